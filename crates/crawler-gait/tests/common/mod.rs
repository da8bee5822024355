//! 测试辅助函数

#![allow(dead_code)]

use std::time::Duration;

use crawler_config::ControllerConfig;
use crawler_gait::{Controller, RecordingPacer};
use crawler_pwm::mock::MockPwm;

pub const LEFT_SHOULDER_CH: u8 = 1;
pub const RIGHT_SHOULDER_CH: u8 = 0;
pub const LEFT_ELBOW_CH: u8 = 3;
pub const RIGHT_ELBOW_CH: u8 = 2;

/// 参考关节表（1000..2000 tick）下各角度的脉宽
pub const TICKS_20: u16 = 1111;
pub const TICKS_40: u16 = 1222;
pub const TICKS_90: u16 = 1500;
pub const TICKS_140: u16 = 1778;
pub const TICKS_160: u16 = 1889;

/// 默认配置 + 记录节拍的控制器，返回 PWM 记录器（已清除初始化事件）
pub fn controller() -> (Controller<MockPwm, RecordingPacer>, MockPwm) {
    controller_with(RecordingPacer::new())
}

pub fn controller_with(pacer: RecordingPacer) -> (Controller<MockPwm, RecordingPacer>, MockPwm) {
    let recorder = MockPwm::new();
    let controller = Controller::open(&ControllerConfig::default(), recorder.clone(), pacer)
        .expect("default config should open");
    recorder.clear_events();
    (controller, recorder)
}

/// 占空比写入转换为脉宽 tick `(channel, ticks)`
pub fn tick_writes(recorder: &MockPwm) -> Vec<(u8, u16)> {
    recorder
        .duty_writes()
        .into_iter()
        .map(|(ch, duty)| (ch, duty >> 4))
        .collect()
}

/// 某通道的非零脉宽序列
pub fn channel_ticks(recorder: &MockPwm, channel: u8) -> Vec<u16> {
    tick_writes(recorder)
        .into_iter()
        .filter(|(ch, ticks)| *ch == channel && *ticks != 0)
        .map(|(_, ticks)| ticks)
        .collect()
}

/// 某通道写 0（释放）的次数
pub fn release_count(recorder: &MockPwm, channel: u8) -> usize {
    recorder
        .duty_writes()
        .iter()
        .filter(|(ch, duty)| *ch == channel && *duty == 0)
        .count()
}

/// 前进步态一个周期的写入序列
pub fn forward_cycle() -> Vec<(u8, u16)> {
    vec![
        // reach
        (LEFT_SHOULDER_CH, TICKS_40),
        (RIGHT_SHOULDER_CH, TICKS_140),
        (LEFT_ELBOW_CH, TICKS_90),
        (RIGHT_ELBOW_CH, TICKS_90),
        // grip
        (LEFT_ELBOW_CH, TICKS_20),
        (RIGHT_ELBOW_CH, TICKS_160),
        // pull
        (LEFT_SHOULDER_CH, TICKS_140),
        (RIGHT_SHOULDER_CH, TICKS_40),
        // reset
        (LEFT_ELBOW_CH, TICKS_90),
        (RIGHT_ELBOW_CH, TICKS_90),
    ]
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
