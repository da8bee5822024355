//! 生命周期集成测试
//!
//! 失败、取消、panic 等退出路径都必须恰好释放一次全部关节并关闭驱动。

mod common;

use std::thread;
use std::time::{Duration, Instant};

use common::*;
use crawler_config::ControllerConfig;
use crawler_driver::DriverError;
use crawler_gait::{Controller, GaitError, LifecycleState, RecordingPacer, SpinPacer, StopSignal};
use crawler_pwm::PwmError;
use crawler_pwm::mock::MockPwm;

#[test]
fn test_write_failure_mid_cycle_releases_everything_once() {
    let (mut controller, recorder) = controller();
    // 第 2 周期第 2 相位的第一次写入（每周期 10 次写入）
    recorder.fail_nth_write(15);

    let result = controller.walk_forward(3, 0.1);

    match result {
        Err(GaitError::Phase {
            gait,
            cycle,
            phase,
            played,
            source: DriverError::ChannelWrite { joint, channel, source },
        }) => {
            assert_eq!(gait, "forward");
            assert_eq!((cycle, phase, played), (1, 1, 5));
            assert_eq!(joint, "left_elbow");
            assert_eq!(channel, LEFT_ELBOW_CH);
            assert!(matches!(source, PwmError::Device(_)));
        },
        other => panic!("Expected Phase error, got {:?}", other),
    }

    // 剩余相位没有执行：成功的运动写入只有 14 条
    let motion: Vec<_> = tick_writes(&recorder)
        .into_iter()
        .filter(|(_, ticks)| *ticks != 0)
        .collect();
    assert_eq!(motion.len(), 14);
    assert_eq!(&motion[..10], forward_cycle().as_slice());

    for channel in [0, 1, 2, 3] {
        assert_eq!(release_count(&recorder, channel), 1, "channel {}", channel);
        assert_eq!(recorder.last_duty(channel), Some(0));
    }
    assert_eq!(recorder.deinit_count(), 1);
    assert_eq!(controller.state(), LifecycleState::Closed);

    // 之后的关闭和 Drop 都是空操作
    controller.shutdown().unwrap();
    drop(controller);
    assert_eq!(recorder.deinit_count(), 1);
    for channel in [0, 1, 2, 3] {
        assert_eq!(release_count(&recorder, channel), 1);
    }
}

#[test]
fn test_stop_signal_cancels_between_phases() {
    let stop = StopSignal::new();
    let (controller, recorder) = controller_with(RecordingPacer::new().stop_after(6, stop.clone()));
    let mut controller = controller.with_stop_signal(stop);

    let err = controller.walk_forward(5, 0.1).unwrap_err();
    assert!(err.is_cancelled());
    match err {
        GaitError::Cancelled {
            gait,
            cycle,
            phase,
            played,
        } => {
            assert_eq!(gait, "forward");
            assert_eq!((cycle, phase, played), (1, 2, 6));
        },
        other => panic!("Expected Cancelled, got {:?}", other),
    }

    let motion = tick_writes(&recorder)
        .into_iter()
        .filter(|(_, ticks)| *ticks != 0)
        .count();
    assert_eq!(motion, 16);
    for channel in [0, 1, 2, 3] {
        assert_eq!(release_count(&recorder, channel), 1);
    }
    assert_eq!(recorder.deinit_count(), 1);
    assert_eq!(controller.state(), LifecycleState::Closed);
}

#[test]
fn test_stop_signal_from_another_thread() {
    let (controller, recorder) = controller();
    let stop = controller.stop_signal();
    let mut controller = controller;

    std::thread::spawn(move || stop.raise()).join().unwrap();

    let err = controller.turn_left(2, 0.1).unwrap_err();
    assert!(err.is_cancelled());
    assert!(recorder.duty_writes().iter().all(|(_, duty)| *duty == 0));
    assert_eq!(recorder.deinit_count(), 1);
}

#[test]
fn test_stop_signal_interrupts_long_hold() {
    let stop = StopSignal::new();
    let recorder = MockPwm::new();
    let mut controller = Controller::open(
        &ControllerConfig::default(),
        recorder.clone(),
        SpinPacer::interruptible(stop.clone()),
    )
    .unwrap()
    .with_stop_signal(stop.clone());
    recorder.clear_events();

    let raiser = thread::spawn(move || {
        thread::sleep(ms(50));
        stop.raise();
    });

    let start = Instant::now();
    let err = controller.walk_forward(5, 10.0).unwrap_err();
    raiser.join().unwrap();

    // 第一个相位的 10 秒保持被打断，第二个相位未下发
    assert!(start.elapsed() < Duration::from_secs(5));
    match err {
        GaitError::Cancelled {
            cycle,
            phase,
            played,
            ..
        } => assert_eq!((cycle, phase, played), (0, 1, 1)),
        other => panic!("Expected Cancelled, got {:?}", other),
    }
    for channel in [0, 1, 2, 3] {
        assert_eq!(release_count(&recorder, channel), 1);
    }
    assert_eq!(recorder.deinit_count(), 1);
    assert_eq!(controller.state(), LifecycleState::Closed);
}

#[test]
fn test_release_failure_during_shutdown_is_aggregated() {
    let (mut controller, recorder) = controller();
    controller.walk_forward(1, 0.1).unwrap();
    recorder.fail_channel(2);

    match controller.shutdown() {
        Err(GaitError::Driver(DriverError::ReleaseFailed { failures })) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].joint, "right_elbow");
        },
        other => panic!("Expected ReleaseFailed, got {:?}", other),
    }

    // 坏通道之外的关节都已释放，驱动仍然关闭
    for channel in [0, 1, 3] {
        assert_eq!(recorder.last_duty(channel), Some(0));
    }
    assert_eq!(recorder.deinit_count(), 1);
    assert_eq!(controller.state(), LifecycleState::Closed);
}

#[test]
fn test_panic_while_holding_controller_releases() {
    let (controller, recorder) = controller();
    let controller = std::panic::AssertUnwindSafe(controller);

    let result = std::panic::catch_unwind(move || {
        let _owned = controller;
        panic!("caller bug");
    });

    assert!(result.is_err());
    assert_eq!(recorder.deinit_count(), 1);
    for channel in [0, 1, 2, 3] {
        assert_eq!(release_count(&recorder, channel), 1);
    }
}
