//! Mock PWM 输出
//!
//! 记录所有写入，支持注入故障，用于无硬件测试。
//! `MockPwm` 可克隆，克隆体共享同一份状态：测试在把实例交给驱动之前
//! 保留一个克隆作为记录器。

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{PwmError, PwmOutput};

/// 记录的硬件事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmEvent {
    Frequency(u32),
    Duty { channel: u8, duty: u16 },
    Deinit,
}

#[derive(Debug, Default)]
struct MockState {
    events: Vec<PwmEvent>,
    /// 已尝试的占空比写入次数（包括失败的）
    write_attempts: usize,
    /// 第 N 次写入失败（1 起计，只失败一次）
    fail_nth_write: Option<usize>,
    /// 该通道的写入总是失败
    failing_channels: Vec<u8>,
    /// 设置频率失败（模拟总线不可用）
    fail_frequency: bool,
    closed: bool,
}

/// Mock PWM 输出
#[derive(Debug, Clone, Default)]
pub struct MockPwm {
    state: Arc<Mutex<MockState>>,
}

impl MockPwm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 让第 `n` 次占空比写入失败（1 起计）
    pub fn fail_nth_write(&self, n: usize) {
        self.state.lock().fail_nth_write = Some(n);
    }

    /// 让某通道的所有写入失败
    pub fn fail_channel(&self, channel: u8) {
        self.state.lock().failing_channels.push(channel);
    }

    /// 让 `set_frequency` 失败
    pub fn fail_frequency(&self) {
        self.state.lock().fail_frequency = true;
    }

    /// 全部已成功的事件（按发生顺序）
    pub fn events(&self) -> Vec<PwmEvent> {
        self.state.lock().events.clone()
    }

    /// 已成功的占空比写入 `(channel, duty)`
    pub fn duty_writes(&self) -> Vec<(u8, u16)> {
        self.state
            .lock()
            .events
            .iter()
            .filter_map(|e| match *e {
                PwmEvent::Duty { channel, duty } => Some((channel, duty)),
                _ => None,
            })
            .collect()
    }

    /// 已尝试的写入次数（包括注入失败的那次）
    pub fn write_attempts(&self) -> usize {
        self.state.lock().write_attempts
    }

    /// 某通道最后一次写入的占空比
    pub fn last_duty(&self, channel: u8) -> Option<u16> {
        self.duty_writes()
            .into_iter()
            .rev()
            .find(|(ch, _)| *ch == channel)
            .map(|(_, duty)| duty)
    }

    pub fn deinit_count(&self) -> usize {
        self.state
            .lock()
            .events
            .iter()
            .filter(|e| matches!(e, PwmEvent::Deinit))
            .count()
    }

    /// 清空事件记录（保留故障注入设置）
    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }
}

impl PwmOutput for MockPwm {
    fn set_frequency(&mut self, frequency_hz: u32) -> Result<(), PwmError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(PwmError::Closed);
        }
        if state.fail_frequency {
            return Err(PwmError::BusUnavailable {
                device: "mock".to_string(),
                reason: "simulated bus failure".to_string(),
            });
        }
        state.events.push(PwmEvent::Frequency(frequency_hz));
        Ok(())
    }

    fn write_duty(&mut self, channel: u8, duty: u16) -> Result<(), PwmError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(PwmError::Closed);
        }
        if channel >= 16 {
            return Err(PwmError::InvalidChannel(channel));
        }

        state.write_attempts += 1;
        if state.fail_nth_write == Some(state.write_attempts) {
            return Err(PwmError::Device(format!(
                "simulated write failure on channel {}",
                channel
            )));
        }
        if state.failing_channels.contains(&channel) {
            return Err(PwmError::Device(format!(
                "simulated dead channel {}",
                channel
            )));
        }

        state.events.push(PwmEvent::Duty { channel, duty });
        Ok(())
    }

    fn deinit(&mut self) -> Result<(), PwmError> {
        let mut state = self.state.lock();
        state.closed = true;
        state.events.push(PwmEvent::Deinit);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_writes_in_order() {
        let recorder = MockPwm::new();
        let mut pwm = recorder.clone();

        pwm.set_frequency(50).unwrap();
        pwm.write_duty(0, 100).unwrap();
        pwm.write_duty(1, 200).unwrap();

        assert_eq!(recorder.duty_writes(), vec![(0, 100), (1, 200)]);
        assert_eq!(recorder.events()[0], PwmEvent::Frequency(50));
        assert_eq!(recorder.last_duty(1), Some(200));
        assert_eq!(recorder.last_duty(5), None);
    }

    #[test]
    fn test_nth_write_fails_once() {
        let recorder = MockPwm::new();
        let mut pwm = recorder.clone();
        recorder.fail_nth_write(2);

        assert!(pwm.write_duty(0, 1).is_ok());
        assert!(pwm.write_duty(0, 2).is_err());
        assert!(pwm.write_duty(0, 3).is_ok());
        assert_eq!(recorder.write_attempts(), 3);
        assert_eq!(recorder.duty_writes(), vec![(0, 1), (0, 3)]);
    }

    #[test]
    fn test_failing_channel() {
        let recorder = MockPwm::new();
        let mut pwm = recorder.clone();
        recorder.fail_channel(2);

        assert!(pwm.write_duty(2, 0).is_err());
        assert!(pwm.write_duty(3, 0).is_ok());
    }

    #[test]
    fn test_closed_after_deinit() {
        let recorder = MockPwm::new();
        let mut pwm = recorder.clone();

        pwm.deinit().unwrap();
        assert!(matches!(pwm.write_duty(0, 0), Err(PwmError::Closed)));
        assert_eq!(recorder.deinit_count(), 1);
    }

    #[test]
    fn test_frequency_failure() {
        let recorder = MockPwm::new();
        let mut pwm = recorder.clone();
        recorder.fail_frequency();

        assert!(matches!(
            pwm.set_frequency(50),
            Err(PwmError::BusUnavailable { .. })
        ));
        assert!(recorder.events().is_empty());
    }
}
