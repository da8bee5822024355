//! 相位节拍
//!
//! 步态回放通过 [`Pacer`] 等待相位保持时间，测试中替换为不实际睡眠的实现。

use std::time::{Duration, Instant};

use crate::signal::StopSignal;

/// 相位之间的等待策略
pub trait Pacer {
    /// 保持当前姿态 `duration`
    fn hold(&mut self, duration: Duration);
}

impl<T: Pacer + ?Sized> Pacer for &mut T {
    fn hold(&mut self, duration: Duration) {
        (**self).hold(duration)
    }
}

/// 停止信号的检查间隔
const STOP_POLL: Duration = Duration::from_millis(10);

/// 实时节拍：使用 `spin_sleep` 获得比 `thread::sleep` 更稳定的时长
///
/// 绑定停止信号后按 [`STOP_POLL`] 分段等待，信号触发时提前返回。
#[derive(Debug, Clone, Default)]
pub struct SpinPacer {
    stop: Option<StopSignal>,
}

impl SpinPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 可被 `stop` 打断的节拍
    pub fn interruptible(stop: StopSignal) -> Self {
        Self { stop: Some(stop) }
    }
}

impl Pacer for SpinPacer {
    fn hold(&mut self, duration: Duration) {
        let Some(stop) = &self.stop else {
            if !duration.is_zero() {
                spin_sleep::sleep(duration);
            }
            return;
        };

        // 超出 Instant 表示范围时一直等到停止
        let deadline = Instant::now().checked_add(duration);
        while !stop.is_raised() {
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => STOP_POLL,
            };
            if remaining.is_zero() {
                break;
            }
            spin_sleep::sleep(remaining.min(STOP_POLL));
        }
    }
}

/// 记录节拍：只记录等待时长，不睡眠
///
/// 可以设置在第 N 次等待之后触发停止信号，模拟回放过程中的外部中断。
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, Default)]
pub struct RecordingPacer {
    holds: Vec<Duration>,
    stop_after: Option<(usize, StopSignal)>,
}

#[cfg(any(test, feature = "mock"))]
impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 第 `n` 次等待结束时触发 `signal`
    pub fn stop_after(mut self, n: usize, signal: StopSignal) -> Self {
        self.stop_after = Some((n, signal));
        self
    }

    /// 已记录的等待时长
    pub fn holds(&self) -> &[Duration] {
        &self.holds
    }

    /// 等待总时长
    pub fn total(&self) -> Duration {
        self.holds.iter().sum()
    }
}

#[cfg(any(test, feature = "mock"))]
impl Pacer for RecordingPacer {
    fn hold(&mut self, duration: Duration) {
        self.holds.push(duration);
        if let Some((n, signal)) = &self.stop_after {
            if self.holds.len() == *n {
                signal.raise();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_recording_pacer() {
        let mut pacer = RecordingPacer::new();
        pacer.hold(Duration::from_millis(100));
        pacer.hold(Duration::from_millis(50));
        assert_eq!(
            pacer.holds(),
            &[Duration::from_millis(100), Duration::from_millis(50)]
        );
        assert_eq!(pacer.total(), Duration::from_millis(150));
    }

    #[test]
    fn test_stop_after() {
        let signal = StopSignal::new();
        let mut pacer = RecordingPacer::new().stop_after(2, signal.clone());

        pacer.hold(Duration::ZERO);
        assert!(!signal.is_raised());
        pacer.hold(Duration::ZERO);
        assert!(signal.is_raised());
    }

    #[test]
    fn test_spin_pacer_waits() {
        let mut pacer = SpinPacer::new();
        let start = Instant::now();
        pacer.hold(Duration::from_millis(5));
        assert!(start.elapsed() >= Duration::from_millis(5));

        let mut pacer = SpinPacer::interruptible(StopSignal::new());
        let start = Instant::now();
        pacer.hold(Duration::from_millis(25));
        assert!(start.elapsed() >= Duration::from_millis(25));
    }

    #[test]
    fn test_spin_pacer_returns_when_stopped() {
        let stop = StopSignal::new();
        let mut pacer = SpinPacer::interruptible(stop.clone());

        let raiser = {
            let stop = stop.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                stop.raise();
            })
        };

        let start = Instant::now();
        pacer.hold(Duration::from_secs(30));
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(stop.is_raised());
        raiser.join().unwrap();

        // 已触发的信号使后续等待立即返回
        let start = Instant::now();
        pacer.hold(Duration::from_secs(30));
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
