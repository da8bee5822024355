//! 停止信号
//!
//! 外部中断（如 Ctrl+C 处理函数）设置标志，步态回放在相位之间检查。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 可跨线程共享的停止标志
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    raised: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求停止
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// 清除停止请求
    pub fn reset(&self) {
        self.raised.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let signal = StopSignal::new();
        let handler_copy = signal.clone();
        assert!(!signal.is_raised());

        handler_copy.raise();
        assert!(signal.is_raised());

        signal.reset();
        assert!(!handler_copy.is_raised());
    }

    #[test]
    fn test_raise_from_other_thread() {
        let signal = StopSignal::new();
        let remote = signal.clone();
        std::thread::spawn(move || remote.raise()).join().unwrap();
        assert!(signal.is_raised());
    }
}
