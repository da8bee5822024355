//! 步态层错误类型定义

use crawler_config::ConfigError;
use crawler_driver::DriverError;
use thiserror::Error;

use crate::session::LifecycleState;

/// 步态层错误类型
///
/// 相位和周期索引均从 0 开始。
#[derive(Error, Debug)]
pub enum GaitError {
    /// 驱动层错误（不在步态回放中）
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// 步态回放中某个相位失败（快速失败，剩余相位不再执行）
    #[error("Gait {gait} failed at cycle {cycle}, phase {phase} after {played} phases: {source}")]
    Phase {
        gait: String,
        cycle: u32,
        phase: usize,
        played: usize,
        #[source]
        source: DriverError,
    },

    /// 步态引用了关节表中不存在的关节
    #[error("Gait {gait} references unknown joint {joint}")]
    UnknownJoint { gait: String, joint: String },

    /// 收到停止信号
    #[error("Gait {gait} cancelled before cycle {cycle}, phase {phase} ({played} phases played)")]
    Cancelled {
        gait: String,
        cycle: u32,
        phase: usize,
        played: usize,
    },

    /// 配置或参数错误
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// 非法的生命周期转换
    #[error("Invalid lifecycle transition from {0:?}")]
    Lifecycle(LifecycleState),

    /// 运行失败后关闭也失败
    #[error("{cause}; shutdown also failed: {shutdown}")]
    ShutdownAfterFailure {
        cause: Box<GaitError>,
        shutdown: Box<GaitError>,
    },
}

impl GaitError {
    /// 是否因停止信号而中止
    pub fn is_cancelled(&self) -> bool {
        match self {
            GaitError::Cancelled { .. } => true,
            GaitError::ShutdownAfterFailure { cause, .. } => cause.is_cancelled(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawler_pwm::PwmError;

    #[test]
    fn test_phase_error_display() {
        let err = GaitError::Phase {
            gait: "forward".to_string(),
            cycle: 1,
            phase: 1,
            played: 5,
            source: DriverError::ChannelWrite {
                joint: "left_elbow".to_string(),
                channel: 3,
                source: PwmError::Closed,
            },
        };
        let msg = format!("{}", err);
        assert!(msg.contains("forward"));
        assert!(msg.contains("cycle 1, phase 1"));
        assert!(msg.contains("left_elbow"));
    }

    #[test]
    fn test_is_cancelled() {
        let cancelled = GaitError::Cancelled {
            gait: "forward".to_string(),
            cycle: 0,
            phase: 2,
            played: 2,
        };
        assert!(cancelled.is_cancelled());

        let wrapped = GaitError::ShutdownAfterFailure {
            cause: Box::new(cancelled),
            shutdown: Box::new(GaitError::Driver(DriverError::DriverClosed)),
        };
        assert!(wrapped.is_cancelled());

        assert!(!GaitError::Driver(DriverError::DriverClosed).is_cancelled());
    }

    #[test]
    fn test_from_driver_error() {
        let err: GaitError = DriverError::OutOfRange { angle: 181.0 }.into();
        assert!(matches!(
            err,
            GaitError::Driver(DriverError::OutOfRange { .. })
        ));
    }
}
