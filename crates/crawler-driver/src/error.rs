//! 驱动层错误类型定义

use std::fmt;

use crawler_config::ConfigError;
use crawler_pwm::PwmError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 角度超出 [0, 180]
    ///
    /// 不会被静默钳位：钳位会掩盖步态定义或标定中的错误。
    #[error("Angle {angle} out of range [0, 180]")]
    OutOfRange { angle: f64 },

    /// 关节表中不存在该关节
    #[error("Unknown joint: {0}")]
    UnknownJoint(String),

    /// 脉宽左移后放不进 16 位占空比
    #[error("Pulse {pulse} << {shift} overflows 16-bit duty")]
    DutyOverflow { pulse: u16, shift: u8 },

    /// 打开总线或设置频率失败
    #[error("PWM bus unavailable: {0}")]
    BusUnavailable(#[source] PwmError),

    /// 通道写入失败
    #[error("Write to joint {joint} (channel {channel}) failed: {source}")]
    ChannelWrite {
        joint: String,
        channel: u8,
        #[source]
        source: PwmError,
    },

    /// 驱动已关闭
    #[error("Driver closed")]
    DriverClosed,

    /// 释放关节时有通道失败（其余通道已尽量释放）
    #[error("Failed to release {} joint(s): {}", .failures.len(), join_failures(.failures))]
    ReleaseFailed { failures: Vec<ReleaseFailure> },

    /// 释放 PWM 设备失败
    #[error("Failed to deinitialize PWM output: {0}")]
    Deinit(#[source] PwmError),

    /// 配置错误
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// 单个通道的释放失败
#[derive(Debug)]
pub struct ReleaseFailure {
    pub joint: String,
    pub channel: u8,
    pub error: PwmError,
}

impl fmt::Display for ReleaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (channel {}): {}", self.joint, self.channel, self.error)
    }
}

fn join_failures(failures: &[ReleaseFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
