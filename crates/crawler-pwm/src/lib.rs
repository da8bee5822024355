//! # Crawler PWM Adapter Layer
//!
//! PWM 输出硬件抽象层。上层只依赖 [`PwmOutput`] trait：
//! 设置频率、按通道写 16 位占空比、释放设备。
//!
//! - Linux: [`Pca9685`]（通过 `/dev/i2c-*` 访问 PCA9685 芯片）
//! - 测试: [`mock::MockPwm`]（需要 `mock` feature）

use thiserror::Error;

#[cfg(target_os = "linux")]
pub mod pca9685;

#[cfg(target_os = "linux")]
pub use pca9685::Pca9685;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

/// PCA9685 默认 I2C 地址
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// 舵机常用 PWM 频率（Hz）
pub const DEFAULT_FREQUENCY_HZ: u32 = 50;

/// PWM 适配层统一错误类型
#[derive(Error, Debug)]
pub enum PwmError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Bus unavailable ({device}): {reason}")]
    BusUnavailable { device: String, reason: String },
    #[error("Invalid channel: {0}")]
    InvalidChannel(u8),
    #[error("PWM output closed")]
    Closed,
    #[error("Device Error: {0}")]
    Device(String),
}

/// PWM 输出能力
///
/// 实现者只负责把占空比写到芯片，不关心关节和角度。
/// 占空比使用 16 位表示（`0..=65535`），由后端换算为芯片分辨率。
pub trait PwmOutput {
    /// 设置 PWM 频率（Hz）
    fn set_frequency(&mut self, frequency_hz: u32) -> Result<(), PwmError>;

    /// 写入单个通道的占空比
    ///
    /// `0` 表示关闭输出（舵机失去保持力矩）。
    fn write_duty(&mut self, channel: u8, duty: u16) -> Result<(), PwmError>;

    /// 释放设备，之后的写入返回 [`PwmError::Closed`]
    fn deinit(&mut self) -> Result<(), PwmError>;

    /// 芯片通道数
    fn channel_count(&self) -> u8 {
        16
    }
}

impl<P: PwmOutput + ?Sized> PwmOutput for Box<P> {
    fn set_frequency(&mut self, frequency_hz: u32) -> Result<(), PwmError> {
        (**self).set_frequency(frequency_hz)
    }

    fn write_duty(&mut self, channel: u8, duty: u16) -> Result<(), PwmError> {
        (**self).write_duty(channel, duty)
    }

    fn deinit(&mut self) -> Result<(), PwmError> {
        (**self).deinit()
    }

    fn channel_count(&self) -> u8 {
        (**self).channel_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pwm_error_display() {
        let err = PwmError::BusUnavailable {
            device: "/dev/i2c-1".to_string(),
            reason: "Permission denied".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("/dev/i2c-1") && msg.contains("Permission denied"));

        assert_eq!(format!("{}", PwmError::InvalidChannel(17)), "Invalid channel: 17");
        assert_eq!(format!("{}", PwmError::Closed), "PWM output closed");
    }

    #[test]
    fn test_boxed_output_forwards() {
        let mock = mock::MockPwm::new();
        let mut boxed: Box<dyn PwmOutput> = Box::new(mock.clone());

        boxed.set_frequency(50).unwrap();
        boxed.write_duty(3, 1234).unwrap();
        boxed.deinit().unwrap();

        assert_eq!(
            mock.events(),
            vec![
                mock::PwmEvent::Frequency(50),
                mock::PwmEvent::Duty {
                    channel: 3,
                    duty: 1234
                },
                mock::PwmEvent::Deinit,
            ]
        );
        assert_eq!(boxed.channel_count(), 16);
    }
}
