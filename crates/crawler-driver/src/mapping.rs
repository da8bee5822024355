//! 角度映射
//!
//! 逻辑角度 → 脉宽 tick → 16 位占空比：
//!
//! ```text
//! pulse = min_pulse + (angle / 180) * (max_pulse - min_pulse)   （四舍五入）
//! duty  = pulse << shift                                         （芯片属性）
//! ```

use crawler_config::Joint;

use crate::angle::Deg;
use crate::error::DriverError;

/// 计算关节在给定角度下的脉宽（tick）
///
/// # 错误
///
/// - `DriverError::OutOfRange`: 角度不在 [0, 180] 内
pub fn pulse_for(joint: &Joint, angle: Deg) -> Result<u16, DriverError> {
    if !angle.is_valid() {
        return Err(DriverError::OutOfRange { angle: angle.0 });
    }

    let calibration = joint.calibration();
    let pulse = calibration.min_pulse as f64 + (angle.0 / 180.0) * calibration.span() as f64;
    Ok(pulse.round() as u16)
}

/// 镜像变换 `180 - angle`
#[inline]
pub fn mirror(angle: Deg) -> Deg {
    angle.mirror()
}

/// 脉宽到占空比寄存器的缩放
///
/// PCA9685 的 12 位计数放在 16 位占空比中，左移 4 位。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyScale {
    shift: u8,
}

impl DutyScale {
    pub const fn new(shift: u8) -> Self {
        Self { shift }
    }

    /// PCA9685（12 位分辨率）
    pub const fn pca9685() -> Self {
        Self::new(4)
    }

    pub fn shift(&self) -> u8 {
        self.shift
    }

    /// 脉宽转换为占空比
    pub fn to_duty(&self, pulse: u16) -> Result<u16, DriverError> {
        (pulse as u32)
            .checked_shl(self.shift as u32)
            .and_then(|duty| u16::try_from(duty).ok())
            .ok_or(DriverError::DutyOverflow {
                pulse,
                shift: self.shift,
            })
    }
}

impl Default for DutyScale {
    fn default() -> Self {
        Self::pca9685()
    }
}

/// 角度映射器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AngleMapper {
    scale: DutyScale,
}

impl AngleMapper {
    pub fn new(scale: DutyScale) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> DutyScale {
        self.scale
    }

    /// 关节在给定角度下的占空比
    pub fn duty_for(&self, joint: &Joint, angle: Deg) -> Result<u16, DriverError> {
        self.scale.to_duty(pulse_for(joint, angle)?)
    }
}
