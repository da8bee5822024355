//! 驱动层模块
//!
//! 本模块提供舵机关节的驱动功能，包括：
//! - 强类型角度（[`Deg`]）与镜像变换
//! - 角度到脉宽/占空比的映射（[`AngleMapper`]）
//! - 唯一持有 PWM 输出句柄的执行器驱动（[`ActuatorDriver`]）
//!
//! # 使用场景
//!
//! 适用于需要逐个关节下发角度的场景。
//! 步态回放请使用 `crawler-gait` 提供的更高级接口。

mod angle;
mod builder;
mod driver;
mod error;
pub mod mapping;

pub use angle::Deg;
pub use builder::DriverBuilder;
pub use driver::{ActuatorDriver, DriverState, JointCommand};
pub use error::{DriverError, ReleaseFailure};
pub use mapping::{AngleMapper, DutyScale, mirror, pulse_for};

// 重新导出配置层常用类型
pub use crawler_config::{Joint, JointRegistry};
