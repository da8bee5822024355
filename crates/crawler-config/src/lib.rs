//! # Crawler Config - 关节表与控制器配置
//!
//! **依赖原则**: 纯数据，不依赖任何硬件 crate
//!
//! ## 包含模块
//!
//! - `registry` - 经过校验的不可变关节表
//! - `controller` - 控制器配置（总线、步态节奏、关节表），TOML 读写
//! - `error` - 配置错误
//!
//! 配置只在启动时加载一次，校验失败时在任何硬件 IO 之前终止。

pub mod controller;
pub mod error;
pub mod registry;

pub use controller::{BusConfig, ControllerConfig, GaitTiming, JointSpec, SmoothingConfig};
pub use error::ConfigError;
pub use registry::{Calibration, Joint, JointRegistry};

/// 标准关节名称
pub mod names {
    pub const LEFT_SHOULDER: &str = "left_shoulder";
    pub const RIGHT_SHOULDER: &str = "right_shoulder";
    pub const LEFT_ELBOW: &str = "left_elbow";
    pub const RIGHT_ELBOW: &str = "right_elbow";
}
