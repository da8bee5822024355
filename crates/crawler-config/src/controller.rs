//! # 控制器配置
//!
//! 总线参数、步态节奏与关节表。
//!
//! 配置文件路径由调用方决定（CLI 默认 `~/.config/crawler/config.toml`）。

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::names::{LEFT_ELBOW, LEFT_SHOULDER, RIGHT_ELBOW, RIGHT_SHOULDER};
pub use crate::registry::JointSpec;
use crate::registry::JointRegistry;

/// 控制器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// PWM 总线设置
    #[serde(default)]
    pub bus: BusConfig,

    /// 步态节奏
    #[serde(default)]
    pub gait: GaitTiming,

    /// 关节表
    #[serde(default = "default_joints")]
    pub joints: Vec<JointSpec>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            bus: BusConfig::default(),
            gait: GaitTiming::default(),
            joints: default_joints(),
        }
    }
}

impl ControllerConfig {
    /// 从 TOML 字符串解析（不校验）
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// 从文件加载并校验
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        debug!("Loaded controller config from {}", path.display());
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 校验整个配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bus.frequency_hz == 0 {
            return Err(ConfigError::InvalidFrequency(self.bus.frequency_hz));
        }
        self.gait.delay()?;
        self.registry()?;
        Ok(())
    }

    /// 构造已校验的关节表
    pub fn registry(&self) -> Result<JointRegistry, ConfigError> {
        JointRegistry::new(&self.joints, self.bus.channels, self.bus.duty_shift)
    }
}

/// PWM 总线设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// I2C 设备文件
    pub device: String,

    /// 芯片 I2C 地址
    pub address: u8,

    /// PWM 频率（Hz）
    pub frequency_hz: u32,

    /// 脉宽 tick 到 16 位占空比的左移位数
    ///
    /// 这是芯片属性：PCA9685 的 12 位计数放进 16 位寄存器，左移 4 位。
    pub duty_shift: u8,

    /// 芯片通道数
    pub channels: u8,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            device: "/dev/i2c-1".to_string(),
            address: 0x40,
            frequency_hz: 50,
            duty_shift: 4,
            channels: 16,
        }
    }
}

/// 步态节奏
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitTiming {
    /// 每个相位的保持时间（秒）
    pub delay_secs: f64,

    /// 默认步数
    pub steps: u32,

    /// 平滑过渡（可选，默认关闭）
    pub smoothing: Option<SmoothingConfig>,
}

impl Default for GaitTiming {
    fn default() -> Self {
        Self {
            delay_secs: 0.3,
            steps: 5,
            smoothing: None,
        }
    }
}

impl GaitTiming {
    /// 相位保持时间
    pub fn delay(&self) -> Result<Duration, ConfigError> {
        delay_from_secs(self.delay_secs)
    }
}

/// 秒数转换为保持时间，拒绝非正数、NaN、无穷大
pub fn delay_from_secs(secs: f64) -> Result<Duration, ConfigError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::InvalidDelay(secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidDelay(secs))
}

/// 平滑过渡设置
///
/// 每个关节从上次角度线性插值到目标角度，共 `steps` 步，每步间隔 `interval_ms`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    pub steps: u32,
    pub interval_ms: u64,
}

impl SmoothingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// 参考硬件的关节表
fn default_joints() -> Vec<JointSpec> {
    vec![
        JointSpec::new(RIGHT_SHOULDER, 0, 1000, 2000),
        JointSpec::new(LEFT_SHOULDER, 1, 1000, 2000),
        JointSpec::new(RIGHT_ELBOW, 2, 1000, 2000),
        JointSpec::new(LEFT_ELBOW, 3, 1000, 2000),
    ]
}
