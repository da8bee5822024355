//! 配置错误类型定义

use thiserror::Error;

/// 配置错误
///
/// 全部在启动时检测，属于致命错误。
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 读写配置文件失败
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML 解析失败
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML 序列化失败
    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// 关节表为空
    #[error("Joint registry is empty")]
    EmptyRegistry,

    /// 关节名称为空或重复
    #[error("Invalid joint name: {0:?}")]
    InvalidName(String),

    #[error("Duplicate joint name: {0}")]
    DuplicateName(String),

    /// 两个关节共用同一通道
    #[error("Duplicate channel {channel}: used by {first} and {second}")]
    DuplicateChannel {
        channel: u8,
        first: String,
        second: String,
    },

    /// 通道超出芯片通道数
    #[error("Joint {joint}: channel {channel} out of range (chip has {channels} channels)")]
    ChannelOutOfRange {
        joint: String,
        channel: u8,
        channels: u8,
    },

    /// 脉宽范围无效（min >= max）
    #[error("Joint {joint}: invalid pulse range [{min_pulse}, {max_pulse}]")]
    InvalidRange {
        joint: String,
        min_pulse: u16,
        max_pulse: u16,
    },

    /// 最大脉宽左移后超出 16 位占空比寄存器
    #[error("Joint {joint}: max pulse {max_pulse} << {shift} overflows 16-bit duty")]
    DutyOverflow {
        joint: String,
        max_pulse: u16,
        shift: u8,
    },

    /// PWM 频率无效
    #[error("Invalid PWM frequency: {0} Hz")]
    InvalidFrequency(u32),

    /// 相位保持时间无效
    #[error("Invalid phase delay: {0} s (must be positive and finite)")]
    InvalidDelay(f64),
}
