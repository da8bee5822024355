//! 关节表
//!
//! 启动时从 [`JointSpec`] 列表校验构造，之后不可变。
//! 校验规则：名称非空且唯一、通道唯一且在芯片范围内、`min_pulse < max_pulse`、
//! `max_pulse << duty_shift` 能放进 16 位占空比寄存器。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 关节配置条目（文件格式）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointSpec {
    /// 关节名称（如 "left_shoulder"）
    pub name: String,
    /// PWM 通道
    pub channel: u8,
    /// 0° 对应的脉宽（tick）
    pub min_pulse: u16,
    /// 180° 对应的脉宽（tick）
    pub max_pulse: u16,
}

impl JointSpec {
    pub fn new(name: impl Into<String>, channel: u8, min_pulse: u16, max_pulse: u16) -> Self {
        Self {
            name: name.into(),
            channel,
            min_pulse,
            max_pulse,
        }
    }
}

/// 脉宽标定范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub min_pulse: u16,
    pub max_pulse: u16,
}

impl Calibration {
    /// 脉宽跨度（tick）
    pub fn span(&self) -> u16 {
        self.max_pulse - self.min_pulse
    }
}

/// 已校验的关节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joint {
    name: String,
    channel: u8,
    calibration: Calibration,
}

impl Joint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }
}

/// 不可变关节表
///
/// 迭代顺序与配置中的顺序一致。
#[derive(Debug, Clone)]
pub struct JointRegistry {
    joints: Vec<Joint>,
    index: HashMap<String, usize>,
}

impl JointRegistry {
    /// 校验并构造关节表
    ///
    /// # 参数
    ///
    /// - `specs`: 关节配置
    /// - `channels`: 芯片通道数
    /// - `duty_shift`: 脉宽到占空比的左移位数
    pub fn new(specs: &[JointSpec], channels: u8, duty_shift: u8) -> Result<Self, ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }

        let mut joints = Vec::with_capacity(specs.len());
        let mut index = HashMap::with_capacity(specs.len());
        let mut channel_owner: HashMap<u8, &str> = HashMap::new();

        for spec in specs {
            let name = spec.name.trim();
            if name.is_empty() || name != spec.name {
                return Err(ConfigError::InvalidName(spec.name.clone()));
            }
            if index.contains_key(name) {
                return Err(ConfigError::DuplicateName(spec.name.clone()));
            }
            if spec.channel >= channels {
                return Err(ConfigError::ChannelOutOfRange {
                    joint: spec.name.clone(),
                    channel: spec.channel,
                    channels,
                });
            }
            if let Some(first) = channel_owner.insert(spec.channel, spec.name.as_str()) {
                return Err(ConfigError::DuplicateChannel {
                    channel: spec.channel,
                    first: first.to_string(),
                    second: spec.name.clone(),
                });
            }
            if spec.min_pulse >= spec.max_pulse {
                return Err(ConfigError::InvalidRange {
                    joint: spec.name.clone(),
                    min_pulse: spec.min_pulse,
                    max_pulse: spec.max_pulse,
                });
            }
            let max_duty = (spec.max_pulse as u32).checked_shl(duty_shift as u32);
            if !max_duty.is_some_and(|duty| duty <= u16::MAX as u32) {
                return Err(ConfigError::DutyOverflow {
                    joint: spec.name.clone(),
                    max_pulse: spec.max_pulse,
                    shift: duty_shift,
                });
            }

            index.insert(spec.name.clone(), joints.len());
            joints.push(Joint {
                name: spec.name.clone(),
                channel: spec.channel,
                calibration: Calibration {
                    min_pulse: spec.min_pulse,
                    max_pulse: spec.max_pulse,
                },
            });
        }

        Ok(Self { joints, index })
    }

    /// 按名称查找关节
    pub fn get(&self, name: &str) -> Option<&Joint> {
        self.index.get(name).map(|&i| &self.joints[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.joints.iter().map(|j| j.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}
