//! 执行器驱动
//!
//! 唯一持有 PWM 输出句柄的组件，也是唯一调用外部 PWM 接口的组件。
//! 句柄由调用方显式拥有和传递，不存在全局状态；驱动不可克隆，
//! 因此同一时刻只有一个调用持有硬件。

use std::collections::HashMap;

use crawler_config::{Joint, JointRegistry};
use crawler_pwm::PwmOutput;
use tracing::{debug, error, info, trace, warn};

use crate::angle::Deg;
use crate::error::{DriverError, ReleaseFailure};
use crate::mapping::AngleMapper;

/// 驱动状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// 已初始化，可以下发命令
    Active,
    /// 已关闭，所有操作返回 `DriverClosed`
    Closed,
}

/// 已映射、待写入的单关节命令
#[derive(Debug, Clone, PartialEq)]
pub struct JointCommand {
    pub joint: String,
    pub channel: u8,
    pub angle: Deg,
    pub duty: u16,
}

/// 执行器驱动
pub struct ActuatorDriver<P: PwmOutput> {
    pwm: P,
    registry: JointRegistry,
    mapper: AngleMapper,
    state: DriverState,
    /// 每个关节最后一次成功下发的角度
    last_angles: HashMap<String, Deg>,
}

impl<P: PwmOutput> ActuatorDriver<P> {
    /// 初始化驱动：设置 PWM 频率
    ///
    /// # 错误
    ///
    /// - `DriverError::BusUnavailable`: 设置频率失败
    pub fn init(
        mut pwm: P,
        registry: JointRegistry,
        mapper: AngleMapper,
        frequency_hz: u32,
    ) -> Result<Self, DriverError> {
        pwm.set_frequency(frequency_hz).map_err(DriverError::BusUnavailable)?;

        info!(
            "Actuator driver initialized: {} joints, {} Hz, duty shift {}",
            registry.len(),
            frequency_hz,
            mapper.scale().shift()
        );

        Ok(Self {
            pwm,
            registry,
            mapper,
            state: DriverState::Active,
            last_angles: HashMap::new(),
        })
    }

    pub fn registry(&self) -> &JointRegistry {
        &self.registry
    }

    pub fn mapper(&self) -> &AngleMapper {
        &self.mapper
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == DriverState::Closed
    }

    /// 关节最后一次成功下发的角度（释放后清空）
    pub fn last_angle(&self, joint: &str) -> Option<Deg> {
        self.last_angles.get(joint).copied()
    }

    fn ensure_active(&self) -> Result<(), DriverError> {
        match self.state {
            DriverState::Active => Ok(()),
            DriverState::Closed => Err(DriverError::DriverClosed),
        }
    }

    fn joint(&self, name: &str) -> Result<&Joint, DriverError> {
        self.registry
            .get(name)
            .ok_or_else(|| DriverError::UnknownJoint(name.to_string()))
    }

    /// 映射命令但不写硬件
    ///
    /// 用于在写入之前一次性校验整组命令。
    pub fn prepare(&self, joint: &str, angle: Deg) -> Result<JointCommand, DriverError> {
        self.ensure_active()?;
        let j = self.joint(joint)?;
        let duty = self.mapper.duty_for(j, angle)?;
        Ok(JointCommand {
            joint: j.name().to_string(),
            channel: j.channel(),
            angle,
            duty,
        })
    }

    /// 写入一条已映射的命令
    pub fn apply(&mut self, command: &JointCommand) -> Result<(), DriverError> {
        self.ensure_active()?;
        trace!(
            "{} -> {} (ch{} duty={})",
            command.joint, command.angle, command.channel, command.duty
        );
        self.pwm
            .write_duty(command.channel, command.duty)
            .map_err(|source| DriverError::ChannelWrite {
                joint: command.joint.clone(),
                channel: command.channel,
                source,
            })?;
        self.last_angles.insert(command.joint.clone(), command.angle);
        Ok(())
    }

    /// 将关节转到指定角度
    ///
    /// 越界角度返回 `OutOfRange`，且不产生任何硬件写入。
    pub fn set_joint(&mut self, joint: &str, angle: Deg) -> Result<(), DriverError> {
        let command = self.prepare(joint, angle)?;
        self.apply(&command)
    }

    /// 按顺序下发一组目标
    ///
    /// 全部目标先完成映射校验，任何一个失败则整组不写入。
    /// 写入阶段遇到第一个失败立即返回。返回写入条数。
    pub fn set_joints<S: AsRef<str>>(&mut self, targets: &[(S, Deg)]) -> Result<usize, DriverError> {
        let commands = targets
            .iter()
            .map(|(joint, angle)| self.prepare(joint.as_ref(), *angle))
            .collect::<Result<Vec<_>, _>>()?;

        for command in &commands {
            self.apply(command)?;
        }
        Ok(commands.len())
    }

    /// 释放关节（写 0 占空比，舵机失去保持力矩）
    ///
    /// 幂等。
    pub fn release_joint(&mut self, joint: &str) -> Result<(), DriverError> {
        self.ensure_active()?;
        let j = self.joint(joint)?;
        let (name, channel) = (j.name().to_string(), j.channel());

        self.pwm
            .write_duty(channel, 0)
            .map_err(|source| DriverError::ChannelWrite {
                joint: name.clone(),
                channel,
                source,
            })?;
        self.last_angles.remove(&name);
        debug!("Released joint {} (ch{})", name, channel);
        Ok(())
    }

    /// 释放全部关节
    ///
    /// 单个通道失败不会中断：继续释放其余通道，最后汇总返回
    /// `ReleaseFailed`。
    pub fn release_all(&mut self) -> Result<(), DriverError> {
        self.ensure_active()?;
        self.release_all_channels()
    }

    fn release_all_channels(&mut self) -> Result<(), DriverError> {
        let mut failures = Vec::new();

        for joint in self.registry.iter() {
            match self.pwm.write_duty(joint.channel(), 0) {
                Ok(()) => {
                    self.last_angles.remove(joint.name());
                },
                Err(error) => {
                    warn!(
                        "Failed to release joint {} (ch{}): {}. Continuing anyway.",
                        joint.name(),
                        joint.channel(),
                        error
                    );
                    failures.push(ReleaseFailure {
                        joint: joint.name().to_string(),
                        channel: joint.channel(),
                        error,
                    });
                },
            }
        }

        if failures.is_empty() {
            debug!("Released all {} joints", self.registry.len());
            Ok(())
        } else {
            Err(DriverError::ReleaseFailed { failures })
        }
    }

    /// 关闭驱动：释放全部关节，然后释放 PWM 设备
    ///
    /// 重复调用是空操作。关闭后其余操作返回 `DriverClosed`。
    pub fn shutdown(&mut self) -> Result<(), DriverError> {
        if self.is_closed() {
            debug!("Driver already closed, shutdown is a no-op");
            return Ok(());
        }

        info!("Starting actuator driver shutdown");

        let released = self.release_all_channels();
        let deinit = self.pwm.deinit();
        self.state = DriverState::Closed;
        self.last_angles.clear();

        match (released, deinit) {
            (Ok(()), Ok(())) => {
                info!("Actuator driver shutdown complete");
                Ok(())
            },
            (Err(e), Ok(())) => Err(e),
            (Ok(()), Err(e)) => Err(DriverError::Deinit(e)),
            (Err(e), Err(deinit_error)) => {
                error!(
                    "PWM deinit also failed after release failure: {}",
                    deinit_error
                );
                Err(e)
            },
        }
    }
}
