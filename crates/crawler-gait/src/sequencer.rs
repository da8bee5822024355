//! 步态序列器
//!
//! 按顺序回放相位：先下发一个相位的全部关节命令，再保持该相位的时长。
//! 多个周期首尾相接，周期边界没有额外等待。停止信号在每个相位之前检查。
//!
//! ```text
//! Idle --play_gait--> Running --完成/失败/取消--> Idle
//! ```

use crawler_config::SmoothingConfig;
use crawler_driver::{ActuatorDriver, Deg, DriverError, JointCommand};
use crawler_pwm::PwmOutput;
use tracing::{debug, error, info, trace, warn};

use crate::error::GaitError;
use crate::gait::{Gait, Phase};
use crate::pacer::{Pacer, SpinPacer};
use crate::signal::StopSignal;

/// 序列器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    Running,
}

/// 步态序列器
pub struct GaitSequencer<T: Pacer = SpinPacer> {
    pacer: T,
    stop: StopSignal,
    smoothing: Option<SmoothingConfig>,
    state: SequencerState,
}

impl Default for GaitSequencer<SpinPacer> {
    fn default() -> Self {
        let stop = StopSignal::new();
        Self::new(SpinPacer::interruptible(stop.clone()), stop)
    }
}

impl<T: Pacer> GaitSequencer<T> {
    pub fn new(pacer: T, stop: StopSignal) -> Self {
        Self {
            pacer,
            stop,
            smoothing: None,
            state: SequencerState::Idle,
        }
    }

    /// 替换停止信号
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// 启用平滑过渡（`steps <= 1` 等同于关闭）
    pub fn with_smoothing(mut self, smoothing: Option<SmoothingConfig>) -> Self {
        self.smoothing = smoothing.filter(|s| s.steps > 1);
        self
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// 停止信号（克隆后交给中断处理函数）
    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    pub fn pacer(&self) -> &T {
        &self.pacer
    }

    pub fn smoothing(&self) -> Option<SmoothingConfig> {
        self.smoothing
    }

    /// 检查步态中的所有关节都已注册
    pub fn validate<P: PwmOutput>(
        &self,
        driver: &ActuatorDriver<P>,
        gait: &Gait,
    ) -> Result<(), GaitError> {
        let registry = driver.registry();
        for phase in gait.phases() {
            if let Some(joint) = phase.pose().joints().find(|j| !registry.contains(j)) {
                return Err(GaitError::UnknownJoint {
                    gait: gait.name().to_string(),
                    joint: joint.to_string(),
                });
            }
        }
        Ok(())
    }

    /// 回放单个相位
    ///
    /// 整个姿态先完成映射校验，任何关节失败则该相位不产生写入。
    /// 全部命令下发后才开始保持。
    pub fn play_phase<P: PwmOutput>(
        &mut self,
        driver: &mut ActuatorDriver<P>,
        phase: &Phase,
    ) -> Result<(), DriverError> {
        let commands = phase
            .pose()
            .targets()
            .iter()
            .map(|(joint, angle)| driver.prepare(joint, *angle))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(smoothing) = self.smoothing {
            self.approach(driver, &commands, smoothing)?;
        }

        for command in &commands {
            driver.apply(command)?;
        }

        trace!("Phase {} holding for {:?}", phase.name(), phase.hold());
        self.pacer.hold(phase.hold());
        Ok(())
    }

    /// 平滑过渡的中间步：从上次角度线性插值，最后一步由调用方写入目标
    fn approach<P: PwmOutput>(
        &mut self,
        driver: &mut ActuatorDriver<P>,
        commands: &[JointCommand],
        smoothing: SmoothingConfig,
    ) -> Result<(), DriverError> {
        let starts: Vec<(&JointCommand, Deg)> = commands
            .iter()
            .filter_map(|c| {
                driver
                    .last_angle(&c.joint)
                    .filter(|last| *last != c.angle)
                    .map(|last| (c, last))
            })
            .collect();

        if starts.is_empty() {
            return Ok(());
        }

        for step in 1..smoothing.steps {
            let t = step as f64 / smoothing.steps as f64;
            for (command, start) in &starts {
                let intermediate = driver.prepare(&command.joint, start.lerp(command.angle, t))?;
                driver.apply(&intermediate)?;
            }
            self.pacer.hold(smoothing.interval());
        }
        Ok(())
    }

    /// 回放步态 `cycles` 次
    ///
    /// 返回成功回放的相位数。遇到第一个错误立即停止（快速失败），
    /// 错误携带步态名称、周期索引和相位索引（均从 0 开始）。
    /// 收到停止信号时在下一个相位之前返回 `GaitError::Cancelled`。
    pub fn play_gait<P: PwmOutput>(
        &mut self,
        driver: &mut ActuatorDriver<P>,
        gait: &Gait,
        cycles: u32,
    ) -> Result<usize, GaitError> {
        if driver.is_closed() {
            return Err(GaitError::Driver(DriverError::DriverClosed));
        }
        self.validate(driver, gait)?;

        info!(
            "Playing gait {} for {} cycles ({} phases each)",
            gait.name(),
            cycles,
            gait.len()
        );

        self.state = SequencerState::Running;
        let result = self.run_cycles(driver, gait, cycles);
        self.state = SequencerState::Idle;

        if let Ok(played) = result {
            info!("Gait {} complete: {} phases played", gait.name(), played);
        }
        result
    }

    fn run_cycles<P: PwmOutput>(
        &mut self,
        driver: &mut ActuatorDriver<P>,
        gait: &Gait,
        cycles: u32,
    ) -> Result<usize, GaitError> {
        let mut played = 0;

        for cycle in 0..cycles {
            for (index, phase) in gait.phases().iter().enumerate() {
                if self.stop.is_raised() {
                    warn!(
                        "Stop requested, cancelling gait {} at cycle {}, phase {}",
                        gait.name(),
                        cycle,
                        index
                    );
                    return Err(GaitError::Cancelled {
                        gait: gait.name().to_string(),
                        cycle,
                        phase: index,
                        played,
                    });
                }

                debug!(
                    "Gait {} cycle {} phase {} ({})",
                    gait.name(),
                    cycle,
                    index,
                    phase.name()
                );

                self.play_phase(driver, phase).map_err(|source| {
                    error!(
                        "Gait {} aborted at cycle {}, phase {}: {}",
                        gait.name(),
                        cycle,
                        index,
                        source
                    );
                    GaitError::Phase {
                        gait: gait.name().to_string(),
                        cycle,
                        phase: index,
                        played,
                        source,
                    }
                })?;
                played += 1;
            }
        }

        Ok(played)
    }
}
