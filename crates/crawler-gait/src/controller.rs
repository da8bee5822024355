//! 控制器：面向调用方的步态接口
//!
//! 组合 [`Session`] 与 [`GaitSequencer`]。任何一次步态回放失败（包括被停止信号取消）
//! 都会立即关闭会话：关节停在最后一次成功下发的姿态，然后全部释放。
//! 参数错误（如非法的相位时长）在运动开始前被拒绝，不会关闭会话。

use crawler_config::{ControllerConfig, JointRegistry, SmoothingConfig, controller::delay_from_secs};
use crawler_driver::{ActuatorDriver, Deg, DriverBuilder};
use crawler_pwm::PwmOutput;
use tracing::{info, warn};

use crate::error::GaitError;
use crate::gait::Gait;
use crate::library::{self, TurnDirection};
use crate::pacer::{Pacer, SpinPacer};
use crate::sequencer::GaitSequencer;
use crate::session::{LifecycleState, Session, combine};
use crate::signal::StopSignal;

/// 步态控制器
pub struct Controller<P: PwmOutput, T: Pacer = SpinPacer> {
    session: Session<P>,
    sequencer: GaitSequencer<T>,
}

impl<P: PwmOutput> Controller<P> {
    /// 接管驱动，实时节拍（停止信号可打断正在进行的保持）
    pub fn new(driver: ActuatorDriver<P>) -> Self {
        let stop = StopSignal::new();
        Self::with_pacer(driver, SpinPacer::interruptible(stop.clone())).with_stop_signal(stop)
    }
}

impl<P: PwmOutput, T: Pacer> Controller<P, T> {
    pub fn with_pacer(driver: ActuatorDriver<P>, pacer: T) -> Self {
        Self {
            session: Session::open(driver),
            sequencer: GaitSequencer::new(pacer, StopSignal::new()),
        }
    }

    /// 按配置初始化驱动并创建控制器
    ///
    /// 配置（关节表、频率）在任何硬件写入之前校验。
    pub fn open(config: &ControllerConfig, pwm: P, pacer: T) -> Result<Self, GaitError> {
        config.validate()?;
        let builder = DriverBuilder::from_config(config)?;

        let mut session = Session::new();
        session.initialize(|| builder.build_with(pwm))?;

        Ok(Self {
            session,
            sequencer: GaitSequencer::new(pacer, StopSignal::new())
                .with_smoothing(config.gait.smoothing),
        })
    }

    pub fn with_smoothing(mut self, smoothing: Option<SmoothingConfig>) -> Self {
        self.sequencer = self.sequencer.with_smoothing(smoothing);
        self
    }

    /// 使用外部创建的停止信号（例如已经交给 Ctrl+C 处理函数的那个）
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.sequencer = self.sequencer.with_stop_signal(stop);
        self
    }

    /// 停止信号的句柄，可交给中断处理函数
    pub fn stop_signal(&self) -> StopSignal {
        self.sequencer.stop_signal().clone()
    }

    pub fn session(&self) -> &Session<P> {
        &self.session
    }

    pub fn sequencer(&self) -> &GaitSequencer<T> {
        &self.sequencer
    }

    pub fn state(&self) -> LifecycleState {
        self.session.state()
    }

    fn registry(&self) -> Result<&JointRegistry, GaitError> {
        match self.session.driver() {
            Some(driver) if self.state() == LifecycleState::Initialized => Ok(driver.registry()),
            _ => Err(GaitError::Lifecycle(self.state())),
        }
    }

    /// 前进 `steps` 个周期，每个相位保持 `delay_secs` 秒
    ///
    /// 返回回放的相位数（`steps * 4`）。
    pub fn walk_forward(&mut self, steps: u32, delay_secs: f64) -> Result<usize, GaitError> {
        let hold = delay_from_secs(delay_secs)?;
        self.play(&library::forward(hold), steps)
    }

    pub fn turn_left(&mut self, steps: u32, delay_secs: f64) -> Result<usize, GaitError> {
        self.turn(TurnDirection::Left, steps, delay_secs)
    }

    pub fn turn_right(&mut self, steps: u32, delay_secs: f64) -> Result<usize, GaitError> {
        self.turn(TurnDirection::Right, steps, delay_secs)
    }

    pub fn turn(
        &mut self,
        direction: TurnDirection,
        steps: u32,
        delay_secs: f64,
    ) -> Result<usize, GaitError> {
        let hold = delay_from_secs(delay_secs)?;
        self.play(&library::turn(direction, hold), steps)
    }

    /// 所有关节回到 90°
    pub fn neutral(&mut self, delay_secs: f64) -> Result<usize, GaitError> {
        let hold = delay_from_secs(delay_secs)?;
        let gait = library::neutral(self.registry()?, hold);
        self.play(&gait, 1)
    }

    /// 舵机自检：每个关节依次 0°、90°、180°、90°
    pub fn self_test(&mut self, delay_secs: f64) -> Result<usize, GaitError> {
        let hold = delay_from_secs(delay_secs)?;
        let gait = library::self_test(self.registry()?, hold);
        self.play(&gait, 1)
    }

    /// 回放任意步态；失败时立即关闭会话
    pub fn play(&mut self, gait: &Gait, cycles: u32) -> Result<usize, GaitError> {
        let driver = self.session.driver_mut()?;

        match self.sequencer.play_gait(driver, gait, cycles) {
            Ok(played) => Ok(played),
            Err(cause) => {
                if cause.is_cancelled() {
                    info!("Gait {} stopped on request, releasing joints", gait.name());
                } else {
                    warn!("Gait {} failed, releasing joints: {}", gait.name(), cause);
                }
                let shutdown = self.session.shutdown();
                Err(combine(cause, shutdown))
            },
        }
    }

    /// 单关节命令（校准用）
    ///
    /// 失败不会关闭会话。
    pub fn set_joint(&mut self, joint: &str, angle: impl Into<Deg>) -> Result<(), GaitError> {
        self.session.driver_mut()?.set_joint(joint, angle.into())?;
        Ok(())
    }

    /// 释放全部关节，会话保持打开
    pub fn release_all(&mut self) -> Result<(), GaitError> {
        self.session.driver_mut()?.release_all()?;
        Ok(())
    }

    /// 关闭会话（幂等）
    pub fn shutdown(&mut self) -> Result<(), GaitError> {
        self.session.shutdown()
    }
}
