//! 生命周期管理
//!
//! [`Session`] 持有唯一的 [`ActuatorDriver`]，保证无论运行如何结束
//! （正常返回、错误、外部中断、panic），驱动都恰好关闭一次。
//!
//! ```text
//! Uninitialized --initialize/open--> Initialized --shutdown--> ShuttingDown --> Closed
//! ```
//!
//! 关闭发生在以下任一位置，先到者生效，其余为空操作：
//! - 显式调用 [`Session::shutdown`]
//! - [`Session::run`] 的作用域结束
//! - `Drop`

use crawler_driver::{ActuatorDriver, DriverError};
use crawler_pwm::PwmOutput;
use tracing::{debug, error, info};

use crate::error::GaitError;

/// 生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initialized,
    ShuttingDown,
    Closed,
}

/// 驱动会话
pub struct Session<P: PwmOutput> {
    state: LifecycleState,
    driver: Option<ActuatorDriver<P>>,
}

impl<P: PwmOutput> Default for Session<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PwmOutput> Session<P> {
    /// 尚未持有驱动的会话
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            driver: None,
        }
    }

    /// 接管已初始化的驱动
    pub fn open(driver: ActuatorDriver<P>) -> Self {
        info!("Session opened");
        Self {
            state: LifecycleState::Initialized,
            driver: Some(driver),
        }
    }

    /// 通过 `init` 获取驱动
    ///
    /// 只能在 `Uninitialized` 状态调用。`init` 失败时会话保持未初始化，
    /// 不会产生任何关闭动作。
    pub fn initialize<F>(&mut self, init: F) -> Result<(), GaitError>
    where
        F: FnOnce() -> Result<ActuatorDriver<P>, DriverError>,
    {
        if self.state != LifecycleState::Uninitialized {
            return Err(GaitError::Lifecycle(self.state));
        }

        let driver = init()?;
        self.driver = Some(driver);
        self.state = LifecycleState::Initialized;
        info!("Session initialized");
        Ok(())
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn driver(&self) -> Option<&ActuatorDriver<P>> {
        self.driver.as_ref()
    }

    /// 可用的驱动
    ///
    /// # 错误
    ///
    /// - 未初始化：`GaitError::Lifecycle(Uninitialized)`
    /// - 已关闭：`GaitError::Driver(DriverClosed)`
    pub fn driver_mut(&mut self) -> Result<&mut ActuatorDriver<P>, GaitError> {
        match (self.state, self.driver.as_mut()) {
            (LifecycleState::Initialized, Some(driver)) => Ok(driver),
            (LifecycleState::Uninitialized, _) => {
                Err(GaitError::Lifecycle(LifecycleState::Uninitialized))
            },
            _ => Err(GaitError::Driver(DriverError::DriverClosed)),
        }
    }

    /// 关闭会话：释放全部关节并关闭驱动
    ///
    /// 只有第一次调用生效，之后是空操作。关闭失败同样会进入 `Closed`。
    pub fn shutdown(&mut self) -> Result<(), GaitError> {
        match self.state {
            LifecycleState::Initialized => {},
            LifecycleState::Uninitialized => {
                debug!("Session closed before initialization");
                self.state = LifecycleState::Closed;
                return Ok(());
            },
            LifecycleState::ShuttingDown | LifecycleState::Closed => {
                debug!("Session already closed, shutdown is a no-op");
                return Ok(());
            },
        }

        self.state = LifecycleState::ShuttingDown;
        let result = match self.driver.as_mut() {
            Some(driver) => driver.shutdown().map_err(GaitError::from),
            None => Ok(()),
        };
        self.state = LifecycleState::Closed;

        match &result {
            Ok(()) => info!("Session closed"),
            Err(e) => error!("Session closed with errors: {}", e),
        }
        result
    }

    /// 在作用域内使用驱动，作用域结束时无论结果如何都关闭会话
    ///
    /// `f` 的错误优先返回；若关闭也失败，两者合并为
    /// `GaitError::ShutdownAfterFailure`。
    pub fn run<R, F>(&mut self, f: F) -> Result<R, GaitError>
    where
        F: FnOnce(&mut ActuatorDriver<P>) -> Result<R, GaitError>,
    {
        let outcome = self.driver_mut().and_then(f);
        let shutdown = self.shutdown();

        match outcome {
            Ok(value) => shutdown.map(|()| value),
            Err(cause) => Err(combine(cause, shutdown)),
        }
    }
}

impl<P: PwmOutput> Drop for Session<P> {
    fn drop(&mut self) {
        if self.state == LifecycleState::Initialized {
            debug!("Session dropped while initialized, shutting down");
            // shutdown 已记录错误日志
            let _ = self.shutdown();
        }
    }
}

/// 合并运行错误与随后的关闭结果
pub(crate) fn combine(cause: GaitError, shutdown: Result<(), GaitError>) -> GaitError {
    match shutdown {
        Ok(()) => cause,
        Err(shutdown) => GaitError::ShutdownAfterFailure {
            cause: Box::new(cause),
            shutdown: Box::new(shutdown),
        },
    }
}
