//! # Crawler Gait
//!
//! 步态层：把"向前走 N 步"、"右转 N 步"这类意图转换为按时间排列的关节角度命令。
//!
//! ## 数据
//!
//! - [`Pose`]：一组关节目标角度（可以只包含部分关节）
//! - [`Phase`]：一个 Pose 加保持时间，步态的原子步骤
//! - [`Gait`]：有序的 Phase 序列，循环回放产生一个运动单位
//!
//! ## 执行
//!
//! - [`GaitSequencer`]：按顺序回放相位，相位之间检查停止信号
//! - [`Session`]：生命周期管理，保证任何退出路径都恰好关闭一次驱动
//! - [`Controller`]：面向调用方的接口（`walk_forward` / `turn_left` / `turn_right`）
//!
//! # 示例
//!
//! ```rust,ignore
//! use crawler_driver::DriverBuilder;
//! use crawler_gait::Controller;
//!
//! let driver = DriverBuilder::new().build()?;
//! let mut controller = Controller::new(driver);
//! controller.walk_forward(5, 0.3)?;
//! controller.turn_right(2, 0.3)?;
//! controller.shutdown()?;
//! ```

pub mod controller;
mod error;
pub mod gait;
pub mod library;
pub mod pacer;
pub mod pose;
pub mod sequencer;
pub mod session;
mod signal;

pub use controller::Controller;
pub use error::GaitError;
pub use gait::{Gait, Phase};
pub use library::TurnDirection;
pub use pacer::{Pacer, SpinPacer};
#[cfg(any(test, feature = "mock"))]
pub use pacer::RecordingPacer;
pub use pose::{LimbTarget, Pose};
pub use sequencer::{GaitSequencer, SequencerState};
pub use session::{LifecycleState, Session};
pub use signal::StopSignal;

// 重新导出常用类型
pub use crawler_config::names;
pub use crawler_driver::Deg;
