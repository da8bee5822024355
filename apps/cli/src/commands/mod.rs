//! 命令定义和实现

pub mod config;
pub mod gait;
pub mod joint;

pub use config::ConfigCommand;
pub use gait::{DelayArgs, GaitArgs, Motion};
pub use joint::SetCommand;
