//! 单关节命令：set / release

use anyhow::{Context, Result};
use clap::Args;
use crawler_config::{ControllerConfig, controller::delay_from_secs};
use crawler_gait::{Pacer, SpinPacer};

use crate::hardware;

/// 把单个关节转到指定角度（校准用）
#[derive(Args, Debug, Clone)]
pub struct SetCommand {
    /// 关节名称（如 left_shoulder）
    pub joint: String,

    /// 目标角度 [0, 180]
    #[arg(allow_negative_numbers = true)]
    pub angle: f64,

    /// 保持时间（秒），之后释放全部关节
    #[arg(long, default_value_t = 1.0)]
    pub hold: f64,
}

impl SetCommand {
    pub fn execute(&self, config: &ControllerConfig) -> Result<()> {
        let hold = delay_from_secs(self.hold).context("Invalid --hold")?;

        if !config.joints.iter().any(|j| j.name == self.joint) {
            let known: Vec<&str> = config.joints.iter().map(|j| j.name.as_str()).collect();
            anyhow::bail!(
                "Unknown joint {}. Known joints: {}",
                self.joint,
                known.join(", ")
            );
        }

        let mut controller = hardware::open(config)?;
        controller
            .set_joint(&self.joint, self.angle)
            .with_context(|| format!("Failed to move {} to {}°", self.joint, self.angle))?;
        println!("✅ {} -> {:.1}°", self.joint, self.angle);

        SpinPacer::interruptible(controller.stop_signal()).hold(hold);
        controller.shutdown().context("Failed to release joints")?;
        Ok(())
    }
}

/// 释放全部关节并关闭驱动
pub fn release(config: &ControllerConfig) -> Result<()> {
    let mut controller = hardware::open(config)?;
    controller.shutdown().context("Failed to release joints")?;
    println!("✅ All joints released");
    Ok(())
}
