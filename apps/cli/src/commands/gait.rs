//! 步态命令：walk / turn-left / turn-right / neutral / self-test

use anyhow::{Context, Result};
use clap::Args;
use crawler_config::ControllerConfig;
use crawler_gait::{GaitError, TurnDirection};
use tracing::info;

use crate::hardware::{self, HardwareController};

/// 步态参数
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct GaitArgs {
    /// 步数（周期数，默认取配置中的 gait.steps）
    #[arg(short, long)]
    pub steps: Option<u32>,

    /// 每个相位的保持时间（秒，默认取配置中的 gait.delay_secs）
    #[arg(short, long)]
    pub delay: Option<f64>,
}

impl GaitArgs {
    /// 命令行参数优先，其次是配置
    pub fn resolve(&self, config: &ControllerConfig) -> (u32, f64) {
        (
            self.steps.unwrap_or(config.gait.steps),
            self.delay.unwrap_or(config.gait.delay_secs),
        )
    }
}

/// 单次动作参数
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct DelayArgs {
    /// 每个姿态的保持时间（秒，默认取配置中的 gait.delay_secs）
    #[arg(short, long)]
    pub delay: Option<f64>,
}

/// 要执行的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Forward,
    Turn(TurnDirection),
    Neutral,
    SelfTest,
}

impl Motion {
    pub fn name(self) -> &'static str {
        match self {
            Motion::Forward => "forward",
            Motion::Turn(direction) => direction.gait_name(),
            Motion::Neutral => "neutral",
            Motion::SelfTest => "self_test",
        }
    }
}

/// 执行动作；结束后（无论结果）所有关节都已释放
pub fn execute(config: &ControllerConfig, motion: Motion, steps: u32, delay: f64) -> Result<()> {
    let mut controller = hardware::open(config)?;
    info!(
        "Running {} ({} steps, {:.2}s per phase)",
        motion.name(),
        steps,
        delay
    );

    let result = match motion {
        Motion::Forward => controller.walk_forward(steps, delay),
        Motion::Turn(direction) => controller.turn(direction, steps, delay),
        Motion::Neutral => controller.neutral(delay),
        Motion::SelfTest => controller.self_test(delay),
    };

    finish(&mut controller, motion, result)
}

fn finish(
    controller: &mut HardwareController,
    motion: Motion,
    result: Result<usize, GaitError>,
) -> Result<()> {
    match result {
        Ok(played) => {
            controller.shutdown().context("Failed to release joints")?;
            println!("✅ {}: {} phases played, joints released", motion.name(), played);
            Ok(())
        },
        Err(e) if e.is_cancelled() => {
            // 会话已在取消时关闭
            println!("🛑 {}", e);
            Ok(())
        },
        Err(e) => {
            // 参数错误不会关闭会话，这里统一收尾
            let _ = controller.shutdown();
            Err(e).with_context(|| format!("{} failed; joints released", motion.name()))
        },
    }
}
