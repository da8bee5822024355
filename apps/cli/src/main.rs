//! # Crawler CLI
//!
//! 四足爬行机器人步态控制的命令行工具。
//!
//! ```bash
//! # 生成默认配置（~/.config/crawler/config.toml）
//! crawler-cli config init
//!
//! # 前进 5 步，每个相位保持 0.3 秒
//! crawler-cli walk --steps 5 --delay 0.3
//!
//! # 右转 2 步
//! crawler-cli turn-right -s 2
//!
//! # 校准：把左肩转到 90°
//! crawler-cli set left_shoulder 90
//! ```
//!
//! 每个命令都独占驱动：打开 → 执行 → 释放全部关节 → 关闭。
//! Ctrl+C 在当前相位结束后停止，关节随即释放。

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crawler_gait::TurnDirection;
use tracing_subscriber::EnvFilter;

mod commands;
mod hardware;

use commands::{ConfigCommand, DelayArgs, GaitArgs, Motion, SetCommand};

/// Crawler CLI - 爬行机器人命令行工具
#[derive(Parser, Debug)]
#[command(name = "crawler-cli")]
#[command(about = "Command-line interface for the crawler robot gait controller", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 ~/.config/crawler/config.toml）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 向前走
    Walk {
        #[command(flatten)]
        args: GaitArgs,
    },

    /// 左转
    TurnLeft {
        #[command(flatten)]
        args: GaitArgs,
    },

    /// 右转
    TurnRight {
        #[command(flatten)]
        args: GaitArgs,
    },

    /// 所有关节回到 90°
    Neutral {
        #[command(flatten)]
        args: DelayArgs,
    },

    /// 舵机自检（每个关节 0° → 90° → 180° → 90°）
    SelfTest {
        #[command(flatten)]
        args: DelayArgs,
    },

    /// 单关节命令
    Set {
        #[command(flatten)]
        args: SetCommand,
    },

    /// 释放全部关节
    Release,

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let mut filter = EnvFilter::from_default_env();
    for target in ["crawler_cli", "crawler_gait", "crawler_driver", "crawler_pwm"] {
        filter = filter.add_directive(format!("{}={}", target, level).parse()?);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let explicit = cli.config.as_deref();

    match cli.command {
        Commands::Config(cmd) => cmd.execute(explicit),

        Commands::Walk { args } => run_gait(explicit, Motion::Forward, args),

        Commands::TurnLeft { args } => {
            run_gait(explicit, Motion::Turn(TurnDirection::Left), args)
        },

        Commands::TurnRight { args } => {
            run_gait(explicit, Motion::Turn(TurnDirection::Right), args)
        },

        Commands::Neutral { args } => run_pose(explicit, Motion::Neutral, args),

        Commands::SelfTest { args } => run_pose(explicit, Motion::SelfTest, args),

        Commands::Set { args } => {
            let config = commands::config::load(explicit)?;
            args.execute(&config)
        },

        Commands::Release => {
            let config = commands::config::load(explicit)?;
            commands::joint::release(&config)
        },
    }
}

fn run_gait(explicit: Option<&std::path::Path>, motion: Motion, args: GaitArgs) -> Result<()> {
    let config = commands::config::load(explicit)?;
    let (steps, delay) = args.resolve(&config);
    commands::gait::execute(&config, motion, steps, delay)
}

fn run_pose(explicit: Option<&std::path::Path>, motion: Motion, args: DelayArgs) -> Result<()> {
    let config = commands::config::load(explicit)?;
    let delay = args.delay.unwrap_or(config.gait.delay_secs);
    commands::gait::execute(&config, motion, 1, delay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_walk() {
        let cli = Cli::try_parse_from(["crawler-cli", "walk", "--steps", "3", "--delay", "0.1"])
            .unwrap();
        match cli.command {
            Commands::Walk { args } => {
                assert_eq!(args.steps, Some(3));
                assert_eq!(args.delay, Some(0.1));
            },
            other => panic!("Expected Walk, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_turn_with_global_config() {
        let cli = Cli::try_parse_from(["crawler-cli", "turn-right", "-s", "2", "-c", "robot.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("robot.toml")));
        assert!(matches!(
            cli.command,
            Commands::TurnRight {
                args: GaitArgs {
                    steps: Some(2),
                    delay: None
                }
            }
        ));
    }

    #[test]
    fn test_parse_set_negative_angle() {
        let cli = Cli::try_parse_from(["crawler-cli", "set", "left_elbow", "-1"]).unwrap();
        match cli.command {
            Commands::Set { args } => {
                assert_eq!(args.joint, "left_elbow");
                assert_eq!(args.angle, -1.0);
                assert_eq!(args.hold, 1.0);
            },
            other => panic!("Expected Set, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::try_parse_from(["crawler-cli", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommand::Init { force: true })
        ));
    }

    #[test]
    fn test_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["crawler-cli", "fly"]).is_err());
    }
}
