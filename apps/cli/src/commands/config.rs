//! 配置管理命令
//!
//! 配置文件路径：`--config` 指定，否则 `~/.config/crawler/config.toml`，
//! 都不存在时使用内置的参考硬件配置。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use crawler_config::ControllerConfig;
use tracing::{debug, info};

/// 默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("crawler").join("config.toml"))
}

/// 加载配置
///
/// 显式指定的文件必须存在；默认路径不存在时回退到内置配置。
pub fn load(explicit: Option<&Path>) -> Result<ControllerConfig> {
    if let Some(path) = explicit {
        return ControllerConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    match default_config_path() {
        Some(path) if path.exists() => ControllerConfig::load_from_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        _ => {
            debug!("No config file found, using built-in defaults");
            Ok(ControllerConfig::default())
        },
    }
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 显示生效的配置（TOML）
    Show,

    /// 校验配置并列出关节表
    Check,

    /// 写入默认配置文件
    Init {
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(&self, explicit: Option<&Path>) -> Result<()> {
        match self {
            ConfigCommand::Show => {
                let config = load(explicit)?;
                let content =
                    toml::to_string_pretty(&config).context("Failed to serialize config")?;
                print!("{}", content);
                Ok(())
            },
            ConfigCommand::Check => check(explicit),
            ConfigCommand::Init { force } => {
                let path = match explicit {
                    Some(path) => path.to_path_buf(),
                    None => default_config_path()
                        .context("Cannot determine config directory, use --config")?,
                };
                init(&path, *force)?;
                println!("✅ Wrote default config to {}", path.display());
                Ok(())
            },
        }
    }
}

fn check(explicit: Option<&Path>) -> Result<()> {
    let config = load(explicit)?;
    let registry = config.registry().context("Invalid joint table")?;

    println!(
        "Bus: {} @ 0x{:02x}, {} Hz, duty shift {}",
        config.bus.device, config.bus.address, config.bus.frequency_hz, config.bus.duty_shift
    );
    println!(
        "Gait: {:.2}s per phase, {} steps, smoothing {}",
        config.gait.delay_secs,
        config.gait.steps,
        match config.gait.smoothing {
            Some(s) => format!("{} x {}ms", s.steps, s.interval_ms),
            None => "off".to_string(),
        }
    );
    println!("Joints:");
    for joint in registry.iter() {
        let calibration = joint.calibration();
        println!(
            "  {:<16} ch{:<2} {}..{}",
            joint.name(),
            joint.channel(),
            calibration.min_pulse,
            calibration.max_pulse
        );
    }
    println!("✅ Config OK");
    Ok(())
}

/// 写入默认配置，不覆盖已有文件（除非 `force`）
pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists, use --force to overwrite",
            path.display()
        );
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("Failed to create config directory")?;
    }
    ControllerConfig::default()
        .save_to_file(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Default config written to {}", path.display());
    Ok(())
}
