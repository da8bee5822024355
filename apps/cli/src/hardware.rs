//! 硬件会话
//!
//! 打开 PCA9685，创建控制器，并把 Ctrl+C 接到停止信号上。

use anyhow::{Context, Result};
use crawler_config::ControllerConfig;
use crawler_gait::{Controller, SpinPacer, StopSignal};
use crawler_pwm::PwmOutput;

/// CLI 使用的控制器（后端在运行时选择）
pub type HardwareController = Controller<Box<dyn PwmOutput>>;

/// 打开硬件并初始化控制器
///
/// 配置在任何硬件写入之前校验。停止信号同时交给节拍器，
/// Ctrl+C 会打断正在进行的保持。
pub fn open(config: &ControllerConfig) -> Result<HardwareController> {
    config.validate().context("Invalid controller config")?;

    let stop = StopSignal::new();
    install_stop_handler(stop.clone())?;

    let pwm = open_pwm(config)?;
    let controller = Controller::open(config, pwm, SpinPacer::interruptible(stop.clone()))
        .context("Failed to initialize actuator driver")?;
    Ok(controller.with_stop_signal(stop))
}

#[cfg(target_os = "linux")]
fn open_pwm(config: &ControllerConfig) -> Result<Box<dyn PwmOutput>> {
    let pwm = crawler_pwm::Pca9685::open(&config.bus.device, config.bus.address).with_context(
        || {
            format!(
                "Failed to open PCA9685 at {} (address 0x{:02x}). Is I2C enabled?",
                config.bus.device, config.bus.address
            )
        },
    )?;
    Ok(Box::new(pwm))
}

#[cfg(not(target_os = "linux"))]
fn open_pwm(_config: &ControllerConfig) -> Result<Box<dyn PwmOutput>> {
    anyhow::bail!("PCA9685 access requires Linux i2c-dev")
}

fn install_stop_handler(stop: StopSignal) -> Result<()> {
    ctrlc::set_handler(move || request_stop(&stop)).context("Failed to set signal handler")
}

/// Ctrl+C：打断当前保持并停止回放，关节随后由会话释放
///
/// 重复的中断只提示，不退出进程。
fn request_stop(stop: &StopSignal) {
    if stop.is_raised() {
        eprintln!("\nAlready stopping. Waiting for joints to be released...");
        return;
    }
    eprintln!("\nReceived interrupt signal. Stopping and releasing joints...");
    stop.raise();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_interrupt_keeps_running() {
        let stop = StopSignal::new();
        request_stop(&stop);
        assert!(stop.is_raised());

        // 第二次中断不会结束进程，也不会清除停止请求
        request_stop(&stop);
        assert!(stop.is_raised());
    }
}
