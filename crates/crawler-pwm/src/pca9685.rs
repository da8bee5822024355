//! PCA9685 后端（Linux i2c-dev）
//!
//! 芯片寄存器协议由 `pwm-pca9685` 处理，总线由 `linux-embedded-hal`
//! 的 `I2cdev` 提供。
//!
//! 占空比约定：16 位占空比右移 4 位得到 12 位 OFF 计数，
//! `0` 使用 full-off 位，`0xFFFF` 使用 full-on 位。

use std::fmt::Debug;

use linux_embedded_hal::I2cdev;
use pwm_pca9685::{Channel, Error as ChipError, Pca9685 as Chip};
use tracing::{debug, info, trace};

use crate::{PwmError, PwmOutput};

/// 内部振荡器频率（Hz）
const OSCILLATOR_HZ: f64 = 25_000_000.0;

const CHANNELS: [Channel; 16] = [
    Channel::C0,
    Channel::C1,
    Channel::C2,
    Channel::C3,
    Channel::C4,
    Channel::C5,
    Channel::C6,
    Channel::C7,
    Channel::C8,
    Channel::C9,
    Channel::C10,
    Channel::C11,
    Channel::C12,
    Channel::C13,
    Channel::C14,
    Channel::C15,
];

/// PCA9685 PWM 驱动芯片
pub struct Pca9685 {
    device: String,
    address: u8,
    chip: Option<Chip<I2cdev>>,
}

impl Pca9685 {
    /// 打开 I2C 总线并唤醒芯片
    ///
    /// # 错误
    ///
    /// - `PwmError::BusUnavailable`: 设备文件不存在、权限不足、
    ///   地址非法或地址上没有应答（I2C 未启用 / 芯片未连接）
    pub fn open(device: &str, address: u8) -> Result<Self, PwmError> {
        let unavailable = |reason: String| PwmError::BusUnavailable {
            device: device.to_string(),
            reason,
        };

        let i2c = I2cdev::new(device).map_err(|e| unavailable(e.to_string()))?;
        let mut chip = Chip::new(i2c, address)
            .map_err(|e| unavailable(format!("invalid address {:#04x}: {:?}", address, e)))?;
        chip.enable()
            .map_err(|e| unavailable(format!("no response at {:#04x}: {:?}", address, e)))?;

        info!("PCA9685 initialized at {} address {:#04x}", device, address);
        Ok(Self {
            device: device.to_string(),
            address,
            chip: Some(chip),
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    fn chip(&mut self) -> Result<&mut Chip<I2cdev>, PwmError> {
        self.chip.as_mut().ok_or(PwmError::Closed)
    }
}

fn device_error<E: Debug>(err: ChipError<E>) -> PwmError {
    match err {
        ChipError::I2C(e) => PwmError::Device(format!("i2c transfer failed: {:?}", e)),
        ChipError::InvalidInputData => PwmError::Device("invalid input data".to_string()),
    }
}

/// 通道号转换为芯片通道
fn channel(index: u8) -> Result<Channel, PwmError> {
    CHANNELS
        .get(index as usize)
        .copied()
        .ok_or(PwmError::InvalidChannel(index))
}

/// 频率对应的预分频值，芯片只接受 3..=255
fn prescale(frequency_hz: u32) -> Result<u8, PwmError> {
    if frequency_hz == 0 {
        return Err(PwmError::Device("frequency must be positive".to_string()));
    }
    let prescale = (OSCILLATOR_HZ / 4096.0 / frequency_hz as f64).round() - 1.0;
    if !(3.0..=255.0).contains(&prescale) {
        return Err(PwmError::Device(format!(
            "frequency {} Hz out of range (prescale {})",
            frequency_hz, prescale
        )));
    }
    Ok(prescale as u8)
}

impl PwmOutput for Pca9685 {
    fn set_frequency(&mut self, frequency_hz: u32) -> Result<(), PwmError> {
        let prescale = prescale(frequency_hz)?;
        let chip = self.chip()?;
        chip.set_prescale(prescale).map_err(device_error)?;
        chip.enable().map_err(device_error)?;

        debug!(
            "PCA9685 frequency set to {} Hz (prescale {})",
            frequency_hz, prescale
        );
        Ok(())
    }

    fn write_duty(&mut self, index: u8, duty: u16) -> Result<(), PwmError> {
        let channel = channel(index)?;
        let chip = self.chip()?;

        trace!("PCA9685 ch{} duty={}", index, duty);
        match duty {
            0 => chip.set_channel_full_off(channel),
            u16::MAX => chip.set_channel_full_on(channel, 0),
            _ => chip.set_channel_on_off(channel, 0, ((duty as u32 + 1) >> 4) as u16),
        }
        .map_err(device_error)
    }

    fn deinit(&mut self) -> Result<(), PwmError> {
        let Some(mut chip) = self.chip.take() else {
            return Ok(());
        };
        let result = chip.disable().map_err(device_error);
        drop(chip.destroy());
        info!("PCA9685 at {} released", self.device);
        result
    }

    fn channel_count(&self) -> u8 {
        CHANNELS.len() as u8
    }
}
