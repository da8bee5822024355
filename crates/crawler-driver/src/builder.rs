//! Builder 模式实现
//!
//! 提供链式构造 `ActuatorDriver` 实例的便捷方式。

use crawler_config::{ControllerConfig, JointRegistry};
use crawler_pwm::PwmOutput;
#[cfg(target_os = "linux")]
use crawler_pwm::Pca9685;

use crate::driver::ActuatorDriver;
use crate::error::DriverError;
use crate::mapping::{AngleMapper, DutyScale};

/// 驱动 Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use crawler_driver::DriverBuilder;
///
/// // 使用参考硬件的默认配置
/// let driver = DriverBuilder::new().build().unwrap();
///
/// // 自定义总线
/// let driver = DriverBuilder::new()
///     .device("/dev/i2c-0")
///     .address(0x41)
///     .frequency(60)
///     .build()
///     .unwrap();
/// ```
pub struct DriverBuilder {
    /// I2C 设备文件
    device: String,
    /// 芯片地址
    address: u8,
    /// PWM 频率（Hz）
    frequency_hz: u32,
    /// 占空比缩放
    scale: DutyScale,
    /// 关节表（未设置时使用参考硬件的关节表）
    registry: Option<JointRegistry>,
}

impl DriverBuilder {
    pub fn new() -> Self {
        let bus = crawler_config::BusConfig::default();
        Self {
            device: bus.device,
            address: bus.address,
            frequency_hz: bus.frequency_hz,
            scale: DutyScale::new(bus.duty_shift),
            registry: None,
        }
    }

    /// 从控制器配置创建（关节表在此校验）
    pub fn from_config(config: &ControllerConfig) -> Result<Self, DriverError> {
        let registry = config.registry()?;
        Ok(Self {
            device: config.bus.device.clone(),
            address: config.bus.address,
            frequency_hz: config.bus.frequency_hz,
            scale: DutyScale::new(config.bus.duty_shift),
            registry: Some(registry),
        })
    }

    /// 设置 I2C 设备文件（默认 `/dev/i2c-1`）
    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    /// 设置芯片地址（默认 0x40）
    pub fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// 设置 PWM 频率（默认 50 Hz）
    pub fn frequency(mut self, frequency_hz: u32) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    /// 设置占空比缩放（默认 PCA9685，左移 4 位）
    pub fn duty_scale(mut self, scale: DutyScale) -> Self {
        self.scale = scale;
        self
    }

    /// 设置关节表
    pub fn registry(mut self, registry: JointRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// 使用任意 PWM 后端构建
    ///
    /// # Errors
    /// - `DriverError::BusUnavailable`: 设置频率失败
    /// - `DriverError::Config`: 默认关节表无效（不会发生）
    pub fn build_with<P: PwmOutput>(self, pwm: P) -> Result<ActuatorDriver<P>, DriverError> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => ControllerConfig::default().registry()?,
        };
        ActuatorDriver::init(
            pwm,
            registry,
            AngleMapper::new(self.scale),
            self.frequency_hz,
        )
    }

    /// 打开 PCA9685 并构建
    ///
    /// # Errors
    /// - `DriverError::BusUnavailable`: I2C 未启用、权限不足或芯片未连接
    #[cfg(target_os = "linux")]
    pub fn build(self) -> Result<ActuatorDriver<Pca9685>, DriverError> {
        let pwm = Pca9685::open(&self.device, self.address).map_err(DriverError::BusUnavailable)?;
        self.build_with(pwm)
    }
}

impl Default for DriverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::Deg;
    use crawler_config::JointSpec;
    use crawler_pwm::mock::{MockPwm, PwmEvent};

    #[test]
    fn test_build_with_defaults() {
        let recorder = MockPwm::new();
        let mut driver = DriverBuilder::new().build_with(recorder.clone()).unwrap();

        assert_eq!(driver.registry().len(), 4);
        driver.set_joint("right_shoulder", Deg(180.0)).unwrap();
        assert_eq!(recorder.duty_writes(), vec![(0, 2000 << 4)]);
    }

    #[test]
    fn test_from_config() {
        let mut config = ControllerConfig::default();
        config.bus.frequency_hz = 60;
        config.bus.duty_shift = 0;
        config.joints = vec![JointSpec::new("tail", 7, 500, 2500)];

        let recorder = MockPwm::new();
        let mut driver = DriverBuilder::from_config(&config)
            .unwrap()
            .build_with(recorder.clone())
            .unwrap();

        driver.set_joint("tail", Deg(90.0)).unwrap();
        assert_eq!(
            recorder.events(),
            vec![
                PwmEvent::Frequency(60),
                PwmEvent::Duty {
                    channel: 7,
                    duty: 1500
                }
            ]
        );
    }

    #[test]
    fn test_from_invalid_config() {
        let mut config = ControllerConfig::default();
        config.joints[0].channel = 1;
        assert!(matches!(
            DriverBuilder::from_config(&config),
            Err(DriverError::Config(_))
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_build_missing_bus() {
        let result = DriverBuilder::new().device("/dev/i2c-does-not-exist").build();
        assert!(matches!(result, Err(DriverError::BusUnavailable(_))));
    }
}
