//! 关节角度（NewType）
//!
//! 逻辑角度，合法范围为闭区间 [0, 180] 度，只有结合关节标定才有物理意义。
//! 构造时不做检查；越界在映射为脉宽时以 `OutOfRange` 拒绝。

use std::fmt;

/// 角度（度）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Deg(pub f64);

impl Deg {
    /// 0°
    pub const MIN: Self = Deg(0.0);

    /// 中位 90°
    pub const NEUTRAL: Self = Deg(90.0);

    /// 180°
    pub const MAX: Self = Deg(180.0);

    #[inline]
    pub const fn new(value: f64) -> Self {
        Deg(value)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// 镜像变换 `180 - angle`
    ///
    /// 用于由一侧肢体的目标推导对称肢体的目标。在 [0, 180] 上是对合：
    /// `a.mirror().mirror() == a`。
    #[inline]
    pub fn mirror(self) -> Self {
        Deg(180.0 - self.0)
    }

    /// 是否在 [0, 180] 内（NaN 视为越界）
    #[inline]
    pub fn is_valid(self) -> bool {
        (Self::MIN.0..=Self::MAX.0).contains(&self.0)
    }

    /// 线性插值，`t` 取 [0, 1]
    #[inline]
    pub fn lerp(self, target: Deg, t: f64) -> Deg {
        Deg(self.0 + (target.0 - self.0) * t)
    }
}

impl From<f64> for Deg {
    fn from(value: f64) -> Self {
        Deg(value)
    }
}

impl From<u8> for Deg {
    fn from(value: u8) -> Self {
        Deg(value as f64)
    }
}

impl fmt::Display for Deg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}
