//! 姿态与对称肢体设置
//!
//! 步态作者通过两个原语组合姿态：[`Pose::set_shoulders`] 和 [`Pose::set_elbows`]。
//! 对称目标只给出左侧角度，右侧自动取镜像 `180 - angle`；
//! 分离目标显式给出 `(left, right)`，用于转向步态打破对称。

use crawler_config::names::{LEFT_ELBOW, LEFT_SHOULDER, RIGHT_ELBOW, RIGHT_SHOULDER};
use crawler_driver::Deg;

/// 一对左右肢体的目标
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimbTarget {
    /// 对称：左侧取该角度，右侧取其镜像
    Symmetric(Deg),
    /// 分离：左右分别给出
    Split { left: Deg, right: Deg },
}

impl LimbTarget {
    /// 按 `symmetric` 标志构造
    ///
    /// `symmetric == true` 时只使用 `left`，右侧由镜像推导；
    /// 否则原样使用 `(left, right)`。
    pub fn new(left: impl Into<Deg>, right: impl Into<Deg>, symmetric: bool) -> Self {
        let left = left.into();
        if symmetric {
            LimbTarget::Symmetric(left)
        } else {
            LimbTarget::Split {
                left,
                right: right.into(),
            }
        }
    }

    pub fn symmetric(angle: impl Into<Deg>) -> Self {
        LimbTarget::Symmetric(angle.into())
    }

    pub fn split(left: impl Into<Deg>, right: impl Into<Deg>) -> Self {
        LimbTarget::Split {
            left: left.into(),
            right: right.into(),
        }
    }

    /// 解析为 `(left, right)`
    pub fn resolve(self) -> (Deg, Deg) {
        match self {
            LimbTarget::Symmetric(angle) => (angle, angle.mirror()),
            LimbTarget::Split { left, right } => (left, right),
        }
    }
}

/// 姿态：关节名称到目标角度的有序映射
///
/// 可以只包含部分关节，未出现的关节保持不动。
/// 同一关节重复设置时覆盖原值并保留原位置。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    targets: Vec<(String, Deg)>,
}

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置单个关节
    pub fn set(mut self, joint: impl Into<String>, angle: impl Into<Deg>) -> Self {
        let joint = joint.into();
        let angle = angle.into();
        match self.targets.iter_mut().find(|(name, _)| *name == joint) {
            Some(entry) => entry.1 = angle,
            None => self.targets.push((joint, angle)),
        }
        self
    }

    /// 设置一对左右关节
    pub fn set_pair(self, left_joint: &str, right_joint: &str, target: LimbTarget) -> Self {
        let (left, right) = target.resolve();
        self.set(left_joint, left).set(right_joint, right)
    }

    /// 设置两侧肩关节
    pub fn set_shoulders(self, target: LimbTarget) -> Self {
        self.set_pair(LEFT_SHOULDER, RIGHT_SHOULDER, target)
    }

    /// 设置两侧肘关节
    pub fn set_elbows(self, target: LimbTarget) -> Self {
        self.set_pair(LEFT_ELBOW, RIGHT_ELBOW, target)
    }

    pub fn get(&self, joint: &str) -> Option<Deg> {
        self.targets
            .iter()
            .find(|(name, _)| name == joint)
            .map(|(_, angle)| *angle)
    }

    /// 按设置顺序的目标
    pub fn targets(&self) -> &[(String, Deg)] {
        &self.targets
    }

    pub fn joints(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
