//! 相位与步态定义
//!
//! 纯数据：相位严格按顺序执行，步态定义创建后不可变。

use std::time::Duration;

use crate::pose::Pose;

/// 相位：一个姿态加保持时间
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    name: String,
    pose: Pose,
    hold: Duration,
}

impl Phase {
    pub fn new(name: impl Into<String>, pose: Pose, hold: Duration) -> Self {
        Self {
            name: name.into(),
            pose,
            hold,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }
}

/// 步态：有序相位序列
#[derive(Debug, Clone, PartialEq)]
pub struct Gait {
    name: String,
    phases: Vec<Phase>,
}

impl Gait {
    pub fn new(name: impl Into<String>, phases: Vec<Phase>) -> Self {
        Self {
            name: name.into(),
            phases,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// 以新名称派生
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 替换第 `index` 个相位，返回被替换的相位
    ///
    /// `index` 越界时返回 `None`，步态保持不变。
    pub fn replace_phase(&mut self, index: usize, phase: Phase) -> Option<Phase> {
        self.phases
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, phase))
    }

    /// 统一设置所有相位的保持时间
    pub fn with_hold(mut self, hold: Duration) -> Self {
        for phase in &mut self.phases {
            phase.hold = hold;
        }
        self
    }

    /// 单个周期的总保持时间
    pub fn cycle_duration(&self) -> Duration {
        self.phases.iter().map(|p| p.hold).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gait() -> Gait {
        let hold = Duration::from_millis(100);
        Gait::new(
            "test",
            vec![
                Phase::new("a", Pose::new().set("j", 10.0), hold),
                Phase::new("b", Pose::new().set("j", 20.0), hold),
            ],
        )
    }

    #[test]
    fn test_replace_phase_overrides_one_phase() {
        let replacement = Phase::new("c", Pose::new().set("j", 30.0), Duration::ZERO);
        let mut derived = gait().renamed("derived");
        let previous = derived.replace_phase(1, replacement.clone());

        assert_eq!(previous.as_ref(), Some(&gait().phases()[1]));
        assert_eq!(derived.name(), "derived");
        assert_eq!(derived.phases()[0], gait().phases()[0]);
        assert_eq!(derived.phases()[1], replacement);
    }

    #[test]
    fn test_replace_phase_out_of_range() {
        let phase = Phase::new("c", Pose::new(), Duration::ZERO);
        let mut derived = gait();
        assert!(derived.replace_phase(5, phase).is_none());
        assert_eq!(derived.phases(), gait().phases());
    }

    #[test]
    fn test_with_hold_and_cycle_duration() {
        let gait = gait().with_hold(Duration::from_millis(250));
        assert!(gait.phases().iter().all(|p| p.hold() == Duration::from_millis(250)));
        assert_eq!(gait.cycle_duration(), Duration::from_millis(500));
    }
}
