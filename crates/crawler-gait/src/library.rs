//! 步态库
//!
//! 前进步态是唯一完整手写的步态；左右转向由它派生：
//! 复用前两个相位和复位相位，只替换第 3 个相位为不对称的肩部动作。
//!
//! ```text
//! forward:    reach(40/140, 90/90) -> grip(20/160) -> pull(140/40) -> reset(90/90)
//! turn_right: reach                -> grip         -> pivot(140/140) -> reset
//! turn_left:  reach                -> grip         -> pivot(40/40)   -> reset
//! ```

use std::time::Duration;

use crawler_config::JointRegistry;
use crawler_driver::Deg;

use crate::gait::{Gait, Phase};
use crate::pose::{LimbTarget, Pose};

/// 肩部前伸角度（左侧；右侧取镜像）
pub const SHOULDER_REACH: Deg = Deg(40.0);
/// 肩部后拉角度
pub const SHOULDER_PULL: Deg = Deg(140.0);
/// 肘部抬起（中位）
pub const ELBOW_UP: Deg = Deg(90.0);
/// 肘部下压抓地
pub const ELBOW_GRIP: Deg = Deg(20.0);

/// 前进步态中被替换为转向动作的相位索引
pub const PIVOT_PHASE: usize = 2;

/// 自检时每个关节依次经过的角度
pub const SELF_TEST_SWEEP: [Deg; 4] = [Deg(0.0), Deg(90.0), Deg(180.0), Deg(90.0)];

/// 转向方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    pub fn gait_name(self) -> &'static str {
        match self {
            TurnDirection::Left => "turn_left",
            TurnDirection::Right => "turn_right",
        }
    }
}

/// 前进步态（4 相位）
pub fn forward(hold: Duration) -> Gait {
    Gait::new(
        "forward",
        vec![
            Phase::new(
                "reach",
                Pose::new()
                    .set_shoulders(LimbTarget::symmetric(SHOULDER_REACH))
                    .set_elbows(LimbTarget::symmetric(ELBOW_UP)),
                hold,
            ),
            Phase::new(
                "grip",
                Pose::new().set_elbows(LimbTarget::symmetric(ELBOW_GRIP)),
                hold,
            ),
            Phase::new(
                "pull",
                Pose::new().set_shoulders(LimbTarget::symmetric(SHOULDER_PULL)),
                hold,
            ),
            Phase::new(
                "reset",
                Pose::new().set_elbows(LimbTarget::symmetric(ELBOW_UP)),
                hold,
            ),
        ],
    )
}

/// 转向步态
///
/// 一侧肩部完成后拉，另一侧停在前伸位置不动，产生旋转而不是平移。
/// 右转推进左肩，左转推进右肩；两者互为镜像。
pub fn turn(direction: TurnDirection, hold: Duration) -> Gait {
    let (reach_left, reach_right) = LimbTarget::symmetric(SHOULDER_REACH).resolve();
    let (pull_left, pull_right) = LimbTarget::symmetric(SHOULDER_PULL).resolve();

    let pivot = match direction {
        TurnDirection::Right => LimbTarget::split(pull_left, reach_right),
        TurnDirection::Left => LimbTarget::split(reach_left, pull_right),
    };

    let mut gait = forward(hold).renamed(direction.gait_name());
    gait.replace_phase(
        PIVOT_PHASE,
        Phase::new("pivot", Pose::new().set_shoulders(pivot), hold),
    );
    gait
}

pub fn turn_left(hold: Duration) -> Gait {
    turn(TurnDirection::Left, hold)
}

pub fn turn_right(hold: Duration) -> Gait {
    turn(TurnDirection::Right, hold)
}

/// 中位姿态：所有关节 90°
pub fn neutral(registry: &JointRegistry, hold: Duration) -> Gait {
    let pose = registry
        .names()
        .fold(Pose::new(), |pose, name| pose.set(name, Deg::NEUTRAL));
    Gait::new("neutral", vec![Phase::new("neutral", pose, hold)])
}

/// 舵机自检：按关节表顺序，每个关节依次转到 0°、90°、180°、90°
pub fn self_test(registry: &JointRegistry, hold: Duration) -> Gait {
    let phases = registry
        .names()
        .flat_map(|name| {
            SELF_TEST_SWEEP.iter().map(move |&angle| {
                Phase::new(
                    format!("{}@{}", name, angle.value()),
                    Pose::new().set(name, angle),
                    hold,
                )
            })
        })
        .collect();
    Gait::new("self_test", phases)
}
