//! Actors and the parts of them this crate reads or temporarily rewrites.

use std::sync::Arc;

use glam::Vec3;

use super::item::{ItemId, PrefabHash};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

/// How a melee swing picks the contact point on a target hit by several rays.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HitPointType {
    #[default]
    Closest,
    Average,
    First,
}

/// The attack an actor is currently performing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attack {
    /// Weapon whose stats the next melee sweep uses.
    pub weapon: Option<ItemId>,
    pub hit_point_type: HitPointType,
    /// Sweep angle in degrees. The sign selects the sweep direction.
    pub attack_angle: f32,
    pub attack_animation: String,
    /// Number of steps in this weapon's combo; `<= 1` means no combo.
    pub chain_levels: u32,
    pub current_chain_level: u32,
}

/// One clip slot of an animator controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationClip {
    /// Name the animator state machine knows the clip by.
    pub name: String,
    /// Asset the clip's curves come from.
    pub asset: String,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, asset: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asset: asset.into(),
        }
    }

    /// Copy of this clip's curves under another slot name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asset: self.asset.clone(),
        }
    }
}

/// Fully materialized animator controller.
///
/// Controllers are immutable once built and shared by `Arc`; identity
/// (`Arc::ptr_eq`) is what decides whether an animator needs a swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimatorController {
    pub name: String,
    pub clips: Vec<AnimationClip>,
}

impl AnimatorController {
    pub fn new(name: impl Into<String>, clips: Vec<AnimationClip>) -> Self {
        Self {
            name: name.into(),
            clips,
        }
    }

    /// Builds an override controller: each clip is passed to `replace`, which
    /// either returns a replacement or `None` to keep the original.
    pub fn with_overrides(
        &self,
        name: impl Into<String>,
        mut replace: impl FnMut(&AnimationClip) -> Option<AnimationClip>,
    ) -> AnimatorController {
        AnimatorController {
            name: name.into(),
            clips: self
                .clips
                .iter()
                .map(|clip| replace(clip).unwrap_or_else(|| clip.clone()))
                .collect(),
        }
    }

    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.iter().find(|c| c.name == name)
    }
}

#[derive(Clone, Debug)]
pub struct Animator {
    pub controller: Arc<AnimatorController>,
    pub speed: f32,
    /// Clip currently playing on the base layer.
    pub current_clip: Option<String>,
}

impl Animator {
    pub fn new(controller: Arc<AnimatorController>) -> Self {
        Self {
            controller,
            speed: 1.0,
            current_clip: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Local Euler angles in degrees.
    pub euler: Vec3,
}

impl Transform {
    pub const fn new(position: Vec3, euler: Vec3) -> Self {
        Self { position, euler }
    }
}

/// Attachment point on an actor's rig.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Joint {
    pub children: Vec<Transform>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeaponTrail {
    pub emit: bool,
}

/// Spawned visual of an equipped item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemVisual {
    pub trails: Vec<WeaponTrail>,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum JointKind {
    RightHand,
    LeftHand,
    BackMelee,
    BackTool,
    BackShield,
    BackTwoHanded,
}

/// Visual equipment state. This is what remote clients see, so it is the
/// source of truth for animation decisions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisEquipment {
    pub current_right: Option<PrefabHash>,
    pub current_left: Option<PrefabHash>,
    pub left_instance: Option<ItemVisual>,
    pub back_melee: Joint,
    pub back_tool: Joint,
}

impl VisEquipment {
    pub fn joint_mut(&mut self, kind: JointKind) -> Option<&mut Joint> {
        match kind {
            JointKind::BackMelee => Some(&mut self.back_melee),
            JointKind::BackTool => Some(&mut self.back_tool),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Actor {
    pub id: ActorId,
    pub is_player: bool,
    pub right_item: Option<ItemId>,
    pub left_item: Option<ItemId>,
    pub hidden_right: Option<ItemId>,
    pub hidden_left: Option<ItemId>,
    pub animator: Animator,
    pub visual: VisEquipment,
    pub current_attack: Option<Attack>,
    pub in_attack: bool,
}

impl Actor {
    pub fn new(id: ActorId, is_player: bool, controller: Arc<AnimatorController>) -> Self {
        Self {
            id,
            is_player,
            right_item: None,
            left_item: None,
            hidden_right: None,
            hidden_left: None,
            animator: Animator::new(controller),
            visual: VisEquipment::default(),
            current_attack: None,
            in_attack: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AnimatorController {
        AnimatorController::new(
            "player",
            vec![
                AnimationClip::new("Attack1", "sword_attack1"),
                AnimationClip::new("fight idle", "idle"),
            ],
        )
    }

    #[test]
    fn overrides_keep_unmatched_clips() {
        let variant = base().with_overrides("variant", |clip| {
            (clip.name == "Attack1").then(|| AnimationClip::new("Attack1", "dw_attack1"))
        });

        assert_eq!(variant.name, "variant");
        assert_eq!(variant.clip("Attack1").map(|c| c.asset.as_str()), Some("dw_attack1"));
        assert_eq!(variant.clip("fight idle").map(|c| c.asset.as_str()), Some("idle"));
    }

    #[test]
    fn renamed_clip_keeps_asset() {
        let clip = AnimationClip::new("DWblock", "bundle/DWblock").renamed("Block idle");
        assert_eq!(clip, AnimationClip::new("Block idle", "bundle/DWblock"));
    }
}
