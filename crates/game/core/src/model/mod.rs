//! Host-side object model.
//!
//! These types mirror the parts of the host's actors, items and animators
//! that dual-wield logic reads or temporarily rewrites. The host owns every
//! instance; this crate only reaches them through [`crate::Host`].
mod actor;
mod item;

pub use actor::{
    Actor, ActorId, AnimationClip, Animator, AnimatorController, Attack, HitPointType,
    ItemVisual, Joint, JointKind, Transform, VisEquipment, WeaponTrail,
};
pub use item::{
    AttackCue, DamageTypes, ItemData, ItemId, ItemType, PrefabHash, SharedData, SharedId,
    SkillType, WeaponCategory,
};
