//! Dual-wield combat rules layered on top of a host game.
//!
//! `dualwield-core` holds everything that decides *what* happens when a
//! player wields two one-handed weapons: off-hand routing on equip, the
//! mirrored off-hand swing, per-combo balancing, animation variants and the
//! extension skills. It never touches the host directly; every read and
//! write goes through the [`Host`] trait, which the runtime implements on top
//! of the host's own objects.
//!
//! Temporary mutations of host data during an attack are scoped by
//! [`combat::TriggerGuard`] and always restored before control returns.
pub mod animation;
pub mod balancing;
pub mod combat;
pub mod config;
pub mod equipment;
pub mod error;
pub mod host;
pub mod model;
pub mod skills;

pub use animation::{
    AnimationAssets, AnimationVariantSelector, ApplyOutcome, AssetError, ClipBundle, ClipLibrary,
    ClipManifest, ReplacementRules, VariantKey, clips,
};
pub use balancing::{BalancingEntry, BalancingError, BalancingTable, ClipSlotMap, ComboSlot};
pub use combat::{
    CombatContext, CombatResolver, DualWieldPair, SpeedScaler, SpeedUpdate, TriggerReport,
    attack_stamina, dual_wield_stamina, eligibility, scale_speed,
};
pub use config::{BalancingSettings, CategoryBalancing, ConfigChange, DualWieldConfig};
pub use equipment::{
    EquipmentError, EquipmentTracker, ExclusionSet, GuardScope, Normalization, ReentrancyGuard,
    dual_wield_category,
};
pub use error::{DualWieldError, ErrorSeverity};
pub use host::{Host, HostError};
pub use model::{
    Actor, ActorId, AnimationClip, Animator, AnimatorController, Attack, AttackCue, DamageTypes,
    HitPointType, ItemData, ItemId, ItemType, ItemVisual, Joint, JointKind, PrefabHash,
    SharedData, SharedId, SkillType, Transform, VisEquipment, WeaponCategory, WeaponTrail,
};
pub use skills::{
    Icon, SkillCommand, SkillDef, SkillError, SkillExtension, SkillExtensionRegistry, SkillId,
    raise_skill, reset_skill, stable_hash,
};
