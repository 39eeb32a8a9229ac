//! The host operations dual-wield intercepts.
//!
//! Each operation is a zero-sized marker implementing [`Operation`], named by
//! the host routine it stands for. Argument bundles are plain structs so
//! pre-call overrides can rewrite them before the host runs.

pub mod rewrites;

use dualwield_core::{ActorId, ItemId, JointKind, SkillDef, SkillType};
use hook_registry::{Operation, OperationId};

macro_rules! operation {
    ($(#[$meta:meta])* $name:ident, $id:literal, $args:ty => $output:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl Operation for $name {
            const ID: OperationId = OperationId($id);
            type Args = $args;
            type Output = $output;
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipItemArgs {
    pub actor: ActorId,
    pub item: ItemId,
    pub trigger_effects: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponTrailsArgs {
    pub actor: ActorId,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachItemArgs {
    pub actor: ActorId,
    pub joint: JointKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerArgs {
    pub actor: ActorId,
    pub trigger: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillArgs {
    pub actor: ActorId,
    pub skill: SkillType,
}

/// Arguments of a host skill change. `factor` is experience gained for a
/// raise, or the fraction of the level lost for a death penalty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillChangeArgs {
    pub actor: ActorId,
    pub skill: SkillType,
    pub factor: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheatSkillArgs {
    pub actor: ActorId,
    pub name: String,
    pub value: f32,
}

operation!(
    /// Equips an item into the slot its type calls for.
    EquipItem, "Humanoid.EquipItem", EquipItemArgs => bool
);
operation!(UnequipAllItems, "Humanoid.UnequipAllItems", ActorId => ());
operation!(
    /// Re-derives hand slots after the inventory changed.
    SetupEquipment, "Humanoid.SetupEquipment", ActorId => ()
);
operation!(PlayerStart, "Player.Start", ActorId => ());
operation!(
    /// Re-equips items hidden while swimming or sitting.
    ShowHandItems, "Humanoid.ShowHandItems", ActorId => ()
);
operation!(SetWeaponTrails, "VisEquipment.SetWeaponTrails", WeaponTrailsArgs => ());
operation!(AttachItem, "VisEquipment.AttachItem", AttachItemArgs => ());
operation!(SetTrigger, "ZSyncAnimation.SetTrigger", TriggerArgs => ());
operation!(
    /// The animation event that makes an attack deal its hits.
    OnAttackTrigger, "Attack.OnAttackTrigger", ActorId => ()
);
operation!(
    /// One melee sweep. Only its body is rewritten.
    DoMeleeAttack, "Attack.DoMeleeAttack", ActorId => ()
);
operation!(GetAttackStamina, "Attack.GetAttackStamina", ActorId => f32);
operation!(GetRandomSkillFactor, "Player.GetRandomSkillFactor", SkillArgs => f32);
operation!(AnimationFixedUpdate, "CharacterAnimEvent.FixedUpdate", ActorId => ());
operation!(GetSkillDef, "Skills.GetSkillDef", SkillType => Option<SkillDef>);
operation!(IsSkillValid, "Skills.IsSkillValid", SkillType => bool);
operation!(CheatRaiseSkill, "Skills.CheatRaiseSkill", CheatSkillArgs => ());
operation!(CheatResetSkill, "Skills.CheatResetSkill", CheatSkillArgs => ());
operation!(InitTerminal, "Terminal.InitTerminal", () => ());
operation!(RaiseSkill, "Skills.RaiseSkill", SkillChangeArgs => ());
operation!(LowerSkillOnDeath, "Skills.LowerSkillOnDeath", SkillChangeArgs => ());

/// Name of the injected call the rewritten equip body makes.
pub const TRY_ASSIGN_OFFHAND: &str = "dualwield.try_assign_offhand";

/// Console commands whose tab completion lists the extension skills.
pub const SKILL_COMMANDS: [&str; 2] = ["raiseskill", "resetskill"];
