//! The host adapter the runtime drives.
//!
//! [`HostRuntime`] extends the core [`Host`] world access with the host's own
//! (unhooked) behavior for every intercepted operation, and with the few
//! registration services startup needs. The session calls these as the
//! "original" of each operation; handlers run around them.

use dualwield_core::{ActorId, Host, ItemId, SkillDef, SkillType};
use hook_registry::{BodySource, InstructionSequence, OperationId};

use crate::hooks::{
    AttachItemArgs, CheatSkillArgs, EquipItemArgs, SkillArgs, SkillChangeArgs, TriggerArgs,
    WeaponTrailsArgs,
};

/// Callback a host body uses to reach an injected call by name.
pub type InjectedCall<'a, H> = dyn FnMut(&mut H, &'static str) -> bool + 'a;

/// Callback a host routine uses to equip through the hooked equip path.
pub type NestedEquip<'a, H> = dyn FnMut(&mut H, ItemId) -> bool + 'a;

pub trait HostRuntime: Host + 'static {
    /// Runs the published equip body. `Hook` instructions go to `injected`.
    fn equip_item(&mut self, args: &EquipItemArgs, injected: &mut InjectedCall<'_, Self>) -> bool;

    fn unequip_all_items(&mut self, actor: ActorId);

    fn setup_equipment(&mut self, actor: ActorId);

    fn player_start(&mut self, actor: ActorId);

    /// Runs the published body that re-equips hidden items through `equip`.
    fn show_hand_items(&mut self, actor: ActorId, equip: &mut NestedEquip<'_, Self>);

    fn set_weapon_trails(&mut self, args: &WeaponTrailsArgs);

    fn attach_item(&mut self, args: &AttachItemArgs);

    fn set_trigger(&mut self, args: &TriggerArgs);

    /// The host's attack trigger: the right-hand melee sweep.
    fn on_attack_trigger(&mut self, actor: ActorId);

    fn attack_stamina(&mut self, actor: ActorId) -> f32;

    fn random_skill_factor(&mut self, args: &SkillArgs) -> f32;

    fn animation_fixed_update(&mut self, actor: ActorId);

    fn skill_def(&mut self, skill: SkillType) -> Option<SkillDef>;

    fn is_skill_valid(&mut self, skill: SkillType) -> bool;

    fn cheat_raise_skill(&mut self, args: &CheatSkillArgs);

    fn cheat_reset_skill(&mut self, args: &CheatSkillArgs);

    fn init_terminal(&mut self);

    fn raise_skill(&mut self, args: &SkillChangeArgs);

    fn lower_skill_on_death(&mut self, args: &SkillChangeArgs);

    /// Body of `operation` if the host lets it be rewritten.
    fn operation_body_mut(&mut self, operation: OperationId) -> Option<&mut InstructionSequence>;

    /// Appends a definition to the host's skill list.
    fn register_skill_def(&mut self, def: SkillDef);

    /// Adds `options` to the tab completion of each of `commands`.
    fn extend_tab_completion(&mut self, commands: &[&str], options: &[String]);
}

/// Lends a host's rewritable bodies to the hook registry.
pub(crate) struct HostBodies<'a, H>(pub(crate) &'a mut H);

impl<H: HostRuntime> BodySource for HostBodies<'_, H> {
    fn body_mut(&mut self, operation: OperationId) -> Option<&mut InstructionSequence> {
        self.0.operation_body_mut(operation)
    }
}
