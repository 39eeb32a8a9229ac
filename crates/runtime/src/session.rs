//! Dispatch surface the host adapter calls into.
//!
//! A [`Session`] owns the host adapter, the dual-wield state and the sealed
//! hook registry as three disjoint fields. Every method stands for one host
//! operation: it runs the registered handlers around the host's own routine
//! and returns what the host would have returned.

use dualwield_core::{
    ActorId, BalancingError, ConfigChange, DualWieldConfig, ItemId, JointKind, SkillDef,
    SkillType,
};
use hook_registry::{Call, HookRegistry, InstallReport};
use tracing::info;

use crate::hooks::{
    AnimationFixedUpdate, AttachItem, AttachItemArgs, CheatRaiseSkill, CheatResetSkill,
    CheatSkillArgs, EquipItem, EquipItemArgs, GetAttackStamina, GetRandomSkillFactor, GetSkillDef,
    InitTerminal, IsSkillValid, LowerSkillOnDeath, OnAttackTrigger, PlayerStart, RaiseSkill,
    SetTrigger, SetWeaponTrails, SetupEquipment, ShowHandItems, SkillArgs, SkillChangeArgs,
    TriggerArgs, UnequipAllItems, WeaponTrailsArgs,
};
use crate::host::HostRuntime;
use crate::state::DualWieldState;

type DualWieldCall<'a, H> = Call<'a, H, DualWieldState>;

pub struct Session<H: HostRuntime> {
    hooks: HookRegistry<H, DualWieldState>,
    host: H,
    state: DualWieldState,
    report: InstallReport,
}

/// Host equip routine with its injected calls routed back into the registry.
fn equip_original<H: HostRuntime>(
    call: &mut DualWieldCall<'_, H>,
    args: &mut EquipItemArgs,
) -> bool {
    let hooks = call.hooks;
    let state = &mut *call.state;
    let args: &EquipItemArgs = args;
    call.target.equip_item(args, &mut |host, name| {
        hooks.run_injected::<EquipItem>(host, state, name, args)
    })
}

impl<H: HostRuntime> Session<H> {
    pub(crate) fn new(
        host: H,
        state: DualWieldState,
        hooks: HookRegistry<H, DualWieldState>,
        report: InstallReport,
    ) -> Self {
        Self {
            hooks,
            host,
            state,
            report,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn state(&self) -> &DualWieldState {
        &self.state
    }

    pub fn hooks(&self) -> &HookRegistry<H, DualWieldState> {
        &self.hooks
    }

    pub fn install_report(&self) -> &InstallReport {
        &self.report
    }

    pub fn into_host(self) -> H {
        self.host
    }

    // ------------------------------------------------------------------
    // Equipment
    // ------------------------------------------------------------------

    pub fn equip_item(&mut self, actor: ActorId, item: ItemId, trigger_effects: bool) -> bool {
        let _scope = self.state.equipment.guard().enter();
        let mut args = EquipItemArgs {
            actor,
            item,
            trigger_effects,
        };
        self.hooks
            .invoke::<EquipItem>(&mut self.host, &mut self.state, &mut args, equip_original)
    }

    pub fn unequip_all_items(&mut self, actor: ActorId) {
        let _scope = self.state.equipment.guard().enter();
        self.hooks.invoke::<UnequipAllItems>(
            &mut self.host,
            &mut self.state,
            &mut { actor },
            |call, actor| call.target.unequip_all_items(*actor),
        )
    }

    pub fn setup_equipment(&mut self, actor: ActorId) {
        self.hooks.invoke::<SetupEquipment>(
            &mut self.host,
            &mut self.state,
            &mut { actor },
            |call, actor| call.target.setup_equipment(*actor),
        )
    }

    /// Re-equips hidden items; each one goes through the hooked equip path.
    pub fn show_hand_items(&mut self, actor: ActorId) {
        self.hooks.invoke::<ShowHandItems>(
            &mut self.host,
            &mut self.state,
            &mut { actor },
            |call, actor| {
                let actor = *actor;
                let hooks = call.hooks;
                let state = &mut *call.state;
                call.target.show_hand_items(actor, &mut |host, item| {
                    let _scope = state.equipment.guard().enter();
                    let mut args = EquipItemArgs {
                        actor,
                        item,
                        trigger_effects: false,
                    };
                    hooks.invoke::<EquipItem>(host, state, &mut args, equip_original)
                })
            },
        )
    }

    // ------------------------------------------------------------------
    // Animation and visuals
    // ------------------------------------------------------------------

    pub fn player_start(&mut self, actor: ActorId) {
        self.hooks.invoke::<PlayerStart>(
            &mut self.host,
            &mut self.state,
            &mut { actor },
            |call, actor| call.target.player_start(*actor),
        )
    }

    pub fn set_trigger(&mut self, actor: ActorId, trigger: &str) {
        let mut args = TriggerArgs {
            actor,
            trigger: trigger.to_owned(),
        };
        self.hooks
            .invoke::<SetTrigger>(&mut self.host, &mut self.state, &mut args, |call, args| {
                call.target.set_trigger(args)
            })
    }

    pub fn set_weapon_trails(&mut self, actor: ActorId, enabled: bool) {
        let mut args = WeaponTrailsArgs { actor, enabled };
        self.hooks
            .invoke::<SetWeaponTrails>(&mut self.host, &mut self.state, &mut args, |call, args| {
                call.target.set_weapon_trails(args)
            })
    }

    pub fn attach_item(&mut self, actor: ActorId, joint: JointKind) {
        let mut args = AttachItemArgs { actor, joint };
        self.hooks
            .invoke::<AttachItem>(&mut self.host, &mut self.state, &mut args, |call, args| {
                call.target.attach_item(args)
            })
    }

    pub fn animation_fixed_update(&mut self, actor: ActorId) {
        self.hooks.invoke::<AnimationFixedUpdate>(
            &mut self.host,
            &mut self.state,
            &mut { actor },
            |call, actor| call.target.animation_fixed_update(*actor),
        )
    }

    // ------------------------------------------------------------------
    // Combat
    // ------------------------------------------------------------------

    pub fn on_attack_trigger(&mut self, actor: ActorId) {
        self.hooks.invoke::<OnAttackTrigger>(
            &mut self.host,
            &mut self.state,
            &mut { actor },
            |call, actor| call.target.on_attack_trigger(*actor),
        )
    }

    pub fn attack_stamina(&mut self, actor: ActorId) -> f32 {
        self.hooks.invoke::<GetAttackStamina>(
            &mut self.host,
            &mut self.state,
            &mut { actor },
            |call, actor| call.target.attack_stamina(*actor),
        )
    }

    // ------------------------------------------------------------------
    // Skills
    // ------------------------------------------------------------------

    pub fn random_skill_factor(&mut self, actor: ActorId, skill: SkillType) -> f32 {
        let mut args = SkillArgs { actor, skill };
        self.hooks.invoke::<GetRandomSkillFactor>(
            &mut self.host,
            &mut self.state,
            &mut args,
            |call, args| call.target.random_skill_factor(args),
        )
    }

    pub fn skill_def(&mut self, skill: SkillType) -> Option<SkillDef> {
        self.hooks.invoke::<GetSkillDef>(
            &mut self.host,
            &mut self.state,
            &mut { skill },
            |call, skill| call.target.skill_def(*skill),
        )
    }

    pub fn is_skill_valid(&mut self, skill: SkillType) -> bool {
        self.hooks.invoke::<IsSkillValid>(
            &mut self.host,
            &mut self.state,
            &mut { skill },
            |call, skill| call.target.is_skill_valid(*skill),
        )
    }

    pub fn cheat_raise_skill(&mut self, actor: ActorId, name: &str, value: f32) {
        let mut args = CheatSkillArgs {
            actor,
            name: name.to_owned(),
            value,
        };
        self.hooks
            .invoke::<CheatRaiseSkill>(&mut self.host, &mut self.state, &mut args, |call, args| {
                call.target.cheat_raise_skill(args)
            })
    }

    pub fn cheat_reset_skill(&mut self, actor: ActorId, name: &str) {
        let mut args = CheatSkillArgs {
            actor,
            name: name.to_owned(),
            value: 0.0,
        };
        self.hooks
            .invoke::<CheatResetSkill>(&mut self.host, &mut self.state, &mut args, |call, args| {
                call.target.cheat_reset_skill(args)
            })
    }

    pub fn init_terminal(&mut self) {
        self.hooks
            .invoke::<InitTerminal>(&mut self.host, &mut self.state, &mut (), |call, _| {
                call.target.init_terminal()
            })
    }

    pub fn raise_skill(&mut self, actor: ActorId, skill: SkillType, factor: f32) {
        let mut args = SkillChangeArgs {
            actor,
            skill,
            factor,
        };
        self.hooks
            .invoke::<RaiseSkill>(&mut self.host, &mut self.state, &mut args, |call, args| {
                call.target.raise_skill(args)
            })
    }

    pub fn lower_skill_on_death(&mut self, actor: ActorId, skill: SkillType, factor: f32) {
        let mut args = SkillChangeArgs {
            actor,
            skill,
            factor,
        };
        self.hooks
            .invoke::<LowerSkillOnDeath>(&mut self.host, &mut self.state, &mut args, |call, args| {
                call.target.lower_skill_on_death(args)
            })
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Applies one configuration change to the live components, in place.
    ///
    /// `config` is the already synchronized and range-checked configuration.
    /// A rejected balancing entry leaves the table unchanged.
    pub fn apply_config(
        &mut self,
        config: &DualWieldConfig,
        change: ConfigChange,
    ) -> Result<(), BalancingError> {
        let state = &mut self.state;
        match change {
            ConfigChange::ExclusionList => state.exclusions.rebuild(&config.exclusion_list),
            ConfigChange::ExperienceGainFactor => {
                state.skills.set_xp_gain_factor(config.experience_gain_factor)
            }
            ConfigChange::ExperienceLoss => {
                state.skills.set_xp_loss_on_death(config.experience_loss as f32)
            }
            ConfigChange::SingleOffhandSkill => {
                state.skills.set_shared_mode(config.single_offhand_skill)
            }
            ConfigChange::Balancing { category, slot } => {
                let entry = config.balancing.category(category).slot(slot);
                state.balancing.set(category, slot, entry)?;
            }
            ConfigChange::Reloaded => {
                state.balancing.rebuild_from_config(&config.balancing)?;
                state.exclusions.rebuild(&config.exclusion_list);
                state.skills.set_xp_gain_factor(config.experience_gain_factor);
                state.skills.set_xp_loss_on_death(config.experience_loss as f32);
                state.skills.set_shared_mode(config.single_offhand_skill);
                state.config_locked = config.lock_configuration;
            }
        }
        info!(target: "dualwield::config", ?change, "Configuration applied");
        Ok(())
    }

    /// Whether only admins may change configuration. Read-only here; the
    /// sync layer enforces it.
    pub fn is_config_locked(&self) -> bool {
        self.state.config_locked
    }
}
