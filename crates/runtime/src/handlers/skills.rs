//! Extension skills: definitions, experience, console commands.

use dualwield_core::{SkillCommand, raise_skill, reset_skill};
use hook_registry::{HookError, HookRegistry, PreCall, Priority};
use tracing::{debug, info};

use crate::hooks::{
    CheatRaiseSkill, CheatResetSkill, GetRandomSkillFactor, GetSkillDef, InitTerminal,
    IsSkillValid, LowerSkillOnDeath, RaiseSkill, SKILL_COMMANDS,
};
use crate::host::HostRuntime;
use crate::state::DualWieldState;

pub(crate) fn register<H: HostRuntime>(
    hooks: &mut HookRegistry<H, DualWieldState>,
) -> Result<(), HookError> {
    hooks.prefix::<GetRandomSkillFactor, _>(
        "dualwield.random_skill_factor",
        Priority::NORMAL,
        |call, args| {
            let factor = call.target.skill_factor(args.actor, args.skill);
            match call.state.skills.random_skill_factor(args.skill, factor) {
                Some(roll) => PreCall::Skip(roll),
                None => PreCall::Continue,
            }
        },
    )?;

    hooks.postfix::<GetSkillDef, _>("dualwield.skill_def", Priority::NORMAL, |call, skill, def| {
        if def.is_some() {
            return;
        }
        let Some(extension) = call.state.skills.extension(*skill) else {
            return;
        };
        let definition = extension.definition();
        call.target
            .add_localized_word(&extension.localization_key(), &extension.display_name);
        call.target.register_skill_def(definition.clone());
        debug!(
            target: "dualwield::skills",
            skill = %extension.display_name,
            id = %extension.id,
            "Registered skill definition"
        );
        *def = Some(definition);
    })?;

    hooks.postfix::<IsSkillValid, _>(
        "dualwield.skill_valid",
        Priority::NORMAL,
        |call, skill, valid| {
            if call.state.skills.extension(*skill).is_some() {
                *valid = true;
            }
        },
    )?;

    hooks.prefix::<CheatRaiseSkill, _>("dualwield.cheat_raise", Priority::NORMAL, |call, args| {
        let skills = &call.state.skills;
        match raise_skill(&mut *call.target, skills, args.actor, &args.name, args.value) {
            SkillCommand::Handled { skill, level } => {
                info!(target: "dualwield::skills", %skill, level, "Skill raised by command");
                PreCall::Skip(())
            }
            SkillCommand::NotFound => PreCall::Continue,
        }
    })?;

    hooks.prefix::<CheatResetSkill, _>("dualwield.cheat_reset", Priority::NORMAL, |call, args| {
        match reset_skill(&mut *call.target, &call.state.skills, args.actor, &args.name) {
            SkillCommand::Handled { skill, .. } => {
                info!(target: "dualwield::skills", %skill, "Skill reset by command");
                PreCall::Skip(())
            }
            SkillCommand::NotFound => PreCall::Continue,
        }
    })?;

    hooks.postfix::<InitTerminal, _>("dualwield.tab_completion", Priority::NORMAL, |call, _, _| {
        if call.state.terminal_extended {
            return;
        }
        let names = call.state.skills.internal_names();
        call.target.extend_tab_completion(&SKILL_COMMANDS, &names);
        call.state.terminal_extended = true;
    })?;

    hooks.prefix::<RaiseSkill, _>("dualwield.experience_gain", Priority::NORMAL, |call, args| {
        if let Some(extension) = call.state.skills.extension(args.skill) {
            args.factor *= extension.xp_gain_factor;
        }
        PreCall::Continue
    })?;

    hooks.prefix::<LowerSkillOnDeath, _>(
        "dualwield.experience_loss",
        Priority::NORMAL,
        |call, args| {
            if let Some(extension) = call.state.skills.extension(args.skill) {
                args.factor = extension.xp_loss_on_death / 100.0;
            }
            PreCall::Continue
        },
    )?;
    Ok(())
}
