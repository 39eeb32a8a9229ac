//! Attack trigger, stamina and animation speed.

use dualwield_core::{SpeedUpdate, attack_stamina, eligibility};
use hook_registry::{HookError, HookRegistry, PreCall, Priority};
use tracing::{debug, trace, warn};

use crate::hooks::rewrites::MirroredSweep;
use crate::hooks::{AnimationFixedUpdate, DoMeleeAttack, GetAttackStamina, OnAttackTrigger};
use crate::host::HostRuntime;
use crate::state::DualWieldState;

pub(crate) fn register<H: HostRuntime>(
    hooks: &mut HookRegistry<H, DualWieldState>,
) -> Result<(), HookError> {
    hooks.prefix::<OnAttackTrigger, _>("dualwield.attack_trigger", Priority::NORMAL, |call, actor| {
        let actor = *actor;
        let (ctx, resolver) = call.state.resolver_parts();
        let Some(pair) = eligibility(&*call.target, &ctx, actor) else {
            return PreCall::Continue;
        };

        match resolver.resolve(&mut *call.target, &ctx, actor, pair, |host| {
            host.on_attack_trigger(actor)
        }) {
            Ok(((), report)) => {
                debug!(
                    target: "dualwield::combat",
                    actor = ?actor,
                    category = %report.pair.category,
                    slot = ?report.balance.map(|(slot, _)| slot),
                    damage_factor = ?report.balance.map(|(_, factor)| factor),
                    knockback_suppressed = report.knockback_suppressed,
                    "Dual-wield attack resolved"
                );
                PreCall::Skip(())
            }
            Err(error) => {
                // Everything is restored by now; the host swings alone.
                warn!(
                    target: "dualwield::combat",
                    actor = ?actor,
                    %error,
                    "Off-hand swing failed, running host attack unmodified"
                );
                PreCall::Continue
            }
        }
    })?;
    hooks.rewrite::<DoMeleeAttack>(MirroredSweep);

    hooks.prefix::<GetAttackStamina, _>(
        "dualwield.attack_stamina",
        Priority::NORMAL,
        |call, actor| {
            match attack_stamina(&*call.target, &call.state.combat(), *actor) {
                Some(cost) => {
                    trace!(target: "dualwield::combat", actor = ?actor, cost, "Dual-wield stamina");
                    PreCall::Skip(cost)
                }
                None => PreCall::Continue,
            }
        },
    )?;

    // Runs after other speed adjustments so it scales their result.
    hooks.prefix::<AnimationFixedUpdate, _>("dualwield.attack_speed", Priority::LOW, |call, actor| {
        let (ctx, speed) = call.state.speed_parts();
        if let SpeedUpdate::Scaled { from, to } = speed.update(&mut *call.target, &ctx, *actor) {
            trace!(target: "dualwield::animation", actor = ?actor, from, to, "Scaled attack speed");
        }
        PreCall::Continue
    })?;
    Ok(())
}
