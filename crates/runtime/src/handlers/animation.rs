//! Animation variants, weapon trails and back-slot placement.

use std::sync::Arc;

use dualwield_core::{AnimationVariantSelector, ApplyOutcome, DualWieldError, JointKind, Transform};
use glam::Vec3;
use hook_registry::{HookError, HookRegistry, PreCall, Priority};
use tracing::{debug, error, info};

use crate::hooks::{AttachItem, PlayerStart, SetTrigger, SetWeaponTrails};
use crate::host::HostRuntime;
use crate::state::DualWieldState;

/// Placement of the second weapon hung on the back-melee joint.
const BACK_MELEE_OFFHAND: Transform =
    Transform::new(Vec3::new(-0.003, 0.0, 0.003), Vec3::new(0.0, 80.0, 0.0));
/// Placement of the second weapon hung on the back-tool joint.
const BACK_TOOL_OFFHAND: Transform =
    Transform::new(Vec3::new(-0.0008, -0.0052, 0.0), Vec3::new(20.0, 0.0, 0.0));

pub(crate) fn register<H: HostRuntime>(
    hooks: &mut HookRegistry<H, DualWieldState>,
) -> Result<(), HookError> {
    hooks.postfix::<PlayerStart, _>("dualwield.build_variants", Priority::NORMAL, |call, actor, _| {
        let state = &mut *call.state;
        if state.animation.is_built() || call.target.local_player().is_none() {
            return;
        }
        let Some(base) = call
            .target
            .actor(*actor)
            .map(|a| Arc::clone(&a.animator.controller))
        else {
            return;
        };

        match state.animation.build_variants(&base, &state.rules, &state.clips) {
            Ok(true) => info!(
                target: "dualwield::animation",
                base = %base.name,
                "Built dual-wield animation variants"
            ),
            Ok(false) => {}
            Err(error) => error!(
                target: "dualwield::animation",
                base = %base.name,
                code = error.error_code(),
                %error,
                "Could not build animation variants"
            ),
        }
    })?;

    hooks.prefix::<SetTrigger, _>("dualwield.select_variant", Priority::NORMAL, |call, args| {
        let host = &mut *call.target;
        let Some(state) = host.actor(args.actor) else {
            return PreCall::Continue;
        };
        let left = host.held_prefab(state.left_item);
        let right = host.held_prefab(state.right_item);
        let exclusions = &call.state.exclusions;
        let Some(key) =
            AnimationVariantSelector::select_variant(left, right, &args.trigger, exclusions)
        else {
            return PreCall::Continue;
        };

        match call.state.animation.apply(host, args.actor, key) {
            ApplyOutcome::Swapped => debug!(
                target: "dualwield::animation",
                actor = ?args.actor,
                variant = %key,
                trigger = %args.trigger,
                "Swapped animation variant"
            ),
            ApplyOutcome::NotBuilt => debug!(
                target: "dualwield::animation",
                actor = ?args.actor,
                "Variants not built yet"
            ),
            ApplyOutcome::Unchanged | ApplyOutcome::UnknownActor => {}
        }
        PreCall::Continue
    })?;

    hooks.postfix::<SetWeaponTrails, _>("dualwield.left_trails", Priority::NORMAL, |call, args, _| {
        let Some(actor) = call.target.actor_mut(args.actor) else {
            return;
        };
        if let Some(left) = actor.visual.left_instance.as_mut() {
            for trail in &mut left.trails {
                trail.emit = args.enabled;
            }
        }
    })?;

    hooks.postfix::<AttachItem, _>("dualwield.back_offhand", Priority::NORMAL, |call, args, _| {
        let placement = match args.joint {
            JointKind::BackMelee => BACK_MELEE_OFFHAND,
            JointKind::BackTool => BACK_TOOL_OFFHAND,
            _ => return,
        };
        let Some(actor) = call.target.actor_mut(args.actor) else {
            return;
        };
        if !actor.is_player {
            return;
        }
        if let Some(joint) = actor.visual.joint_mut(args.joint)
            && joint.children.len() > 1
        {
            joint.children[1] = placement;
        }
    })?;
    Ok(())
}
