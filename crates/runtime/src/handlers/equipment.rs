//! Off-hand routing on equip and hand normalization.

use dualwield_core::{DualWieldError, Normalization};
use hook_registry::{HookError, HookRegistry, PreCall, Priority};
use tracing::{debug, warn};

use crate::hooks::rewrites::{InjectOffhandAssignment, swap_hidden_hands};
use crate::hooks::{EquipItem, SetupEquipment, ShowHandItems, TRY_ASSIGN_OFFHAND};
use crate::host::HostRuntime;
use crate::state::DualWieldState;

pub(crate) fn register<H: HostRuntime>(
    hooks: &mut HookRegistry<H, DualWieldState>,
) -> Result<(), HookError> {
    hooks.inject::<EquipItem, _>(TRY_ASSIGN_OFFHAND, |call, args| {
        let state = &*call.state;
        match state.equipment.try_assign_offhand(
            &mut *call.target,
            args.actor,
            args.item,
            args.trigger_effects,
            &state.exclusions,
        ) {
            Ok(assigned) => {
                if assigned {
                    debug!(
                        target: "dualwield::equipment",
                        actor = ?args.actor,
                        item = ?args.item,
                        "Routed item to the left hand"
                    );
                }
                assigned
            }
            Err(error) => {
                warn!(
                    target: "dualwield::equipment",
                    actor = ?args.actor,
                    item = ?args.item,
                    code = error.error_code(),
                    %error,
                    "Off-hand check failed, using host equip"
                );
                false
            }
        }
    })?;
    hooks.rewrite::<EquipItem>(InjectOffhandAssignment);

    hooks.prefix::<SetupEquipment, _>("dualwield.normalize_hands", Priority::NORMAL, |call, actor| {
        match call.state.equipment.normalize_on_setup(&mut *call.target, *actor) {
            Ok(Normalization::Moved(item)) => debug!(
                target: "dualwield::equipment",
                actor = ?actor,
                item = ?item,
                "Moved lone left-hand item to the right hand"
            ),
            Ok(_) => {}
            Err(error) => warn!(
                target: "dualwield::equipment",
                actor = ?actor,
                code = error.error_code(),
                %error,
                "Hand normalization skipped"
            ),
        }
        PreCall::Continue
    })?;

    hooks.rewrite::<ShowHandItems>(swap_hidden_hands());
    Ok(())
}
