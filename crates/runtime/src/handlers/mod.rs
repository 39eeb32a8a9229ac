//! Handler installation, one module per concern.
//!
//! Each `register` attaches its handlers and queues its rewrites on the
//! registry; nothing touches the host until [`HookRegistry::install`] runs.

mod animation;
mod combat;
mod equipment;
mod skills;

use hook_registry::{HookError, HookRegistry};

use crate::host::HostRuntime;
use crate::state::DualWieldState;

/// Attaches every dual-wield handler to `hooks`.
pub(crate) fn register_all<H: HostRuntime>(
    hooks: &mut HookRegistry<H, DualWieldState>,
) -> Result<(), HookError> {
    equipment::register(hooks)?;
    combat::register(hooks)?;
    animation::register(hooks)?;
    skills::register(hooks)?;
    Ok(())
}
