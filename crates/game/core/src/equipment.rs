//! Equipment state tracking: exclusions, off-hand routing and the reentrancy
//! guard around self-triggered equipment mutations.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use thiserror::Error;

use crate::error::{DualWieldError, ErrorSeverity};
use crate::host::Host;
use crate::model::{ActorId, ItemId, SharedData, WeaponCategory};

/// Prefab names that may never be dual-wielded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: HashSet<String>,
}

impl ExclusionSet {
    pub fn parse(raw: &str) -> Self {
        let mut set = Self::default();
        set.rebuild(raw);
        set
    }

    /// Replaces the contents from a comma-separated list, reusing storage.
    /// Entries are trimmed; empty entries are dropped.
    pub fn rebuild(&mut self, raw: &str) {
        self.names.clear();
        self.names.extend(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        );
    }

    pub fn contains(&self, prefab: &str) -> bool {
        self.names.contains(prefab)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Depth counter shared by every [`GuardScope`] taken from it.
///
/// Only the simulation thread touches it, so a plain `Rc<Cell>` suffices.
#[derive(Clone, Debug, Default)]
pub struct ReentrancyGuard {
    depth: Rc<Cell<u32>>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the start of a self-triggered equipment mutation. The mark is
    /// released when the returned scope drops, on every exit path.
    #[must_use = "the guard is released as soon as the scope is dropped"]
    pub fn enter(&self) -> GuardScope {
        self.depth.set(self.depth.get() + 1);
        GuardScope {
            depth: Rc::clone(&self.depth),
        }
    }

    pub fn is_active(&self) -> bool {
        self.depth.get() > 0
    }
}

#[derive(Debug)]
pub struct GuardScope {
    depth: Rc<Cell<u32>>,
}

impl Drop for GuardScope {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EquipmentError {
    #[error("actor {0:?} not found")]
    UnknownActor(ActorId),

    #[error("item {0:?} not found")]
    UnknownItem(ItemId),
}

impl DualWieldError for EquipmentError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownActor(_) => "EQUIPMENT_UNKNOWN_ACTOR",
            Self::UnknownItem(_) => "EQUIPMENT_UNKNOWN_ITEM",
        }
    }
}

/// Shared category of two one-handed melee weapons, ignoring exclusions.
pub fn paired_category(right: &SharedData, left: &SharedData) -> Option<WeaponCategory> {
    let category = right.melee_category()?;
    (left.melee_category()? == category).then_some(category)
}

/// Dual-wield category of a right/left pair, if the pair is eligible.
///
/// Both must be one-handed melee weapons of the same category and neither
/// prefab may be excluded. Every dual-wield decision after equipping goes
/// through here.
pub fn dual_wield_category(
    right: (&str, &SharedData),
    left: (&str, &SharedData),
    exclusions: &ExclusionSet,
) -> Option<WeaponCategory> {
    let (right_prefab, right) = right;
    let (left_prefab, left) = left;
    if exclusions.contains(right_prefab) || exclusions.contains(left_prefab) {
        return None;
    }
    paired_category(right, left)
}

/// Outcome of [`EquipmentTracker::normalize_on_setup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Normalization {
    /// The lone left-hand item was moved to the right hand.
    Moved(ItemId),
    /// Inside a guarded mutation; nothing was checked.
    Suppressed,
    Unchanged,
}

/// Observes and, when needed, overrides hand assignments.
#[derive(Clone, Debug, Default)]
pub struct EquipmentTracker {
    guard: ReentrancyGuard,
}

impl EquipmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guard(&self) -> &ReentrancyGuard {
        &self.guard
    }

    /// Routes `candidate` to the left hand when it pairs with the right-hand
    /// weapon.
    ///
    /// Returns `Ok(true)` when the item was assigned and the host's own
    /// single-hand equip path must be skipped.
    pub fn try_assign_offhand<H: Host>(
        &self,
        host: &mut H,
        actor: ActorId,
        candidate: ItemId,
        trigger_effects: bool,
        exclusions: &ExclusionSet,
    ) -> Result<bool, EquipmentError> {
        let state = host.actor(actor).ok_or(EquipmentError::UnknownActor(actor))?;
        if !state.is_player {
            return Ok(false);
        }
        let (right_item, current_left) = (state.right_item, state.left_item);

        let candidate_data = host.item(candidate).ok_or(EquipmentError::UnknownItem(candidate))?;
        let candidate_shared = host
            .shared(candidate_data.shared)
            .ok_or(EquipmentError::UnknownItem(candidate))?;

        let Some(right) = right_item.and_then(|id| host.item(id)) else {
            return Ok(false);
        };
        let Some(right_shared) = host.shared(right.shared) else {
            return Ok(false);
        };

        // Only the incoming item is checked against the exclusion list.
        if right.id == candidate
            || exclusions.contains(&candidate_data.prefab)
            || paired_category(right_shared, candidate_shared).is_none()
        {
            return Ok(false);
        }

        if let Some(left) = current_left {
            host.unequip_item(actor, left, trigger_effects);
        }
        let actor_state = host.actor_mut(actor).ok_or(EquipmentError::UnknownActor(actor))?;
        actor_state.left_item = Some(candidate);
        if let Some(item) = host.item_mut(candidate) {
            item.equipped = true;
        }
        Ok(true)
    }

    /// Moves a lone left-hand one-handed item to the right hand.
    ///
    /// Skipped entirely while a guarded equipment mutation is in progress.
    pub fn normalize_on_setup<H: Host>(
        &self,
        host: &mut H,
        actor: ActorId,
    ) -> Result<Normalization, EquipmentError> {
        if self.guard.is_active() {
            return Ok(Normalization::Suppressed);
        }

        let state = host.actor(actor).ok_or(EquipmentError::UnknownActor(actor))?;
        if !state.is_player || state.right_item.is_some() {
            return Ok(Normalization::Unchanged);
        }
        let Some((left, _, shared)) = host.held_shared(state.left_item) else {
            return Ok(Normalization::Unchanged);
        };
        if !shared.is_one_handed() {
            return Ok(Normalization::Unchanged);
        }

        host.unequip_item(actor, left, false);
        let state = host.actor_mut(actor).ok_or(EquipmentError::UnknownActor(actor))?;
        state.right_item = Some(left);
        state.left_item = None;
        if let Some(item) = host.item_mut(left) {
            item.equipped = true;
        }
        Ok(Normalization::Moved(left))
    }
}
