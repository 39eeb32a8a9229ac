//! World access the dual-wield logic needs from the host.
//!
//! The host owns every actor, item and skill store. Implementations are thin
//! adapters over the host's own object graph; tests use an in-memory world.

use thiserror::Error;

use crate::model::{Actor, ActorId, ItemData, ItemId, PrefabHash, SharedData, SharedId, SkillType};
use crate::skills::SkillId;

/// Failure reported by a host routine this crate calls into.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("actor {0:?} not found")]
    ActorNotFound(ActorId),

    #[error("actor {0:?} has no attack in progress")]
    NoAttack(ActorId),

    #[error("host aborted the attack: {0}")]
    AttackAborted(String),
}

/// Read and write access to the host's object graph.
pub trait Host {
    fn actor(&self, id: ActorId) -> Option<&Actor>;
    fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor>;

    fn item(&self, id: ItemId) -> Option<&ItemData>;
    fn item_mut(&mut self, id: ItemId) -> Option<&mut ItemData>;

    fn shared(&self, id: SharedId) -> Option<&SharedData>;
    fn shared_mut(&mut self, id: SharedId) -> Option<&mut SharedData>;

    /// Prefab name and stat block behind a visual-equipment hash.
    fn prefab(&self, hash: PrefabHash) -> Option<(&str, SharedId)>;

    fn local_player(&self) -> Option<ActorId>;

    /// Skill factor in `[0, 1]` of `actor` for `skill`.
    fn skill_factor(&self, actor: ActorId, skill: SkillType) -> f32;

    /// Mutable level of an extension skill, creating the entry on first use.
    fn skill_level_mut(&mut self, actor: ActorId, skill: SkillId) -> Option<&mut f32>;

    fn reset_skill(&mut self, actor: ActorId, skill: SkillId);

    /// Host routine that removes `item` from whichever hand holds it.
    fn unequip_item(&mut self, actor: ActorId, item: ItemId, trigger_effects: bool);

    /// Host routine that runs one melee sweep with the actor's current attack.
    fn do_melee_attack(&mut self, actor: ActorId) -> Result<(), HostError>;

    /// Forces the animator to evaluate its state immediately.
    fn refresh_animator(&mut self, actor: ActorId);

    /// Top-left HUD message.
    fn notify(&mut self, actor: ActorId, message: &str);

    fn console_print(&mut self, message: &str);

    fn add_localized_word(&mut self, key: &str, value: &str);

    /// Shared data of the item in a hand slot, resolved through the item.
    fn held_shared(&self, item: Option<ItemId>) -> Option<(ItemId, SharedId, &SharedData)> {
        let item = self.item(item?)?;
        let shared = self.shared(item.shared)?;
        Some((item.id, item.shared, shared))
    }

    /// Prefab name and shared data of the item in a hand slot.
    fn held_prefab(&self, item: Option<ItemId>) -> Option<(&str, &SharedData)> {
        let item = self.item(item?)?;
        Some((item.prefab.as_str(), self.shared(item.shared)?))
    }

    /// Prefab name and shared data behind a visual-equipment hash.
    fn visual_prefab(&self, hash: Option<PrefabHash>) -> Option<(&str, &SharedData)> {
        let (prefab, shared) = self.prefab(hash?)?;
        Some((prefab, self.shared(shared)?))
    }
}
