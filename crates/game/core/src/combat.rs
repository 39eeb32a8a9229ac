//! Dual-wield combat resolution.
//!
//! One attack trigger runs in a single pass:
//!
//! 1. eligibility: both hands hold a one-handed weapon of the same category,
//!    neither excluded, and the category has an extension skill
//! 2. balancing: both weapons' shared stats are scaled for the combo slot
//! 3. mirrored swing: the off-hand sweeps with a negated angle
//! 4. the primary attack runs
//! 5. restoration: every mutated field gets its recorded value back
//!
//! Steps 2 to 5 run inside a [`TriggerGuard`], whose `Drop` performs step 5 on
//! every exit path, including an error or panic from the host.

use std::collections::HashMap;

use crate::balancing::{BalancingTable, ClipSlotMap, ComboSlot};
use crate::equipment::{ExclusionSet, dual_wield_category};
use crate::host::{Host, HostError};
use crate::model::{
    ActorId, DamageTypes, HitPointType, ItemId, PrefabHash, SharedId, SkillType, WeaponCategory,
};
use crate::skills::{SkillExtensionRegistry, SkillId};

/// Attack animations whose knockback is suppressed while dual-wielding.
const KNOCKBACK_SPECIALS: [&str; 2] = ["axe_secondary", "mace_secondary"];

/// Read-only inputs shared by every resolver step.
#[derive(Clone, Copy)]
pub struct CombatContext<'a> {
    pub balancing: &'a BalancingTable,
    pub clip_slots: &'a ClipSlotMap,
    pub exclusions: &'a ExclusionSet,
    pub skills: &'a SkillExtensionRegistry,
}

/// An eligible right/left pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DualWieldPair {
    pub right: ItemId,
    pub left: ItemId,
    pub right_shared: SharedId,
    pub left_shared: SharedId,
    pub category: WeaponCategory,
    /// Extension skill the off-hand swing trains.
    pub offhand_skill: SkillId,
}

impl DualWieldPair {
    /// Distinct shared stat blocks of the pair. Two items of one prefab share
    /// a block, which must only be scaled once.
    fn shared_blocks(&self) -> impl Iterator<Item = SharedId> {
        let left = (self.left_shared != self.right_shared).then_some(self.left_shared);
        std::iter::once(self.right_shared).chain(left)
    }
}

/// Checks whether `actor` is dual-wielding right now.
pub fn eligibility<H: Host>(
    host: &H,
    ctx: &CombatContext<'_>,
    actor: ActorId,
) -> Option<DualWieldPair> {
    let state = host.actor(actor)?;
    if !state.is_player {
        return None;
    }
    let right = host.item(state.right_item?)?;
    let left = host.item(state.left_item?)?;
    let category = dual_wield_category(
        (&right.prefab, host.shared(right.shared)?),
        (&left.prefab, host.shared(left.shared)?),
        ctx.exclusions,
    )?;
    let offhand_skill = ctx.skills.resolve(category).ok()?;
    Some(DualWieldPair {
        right: right.id,
        left: left.id,
        right_shared: right.shared,
        left_shared: left.shared,
        category,
        offhand_skill,
    })
}

/// Recorded state of one shared stat block.
#[derive(Clone, Copy, Debug, PartialEq)]
struct StatSnapshot {
    shared: SharedId,
    damages: DamageTypes,
    backstab_bonus: f32,
    attack_force: f32,
}

/// Recorded attack fields rewritten by the mirrored swing.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SwingSnapshot {
    attack_angle: f32,
    weapon: Option<ItemId>,
    left_shared: SharedId,
    left_skill: SkillType,
}

/// What a trigger did, for logging by the caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerReport {
    pub pair: DualWieldPair,
    /// Slot and damage factor, when the playing clip has a balancing slot.
    pub balance: Option<(ComboSlot, f32)>,
    pub knockback_suppressed: bool,
}

/// Per-trigger scratch state. Owned by the resolver and empty between
/// triggers.
#[derive(Debug, Default)]
pub struct CombatResolver {
    stats: Vec<StatSnapshot>,
}

impl CombatResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no restoration is pending. Holds between triggers.
    pub fn is_idle(&self) -> bool {
        self.stats.is_empty()
    }

    /// Runs a full dual-wield trigger for an eligible `pair`.
    ///
    /// `primary` performs the host's own attack trigger (the right-hand swing)
    /// and runs after the mirrored off-hand swing. All temporary mutations are
    /// undone before this returns, whatever the outcome.
    pub fn resolve<H: Host, R>(
        &mut self,
        host: &mut H,
        ctx: &CombatContext<'_>,
        actor: ActorId,
        pair: DualWieldPair,
        primary: impl FnOnce(&mut H) -> R,
    ) -> Result<(R, TriggerReport), HostError> {
        let mut guard = TriggerGuard::begin(host, &mut self.stats, actor)?;
        let (balance, knockback_suppressed) = guard.apply_balance(ctx, &pair)?;
        guard.mirrored_swing(&pair)?;
        let result = primary(&mut *guard.host);
        drop(guard);

        Ok((
            result,
            TriggerReport {
                pair,
                balance,
                knockback_suppressed,
            },
        ))
    }
}

/// Scope of one attack trigger. Restores everything it changed on drop.
pub struct TriggerGuard<'a, H: Host> {
    host: &'a mut H,
    stats: &'a mut Vec<StatSnapshot>,
    actor: ActorId,
    hit_point_type: Option<HitPointType>,
    swing: Option<SwingSnapshot>,
}

impl<'a, H: Host> TriggerGuard<'a, H> {
    fn begin(
        host: &'a mut H,
        stats: &'a mut Vec<StatSnapshot>,
        actor: ActorId,
    ) -> Result<Self, HostError> {
        host.actor(actor)
            .ok_or(HostError::ActorNotFound(actor))?
            .current_attack
            .as_ref()
            .ok_or(HostError::NoAttack(actor))?;
        stats.clear();
        Ok(Self {
            host,
            stats,
            actor,
            hit_point_type: None,
            swing: None,
        })
    }

    /// Scales both weapons for the playing clip's slot. Clips without a slot
    /// leave stats untouched.
    fn apply_balance(
        &mut self,
        ctx: &CombatContext<'_>,
        pair: &DualWieldPair,
    ) -> Result<(Option<(ComboSlot, f32)>, bool), HostError> {
        let state = self.host.actor(self.actor).ok_or(HostError::ActorNotFound(self.actor))?;
        let Some(slot) = state
            .animator
            .current_clip
            .as_deref()
            .and_then(|clip| ctx.clip_slots.slot(clip))
        else {
            return Ok((None, false));
        };
        let Ok(entry) = ctx.balancing.get(pair.category, slot) else {
            return Ok((None, false));
        };
        let suppress_knockback = state
            .current_attack
            .as_ref()
            .is_some_and(|a| KNOCKBACK_SPECIALS.contains(&a.attack_animation.as_str()));

        let factor = entry.damage_factor();
        let mut suppressed = false;
        for shared_id in pair.shared_blocks() {
            let Some(shared) = self.host.shared_mut(shared_id) else {
                continue;
            };
            // Record before writing so a partial apply still restores.
            self.stats.push(StatSnapshot {
                shared: shared_id,
                damages: shared.damages,
                backstab_bonus: shared.backstab_bonus,
                attack_force: shared.attack_force,
            });

            if suppress_knockback && matches!(shared.skill, SkillType::Clubs | SkillType::Axes) {
                shared.attack_force = 0.0;
                suppressed = true;
            }
            shared.damages.modify(factor);
            if factor != 0.0 {
                shared.backstab_bonus /= factor;
            }
        }
        Ok((Some((slot, factor)), suppressed))
    }

    /// Runs the off-hand sweep: first-contact hit points, negated angle, the
    /// left weapon, and the extension skill in place of the weapon's skill.
    fn mirrored_swing(&mut self, pair: &DualWieldPair) -> Result<(), HostError> {
        let actor = self.actor;
        let left_skill = self
            .host
            .shared(pair.left_shared)
            .map(|s| s.skill)
            .unwrap_or_default();

        let attack = self
            .host
            .actor_mut(actor)
            .and_then(|a| a.current_attack.as_mut())
            .ok_or(HostError::NoAttack(actor))?;
        self.hit_point_type = Some(attack.hit_point_type);
        self.swing = Some(SwingSnapshot {
            attack_angle: attack.attack_angle,
            weapon: attack.weapon,
            left_shared: pair.left_shared,
            left_skill,
        });
        attack.hit_point_type = HitPointType::First;
        attack.attack_angle = -attack.attack_angle;
        attack.weapon = Some(pair.left);

        if let Some(shared) = self.host.shared_mut(pair.left_shared) {
            shared.skill = pair.offhand_skill.skill_type();
        }

        let result = self.host.do_melee_attack(actor);
        self.end_swing(Some(Some(pair.right)));
        result
    }

    /// Puts back the swing fields. `weapon` overrides the recorded weapon.
    fn end_swing(&mut self, weapon: Option<Option<ItemId>>) {
        let Some(swing) = self.swing.take() else {
            return;
        };
        if let Some(shared) = self.host.shared_mut(swing.left_shared) {
            shared.skill = swing.left_skill;
        }
        if let Some(attack) = self
            .host
            .actor_mut(self.actor)
            .and_then(|a| a.current_attack.as_mut())
        {
            attack.weapon = weapon.unwrap_or(swing.weapon);
            attack.attack_angle = swing.attack_angle;
        }
    }
}

impl<H: Host> Drop for TriggerGuard<'_, H> {
    fn drop(&mut self) {
        self.end_swing(None);

        if let Some(hit_point_type) = self.hit_point_type.take()
            && let Some(attack) = self
                .host
                .actor_mut(self.actor)
                .and_then(|a| a.current_attack.as_mut())
        {
            attack.hit_point_type = hit_point_type;
        }

        for snapshot in self.stats.drain(..) {
            if let Some(shared) = self.host.shared_mut(snapshot.shared) {
                shared.damages = snapshot.damages;
                shared.backstab_bonus = snapshot.backstab_bonus;
                shared.attack_force = snapshot.attack_force;
            }
        }
    }
}

/// `base - base/6 * right_factor - base/6 * offhand_factor`.
pub fn dual_wield_stamina(base: f32, right_factor: f32, offhand_factor: f32) -> f32 {
    base - base / 6.0 * right_factor - base / 6.0 * offhand_factor
}

/// Stamina cost of the actor's current dual-wield attack, or `None` to keep
/// the host's own cost.
pub fn attack_stamina<H: Host>(host: &H, ctx: &CombatContext<'_>, actor: ActorId) -> Option<f32> {
    let pair = eligibility(host, ctx, actor)?;
    let attack = host.actor(actor)?.current_attack.as_ref()?;
    let (_, _, weapon) = host.held_shared(attack.weapon)?;
    let slot = ComboSlot::for_chain(attack.chain_levels, attack.current_chain_level)?;
    let base = ctx.balancing.get(pair.category, slot).ok()?.stamina;

    Some(dual_wield_stamina(
        base,
        host.skill_factor(actor, weapon.skill),
        host.skill_factor(actor, pair.offhand_skill.skill_type()),
    ))
}

/// Rounds `speed * factor` to three decimals and re-adds the sub-1e-4
/// remainder of the original speed, which the host may use for signaling.
pub fn scale_speed(speed: f32, factor: f32) -> f32 {
    let scaled = (f64::from(speed) * f64::from(factor) * 1000.0).round_ties_even() / 1000.0;
    scaled as f32 + speed % 1e-4
}

/// Outcome of [`SpeedScaler::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpeedUpdate {
    Scaled { from: f32, to: f32 },
    /// The animator still holds the value written last time.
    AlreadyScaled,
    Skipped,
}

/// Scales attack animation speed for dual-wielders.
///
/// The host rewrites the animator speed whenever it recomputes it. To know
/// whether the current value has been scaled already, the exact value last
/// written per actor is recorded; a different value means the host has
/// overwritten it and it needs scaling again.
#[derive(Debug, Default)]
pub struct SpeedScaler {
    written: HashMap<ActorId, f32>,
}

impl SpeedScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update<H: Host>(
        &mut self,
        host: &mut H,
        ctx: &CombatContext<'_>,
        actor: ActorId,
    ) -> SpeedUpdate {
        let Some(state) = host.actor(actor) else {
            self.written.remove(&actor);
            return SpeedUpdate::Skipped;
        };
        if !state.is_player || !state.in_attack {
            self.written.remove(&actor);
            return SpeedUpdate::Skipped;
        }

        let speed = state.animator.speed;
        if speed <= 0.001 {
            return SpeedUpdate::Skipped;
        }
        if self.written.get(&actor).is_some_and(|w| w.to_bits() == speed.to_bits()) {
            return SpeedUpdate::AlreadyScaled;
        }
        if state.current_attack.is_none() {
            return SpeedUpdate::Skipped;
        }
        let Some(slot) = state
            .animator
            .current_clip
            .as_deref()
            .and_then(|clip| ctx.clip_slots.slot(clip))
        else {
            return SpeedUpdate::Skipped;
        };
        let (left, right) = (state.visual.current_left, state.visual.current_right);
        let Some(factor) = visual_category(host, ctx.exclusions, left, right)
            .and_then(|category| ctx.balancing.get(category, slot).ok())
            .map(|entry| entry.speed_factor())
        else {
            return SpeedUpdate::Skipped;
        };

        let scaled = scale_speed(speed, factor);
        if let Some(state) = host.actor_mut(actor) {
            state.animator.speed = scaled;
        }
        self.written.insert(actor, scaled);
        SpeedUpdate::Scaled {
            from: speed,
            to: scaled,
        }
    }
}

/// Category of a visually dual-wielded pair, decided by the same rule as the
/// equipped pair.
fn visual_category<H: Host>(
    host: &H,
    exclusions: &ExclusionSet,
    left: Option<PrefabHash>,
    right: Option<PrefabHash>,
) -> Option<WeaponCategory> {
    dual_wield_category(host.visual_prefab(right)?, host.visual_prefab(left)?, exclusions)
}
