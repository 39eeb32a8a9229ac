//! Extension state shared by every handler.

use dualwield_core::{
    AnimationVariantSelector, BalancingTable, ClipLibrary, ClipSlotMap, CombatContext,
    CombatResolver, EquipmentTracker, ExclusionSet, ReplacementRules, SkillExtensionRegistry,
    SpeedScaler,
};

/// Everything dual-wield owns at runtime.
///
/// Handlers receive it by `&mut` through the hook call, never by global.
/// Split borrows go through the `*_parts` helpers so read-only tables and
/// the mutable scratch of one component can be held at once.
#[derive(Debug)]
pub struct DualWieldState {
    pub balancing: BalancingTable,
    pub clip_slots: ClipSlotMap,
    pub exclusions: ExclusionSet,
    pub equipment: EquipmentTracker,
    pub animation: AnimationVariantSelector,
    pub rules: ReplacementRules,
    pub clips: ClipLibrary,
    pub resolver: CombatResolver,
    pub speed: SpeedScaler,
    pub skills: SkillExtensionRegistry,
    /// Tab completion has been extended; happens once per process.
    pub terminal_extended: bool,
    pub config_locked: bool,
}

impl DualWieldState {
    pub fn combat(&self) -> CombatContext<'_> {
        CombatContext {
            balancing: &self.balancing,
            clip_slots: &self.clip_slots,
            exclusions: &self.exclusions,
            skills: &self.skills,
        }
    }

    pub fn resolver_parts(&mut self) -> (CombatContext<'_>, &mut CombatResolver) {
        let ctx = CombatContext {
            balancing: &self.balancing,
            clip_slots: &self.clip_slots,
            exclusions: &self.exclusions,
            skills: &self.skills,
        };
        (ctx, &mut self.resolver)
    }

    pub fn speed_parts(&mut self) -> (CombatContext<'_>, &mut SpeedScaler) {
        let ctx = CombatContext {
            balancing: &self.balancing,
            clip_slots: &self.clip_slots,
            exclusions: &self.exclusions,
            skills: &self.skills,
        };
        (ctx, &mut self.speed)
    }
}
