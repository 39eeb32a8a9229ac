//! Dual-wield configuration surface.
//!
//! The values here are owned by an external configuration layer that loads,
//! synchronizes and range-checks them. This crate only reads the resolved
//! values and reacts to [`ConfigChange`] notifications.

use crate::balancing::{BalancingEntry, ComboSlot};
use crate::model::WeaponCategory;

/// Balancing values of one category.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryBalancing {
    pub special: BalancingEntry,
    pub attack1: BalancingEntry,
    pub attack2: BalancingEntry,
    pub attack3: BalancingEntry,
}

impl CategoryBalancing {
    pub const fn new(
        special: BalancingEntry,
        attack1: BalancingEntry,
        attack2: BalancingEntry,
        attack3: BalancingEntry,
    ) -> Self {
        Self {
            special,
            attack1,
            attack2,
            attack3,
        }
    }

    pub fn slot(&self, slot: ComboSlot) -> BalancingEntry {
        match slot {
            ComboSlot::Special => self.special,
            ComboSlot::Attack1 => self.attack1,
            ComboSlot::Attack2 => self.attack2,
            ComboSlot::Attack3 => self.attack3,
        }
    }

    pub fn to_array(&self) -> [BalancingEntry; ComboSlot::COUNT] {
        [self.special, self.attack1, self.attack2, self.attack3]
    }

    fn clamped(self) -> Self {
        Self {
            special: self.special.clamped(),
            attack1: self.attack1.clamped(),
            attack2: self.attack2.clamped(),
            attack3: self.attack3.clamped(),
        }
    }
}

/// Balancing values of every category.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BalancingSettings {
    pub axes: CategoryBalancing,
    pub clubs: CategoryBalancing,
    pub knives: CategoryBalancing,
    pub swords: CategoryBalancing,
}

impl BalancingSettings {
    pub fn category(&self, category: WeaponCategory) -> &CategoryBalancing {
        match category {
            WeaponCategory::Axes => &self.axes,
            WeaponCategory::Clubs => &self.clubs,
            WeaponCategory::Knives => &self.knives,
            WeaponCategory::Swords => &self.swords,
        }
    }

    pub fn category_mut(&mut self, category: WeaponCategory) -> &mut CategoryBalancing {
        match category {
            WeaponCategory::Axes => &mut self.axes,
            WeaponCategory::Clubs => &mut self.clubs,
            WeaponCategory::Knives => &mut self.knives,
            WeaponCategory::Swords => &mut self.swords,
        }
    }
}

impl Default for BalancingSettings {
    fn default() -> Self {
        let e = BalancingEntry::new;
        Self {
            axes: CategoryBalancing::new(
                e(60.0, 90.0, 40.0),
                e(80.0, 90.0, 20.0),
                e(70.0, 95.0, 20.0),
                e(60.0, 170.0, 30.0),
            ),
            clubs: CategoryBalancing::new(
                e(80.0, 60.0, 35.0),
                e(120.0, 65.0, 14.0),
                e(130.0, 75.0, 15.0),
                e(150.0, 75.0, 15.0),
            ),
            knives: CategoryBalancing::new(
                e(140.0, 30.0, 32.0),
                e(140.0, 20.0, 9.0),
                e(140.0, 20.0, 9.0),
                e(200.0, 140.0, 27.0),
            ),
            swords: CategoryBalancing::new(
                e(100.0, 50.0, 40.0),
                e(100.0, 90.0, 15.0),
                e(100.0, 90.0, 15.0),
                e(120.0, 90.0, 20.0),
            ),
        }
    }
}

/// Resolved dual-wield configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DualWieldConfig {
    /// When on, only server admins may change values. Enforced by the sync layer.
    pub lock_configuration: bool,
    /// Comma-separated prefab names that may never be dual-wielded.
    pub exclusion_list: String,
    /// Multiplier on experience gained in the dual-wield skills.
    pub experience_gain_factor: f32,
    /// Percent of dual-wield skill experience lost on death.
    pub experience_loss: u32,
    /// When on, every category trains the single shared offhand skill.
    pub single_offhand_skill: bool,
    pub balancing: BalancingSettings,
}

impl DualWieldConfig {
    pub const EXPERIENCE_GAIN_RANGE: (f32, f32) = (0.0, 5.0);
    pub const MAX_EXPERIENCE_LOSS: u32 = 100;

    pub const DEFAULT_EXPERIENCE_GAIN_FACTOR: f32 = 1.0;
    pub const DEFAULT_EXPERIENCE_LOSS: u32 = 5;

    pub fn new() -> Self {
        Self {
            lock_configuration: true,
            exclusion_list: String::new(),
            experience_gain_factor: Self::DEFAULT_EXPERIENCE_GAIN_FACTOR,
            experience_loss: Self::DEFAULT_EXPERIENCE_LOSS,
            single_offhand_skill: false,
            balancing: BalancingSettings::default(),
        }
    }

    /// Copy with every numeric value forced into its declared range.
    pub fn clamped(mut self) -> Self {
        let (lo, hi) = Self::EXPERIENCE_GAIN_RANGE;
        self.experience_gain_factor = if self.experience_gain_factor.is_nan() {
            Self::DEFAULT_EXPERIENCE_GAIN_FACTOR
        } else {
            self.experience_gain_factor.clamp(lo, hi)
        };
        self.experience_loss = self.experience_loss.min(Self::MAX_EXPERIENCE_LOSS);
        for category in WeaponCategory::ALL {
            let row = self.balancing.category_mut(category);
            *row = row.clamped();
        }
        self
    }
}

impl Default for DualWieldConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Which part of the configuration changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigChange {
    ExclusionList,
    ExperienceGainFactor,
    ExperienceLoss,
    SingleOffhandSkill,
    Balancing {
        category: WeaponCategory,
        slot: ComboSlot,
    },
    /// Everything may have changed (initial sync, file reload).
    Reloaded,
}
