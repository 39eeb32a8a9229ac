//! Per-category combo balancing.
//!
//! Every weapon category owns four [`BalancingEntry`] values, one per
//! [`ComboSlot`]. Values are kept as raw percentages (90 means ×0.9) and only
//! turned into factors at the point of use.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::config::BalancingSettings;
use crate::error::{DualWieldError, ErrorSeverity};
use crate::model::WeaponCategory;

/// Position within a category's combo.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ComboSlot {
    /// Secondary (special) attack.
    Special = 0,
    Attack1 = 1,
    Attack2 = 2,
    Attack3 = 3,
}

impl ComboSlot {
    pub const COUNT: usize = 4;
    pub const ALL: [ComboSlot; 4] = [Self::Special, Self::Attack1, Self::Attack2, Self::Attack3];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Special),
            1 => Some(Self::Attack1),
            2 => Some(Self::Attack2),
            3 => Some(Self::Attack3),
            _ => None,
        }
    }

    /// Slot for an attack's combo position.
    ///
    /// Attacks without a multi-step combo (`chain_levels <= 1`) are special
    /// attacks; otherwise combo step `n` (zero-based) maps to `Attack{n+1}`.
    pub const fn for_chain(chain_levels: u32, current_level: u32) -> Option<Self> {
        if chain_levels <= 1 {
            Some(Self::Special)
        } else {
            Self::from_index(current_level as usize + 1)
        }
    }

    /// Human-readable label as shown in configuration.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Special => "Special attack",
            Self::Attack1 => "Attack 1",
            Self::Attack2 => "Attack 2",
            Self::Attack3 => "Attack 3",
        }
    }
}

/// Speed, damage and stamina of one combo slot.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BalancingEntry {
    #[cfg_attr(feature = "serde", serde(rename = "speed"))]
    pub speed_percent: f32,
    #[cfg_attr(feature = "serde", serde(rename = "damage"))]
    pub damage_percent: f32,
    pub stamina: f32,
}

impl BalancingEntry {
    pub const SPEED_RANGE: (f32, f32) = (1.0, 300.0);
    pub const DAMAGE_RANGE: (f32, f32) = (0.0, 500.0);
    pub const STAMINA_RANGE: (f32, f32) = (0.0, 200.0);

    pub const fn new(speed_percent: f32, damage_percent: f32, stamina: f32) -> Self {
        Self {
            speed_percent,
            damage_percent,
            stamina,
        }
    }

    pub fn speed_factor(&self) -> f32 {
        self.speed_percent / 100.0
    }

    pub fn damage_factor(&self) -> f32 {
        self.damage_percent / 100.0
    }

    /// Copy of this entry with every value forced into its declared range.
    pub fn clamped(self) -> Self {
        let clamp = |v: f32, (lo, hi): (f32, f32)| if v.is_nan() { lo } else { v.clamp(lo, hi) };
        Self {
            speed_percent: clamp(self.speed_percent, Self::SPEED_RANGE),
            damage_percent: clamp(self.damage_percent, Self::DAMAGE_RANGE),
            stamina: clamp(self.stamina, Self::STAMINA_RANGE),
        }
    }

    fn validate(&self, category: WeaponCategory, slot: ComboSlot) -> Result<(), BalancingError> {
        let checks = [
            ("speed", self.speed_percent, Self::SPEED_RANGE),
            ("damage", self.damage_percent, Self::DAMAGE_RANGE),
            ("stamina", self.stamina, Self::STAMINA_RANGE),
        ];
        for (field, value, (lo, hi)) in checks {
            if !(lo..=hi).contains(&value) {
                return Err(BalancingError::OutOfRange {
                    category,
                    slot,
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum BalancingError {
    #[error("no balancing entries for category {0}")]
    UnknownCategory(WeaponCategory),

    #[error("{category} {slot} {field} = {value} is out of range")]
    OutOfRange {
        category: WeaponCategory,
        slot: ComboSlot,
        field: &'static str,
        value: f32,
    },
}

impl DualWieldError for BalancingError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownCategory(_) => ErrorSeverity::Recoverable,
            Self::OutOfRange { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCategory(_) => "BALANCING_UNKNOWN_CATEGORY",
            Self::OutOfRange { .. } => "BALANCING_OUT_OF_RANGE",
        }
    }
}

/// Live balancing values, keyed by category.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BalancingTable {
    entries: BTreeMap<WeaponCategory, [BalancingEntry; ComboSlot::COUNT]>,
}

impl BalancingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &BalancingSettings) -> Result<Self, BalancingError> {
        let mut table = Self::new();
        table.rebuild_from_config(settings)?;
        Ok(table)
    }

    pub fn get(
        &self,
        category: WeaponCategory,
        slot: ComboSlot,
    ) -> Result<BalancingEntry, BalancingError> {
        self.entries
            .get(&category)
            .map(|slots| slots[slot.index()])
            .ok_or(BalancingError::UnknownCategory(category))
    }

    pub fn contains(&self, category: WeaponCategory) -> bool {
        self.entries.contains_key(&category)
    }

    /// Replaces one entry in place.
    pub fn set(
        &mut self,
        category: WeaponCategory,
        slot: ComboSlot,
        entry: BalancingEntry,
    ) -> Result<(), BalancingError> {
        entry.validate(category, slot)?;
        let slots = self
            .entries
            .get_mut(&category)
            .ok_or(BalancingError::UnknownCategory(category))?;
        slots[slot.index()] = entry;
        Ok(())
    }

    /// Replaces every entry from `settings`.
    ///
    /// All entries are validated before the first write, so a rejected
    /// configuration leaves the table exactly as it was. Existing category
    /// rows are overwritten in place.
    pub fn rebuild_from_config(
        &mut self,
        settings: &BalancingSettings,
    ) -> Result<(), BalancingError> {
        for category in WeaponCategory::ALL {
            let row = settings.category(category);
            for slot in ComboSlot::ALL {
                row.slot(slot).validate(category, slot)?;
            }
        }

        for category in WeaponCategory::ALL {
            let row = settings.category(category).to_array();
            match self.entries.get_mut(&category) {
                Some(slots) => *slots = row,
                None => {
                    self.entries.insert(category, row);
                }
            }
        }
        Ok(())
    }
}

/// Maps the host's attack clip names to combo slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipSlotMap {
    slots: HashMap<String, ComboSlot>,
}

impl ClipSlotMap {
    /// Clip names of the host's one-handed melee attacks.
    pub fn standard() -> Self {
        use ComboSlot::*;
        let pairs = [
            ("Sword-Attack-R4", Special),
            ("Knife JumpAttack", Special),
            ("MaceAltAttack", Special),
            ("Axe Secondary Attack", Special),
            ("Attack1", Attack1),
            ("axe_swing", Attack1),
            ("knife_slash0", Attack1),
            ("Attack2", Attack2),
            ("Axe combo 2", Attack2),
            ("knife_slash1", Attack2),
            ("Attack3", Attack3),
            ("Axe combo 3", Attack3),
            ("knife_slash2", Attack3),
        ];
        Self {
            slots: pairs.into_iter().map(|(k, v)| (k.to_owned(), v)).collect(),
        }
    }

    pub fn insert(&mut self, clip: impl Into<String>, slot: ComboSlot) {
        self.slots.insert(clip.into(), slot);
    }

    pub fn slot(&self, clip: &str) -> Option<ComboSlot> {
        self.slots.get(clip).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ComboSlot)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BalancingTable {
        BalancingTable::from_settings(&BalancingSettings::default()).unwrap()
    }

    #[test]
    fn defaults_match_reference_values() {
        let table = table();
        assert_eq!(
            table.get(WeaponCategory::Axes, ComboSlot::Attack3).unwrap(),
            BalancingEntry::new(60.0, 170.0, 30.0)
        );
        assert_eq!(
            table.get(WeaponCategory::Knives, ComboSlot::Special).unwrap(),
            BalancingEntry::new(140.0, 30.0, 32.0)
        );
        assert_eq!(
            table.get(WeaponCategory::Clubs, ComboSlot::Attack2).unwrap(),
            BalancingEntry::new(130.0, 75.0, 15.0)
        );
    }

    #[test]
    fn empty_table_reports_unknown_category() {
        let table = BalancingTable::new();
        assert_eq!(
            table.get(WeaponCategory::Swords, ComboSlot::Attack1),
            Err(BalancingError::UnknownCategory(WeaponCategory::Swords))
        );
    }

    #[test]
    fn percentages_become_factors_at_use() {
        let entry = BalancingEntry::new(140.0, 90.0, 20.0);
        assert!((entry.speed_factor() - 1.4).abs() < 1e-6);
        assert!((entry.damage_factor() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn rejected_rebuild_leaves_table_untouched() {
        let mut table = table();
        let before = table.clone();
        let mut settings = BalancingSettings::default();
        settings.swords.attack2.damage_percent = 900.0;

        let err = table.rebuild_from_config(&settings).unwrap_err();

        assert!(matches!(
            err,
            BalancingError::OutOfRange {
                category: WeaponCategory::Swords,
                slot: ComboSlot::Attack2,
                field: "damage",
                ..
            }
        ));
        assert_eq!(table, before);
    }

    #[test]
    fn rebuild_overwrites_existing_rows() {
        let mut table = table();
        let mut settings = BalancingSettings::default();
        settings.clubs.special = BalancingEntry::new(10.0, 20.0, 30.0);

        table.rebuild_from_config(&settings).unwrap();

        assert_eq!(
            table.get(WeaponCategory::Clubs, ComboSlot::Special).unwrap(),
            BalancingEntry::new(10.0, 20.0, 30.0)
        );
    }

    #[test]
    fn set_validates_ranges() {
        let mut table = table();
        assert!(
            table
                .set(WeaponCategory::Axes, ComboSlot::Attack1, BalancingEntry::new(0.5, 90.0, 20.0))
                .is_err()
        );
        table
            .set(WeaponCategory::Axes, ComboSlot::Attack1, BalancingEntry::new(300.0, 0.0, 200.0))
            .unwrap();
    }

    #[test]
    fn clamped_pulls_values_into_range() {
        let entry = BalancingEntry::new(0.0, 800.0, f32::NAN).clamped();
        assert_eq!(entry, BalancingEntry::new(1.0, 500.0, 0.0));
    }

    #[test]
    fn chain_position_selects_slot() {
        assert_eq!(ComboSlot::for_chain(0, 0), Some(ComboSlot::Special));
        assert_eq!(ComboSlot::for_chain(1, 0), Some(ComboSlot::Special));
        assert_eq!(ComboSlot::for_chain(3, 0), Some(ComboSlot::Attack1));
        assert_eq!(ComboSlot::for_chain(3, 2), Some(ComboSlot::Attack3));
        assert_eq!(ComboSlot::for_chain(5, 4), None);
    }

    #[test]
    fn standard_clip_map_covers_all_families() {
        let map = ClipSlotMap::standard();
        assert_eq!(map.slot("Axe Secondary Attack"), Some(ComboSlot::Special));
        assert_eq!(map.slot("knife_slash1"), Some(ComboSlot::Attack2));
        assert_eq!(map.slot("Axe combo 3"), Some(ComboSlot::Attack3));
        assert_eq!(map.slot("Attack4"), None);
    }
}
