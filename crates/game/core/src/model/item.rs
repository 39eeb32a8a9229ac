//! Items and the per-prefab data they share.

use crate::skills::SkillId;

/// Handle of one item instance owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

/// Handle of a shared stat block. Every item spawned from the same prefab
/// points at the same block, so mutating it affects all of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SharedId(pub u32);

/// Host prefab hash as published by the visual equipment component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefabHash(pub i32);

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemType {
    #[default]
    Material,
    OneHandedWeapon,
    TwoHandedWeapon,
    Bow,
    Shield,
    Tool,
    Torch,
}

/// Melee skill family that can be dual-wielded.
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
pub enum WeaponCategory {
    Axes,
    Clubs,
    Knives,
    Swords,
}

impl WeaponCategory {
    pub const ALL: [WeaponCategory; 4] = [Self::Axes, Self::Clubs, Self::Knives, Self::Swords];

    /// Host skill this category trains.
    pub const fn skill(self) -> SkillType {
        match self {
            Self::Axes => SkillType::Axes,
            Self::Clubs => SkillType::Clubs,
            Self::Knives => SkillType::Knives,
            Self::Swords => SkillType::Swords,
        }
    }

    /// Plural display name (`"Axes"`), as used in skill names.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Axes => "Axes",
            Self::Clubs => "Clubs",
            Self::Knives => "Knives",
            Self::Swords => "Swords",
        }
    }
}

/// Skill an item trains. Host skills are closed; extension skills live in a
/// separate id space registered at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillType {
    #[default]
    None,
    Swords,
    Knives,
    Clubs,
    Polearms,
    Spears,
    Blocking,
    Axes,
    Bows,
    Unarmed,
    Pickaxes,
    Extension(SkillId),
}

impl SkillType {
    /// Weapon category this skill belongs to, if it is dual-wieldable.
    pub const fn category(self) -> Option<WeaponCategory> {
        match self {
            Self::Axes => Some(WeaponCategory::Axes),
            Self::Clubs => Some(WeaponCategory::Clubs),
            Self::Knives => Some(WeaponCategory::Knives),
            Self::Swords => Some(WeaponCategory::Swords),
            _ => None,
        }
    }

    pub const fn extension(self) -> Option<SkillId> {
        match self {
            Self::Extension(id) => Some(id),
            _ => None,
        }
    }
}

/// Per-damage-type amounts of a weapon.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageTypes {
    pub blunt: f32,
    pub slash: f32,
    pub pierce: f32,
    pub chop: f32,
    pub pickaxe: f32,
    pub fire: f32,
    pub frost: f32,
    pub lightning: f32,
    pub poison: f32,
    pub spirit: f32,
}

impl DamageTypes {
    /// Scales every damage type by `factor`.
    pub fn modify(&mut self, factor: f32) {
        for value in [
            &mut self.blunt,
            &mut self.slash,
            &mut self.pierce,
            &mut self.chop,
            &mut self.pickaxe,
            &mut self.fire,
            &mut self.frost,
            &mut self.lightning,
            &mut self.poison,
            &mut self.spirit,
        ] {
            *value *= factor;
        }
    }

    pub fn total(&self) -> f32 {
        self.blunt
            + self.slash
            + self.pierce
            + self.chop
            + self.pickaxe
            + self.fire
            + self.frost
            + self.lightning
            + self.poison
            + self.spirit
    }
}

/// Animation cue of one attack of a weapon.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackCue {
    /// Animator trigger the host fires for this attack. Empty when the
    /// weapon has no such attack.
    pub animation: String,
}

impl AttackCue {
    pub fn new(animation: impl Into<String>) -> Self {
        Self {
            animation: animation.into(),
        }
    }

    /// Returns the animation name, treating an empty name as absent.
    pub fn name(&self) -> Option<&str> {
        (!self.animation.is_empty()).then_some(self.animation.as_str())
    }
}

/// Stat block shared by every item of one prefab.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SharedData {
    pub name: String,
    pub item_type: ItemType,
    pub skill: SkillType,
    pub damages: DamageTypes,
    pub backstab_bonus: f32,
    /// Knockback applied on hit.
    pub attack_force: f32,
    pub attack: AttackCue,
    pub secondary_attack: AttackCue,
}

impl SharedData {
    pub fn is_one_handed(&self) -> bool {
        self.item_type == ItemType::OneHandedWeapon
    }

    /// Dual-wieldable category, if this is a one-handed melee weapon.
    pub fn melee_category(&self) -> Option<WeaponCategory> {
        if self.is_one_handed() {
            self.skill.category()
        } else {
            None
        }
    }
}

/// One item instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemData {
    pub id: ItemId,
    /// Name of the prefab the item was dropped from; exclusion lists match it.
    pub prefab: String,
    pub shared: SharedId,
    pub equipped: bool,
}
