//! Animation controller variants for dual-wield stances.
//!
//! Every actor shares one base controller topology. For each [`VariantKey`]
//! an override controller is built once, by replacing named clips with
//! external ones, and reused for every actor afterwards.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use thiserror::Error;

use crate::balancing::{ClipSlotMap, ComboSlot};
use crate::equipment::{ExclusionSet, dual_wield_category};
use crate::error::{DualWieldError, ErrorSeverity};
use crate::host::Host;
use crate::model::{ActorId, AnimationClip, AnimatorController, SharedData};

/// Cached controller variant.
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum VariantKey {
    /// Unmodified clips (single weapon or unarmed).
    Default,
    DualSwords,
    DualAxes,
}

impl VariantKey {
    pub const ALL: [VariantKey; 3] = [Self::Default, Self::DualSwords, Self::DualAxes];
}

/// Logical names of the external clips.
pub mod clips {
    pub const ATTACK1: &str = "Attack1External";
    pub const ATTACK2: &str = "Attack2External";
    pub const ATTACK3: &str = "Attack3External";
    pub const BLOCK: &str = "BlockExternal";
    pub const DUAL_SWORDS_SPECIAL: &str = "DualSwordsSpecial";
    pub const DUAL_AXES_SPECIAL: &str = "DualAxesSpecial";

    pub(crate) fn attack(step: usize) -> Option<&'static str> {
        match step {
            1 => Some(ATTACK1),
            2 => Some(ATTACK2),
            3 => Some(ATTACK3),
            _ => None,
        }
    }
}

/// Trigger and animation names the host uses for axe-style attacks.
const AXE_SWING: &str = "swing_axe";
const AXE_SECONDARY: &str = "axe_secondary";
const MACE_SECONDARY: &str = "mace_secondary";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("clip `{logical}` (asset `{asset}`) missing from the animation bundle")]
    MissingClip { logical: String, asset: String },

    #[error("replacement rule refers to unknown clip `{0}`")]
    UnknownClip(String),

    #[error("resource `{0}` not found")]
    MissingResource(String),

    #[error("resource `{name}` could not be decoded: {reason}")]
    Decode { name: String, reason: String },
}

impl DualWieldError for AssetError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingClip { .. } => "ASSET_MISSING_CLIP",
            Self::UnknownClip(_) => "ASSET_UNKNOWN_CLIP",
            Self::MissingResource(_) => "ASSET_MISSING_RESOURCE",
            Self::Decode { .. } => "ASSET_DECODE",
        }
    }
}

/// Bundle of external animation assets, looked up by asset name.
pub trait ClipBundle {
    fn load(&self, asset: &str) -> Option<AnimationClip>;
}

/// Source of replacement clips, looked up by logical name.
pub trait AnimationAssets {
    fn clip(&self, logical: &str) -> Option<&AnimationClip>;
}

/// Logical clip name → asset name in the bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipManifest {
    pub clips: BTreeMap<String, String>,
}

impl ClipManifest {
    pub fn standard() -> Self {
        let pairs = [
            (clips::ATTACK1, "Attack1"),
            (clips::ATTACK2, "Attack2"),
            (clips::ATTACK3, "Attack3"),
            (clips::BLOCK, "DWblock"),
            (clips::DUAL_SWORDS_SPECIAL, "DWspecial"),
            (clips::DUAL_AXES_SPECIAL, "DWspecial2"),
        ];
        Self {
            clips: pairs
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        }
    }
}

impl Default for ClipManifest {
    fn default() -> Self {
        Self::standard()
    }
}

/// External clips resolved from a bundle.
#[derive(Clone, Debug, Default)]
pub struct ClipLibrary {
    clips: HashMap<String, AnimationClip>,
}

impl ClipLibrary {
    /// Loads every manifest entry. A missing asset is fatal.
    pub fn resolve(manifest: &ClipManifest, bundle: &dyn ClipBundle) -> Result<Self, AssetError> {
        let mut clips = HashMap::with_capacity(manifest.clips.len());
        for (logical, asset) in &manifest.clips {
            let clip = bundle.load(asset).ok_or_else(|| AssetError::MissingClip {
                logical: logical.clone(),
                asset: asset.clone(),
            })?;
            clips.insert(logical.clone(), clip);
        }
        Ok(Self { clips })
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl AnimationAssets for ClipLibrary {
    fn clip(&self, logical: &str) -> Option<&AnimationClip> {
        self.clips.get(logical)
    }
}

/// Source clip name → logical replacement clip name, per variant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplacementRules {
    rules: BTreeMap<VariantKey, HashMap<String, String>>,
}

impl ReplacementRules {
    /// Dual-swords and dual-axes rules: idle and block become the dual block
    /// clip, special attacks the variant's special, combo step `n` the
    /// external `Attack{n}`. The default variant replaces nothing.
    pub fn standard(slots: &ClipSlotMap) -> Self {
        let mut rules = BTreeMap::new();
        rules.insert(VariantKey::Default, HashMap::new());
        for (key, special) in [
            (VariantKey::DualSwords, clips::DUAL_SWORDS_SPECIAL),
            (VariantKey::DualAxes, clips::DUAL_AXES_SPECIAL),
        ] {
            let mut map: HashMap<String, String> = HashMap::new();
            map.insert("fight idle".into(), clips::BLOCK.into());
            map.insert("Block idle".into(), clips::BLOCK.into());
            for (clip, slot) in slots.iter() {
                let replacement = match slot {
                    ComboSlot::Special => Some(special),
                    other => clips::attack(other.index()),
                };
                if let Some(replacement) = replacement {
                    map.insert(clip.to_owned(), replacement.to_owned());
                }
            }
            rules.insert(key, map);
        }
        Self { rules }
    }

    pub fn for_key(&self, key: VariantKey) -> Option<&HashMap<String, String>> {
        self.rules.get(&key)
    }

    pub fn insert(
        &mut self,
        key: VariantKey,
        source: impl Into<String>,
        logical: impl Into<String>,
    ) {
        self.rules
            .entry(key)
            .or_default()
            .insert(source.into(), logical.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = VariantKey> + '_ {
        self.rules.keys().copied()
    }
}

/// Outcome of [`AnimationVariantSelector::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Swapped,
    /// The actor already uses this variant.
    Unchanged,
    /// Variants are not built yet; nothing happened.
    NotBuilt,
    UnknownActor,
}

/// Whether `trigger` starts the attack animation `animation`.
fn names_attack(trigger: &str, animation: Option<&str>) -> bool {
    match animation {
        Some(AXE_SWING) => true,
        Some(anim) => trigger.starts_with(anim) && anim.len() <= trigger.len() + 1,
        None => false,
    }
}

fn starts_attack(trigger: &str, weapon: Option<&SharedData>) -> bool {
    weapon.is_some_and(|w| {
        names_attack(trigger, w.attack.name()) || names_attack(trigger, w.secondary_attack.name())
    })
}

/// Builds and applies cached controller variants.
#[derive(Debug, Default)]
pub struct AnimationVariantSelector {
    variants: HashMap<VariantKey, Arc<AnimatorController>>,
}

impl AnimationVariantSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_built(&self) -> bool {
        !self.variants.is_empty()
    }

    pub fn variant(&self, key: VariantKey) -> Option<&Arc<AnimatorController>> {
        self.variants.get(&key)
    }

    /// Builds one override of `base` per rule set. Runs once; later calls
    /// return `Ok(false)` and keep the cached variants.
    pub fn build_variants(
        &mut self,
        base: &AnimatorController,
        rules: &ReplacementRules,
        assets: &dyn AnimationAssets,
    ) -> Result<bool, AssetError> {
        if self.is_built() {
            return Ok(false);
        }

        let mut built = HashMap::new();
        for key in rules.keys() {
            let Some(replacements) = rules.for_key(key) else {
                continue;
            };
            let mut missing = None;
            let controller = base.with_overrides(key.to_string(), |clip| {
                let logical = replacements.get(&clip.name)?;
                match assets.clip(logical) {
                    Some(external) => Some(external.renamed(clip.name.clone())),
                    None => {
                        missing.get_or_insert_with(|| logical.clone());
                        None
                    }
                }
            });
            if let Some(logical) = missing {
                return Err(AssetError::UnknownClip(logical));
            }
            built.insert(key, Arc::new(controller));
        }

        self.variants = built;
        Ok(true)
    }

    /// Variant an actor should use for a trigger.
    ///
    /// Hands are given as prefab name and shared data. `None` when the
    /// trigger does not start an attack of either hand; the current
    /// controller is then left alone. A dual variant is chosen only for a pair
    /// that [`dual_wield_category`] accepts. Depends only on its inputs.
    pub fn select_variant(
        left: Option<(&str, &SharedData)>,
        right: Option<(&str, &SharedData)>,
        trigger: &str,
        exclusions: &ExclusionSet,
    ) -> Option<VariantKey> {
        if !starts_attack(trigger, left.map(|(_, w)| w))
            && !starts_attack(trigger, right.map(|(_, w)| w))
        {
            return None;
        }

        let (Some(left), Some(right)) = (left, right) else {
            return Some(VariantKey::Default);
        };
        if dual_wield_category(right, left, exclusions).is_none() {
            return Some(VariantKey::Default);
        }

        let (_, right) = right;
        let axe_style = trigger == MACE_SECONDARY
            || right.attack.animation == AXE_SWING
            || right.secondary_attack.animation == AXE_SECONDARY;
        Some(if axe_style {
            VariantKey::DualAxes
        } else {
            VariantKey::DualSwords
        })
    }

    /// Swaps the actor's controller to `key` and refreshes the animator so
    /// the swap shows this frame. No-op if already active.
    pub fn apply<H: Host>(&self, host: &mut H, actor: ActorId, key: VariantKey) -> ApplyOutcome {
        let Some(variant) = self.variants.get(&key) else {
            return ApplyOutcome::NotBuilt;
        };
        let Some(state) = host.actor_mut(actor) else {
            return ApplyOutcome::UnknownActor;
        };
        if Arc::ptr_eq(&state.animator.controller, variant) {
            return ApplyOutcome::Unchanged;
        }
        state.animator.controller = Arc::clone(variant);
        host.refresh_animator(actor);
        ApplyOutcome::Swapped
    }
}
