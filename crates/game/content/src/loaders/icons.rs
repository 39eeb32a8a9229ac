//! Skill icon loading.
//!
//! Icons arrive as encoded image bytes from a [`ResourceProvider`] (the
//! host's embedded resources, or a directory during development) and are
//! decoded once into RGBA [`Icon`]s.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dualwield_core::{AssetError, Icon, WeaponCategory};

/// Icon resource of each per-category skill.
pub const SKILL_ICONS: [(WeaponCategory, &str); 4] = [
    (WeaponCategory::Axes, "dualaxes.png"),
    (WeaponCategory::Clubs, "dualclubs.png"),
    (WeaponCategory::Knives, "dualknives.png"),
    (WeaponCategory::Swords, "dualswords.png"),
];

/// Icon resource of the shared offhand skill.
pub const OFFHAND_ICON: &str = "dualswords.png";

/// Source of named binary resources.
pub trait ResourceProvider {
    /// Raw bytes of `name`, or `None` when there is no such resource.
    fn resource(&self, name: &str) -> Option<Vec<u8>>;
}

/// Resources held in memory, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct MemoryResources {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.entries.insert(name.into(), bytes.into());
        self
    }
}

impl ResourceProvider for MemoryResources {
    fn resource(&self, name: &str) -> Option<Vec<u8>> {
        self.entries.get(name).cloned()
    }
}

/// Resources read from files under a root directory.
#[derive(Clone, Debug)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceProvider for DirectoryResources {
    fn resource(&self, name: &str) -> Option<Vec<u8>> {
        std::fs::read(self.root.join(name)).ok()
    }
}

/// Decodes icon resources.
pub struct IconLoader;

impl IconLoader {
    /// Decodes `bytes` into an RGBA icon. `name` is only used for errors.
    pub fn decode(name: &str, bytes: &[u8]) -> Result<Icon, AssetError> {
        let image = image::load_from_memory(bytes).map_err(|e| AssetError::Decode {
            name: name.to_owned(),
            reason: e.to_string(),
        })?;
        let rgba = image.to_rgba8();
        Ok(Icon {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }

    /// Reads and decodes the icon resource `name`. A missing or undecodable
    /// resource is an error.
    pub fn load(resources: &dyn ResourceProvider, name: &str) -> Result<Arc<Icon>, AssetError> {
        let bytes = resources
            .resource(name)
            .ok_or_else(|| AssetError::MissingResource(name.to_owned()))?;
        Self::decode(name, &bytes).map(Arc::new)
    }

    /// Icons of the four per-category skills and the shared offhand skill.
    ///
    /// The shared skill reuses the swords icon instance.
    pub fn skill_icons(
        resources: &dyn ResourceProvider,
    ) -> Result<(HashMap<WeaponCategory, Arc<Icon>>, Arc<Icon>), AssetError> {
        let mut by_name: HashMap<&str, Arc<Icon>> = HashMap::new();
        let mut per_category = HashMap::with_capacity(SKILL_ICONS.len());
        for (category, name) in SKILL_ICONS {
            let icon = Self::load(resources, name)?;
            by_name.insert(name, Arc::clone(&icon));
            per_category.insert(category, icon);
        }
        let offhand = match by_name.get(OFFHAND_ICON) {
            Some(icon) => Arc::clone(icon),
            None => Self::load(resources, OFFHAND_ICON)?,
        };
        Ok((per_category, offhand))
    }
}
