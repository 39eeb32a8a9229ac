//! Clip manifest loader.

use std::path::Path;

use dualwield_core::{ClipManifest, clips};

use crate::loaders::{LoadResult, read_file};

const DEFAULT_MANIFEST: &str = include_str!("../../data/clips.ron");

/// Logical clips every manifest must provide.
const REQUIRED: [&str; 6] = [
    clips::ATTACK1,
    clips::ATTACK2,
    clips::ATTACK3,
    clips::BLOCK,
    clips::DUAL_SWORDS_SPECIAL,
    clips::DUAL_AXES_SPECIAL,
];

/// Loader for clip manifests from RON files.
pub struct ClipManifestLoader;

impl ClipManifestLoader {
    /// Load a clip manifest from a RON file.
    pub fn load(path: &Path) -> LoadResult<ClipManifest> {
        let content = read_file(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> LoadResult<ClipManifest> {
        let manifest: ClipManifest = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse clip manifest RON: {}", e))?;

        let missing: Vec<&str> = REQUIRED
            .into_iter()
            .filter(|name| !manifest.clips.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            anyhow::bail!("Clip manifest is missing {}", missing.join(", "));
        }

        Ok(manifest)
    }

    pub fn bundled() -> LoadResult<ClipManifest> {
        Self::from_str(DEFAULT_MANIFEST)
    }
}
