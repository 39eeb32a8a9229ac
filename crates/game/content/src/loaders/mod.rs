//! Content loaders for reading dual-wield data from files and resources.
//!
//! Text formats follow the rest of the workspace: TOML for configuration and
//! RON for asset manifests.

pub mod clips;
pub mod config;
pub mod icons;

pub use clips::ClipManifestLoader;
pub use config::ConfigLoader;
pub use icons::{
    DirectoryResources, IconLoader, MemoryResources, OFFHAND_ICON, ResourceProvider, SKILL_ICONS,
};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
