//! Data-driven configuration and asset loading for dual-wield.
//!
//! This crate turns files and raw resources into `dualwield-core` values:
//! - Dual-wield configuration (TOML, clamped into declared ranges)
//! - Clip manifests mapping logical clip names to bundle assets (RON)
//! - Skill icons decoded from PNG resources
//!
//! Loaders never hold onto content; the runtime owns everything they return.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ClipManifestLoader, ConfigLoader, DirectoryResources, IconLoader, LoadResult, MemoryResources,
    OFFHAND_ICON, ResourceProvider, SKILL_ICONS,
};
