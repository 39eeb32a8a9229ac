//! Dual-wield configuration loader.

use std::path::Path;

use dualwield_core::DualWieldConfig;

use crate::loaders::{LoadResult, read_file};

/// Default configuration shipped with the crate.
const DEFAULT_CONFIG: &str = include_str!("../../data/dualwield.toml");

/// Loader for dual-wield configuration from TOML files.
///
/// Missing keys take their default value, and every numeric value is clamped
/// into its declared range before the configuration is returned.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> LoadResult<DualWieldConfig> {
        let content = read_file(path)?;
        Self::from_str(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn from_str(content: &str) -> LoadResult<DualWieldConfig> {
        let config: DualWieldConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse dual-wield config TOML: {}", e))?;

        Ok(config.clamped())
    }

    /// The bundled default configuration.
    pub fn bundled() -> LoadResult<DualWieldConfig> {
        Self::from_str(DEFAULT_CONFIG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use dualwield_core::{BalancingSettings, WeaponCategory};

    #[test]
    fn bundled_config_matches_defaults() {
        let config = ConfigLoader::bundled().expect("bundled config parses");
        assert_eq!(config, DualWieldConfig::default());
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = ConfigLoader::from_str("single_offhand_skill = true\n").unwrap();

        assert!(config.single_offhand_skill);
        assert!(config.lock_configuration);
        assert_eq!(config.experience_loss, 5);
        assert_eq!(config.balancing, BalancingSettings::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let toml = r#"
experience_gain_factor = 9.5
experience_loss = 400

[balancing.swords]
special = { speed = 0.0, damage = 50.0, stamina = 40.0 }
attack1 = { speed = 100.0, damage = 900.0, stamina = 15.0 }
attack2 = { speed = 100.0, damage = 90.0, stamina = 15.0 }
attack3 = { speed = 120.0, damage = 90.0, stamina = -3.0 }
"#;
        let config = ConfigLoader::from_str(toml).unwrap();

        assert_eq!(config.experience_gain_factor, 5.0);
        assert_eq!(config.experience_loss, 100);
        let swords = config.balancing.category(WeaponCategory::Swords);
        assert_eq!(swords.special.speed_percent, 1.0);
        assert_eq!(swords.attack1.damage_percent, 500.0);
        assert_eq!(swords.attack3.stamina, 0.0);
        assert_eq!(config.balancing.axes, BalancingSettings::default().axes);
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "exclusion_list = \"SwordMistwalker, KnifeSkollAndHati\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.exclusion_list, "SwordMistwalker, KnifeSkollAndHati");
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(ConfigLoader::from_str("experience_loss = \"lots\"").is_err());
    }
}
