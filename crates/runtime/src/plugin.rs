//! Startup: skills, tables, assets, handlers, install.

use dualwield_content::{IconLoader, ResourceProvider};
use dualwield_core::{
    AnimationVariantSelector, BalancingTable, ClipBundle, ClipLibrary, ClipManifest, ClipSlotMap,
    CombatResolver, DualWieldConfig, DualWieldError, EquipmentTracker, ExclusionSet,
    ReplacementRules, SkillExtension, SkillExtensionRegistry, SpeedScaler, WeaponCategory,
};
use hook_registry::HookRegistry;
use tracing::{debug, error, info};

use crate::error::StartupError;
use crate::handlers;
use crate::host::{HostBodies, HostRuntime};
use crate::session::Session;
use crate::state::DualWieldState;

/// Display name of the shared offhand skill.
pub const OFFHAND_SKILL: &str = "Dual Offhand";

/// Assets startup reads from.
pub struct Assets<'a> {
    /// Skill icon images.
    pub resources: &'a dyn ResourceProvider,
    /// The animation bundle holding the external clips.
    pub clips: &'a dyn ClipBundle,
    pub manifest: &'a ClipManifest,
}

pub struct Plugin;

impl Plugin {
    /// Builds every component from `config` and installs the hooks into
    /// `host`.
    ///
    /// Any missing asset or rewrite anchor aborts with an error; the host's
    /// operation bodies are only modified once every rewrite has applied.
    pub fn install<H: HostRuntime>(
        host: H,
        config: &DualWieldConfig,
        assets: Assets<'_>,
    ) -> Result<Session<H>, StartupError> {
        Self::try_install(host, config, assets).inspect_err(|e| {
            error!(
                target: "dualwield::hooks",
                code = e.error_code(),
                severity = e.severity().as_str(),
                error = %e,
                "Dual-wield startup aborted"
            );
        })
    }

    fn try_install<H: HostRuntime>(
        mut host: H,
        config: &DualWieldConfig,
        assets: Assets<'_>,
    ) -> Result<Session<H>, StartupError> {
        let skills = Self::register_skills(config, assets.resources)?;
        let balancing = BalancingTable::from_settings(&config.balancing)?;
        let clips = ClipLibrary::resolve(assets.manifest, assets.clips)?;
        let clip_slots = ClipSlotMap::standard();
        let rules = ReplacementRules::standard(&clip_slots);

        let state = DualWieldState {
            balancing,
            exclusions: ExclusionSet::parse(&config.exclusion_list),
            equipment: EquipmentTracker::new(),
            animation: AnimationVariantSelector::new(),
            rules,
            clips,
            clip_slots,
            resolver: CombatResolver::new(),
            speed: SpeedScaler::new(),
            skills,
            terminal_extended: false,
            config_locked: config.lock_configuration,
        };

        let mut hooks = HookRegistry::new();
        handlers::register_all(&mut hooks)?;
        let report = hooks.install(&mut HostBodies(&mut host))?;

        info!(
            target: "dualwield::hooks",
            operations = report.operations,
            rewrites = report.rewrites.len(),
            skills = state.skills.len(),
            exclusions = state.exclusions.len(),
            shared_skill = state.skills.shared_mode(),
            "Dual-wield installed"
        );
        Ok(Session::new(host, state, hooks, report))
    }

    /// Registers the four per-category skills and the shared offhand skill,
    /// then applies the configured mode and experience settings.
    fn register_skills(
        config: &DualWieldConfig,
        resources: &dyn ResourceProvider,
    ) -> Result<SkillExtensionRegistry, StartupError> {
        let (mut icons, offhand_icon) = IconLoader::skill_icons(resources)?;
        let mut skills = SkillExtensionRegistry::new();

        for category in WeaponCategory::ALL {
            let mut skill = SkillExtension::new(
                format!("Dual {}", category.title()),
                format!(
                    "Increases the damage done with your left hand, when dual wielding {category}."
                ),
            );
            if let Some(icon) = icons.remove(&category) {
                skill = skill.with_icon(icon);
            }
            let id = skills.register(skill)?;
            skills.bind(category, id)?;
            debug!(target: "dualwield::skills", %category, %id, "Registered category skill");
        }

        let offhand = skills.register(
            SkillExtension::new(
                OFFHAND_SKILL,
                "Increases the damage done with your left hand, when dual wielding.",
            )
            .with_icon(offhand_icon),
        )?;
        skills.bind_shared(offhand)?;

        skills.set_shared_mode(config.single_offhand_skill);
        skills.set_xp_gain_factor(config.experience_gain_factor);
        skills.set_xp_loss_on_death(config.experience_loss as f32);
        Ok(skills)
    }
}
