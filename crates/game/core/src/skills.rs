//! Extension skills registered into the host's skill system.
//!
//! The host's skill enumeration is closed, so extension skills use ids
//! derived from their display name with the host's stable string hash. Each
//! weapon category maps to one extension skill; in shared mode all of them
//! map to a single offhand skill instead.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::error::{DualWieldError, ErrorSeverity};
use crate::host::Host;
use crate::model::{ActorId, SkillType, WeaponCategory};

/// Identifier of an extension skill in the host's skill id space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillId(pub i32);

impl SkillId {
    /// Id the host assigns to a skill registered under `name`.
    pub fn from_name(name: &str) -> Self {
        let hash = stable_hash(name);
        SkillId(hash.checked_abs().unwrap_or(i32::MAX))
    }

    pub const fn skill_type(self) -> SkillType {
        SkillType::Extension(self)
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The host's stable string hash (two interleaved djb2 lanes over UTF-16
/// code units).
pub fn stable_hash(s: &str) -> i32 {
    let units: Vec<u16> = s.encode_utf16().collect();
    let mut a: i32 = 5381;
    let mut b: i32 = a;
    let mut i = 0;
    while i < units.len() && units[i] != 0 {
        a = (a << 5).wrapping_add(a) ^ i32::from(units[i]);
        if i == units.len() - 1 || units[i + 1] == 0 {
            break;
        }
        b = (b << 5).wrapping_add(b) ^ i32::from(units[i + 1]);
        i += 2;
    }
    a.wrapping_add(b.wrapping_mul(1_566_083_941))
}

/// Decoded RGBA skill icon.
#[derive(Clone, PartialEq, Eq)]
pub struct Icon {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Icon")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Definition the host shows in its skill list.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillDef {
    pub skill: SkillId,
    pub description: String,
    pub icon: Option<Arc<Icon>>,
    pub increase_step: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkillExtension {
    pub id: SkillId,
    pub display_name: String,
    pub description: String,
    pub icon: Option<Arc<Icon>>,
    pub xp_gain_factor: f32,
    /// Percent of the skill level lost on death.
    pub xp_loss_on_death: f32,
    pub increase_step: f32,
}

impl SkillExtension {
    pub fn new(display_name: impl Into<String>, description: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            id: SkillId::from_name(&display_name),
            display_name,
            description: description.into(),
            icon: None,
            xp_gain_factor: 1.0,
            xp_loss_on_death: 5.0,
            increase_step: 1.0,
        }
    }

    pub fn with_icon(mut self, icon: Arc<Icon>) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Name accepted by console commands: the display name without spaces.
    pub fn internal_name(&self) -> String {
        self.display_name.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// Localization key of the skill's display name.
    pub fn localization_key(&self) -> String {
        format!("skill_{}", self.id)
    }

    pub fn definition(&self) -> SkillDef {
        SkillDef {
            skill: self.id,
            description: self.description.clone(),
            icon: self.icon.clone(),
            increase_step: self.increase_step,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SkillError {
    #[error("no extension skill registered for {0}")]
    NotRegistered(WeaponCategory),

    #[error("skill {0} is already registered")]
    Duplicate(SkillId),

    #[error("skill {0} is not a registered extension skill")]
    UnknownSkill(SkillId),
}

impl DualWieldError for SkillError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotRegistered(_) => ErrorSeverity::Recoverable,
            Self::Duplicate(_) | Self::UnknownSkill(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotRegistered(_) => "SKILL_NOT_REGISTERED",
            Self::Duplicate(_) => "SKILL_DUPLICATE",
            Self::UnknownSkill(_) => "SKILL_UNKNOWN",
        }
    }
}

/// Registered extension skills and the category → skill mapping.
#[derive(Clone, Debug, Default)]
pub struct SkillExtensionRegistry {
    skills: Vec<SkillExtension>,
    per_category: HashMap<WeaponCategory, SkillId>,
    shared: Option<SkillId>,
    shared_mode: bool,
    active: HashMap<WeaponCategory, SkillId>,
}

impl SkillExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, skill: SkillExtension) -> Result<SkillId, SkillError> {
        if self.get(skill.id).is_some() {
            return Err(SkillError::Duplicate(skill.id));
        }
        let id = skill.id;
        self.skills.push(skill);
        Ok(id)
    }

    /// Binds `category` to its own skill (used while shared mode is off).
    pub fn bind(&mut self, category: WeaponCategory, skill: SkillId) -> Result<(), SkillError> {
        self.require(skill)?;
        self.per_category.insert(category, skill);
        self.remap();
        Ok(())
    }

    /// Sets the skill every category maps to in shared mode.
    pub fn bind_shared(&mut self, skill: SkillId) -> Result<(), SkillError> {
        self.require(skill)?;
        self.shared = Some(skill);
        self.remap();
        Ok(())
    }

    /// Switches between per-category and shared skills. The whole mapping is
    /// recomputed at once; accumulated experience stays with the host.
    pub fn set_shared_mode(&mut self, shared: bool) {
        self.shared_mode = shared;
        self.remap();
    }

    pub fn shared_mode(&self) -> bool {
        self.shared_mode
    }

    fn remap(&mut self) {
        self.active.clear();
        match (self.shared_mode, self.shared) {
            (true, Some(shared)) => {
                self.active.extend(WeaponCategory::ALL.map(|c| (c, shared)));
            }
            _ => self.active.extend(self.per_category.iter().map(|(c, s)| (*c, *s))),
        }
    }

    fn require(&self, skill: SkillId) -> Result<(), SkillError> {
        self.get(skill).map(|_| ()).ok_or(SkillError::UnknownSkill(skill))
    }

    /// Extension skill that currently trains `category`.
    pub fn resolve(&self, category: WeaponCategory) -> Result<SkillId, SkillError> {
        self.active
            .get(&category)
            .copied()
            .ok_or(SkillError::NotRegistered(category))
    }

    /// True when `skill` is one of the skills categories currently map to.
    pub fn is_mapped(&self, skill: SkillId) -> bool {
        self.active.values().any(|s| *s == skill)
    }

    pub fn get(&self, skill: SkillId) -> Option<&SkillExtension> {
        self.skills.iter().find(|s| s.id == skill)
    }

    /// Extension behind a host skill type, if it is one.
    pub fn extension(&self, skill: SkillType) -> Option<&SkillExtension> {
        self.get(skill.extension()?)
    }

    pub fn definition(&self, skill: SkillId) -> Option<SkillDef> {
        self.get(skill).map(SkillExtension::definition)
    }

    /// Finds a skill by internal or display name, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&SkillExtension> {
        self.skills.iter().find(|s| {
            s.internal_name().eq_ignore_ascii_case(name)
                || s.display_name.eq_ignore_ascii_case(name)
        })
    }

    pub fn internal_names(&self) -> Vec<String> {
        self.skills.iter().map(SkillExtension::internal_name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillExtension> {
        self.skills.iter()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn set_xp_gain_factor(&mut self, factor: f32) {
        for skill in &mut self.skills {
            skill.xp_gain_factor = factor;
        }
    }

    pub fn set_xp_loss_on_death(&mut self, percent: f32) {
        for skill in &mut self.skills {
            skill.xp_loss_on_death = percent;
        }
    }

    /// Random skill factor of an extension skill the categories map to.
    ///
    /// `None` for any other skill, which keeps the host's own roll.
    pub fn random_skill_factor(&self, skill: SkillType, skill_factor: f32) -> Option<f32> {
        let id = skill.extension()?;
        self.is_mapped(id).then(|| 0.03 + skill_factor * 1.5)
    }
}

/// Result of a console skill command.
#[derive(Clone, Debug, PartialEq)]
pub enum SkillCommand {
    /// Handled; the host command must not run.
    Handled { skill: SkillId, level: f32 },
    /// Not an extension skill; the host handles (and reports) it.
    NotFound,
}

/// `raiseskill <name> <value>` for extension skills.
pub fn raise_skill<H: Host>(
    host: &mut H,
    skills: &SkillExtensionRegistry,
    actor: ActorId,
    name: &str,
    value: f32,
) -> SkillCommand {
    let Some(skill) = skills.find_by_name(name) else {
        return SkillCommand::NotFound;
    };
    let Some(level) = host.skill_level_mut(actor, skill.id) else {
        return SkillCommand::NotFound;
    };
    *level = (*level + value).clamp(0.0, 100.0);
    let level = *level;

    host.notify(
        actor,
        &format!("Skill increased {}: {}", skill.display_name, level as i32),
    );
    host.console_print(&format!("Skill {} = {}", skill.display_name, level));
    SkillCommand::Handled {
        skill: skill.id,
        level,
    }
}

/// `resetskill <name>` for extension skills.
pub fn reset_skill<H: Host>(
    host: &mut H,
    skills: &SkillExtensionRegistry,
    actor: ActorId,
    name: &str,
) -> SkillCommand {
    let Some(skill) = skills.find_by_name(name) else {
        return SkillCommand::NotFound;
    };
    host.reset_skill(actor, skill.id);
    host.console_print(&format!("Skill {} reset", skill.display_name));
    SkillCommand::Handled {
        skill: skill.id,
        level: 0.0,
    }
}
