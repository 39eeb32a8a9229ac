//! Common error infrastructure for dualwield-core.
//!
//! Domain errors (`BalancingError`, `SkillError`, `EquipmentError`,
//! `AssetError`) live next to the code that raises them. This module holds
//! the shared severity classification the runtime uses to decide whether a
//! failure aborts startup or falls back to host behavior.

/// Severity level of an error.
///
/// - **Recoverable**: the dual-wield path is skipped and the host's own
///   behavior runs instead
/// - **Validation**: bad input (configuration, command arguments) rejected
///   without side effects
/// - **Fatal**: startup cannot continue; nothing may silently degrade
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all dualwield-core errors.
pub trait DualWieldError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier of the variant, used as a structured log field.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
