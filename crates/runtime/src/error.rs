//! Startup and setup errors surfaced by the runtime.

use dualwield_core::{AssetError, BalancingError, DualWieldError, ErrorSeverity, SkillError};
use hook_registry::HookError;
use thiserror::Error;

/// Failure that prevents dual-wield from starting.
///
/// Nothing is half-installed when this is returned: rewrites are staged and
/// applied only after every one of them succeeded.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("hook installation failed")]
    Hooks(#[from] HookError),

    #[error("required asset unavailable")]
    Assets(#[from] AssetError),

    #[error("skill registration failed")]
    Skills(#[from] SkillError),

    #[error("balancing configuration rejected")]
    Balancing(#[from] BalancingError),
}

impl DualWieldError for StartupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Hooks(_) => "STARTUP_HOOKS",
            Self::Assets(_) => "STARTUP_ASSETS",
            Self::Skills(_) => "STARTUP_SKILLS",
            Self::Balancing(_) => "STARTUP_BALANCING",
        }
    }
}

/// Failure installing the global log subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("a global subscriber is already installed")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}
