//! Registry error types.

use thiserror::Error;

use crate::operation::OperationId;
use crate::rewrite::RewriteError;

/// Failures raised while registering or installing hooks.
///
/// Every variant is a registration or installation-time condition. Once a registry installs
/// successfully, invoking hooks cannot fail on the registry's account.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("rewrite for {operation} failed")]
    Rewrite {
        operation: OperationId,
        #[source]
        source: RewriteError,
    },

    #[error("host does not publish an instruction sequence for {0}")]
    MissingBody(OperationId),

    #[error("hook registry is already installed")]
    AlreadyInstalled,

    #[error("operation id {0} is registered with two different types")]
    ConflictingOperation(OperationId),

    #[error("injected call {name} is registered twice on {operation}")]
    DuplicateInjection {
        operation: OperationId,
        name: &'static str,
    },
}
