//! Host operation descriptors.

use std::fmt;

/// Stable identifier of a host operation (e.g. `"Humanoid.EquipItem"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(pub &'static str);

impl OperationId {
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Compile-time description of one interceptable host operation.
///
/// Implementors are usually zero-sized marker types. `Args` is the mutable
/// argument bundle handlers may inspect or rewrite before the original runs;
/// `Output` is the value the operation produces.
///
/// # Example
///
/// ```
/// use hook_registry::{Operation, OperationId};
///
/// struct GetAttackStamina;
///
/// impl Operation for GetAttackStamina {
///     const ID: OperationId = OperationId("Attack.GetAttackStamina");
///     type Args = u32;
///     type Output = f32;
/// }
/// ```
pub trait Operation: 'static {
    const ID: OperationId;
    type Args: 'static;
    type Output: 'static;
}
