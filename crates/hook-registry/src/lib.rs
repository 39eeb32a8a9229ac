//! Typed interception points for host operations we cannot recompile.
//!
//! A host exposes a fixed set of operations (equip an item, run a melee swing,
//! compute a stamina cost, ...). This library lets external code attach to
//! those operations without touching host source:
//!
//! - **Pre-call overrides** run first, in ascending priority order. Each may
//!   return [`PreCall::Skip`] with a replacement result, suppressing the
//!   original behavior.
//! - **Post-call observers** run after the original (or the replacement) in
//!   ascending priority order. They may adjust the result but never change
//!   control flow.
//! - **Control-flow rewrites** run exactly once at installation time. They edit
//!   the instruction sequence the host publishes for an operation. A rewrite
//!   whose anchor cannot be found fails installation.
//!
//! # Architecture
//!
//! - [`Operation`]: compile-time description of one host operation
//! - [`HookRegistry`]: per-operation handler tables plus pending rewrites
//! - [`Call`]: the borrow bundle handed to every handler, which can re-enter
//!   the registry for nested host operations
//! - [`InstructionSequence`], [`Pattern`], [`Rewrite`]: the rewrite substrate
//!
//! # Reentrancy
//!
//! The registry is immutable once installed. Handlers receive it by shared
//! reference inside [`Call`], so a handler may perform another hooked
//! operation (on a different actor, say) while its own invocation is still on
//! the stack.

mod error;
mod operation;
mod point;
mod registry;
pub mod rewrite;

pub use error::HookError;
pub use operation::{Operation, OperationId};
pub use point::{Call, PreCall, Priority};
pub use registry::{BodySource, HookRegistry, InstallReport};
pub use rewrite::{Instruction, InstructionSequence, Label, Pattern, Rewrite, RewriteError};
