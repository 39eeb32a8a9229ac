//! Dual-wield runtime: wires the core rules into a host through hooks.
//!
//! Consumers implement [`HostRuntime`] for their host adapter, call
//! [`Plugin::install`] once at startup and then forward each intercepted host
//! operation to the matching [`Session`] method.
//!
//! Modules are organized by responsibility:
//! - [`hooks`] names the intercepted host operations and their rewrites
//! - `handlers` attaches the dual-wield behavior to those operations
//! - [`session`] is the dispatch surface and configuration entry point
//! - [`plugin`] performs startup validation and installation
//! - [`logging`] sets up the `tracing` subscriber
pub mod error;
pub mod hooks;
pub mod host;
pub mod logging;
pub mod plugin;
pub mod session;
pub mod state;

mod handlers;

pub use error::{LoggingError, StartupError};
pub use host::{HostRuntime, InjectedCall, NestedEquip};
pub use plugin::{Assets, OFFHAND_SKILL, Plugin};
pub use session::Session;
pub use state::DualWieldState;
