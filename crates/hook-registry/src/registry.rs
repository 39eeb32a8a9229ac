//! Hook registry: registration, installation and invocation.

use std::any::Any;
use std::collections::HashMap;

use tracing::{debug, info, trace, warn};

use crate::error::HookError;
use crate::operation::{Operation, OperationId};
use crate::point::{Call, Entry, HookPoint, PreCall, Priority};
use crate::rewrite::{InstructionSequence, Rewrite};

/// Gives the registry access to the bodies the host allows rewriting.
pub trait BodySource {
    fn body_mut(&mut self, operation: OperationId) -> Option<&mut InstructionSequence>;
}

/// Summary of a successful [`HookRegistry::install`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub operations: usize,
    pub prefixes: usize,
    pub postfixes: usize,
    /// `(operation, rewrite name, anchors rewritten)` in application order.
    pub rewrites: Vec<(OperationId, &'static str, usize)>,
}

/// Registry of interception handlers, keyed by host operation.
///
/// `T` is the host-side object graph handlers operate on, `S` is the
/// extension state they share. Both are borrowed mutably for the duration of
/// one invocation and handed to handlers through [`Call`].
///
/// Registration requires `&mut self`; invocation only `&self`. Installation
/// applies pending rewrites and seals the registry.
pub struct HookRegistry<T, S> {
    points: HashMap<OperationId, Box<dyn Any>>,
    rewrites: Vec<(OperationId, Box<dyn Rewrite>)>,
    installed: bool,
    counts: (usize, usize),
    _marker: std::marker::PhantomData<fn(&mut T, &mut S)>,
}

impl<T: 'static, S: 'static> HookRegistry<T, S> {
    pub fn new() -> Self {
        Self {
            points: HashMap::new(),
            rewrites: Vec::new(),
            installed: false,
            counts: (0, 0),
            _marker: std::marker::PhantomData,
        }
    }

    /// Handler tables of `O`. Fails when another operation type already
    /// claimed `O::ID`.
    fn point_mut<O: Operation>(&mut self) -> Result<&mut HookPoint<T, S, O>, HookError> {
        self.points
            .entry(O::ID)
            .or_insert_with(|| Box::new(HookPoint::<T, S, O>::new()))
            .downcast_mut::<HookPoint<T, S, O>>()
            .ok_or(HookError::ConflictingOperation(O::ID))
    }

    fn point<O: Operation>(&self) -> Option<&HookPoint<T, S, O>> {
        self.points.get(&O::ID)?.downcast_ref::<HookPoint<T, S, O>>()
    }

    /// Registers a pre-call override.
    pub fn prefix<O, F>(
        &mut self,
        name: &'static str,
        priority: Priority,
        handler: F,
    ) -> Result<&mut Self, HookError>
    where
        O: Operation,
        F: for<'a> Fn(&mut Call<'a, T, S>, &mut O::Args) -> PreCall<O::Output> + 'static,
    {
        debug!(
            target: "hook_registry",
            operation = %O::ID,
            hook = name,
            ?priority,
            "registering prefix"
        );
        self.point_mut::<O>()?.add_prefix(Entry {
            name,
            priority,
            handler: Box::new(handler),
        });
        self.counts.0 += 1;
        Ok(self)
    }

    /// Registers a post-call observer.
    pub fn postfix<O, F>(
        &mut self,
        name: &'static str,
        priority: Priority,
        handler: F,
    ) -> Result<&mut Self, HookError>
    where
        O: Operation,
        F: for<'a> Fn(&mut Call<'a, T, S>, &O::Args, &mut O::Output) + 'static,
    {
        debug!(
            target: "hook_registry",
            operation = %O::ID,
            hook = name,
            ?priority,
            "registering postfix"
        );
        self.point_mut::<O>()?.add_postfix(Entry {
            name,
            priority,
            handler: Box::new(handler),
        });
        self.counts.1 += 1;
        Ok(self)
    }

    /// Registers a named callback that a rewritten body reaches through
    /// [`Instruction::Hook`](crate::Instruction::Hook).
    pub fn inject<O, F>(&mut self, name: &'static str, handler: F) -> Result<&mut Self, HookError>
    where
        O: Operation,
        F: for<'a> Fn(&mut Call<'a, T, S>, &O::Args) -> bool + 'static,
    {
        let point = self.point_mut::<O>()?;
        if point.injected.iter().any(|(n, _)| *n == name) {
            return Err(HookError::DuplicateInjection {
                operation: O::ID,
                name,
            });
        }
        point.injected.push((name, Box::new(handler)));
        Ok(self)
    }

    /// Queues a control-flow rewrite for `O`, applied by [`install`](Self::install).
    pub fn rewrite<O: Operation>(&mut self, rewrite: impl Rewrite + 'static) -> &mut Self {
        self.rewrites.push((O::ID, Box::new(rewrite)));
        self
    }

    /// Applies all queued rewrites and seals the registry.
    ///
    /// Fails on the first rewrite whose anchor is missing or whose target body
    /// the host does not publish. A failed install leaves the registry
    /// unsealed; the caller is expected to abort startup.
    pub fn install(&mut self, bodies: &mut dyn BodySource) -> Result<InstallReport, HookError> {
        if self.installed {
            return Err(HookError::AlreadyInstalled);
        }

        // Apply on copies first so a late failure leaves every host body untouched.
        let mut staged: Vec<(OperationId, InstructionSequence)> = Vec::new();
        let mut applied = Vec::with_capacity(self.rewrites.len());
        for (operation, rewrite) in &self.rewrites {
            let slot = match staged.iter().position(|(op, _)| op == operation) {
                Some(index) => index,
                None => {
                    let body = bodies
                        .body_mut(*operation)
                        .ok_or(HookError::MissingBody(*operation))?
                        .clone();
                    staged.push((*operation, body));
                    staged.len() - 1
                }
            };

            let edits = rewrite
                .apply(&mut staged[slot].1)
                .map_err(|source| HookError::Rewrite {
                    operation: *operation,
                    source,
                })?;
            debug!(
                target: "hook_registry",
                operation = %operation,
                rewrite = rewrite.name(),
                edits,
                "rewrite applied"
            );
            applied.push((*operation, rewrite.name(), edits));
        }

        for (operation, body) in staged {
            if let Some(target) = bodies.body_mut(operation) {
                *target = body;
            }
        }

        self.installed = true;
        let report = InstallReport {
            operations: self.points.len(),
            prefixes: self.counts.0,
            postfixes: self.counts.1,
            rewrites: applied,
        };
        info!(
            target: "hook_registry",
            operations = report.operations,
            prefixes = report.prefixes,
            postfixes = report.postfixes,
            rewrites = report.rewrites.len(),
            "hooks installed"
        );
        Ok(report)
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Runs `O` with all registered handlers around `original`.
    ///
    /// Overrides run in priority order until one skips. The original runs
    /// only if none skipped. Observers always run, against whichever result
    /// was produced.
    pub fn invoke<O: Operation>(
        &self,
        target: &mut T,
        state: &mut S,
        args: &mut O::Args,
        original: impl FnOnce(&mut Call<'_, T, S>, &mut O::Args) -> O::Output,
    ) -> O::Output {
        let mut call = Call {
            hooks: self,
            target,
            state,
        };

        let Some(point) = self.point::<O>() else {
            return original(&mut call, args);
        };

        let mut replacement = None;
        for prefix in &point.prefixes {
            if let PreCall::Skip(result) = (prefix.handler)(&mut call, args) {
                trace!(
                    target: "hook_registry",
                    operation = %O::ID,
                    hook = prefix.name,
                    "original skipped"
                );
                replacement = Some(result);
                break;
            }
        }

        let mut output = match replacement {
            Some(result) => result,
            None => original(&mut call, args),
        };

        for postfix in &point.postfixes {
            (postfix.handler)(&mut call, args, &mut output);
        }

        output
    }

    /// Runs the injected callback `name` of `O`. Unknown names answer `false`
    /// so the host falls through to its unmodified path.
    pub fn run_injected<O: Operation>(
        &self,
        target: &mut T,
        state: &mut S,
        name: &str,
        args: &O::Args,
    ) -> bool {
        let Some(handler) = self
            .point::<O>()
            .and_then(|p| p.injected.iter().find(|(n, _)| *n == name))
            .map(|(_, h)| h)
        else {
            warn!(
                target: "hook_registry",
                operation = %O::ID,
                hook = name,
                "unknown injected call"
            );
            return false;
        };

        let mut call = Call {
            hooks: self,
            target,
            state,
        };
        handler(&mut call, args)
    }

    /// Returns `(name, priority)` of every override on `O`, in execution order.
    pub fn prefixes<O: Operation>(&self) -> Vec<(&'static str, Priority)> {
        self.point::<O>()
            .map(|p| p.prefixes.iter().map(|e| (e.name, e.priority)).collect())
            .unwrap_or_default()
    }

    /// Returns `(name, priority)` of every observer on `O`, in execution order.
    pub fn postfixes<O: Operation>(&self) -> Vec<(&'static str, Priority)> {
        self.point::<O>()
            .map(|p| p.postfixes.iter().map(|e| (e.name, e.priority)).collect())
            .unwrap_or_default()
    }

    /// Returns the ids of all operations with at least one handler.
    pub fn operations(&self) -> impl Iterator<Item = OperationId> + '_ {
        self.points.keys().copied()
    }
}

impl<T: 'static, S: 'static> Default for HookRegistry<T, S> {
    fn default() -> Self {
        Self::new()
    }
}
