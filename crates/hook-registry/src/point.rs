//! Handler tables for a single operation.

use crate::operation::Operation;
use crate::registry::HookRegistry;

/// Execution order of a handler. Lower values run first.
///
/// Typical ranges:
/// - `FIRST..NORMAL`: handlers that must see the untouched call
/// - `NORMAL`: default for most handlers
/// - `NORMAL..LAST`: handlers that should observe what earlier ones did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub i32);

impl Priority {
    pub const FIRST: Priority = Priority(-400);
    pub const HIGH: Priority = Priority(-200);
    pub const NORMAL: Priority = Priority(0);
    pub const LOW: Priority = Priority(200);
    pub const LAST: Priority = Priority(400);
}

/// Decision returned by a pre-call override.
#[derive(Clone, Debug, PartialEq)]
pub enum PreCall<R> {
    /// Let the next override (and eventually the original) run.
    Continue,
    /// Skip the remaining overrides and the original, producing `R` instead.
    Skip(R),
}

impl<R> PreCall<R> {
    #[inline]
    pub fn is_skip(&self) -> bool {
        matches!(self, PreCall::Skip(_))
    }
}

/// Borrow bundle handed to every handler and to the original behavior.
///
/// `target` is the host-side object graph, `state` is the extension's own
/// state. `hooks` lets a handler perform further hooked operations through
/// [`Call::perform`].
pub struct Call<'a, T, S> {
    pub hooks: &'a HookRegistry<T, S>,
    pub target: &'a mut T,
    pub state: &'a mut S,
}

impl<T: 'static, S: 'static> Call<'_, T, S> {
    /// Performs another hooked operation from inside a handler.
    pub fn perform<O: Operation>(
        &mut self,
        args: &mut O::Args,
        original: impl FnOnce(&mut Call<'_, T, S>, &mut O::Args) -> O::Output,
    ) -> O::Output {
        self.hooks
            .invoke::<O>(&mut *self.target, &mut *self.state, args, original)
    }

    /// Runs an injected callback of `O` by name (see [`HookRegistry::inject`]).
    pub fn injected<O: Operation>(&mut self, name: &str, args: &O::Args) -> bool {
        self.hooks
            .run_injected::<O>(&mut *self.target, &mut *self.state, name, args)
    }
}

pub(crate) type PrefixFn<T, S, O> = dyn for<'a> Fn(
    &mut Call<'a, T, S>,
    &mut <O as Operation>::Args,
) -> PreCall<<O as Operation>::Output>;

pub(crate) type PostfixFn<T, S, O> = dyn for<'a> Fn(
    &mut Call<'a, T, S>,
    &<O as Operation>::Args,
    &mut <O as Operation>::Output,
);

pub(crate) type InjectedFn<T, S, O> =
    dyn for<'a> Fn(&mut Call<'a, T, S>, &<O as Operation>::Args) -> bool;

pub(crate) struct Entry<F: ?Sized> {
    pub(crate) name: &'static str,
    pub(crate) priority: Priority,
    pub(crate) handler: Box<F>,
}

/// All handlers attached to one operation.
pub(crate) struct HookPoint<T, S, O: Operation> {
    pub(crate) prefixes: Vec<Entry<PrefixFn<T, S, O>>>,
    pub(crate) postfixes: Vec<Entry<PostfixFn<T, S, O>>>,
    pub(crate) injected: Vec<(&'static str, Box<InjectedFn<T, S, O>>)>,
}

impl<T, S, O: Operation> HookPoint<T, S, O> {
    pub(crate) fn new() -> Self {
        Self {
            prefixes: Vec::new(),
            postfixes: Vec::new(),
            injected: Vec::new(),
        }
    }

    pub(crate) fn add_prefix(&mut self, entry: Entry<PrefixFn<T, S, O>>) {
        self.prefixes.push(entry);
        // Stable sort keeps registration order among equal priorities.
        self.prefixes.sort_by_key(|e| e.priority);
    }

    pub(crate) fn add_postfix(&mut self, entry: Entry<PostfixFn<T, S, O>>) {
        self.postfixes.push(entry);
        self.postfixes.sort_by_key(|e| e.priority);
    }
}
