//! Install-time control-flow rewrites.
//!
//! Hosts that allow structural edits publish each rewritable operation as an
//! [`InstructionSequence`]. A [`Rewrite`] locates one or more anchors with a
//! [`Pattern`] and splices new instructions around them. Rewrites are applied
//! exactly once, by [`HookRegistry::install`](crate::HookRegistry::install),
//! and the edited sequence replaces the original for the rest of the process.
//!
//! An anchor that cannot be found means the host changed under us. That is a
//! startup failure, never a silent no-op.

use std::fmt;

use thiserror::Error;

/// Branch target inside an [`InstructionSequence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Symbolic instruction of a host operation body.
///
/// The set is deliberately small: rewrites only need to recognise argument
/// loads, field loads, constants, calls and branches. Everything else is
/// carried through as [`Instruction::Op`].
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    LoadArg(u8),
    LoadField(&'static str),
    StoreField(&'static str),
    LoadI32(i32),
    LoadF32(f32),
    Call(&'static str),
    /// Call back into a named injected handler; pushes a boolean.
    Hook(&'static str),
    Negate,
    Branch(Label),
    BranchIfTrue(Label),
    BranchIfFalse(Label),
    BranchNotEqual(Label),
    BranchLessOrEqual(Label),
    MarkLabel(Label),
    Return,
    Op(&'static str),
}

impl Instruction {
    /// Returns the branch target if this is a branch instruction.
    pub fn branch_target(&self) -> Option<Label> {
        match self {
            Instruction::Branch(l)
            | Instruction::BranchIfTrue(l)
            | Instruction::BranchIfFalse(l)
            | Instruction::BranchNotEqual(l)
            | Instruction::BranchLessOrEqual(l) => Some(*l),
            _ => None,
        }
    }

    pub fn loads_field(&self, field: &str) -> bool {
        matches!(self, Instruction::LoadField(f) if *f == field)
    }

    pub fn calls(&self, method: &str) -> bool {
        matches!(self, Instruction::Call(m) if *m == method)
    }

    fn label(&self) -> Option<Label> {
        match self {
            Instruction::MarkLabel(l) => Some(*l),
            other => other.branch_target(),
        }
    }
}

/// Editable body of a host operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstructionSequence {
    instructions: Vec<Instruction>,
    next_label: u32,
}

impl InstructionSequence {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        let next_label = instructions
            .iter()
            .filter_map(Instruction::label)
            .map(|l| l.0 + 1)
            .max()
            .unwrap_or(0);
        Self {
            instructions,
            next_label,
        }
    }

    /// Allocates a label that does not collide with any existing one.
    pub fn new_label(&mut self) -> Label {
        let label = Label(self.next_label);
        self.next_label += 1;
        label
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn contains(&self, instruction: &Instruction) -> bool {
        self.instructions.contains(instruction)
    }

    /// Returns the start index of every match of `pattern`, in order.
    pub fn find(&self, pattern: &Pattern) -> Vec<usize> {
        (0..self.instructions.len())
            .filter(|&i| pattern.matches_at(&self.instructions, i))
            .collect()
    }

    /// Replaces the whole body. Used by rewrites that rebuild in one pass.
    pub fn replace_all(&mut self, instructions: Vec<Instruction>) {
        self.instructions = instructions;
    }

    /// Inserts `instructions` right after index `at`.
    pub fn insert_after(&mut self, at: usize, instructions: impl IntoIterator<Item = Instruction>) {
        let tail = self.instructions.split_off(at + 1);
        self.instructions.extend(instructions);
        self.instructions.extend(tail);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Instruction> {
        self.instructions.get_mut(index)
    }
}

type Step = Box<dyn Fn(&Instruction) -> bool + Send + Sync>;

/// Window matcher over consecutive instructions.
///
/// ```
/// use hook_registry::{Instruction, Pattern};
///
/// let one_handed_compare = Pattern::new("item type == one-handed")
///     .then(|i| matches!(i, Instruction::LoadArg(1)))
///     .any()
///     .any()
///     .then(|i| matches!(i, Instruction::LoadI32(3)))
///     .then(|i| matches!(i, Instruction::BranchNotEqual(_)));
/// assert_eq!(one_handed_compare.len(), 5);
/// ```
pub struct Pattern {
    name: &'static str,
    steps: Vec<Step>,
}

impl Pattern {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    /// Appends a step matching one instruction.
    pub fn then(mut self, step: impl Fn(&Instruction) -> bool + Send + Sync + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Appends a wildcard step.
    pub fn any(self) -> Self {
        self.then(|_| true)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn matches_at(&self, instructions: &[Instruction], start: usize) -> bool {
        if self.steps.is_empty() || start + self.steps.len() > instructions.len() {
            return false;
        }
        self.steps
            .iter()
            .zip(&instructions[start..])
            .all(|(step, instruction)| step(instruction))
    }
}

/// Structural edit applied once to an operation body.
pub trait Rewrite {
    /// Human-readable name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Edits `body` in place and returns the number of anchors rewritten.
    ///
    /// Must return [`RewriteError::AnchorNotFound`] when no anchor matches.
    fn apply(&self, body: &mut InstructionSequence) -> Result<usize, RewriteError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("rewrite {rewrite}: anchor `{anchor}` not found")]
    AnchorNotFound {
        rewrite: &'static str,
        anchor: &'static str,
    },

    #[error("rewrite {rewrite}: anchor `{anchor}` matched but {reason}")]
    MalformedAnchor {
        rewrite: &'static str,
        anchor: &'static str,
        reason: &'static str,
    },
}

/// Swaps every load of one field with a load of another.
///
/// Both fields must be loaded at least once, otherwise the host layout is not
/// the one this rewrite was written against.
pub struct SwapFieldLoads {
    pub name: &'static str,
    pub first: &'static str,
    pub second: &'static str,
}

impl Rewrite for SwapFieldLoads {
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, body: &mut InstructionSequence) -> Result<usize, RewriteError> {
        for field in [self.first, self.second] {
            if !body.iter().any(|i| i.loads_field(field)) {
                return Err(RewriteError::AnchorNotFound {
                    rewrite: self.name,
                    anchor: field,
                });
            }
        }

        let mut swapped = 0;
        for instruction in body.instructions.iter_mut() {
            if instruction.loads_field(self.first) {
                *instruction = Instruction::LoadField(self.second);
                swapped += 1;
            } else if instruction.loads_field(self.second) {
                *instruction = Instruction::LoadField(self.first);
                swapped += 1;
            }
        }
        Ok(swapped)
    }
}
