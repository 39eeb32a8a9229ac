//! Structural edits of host operation bodies.

use hook_registry::rewrite::SwapFieldLoads;
use hook_registry::{Instruction, InstructionSequence, Pattern, Rewrite, RewriteError};

use super::TRY_ASSIGN_OFFHAND;

pub const ITEM_SHARED: &str = "ItemData.m_shared";
pub const ITEM_TYPE: &str = "SharedData.m_itemType";
pub const HIDDEN_LEFT: &str = "Humanoid.m_hiddenLeftItem";
pub const HIDDEN_RIGHT: &str = "Humanoid.m_hiddenRightItem";
pub const ATTACK_ANGLE: &str = "Attack.m_attackAngle";
pub const ABS: &str = "Mathf.Abs";
pub const EULER: &str = "Quaternion.Euler";

/// Host's numeric value of the one-handed weapon item type.
pub const ONE_HANDED_TYPE: i32 = 3;

/// Adds an off-hand routing check to the equip body.
///
/// Right after the "item is one-handed" comparison, the injected call gets
/// `(this, item, trigger_effects)`. When it answers true the body jumps to
/// where a non-one-handed item would have gone, skipping the right-hand
/// equip.
pub struct InjectOffhandAssignment;

impl InjectOffhandAssignment {
    fn anchor() -> Pattern {
        Pattern::new("item type == one-handed")
            .then(|i| *i == Instruction::LoadArg(1))
            .then(|i| i.loads_field(ITEM_SHARED))
            .then(|i| i.loads_field(ITEM_TYPE))
            .then(|i| *i == Instruction::LoadI32(ONE_HANDED_TYPE))
            .then(|i| matches!(i, Instruction::BranchNotEqual(_)))
    }
}

impl Rewrite for InjectOffhandAssignment {
    fn name(&self) -> &'static str {
        "inject off-hand assignment"
    }

    fn apply(&self, body: &mut InstructionSequence) -> Result<usize, RewriteError> {
        let anchor = Self::anchor();
        let hits = body.find(&anchor);
        let &[start] = hits.as_slice() else {
            return Err(if hits.is_empty() {
                RewriteError::AnchorNotFound {
                    rewrite: self.name(),
                    anchor: anchor.name(),
                }
            } else {
                RewriteError::MalformedAnchor {
                    rewrite: self.name(),
                    anchor: anchor.name(),
                    reason: "it occurs more than once",
                }
            });
        };

        let branch = start + anchor.len() - 1;
        let Some(skip) = body.as_slice()[branch].branch_target() else {
            return Err(RewriteError::MalformedAnchor {
                rewrite: self.name(),
                anchor: anchor.name(),
                reason: "the comparison does not branch",
            });
        };
        body.insert_after(
            branch,
            [
                Instruction::LoadArg(0),
                Instruction::LoadArg(1),
                Instruction::LoadArg(2),
                Instruction::Hook(TRY_ASSIGN_OFFHAND),
                Instruction::BranchIfTrue(skip),
            ],
        );
        Ok(1)
    }
}

/// Re-equips hidden items right hand first, so the left item can pair with it.
pub fn swap_hidden_hands() -> SwapFieldLoads {
    SwapFieldLoads {
        name: "swap hidden hand order",
        first: HIDDEN_LEFT,
        second: HIDDEN_RIGHT,
    }
}

/// Makes the melee sweep tolerate a negated attack angle.
///
/// Every read of the angle goes through an absolute value, and the sweep
/// start (`-angle/2` fed into the rotation) is only negated while the stored
/// angle is positive. A negative angle therefore sweeps the other way.
pub struct MirroredSweep;

impl MirroredSweep {
    fn start_negation() -> Pattern {
        Pattern::new("negated sweep start")
            .then(|i| *i == Instruction::Negate)
            .any()
            .then(|i| i.calls(EULER))
    }
}

impl Rewrite for MirroredSweep {
    fn name(&self) -> &'static str {
        "mirrored sweep"
    }

    fn apply(&self, body: &mut InstructionSequence) -> Result<usize, RewriteError> {
        let angle_reads = Pattern::new("attack angle read").then(|i| i.loads_field(ATTACK_ANGLE));
        let reads = body.find(&angle_reads);
        if reads.is_empty() {
            return Err(RewriteError::AnchorNotFound {
                rewrite: self.name(),
                anchor: angle_reads.name(),
            });
        }
        let negation = Self::start_negation();
        let negations = body.find(&negation);
        if negations.is_empty() {
            return Err(RewriteError::AnchorNotFound {
                rewrite: self.name(),
                anchor: negation.name(),
            });
        }

        // Negations first, back to front, so the absolute-value pass only
        // sees the host's own angle reads.
        let mut edited: Vec<usize> = Vec::with_capacity(negations.len());
        for &at in negations.iter().rev() {
            let keep_sign = body.new_label();
            if let Some(slot) = body.get_mut(at) {
                *slot = Instruction::LoadArg(0);
            }
            body.insert_after(
                at,
                [
                    Instruction::LoadField(ATTACK_ANGLE),
                    Instruction::LoadF32(0.0),
                    Instruction::BranchLessOrEqual(keep_sign),
                    Instruction::Negate,
                    Instruction::MarkLabel(keep_sign),
                ],
            );
            edited.push(at);
        }

        // Original reads shifted by 5 for every negation spliced in before them.
        let mut shifted: Vec<usize> = reads
            .iter()
            .map(|&r| r + 5 * edited.iter().filter(|&&n| n < r).count())
            .collect();
        shifted.sort_unstable();
        for &at in shifted.iter().rev() {
            body.insert_after(at, [Instruction::Call(ABS)]);
        }

        Ok(reads.len() + negations.len())
    }
}
