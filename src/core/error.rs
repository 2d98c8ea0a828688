// This module defines error types for the lirgen framework using the thiserror crate
// for idiomatic Rust error handling. LowerError is the main error enum covering the
// two fatal failure classes of the emission protocol: protocol violations (lowering a
// block twice, appending with no block open, an operand whose kind is not permitted
// for its declared role, malformed switch input) and missing backend capabilities
// (a required per-architecture emitter the embedding compiler did not provide).
// Each variant carries enough context (block id, instruction mnemonic, operand role
// and permitted set, capability name) to attribute the failure to a specific
// lowering bug. The module also provides LowerResult<T> as a convenience alias.
// Hash-plan absence is deliberately not an error and never appears here.

//! Error types for LIR generation.
//!
//! Using thiserror for more idiomatic error handling.

use thiserror::Error;

use super::inst::{OperandFlags, OperandMode};
use super::lir::BlockId;
use super::value::{Value, ValueKind};

/// Main error type for LIR generation.
///
/// Every variant is fatal for the current lowering pass; there is no
/// partial-success mode for a single function.
#[derive(Error, Debug)]
pub enum LowerError {
    /// A block's instruction sequence was initialized twice. Indicates
    /// re-entrant or duplicate lowering of the same block.
    #[error("LIR already computed for block {block}")]
    DuplicateBlockLowering { block: BlockId },

    /// An instruction was appended while no block scope was open.
    #[error("Cannot append {mnemonic}: no block is currently being lowered")]
    NoBlockOpen { mnemonic: &'static str },

    /// An operand's kind is not in the permitted set for its declared role.
    #[error(
        "Invalid LIR\n  Instruction: {mnemonic}\n  Mode: {mode:?}\n  Flags: {flags}\n  Unexpected value: {value:?} ({kind:?})"
    )]
    InvalidOperand {
        mnemonic: &'static str,
        mode: OperandMode,
        flags: OperandFlags,
        value: Value,
        kind: ValueKind,
    },

    /// Switch input violated the case invariants (keys not strictly
    /// ascending, or probabilities/targets not aligned with keys).
    #[error("Malformed switch case: {reason}")]
    MalformedSwitch { reason: String },

    /// A required backend capability was not provided by the embedding
    /// compiler. Surfaced at the call site instead of producing corrupt
    /// output.
    #[error("Backend capability not provided: {capability}")]
    NotImplemented { capability: &'static str },
}

impl LowerError {
    /// Shorthand used by the default bodies of the backend capability trait.
    pub fn not_implemented(capability: &'static str) -> Self {
        LowerError::NotImplemented { capability }
    }
}

/// Result type alias for lowering operations.
pub type LowerResult<T> = Result<T, LowerError>;
