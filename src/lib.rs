//! lirgen - Block-Scoped LIR Emission and Switch Lowering.
//!
//! lirgen provides the architecture-independent half of a compiler backend's
//! instruction emission: it sequences low-level instructions into basic
//! blocks under a strict well-formedness protocol, and lowers multi-way
//! branches into the cheapest correct dispatch form (comparison tree, dense
//! range table, or hashed table).
//!
//! # Primary Usage
//!
//! ```ignore
//! use lirgen::{LirGenerator, LoweringSession, GenConfig, BasicBlock, BlockId};
//! use bumpalo::Bump;
//!
//! // Create a lowering session with arena allocation
//! let arena = Bump::new();
//! let session = LoweringSession::new(&arena);
//!
//! // Lower one block at a time through scoped handles
//! let mut gen = LirGenerator::new(&session, GenConfig::default());
//! let block = BasicBlock::new(BlockId(0));
//! let mut scope = gen.open_block(&block)?;
//! scope.append(inst)?;
//! drop(scope);
//! ```
//!
//! # Architecture
//!
//! - [`core`] - Shared infrastructure (session, values, instructions, generator)
//! - [`core::switch`] - Switch case model, strategy cost model, lowering decision
//! - [`core::hashing`] - Multiply-shift-mask perfect hashing for sparse key sets
//! - [`core::backend`] - The capability trait concrete machine backends implement

pub mod core;

// Re-export common types from organized modules
pub use crate::core::{
    // Framework
    LirGenerator, BlockScope, GenConfig, LowerBackend,
    // LIR model
    Lir, BasicBlock, BlockId, Label, LirInst, Operand, OperandMode, OperandFlags,
    SourcePosition, Value, ValueKind, AsmReg, StackSlot,
    // Switch lowering
    SwitchCase, SwitchStrategy, LoweringDecision, IntHasher,
    // Session management
    LoweringSession, SessionStats,
    // Errors
    LowerError, LowerResult,
};
