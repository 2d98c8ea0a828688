// This module serves as the central hub for lirgen's core infrastructure components,
// providing the building blocks for lowering a function's high-level operations into
// LIR that are shared by every concrete machine backend. It exports and organizes key
// subsystems: session management (arena-based memory allocation and lowering
// statistics), the LIR data model (values, operand roles, instructions, per-block
// sequences), the generator (block-scoped emission with operand-role verification),
// switch lowering (case model, strategy cost, decision-tree/range-table/hash-table
// selection), integer hashing (multiply-shift-mask perfect hash search), and the
// backend capability trait through which per-architecture emitters are supplied.
// All components are single-threaded per lowering pass; independent passes share
// no mutable state.

//! Core lirgen Infrastructure
//!
//! This module provides the fundamental building blocks for lowering into LIR,
//! designed to be shared across target architectures. All components enforce
//! the emission protocol: one open block at a time, every instruction passing
//! through operand-role verification before it is linked into a block.
//!
//! # Key Components
//!
//! ## Session Management (`session`)
//! - Arena-based memory allocation using `bumpalo`
//! - Lowering statistics (blocks, instructions, switch strategy counts)
//! - String interning for diagnostic labels
//!
//! ## LIR Model (`value`, `inst`, `lir`)
//! - Values classified as register, stack slot, constant, or illegal
//! - Instructions declaring an operand role and permitted kinds per operand
//! - Append-only, set-at-most-once per-block instruction sequences
//!
//! ## Generation (`gen`)
//! - Scoped block acquisition with guaranteed release
//! - Operand-role verification on every appended instruction
//! - Cost-driven switch dispatch through backend capabilities
//!
//! ## Switch Lowering (`switch`, `hashing`)
//! - Decision tree vs. range table vs. hash table selection
//! - Multiply-shift-mask perfect hashing for sparse key sets

pub mod backend;
pub mod error;
pub mod gen;
pub mod hashing;
pub mod inst;
pub mod lir;
pub mod session;
pub mod switch;
pub mod test_utils;
pub mod value;

// Re-export core components
pub use session::{LoweringSession, SessionStats, SwitchKind};

pub use value::{AsmReg, RegBank, RegId, StackSlot, Value, ValueKind};

pub use inst::{LirInst, Operand, OperandFlags, OperandMode, SourcePosition};

pub use lir::{BasicBlock, BlockId, Label, Lir};

pub use error::{LowerError, LowerResult};

pub use gen::{BlockScope, GenConfig, LirGenerator};

pub use backend::LowerBackend;

pub use switch::{plan_switch, LoweringDecision, SwitchCase, SwitchStrategy};

pub use hashing::IntHasher;
