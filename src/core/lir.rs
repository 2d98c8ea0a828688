// This module defines the LIR container and control-flow identity types. BasicBlock
// is the caller's view of a CFG node: an id plus an aligned flag marking loop
// headers. Label names a branch target block. Lir owns the per-block instruction
// sequences produced by lowering; a block's sequence is set exactly once when its
// scope opens, and duplicate initialization is a fatal protocol violation rather
// than a recoverable condition, since it indicates re-entrant or duplicate lowering
// of the same block. Sequences are append-only and preserve call order verbatim;
// later instructions may read values defined by earlier ones in the same block.

//! LIR storage and basic block identities.

use std::fmt;

use hashbrown::HashMap;

use super::error::{LowerError, LowerResult};
use super::inst::LirInst;

/// Identity of a basic block within one lowering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// A branch target naming a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub BlockId);

impl Label {
    pub fn block(self) -> BlockId {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A CFG node as seen by the lowering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicBlock {
    pub id: BlockId,
    /// Loop headers are emitted with the configured code alignment.
    pub aligned: bool,
}

impl BasicBlock {
    pub fn new(id: BlockId) -> Self {
        Self { id, aligned: false }
    }

    pub fn aligned(id: BlockId) -> Self {
        Self { id, aligned: true }
    }
}

/// The LIR produced by one lowering pass: one instruction sequence per
/// lowered block.
#[derive(Debug, Default)]
pub struct Lir {
    blocks: HashMap<BlockId, Vec<LirInst>>,
}

impl Lir {
    pub fn new() -> Self {
        Self {
            blocks: HashMap::new(),
        }
    }

    /// Whether a sequence has been set for `block`.
    pub fn is_lowered(&self, block: BlockId) -> bool {
        self.blocks.contains_key(&block)
    }

    /// Set up the (empty) sequence for `block`. Fails fatally if the block
    /// was already lowered.
    pub(crate) fn init_block(&mut self, block: BlockId) -> LowerResult<()> {
        if self.blocks.contains_key(&block) {
            return Err(LowerError::DuplicateBlockLowering { block });
        }
        self.blocks.insert(block, Vec::new());
        Ok(())
    }

    /// Append to `block`'s sequence and return a reference to the stored
    /// instruction. The caller (the generator) guarantees the block was
    /// initialized.
    pub(crate) fn push(&mut self, block: BlockId, inst: LirInst) -> &LirInst {
        let seq = self
            .blocks
            .get_mut(&block)
            .expect("push into uninitialized block");
        seq.push(inst);
        seq.last().expect("sequence non-empty after push")
    }

    /// The instruction sequence for `block`, if it has been lowered.
    pub fn for_block(&self, block: BlockId) -> Option<&[LirInst]> {
        self.blocks.get(&block).map(|seq| seq.as_slice())
    }

    /// Number of lowered blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}
