// This module implements the LIR generator: the state machine that owns the LIR
// being produced, tracks which block is currently being lowered, and funnels every
// emitted instruction through one verified append path. open_block is scoped
// acquisition: it fails fatally if the block was already lowered, allocates the
// block's sequence, appends the block-entry label (with the configured alignment
// for loop headers), and returns a BlockScope whose drop clears the current-block
// state. The scope borrows the generator mutably, so the single-block-at-a-time
// discipline is enforced at compile time while the duplicate-lowering check guards
// later re-opens. append verifies operand roles (a correctness gate, never
// optional), stamps the current source position, and preserves call order
// verbatim. emit_strategy_switch plans the dispatch form and transcribes it
// through the backend capability trait, composing the multiply/shift/mask hash
// sequence exactly when a hashed table was selected.

//! Block-scoped LIR generation.
//!
//! The generator hands out one [`BlockScope`] at a time; all emission for a
//! block happens through its scope, and every instruction passes operand-role
//! verification before it is linked into the block's sequence.

use log::trace;

use super::backend::LowerBackend;
use super::error::{LowerError, LowerResult};
use super::inst::{LirInst, OperandFlags, OperandMode, SourcePosition};
use super::lir::{BasicBlock, BlockId, Lir};
use super::session::{LoweringSession, SwitchKind};
use super::switch::{plan_switch, LoweringDecision, SwitchCase, SwitchStrategy};
use super::value::{Value, ValueKind};

/// Generator configuration.
#[derive(Debug, Clone, Copy)]
pub struct GenConfig {
    /// Code alignment applied to loop-header block labels.
    pub loop_header_alignment: u32,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            loop_header_alignment: 16,
        }
    }
}

/// The LIR generator for one lowering pass.
pub struct LirGenerator<'s, 'arena> {
    session: &'s LoweringSession<'arena>,
    config: GenConfig,
    lir: Lir,
    current_block: Option<BlockId>,
    current_position: Option<SourcePosition>,
}

impl<'s, 'arena> LirGenerator<'s, 'arena> {
    pub fn new(session: &'s LoweringSession<'arena>, config: GenConfig) -> Self {
        Self {
            session,
            config,
            lir: Lir::new(),
            current_block: None,
            current_position: None,
        }
    }

    pub fn session(&self) -> &'s LoweringSession<'arena> {
        self.session
    }

    /// Set the source position stamped onto subsequently appended
    /// instructions. `None` clears it.
    pub fn set_source_position(&mut self, position: Option<SourcePosition>) {
        self.current_position = position;
    }

    /// The block currently being lowered, if any.
    pub fn current_block(&self) -> Option<BlockId> {
        self.current_block
    }

    /// The LIR produced so far.
    pub fn lir(&self) -> &Lir {
        &self.lir
    }

    /// Finish the pass and take ownership of the LIR.
    pub fn into_lir(self) -> Lir {
        self.lir
    }

    /// Open `block` for lowering.
    ///
    /// Fails fatally with [`LowerError::DuplicateBlockLowering`] if the
    /// block's sequence was already set. On success the block's entry label
    /// is the first instruction of its sequence and the returned scope is
    /// the only way to append to it.
    pub fn open_block(&mut self, block: &BasicBlock) -> LowerResult<BlockScope<'_, 's, 'arena>> {
        self.lir.init_block(block.id)?;
        self.current_block = Some(block.id);
        trace!("BEGIN lowering block {}", block.id);

        let alignment = if block.aligned {
            self.config.loop_header_alignment
        } else {
            0
        };
        let mut scope = BlockScope { gen: self };
        scope.append(LirInst::label(block.id, alignment))?;
        Ok(scope)
    }

    /// Append `inst` to the block currently being lowered.
    ///
    /// This is the single choke point through which every emitted
    /// instruction passes: operand roles are verified (fatally on
    /// violation), the current source position is stamped, and the
    /// instruction is linked into the block's sequence in call order.
    pub fn append(&mut self, mut inst: LirInst) -> LowerResult<&LirInst> {
        let block = self.current_block.ok_or(LowerError::NoBlockOpen {
            mnemonic: inst.mnemonic(),
        })?;
        verify(&inst)?;
        inst.set_position(self.current_position);
        self.session.record_instruction_appended(inst.mnemonic());
        trace!("  {} <- {}", block, inst);
        Ok(self.lir.push(block, inst))
    }
}

/// Verify every operand's kind against its declared role.
///
/// A constant is permitted in any role except `Def`: you cannot write into
/// a constant. Cast wrappers are looked through.
fn verify(inst: &LirInst) -> LowerResult<()> {
    for operand in inst.operands() {
        let value = operand.value.strip_cast();
        let kind = value.kind();
        let allowed = match kind {
            ValueKind::Register => operand.allowed.contains(OperandFlags::REG),
            ValueKind::Stack => operand.allowed.contains(OperandFlags::STACK),
            ValueKind::Constant => {
                operand.allowed.contains(OperandFlags::CONST) && operand.mode != OperandMode::Def
            }
            ValueKind::Illegal => operand.allowed.contains(OperandFlags::ILLEGAL),
        };
        if !allowed {
            return Err(LowerError::InvalidOperand {
                mnemonic: inst.mnemonic(),
                mode: operand.mode,
                flags: operand.allowed,
                value: value.clone(),
                kind,
            });
        }
    }
    Ok(())
}

/// Scoped handle for lowering one block.
///
/// Exactly one scope is live at a time (it borrows the generator mutably);
/// dropping it releases the block and clears the current-block state, on
/// every exit path.
pub struct BlockScope<'g, 's, 'arena> {
    gen: &'g mut LirGenerator<'s, 'arena>,
}

impl core::fmt::Debug for BlockScope<'_, '_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockScope")
            .field("block", &self.gen.current_block)
            .finish()
    }
}

impl<'g, 's, 'arena> BlockScope<'g, 's, 'arena> {
    /// The block this scope is lowering.
    pub fn block(&self) -> BlockId {
        self.gen
            .current_block
            .expect("scope alive without a current block")
    }

    /// Append an instruction to this block. See [`LirGenerator::append`].
    pub fn append(&mut self, inst: LirInst) -> LowerResult<&LirInst> {
        self.gen.append(inst)
    }

    /// Lower a multi-way branch on `value`.
    ///
    /// Chooses among decision tree, dense range table, and hashed table per
    /// the strategy's average effort and the key densities, then emits the
    /// chosen form through the backend capabilities. Deterministic: the
    /// same inputs always produce the same instruction sequence.
    pub fn emit_strategy_switch<B: LowerBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        case: &SwitchCase,
        strategy: &SwitchStrategy,
        value: &Value,
    ) -> LowerResult<()> {
        if case.is_empty() {
            return backend.emit_jump(self, case.default_target());
        }

        match plan_switch(case, strategy) {
            LoweringDecision::DecisionTree => {
                self.gen
                    .session
                    .record_switch_lowered(SwitchKind::DecisionTree);
                for &index in strategy.order() {
                    backend.emit_compare_branch(
                        self,
                        value,
                        case.key(index),
                        case.target(index),
                        case.probability(index),
                    )?;
                }
                backend.emit_jump(self, case.default_target())
            }
            LoweringDecision::RangeTable { low_key, targets } => {
                self.gen
                    .session
                    .record_switch_lowered(SwitchKind::RangeTable);
                backend.emit_range_table_switch(
                    self,
                    low_key,
                    case.default_target(),
                    &targets,
                    value,
                )
            }
            LoweringDecision::HashTable {
                hasher,
                keys,
                targets,
            } => {
                self.gen
                    .session
                    .record_switch_lowered(SwitchKind::HashTable);
                let mut hash = value.clone();
                if hasher.factor > 1 {
                    let factor = backend.emit_constant(self, hasher.factor as i64)?;
                    hash = backend.emit_mul(self, &hash, &factor)?;
                }
                if hasher.shift > 0 {
                    let shift = backend.emit_constant(self, hasher.shift as i64)?;
                    hash = backend.emit_shr(self, &hash, &shift)?;
                }
                let mask = backend.emit_constant(self, (hasher.cardinality - 1) as i64)?;
                hash = backend.emit_and(self, &hash, &mask)?;
                backend.emit_hash_table_switch(
                    self,
                    &keys,
                    case.default_target(),
                    &targets,
                    value,
                    &hash,
                )
            }
        }
    }
}

impl Drop for BlockScope<'_, '_, '_> {
    fn drop(&mut self) {
        if let Some(block) = self.gen.current_block.take() {
            self.gen.session.record_block_lowered();
            trace!("END lowering block {}", block);
        }
    }
}
