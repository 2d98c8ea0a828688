// This module defines the LIR instruction representation. Every operand an
// instruction touches declares an OperandMode (the role the value plays: Input,
// Alive, Temp, State, or Def) and an OperandFlags set naming the value kinds legal
// for that role. The operand-role checker in gen.rs inspects both before an
// instruction may be linked into a block. Instructions additionally carry branch
// target labels, immediate payload words, an optional branch probability used by
// downstream layout heuristics, and an optional source position stamped by the
// appender. Standard ops constructed by the framework itself (the block-entry
// label) are provided here; everything else is built by backend capability
// implementations.

//! LIR instructions and operand role declarations.

use std::fmt;
use std::ops::BitOr;

use super::lir::{BlockId, Label};

/// The role in which an instruction uses an operand.
///
/// `Def` is the output role; a constant is never legal there since a
/// constant cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandMode {
    Input,
    Alive,
    Temp,
    State,
    Def,
}

/// Permitted value kinds for one operand role, as a small bit set.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct OperandFlags(u8);

impl OperandFlags {
    pub const REG: OperandFlags = OperandFlags(1 << 0);
    pub const STACK: OperandFlags = OperandFlags(1 << 1);
    pub const CONST: OperandFlags = OperandFlags(1 << 2);
    pub const ILLEGAL: OperandFlags = OperandFlags(1 << 3);

    pub const fn empty() -> Self {
        OperandFlags(0)
    }

    pub const fn contains(self, other: OperandFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for OperandFlags {
    type Output = OperandFlags;

    fn bitor(self, rhs: OperandFlags) -> OperandFlags {
        OperandFlags(self.0 | rhs.0)
    }
}

impl fmt::Display for OperandFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (OperandFlags::REG, "REG"),
            (OperandFlags::STACK, "STACK"),
            (OperandFlags::CONST, "CONST"),
            (OperandFlags::ILLEGAL, "ILLEGAL"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        if first {
            write!(f, "NONE")?;
        }
        Ok(())
    }
}

impl fmt::Debug for OperandFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperandFlags({})", self)
    }
}

/// One declared operand: the value, its role, and the kinds legal in that role.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    pub value: super::value::Value,
    pub mode: OperandMode,
    pub allowed: OperandFlags,
}

/// A source position attached to emitted instructions for debug info.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

/// A single LIR instruction.
///
/// The framework never interprets the mnemonic; it exists for diagnostics,
/// statistics, and tests. Structure (operands, targets, immediates) is what
/// downstream consumers read.
#[derive(Debug, Clone, PartialEq)]
pub struct LirInst {
    mnemonic: &'static str,
    operands: Vec<Operand>,
    targets: Vec<Label>,
    imms: Vec<i64>,
    branch_probability: Option<f64>,
    position: Option<SourcePosition>,
}

impl LirInst {
    pub fn new(mnemonic: &'static str) -> Self {
        Self {
            mnemonic,
            operands: Vec::new(),
            targets: Vec::new(),
            imms: Vec::new(),
            branch_probability: None,
            position: None,
        }
    }

    /// The block-entry label op. Appended by the generator itself when a
    /// block scope opens; `alignment` is nonzero for loop headers.
    pub fn label(block: BlockId, alignment: u32) -> Self {
        LirInst::new("label")
            .with_imm(block.0 as i64)
            .with_imm(alignment as i64)
    }

    pub fn with_operand(
        mut self,
        value: super::value::Value,
        mode: OperandMode,
        allowed: OperandFlags,
    ) -> Self {
        self.operands.push(Operand {
            value,
            mode,
            allowed,
        });
        self
    }

    /// Declare an input operand.
    pub fn input(self, value: super::value::Value, allowed: OperandFlags) -> Self {
        self.with_operand(value, OperandMode::Input, allowed)
    }

    /// Declare an output operand.
    pub fn def(self, value: super::value::Value, allowed: OperandFlags) -> Self {
        self.with_operand(value, OperandMode::Def, allowed)
    }

    /// Declare a temp operand.
    pub fn temp(self, value: super::value::Value, allowed: OperandFlags) -> Self {
        self.with_operand(value, OperandMode::Temp, allowed)
    }

    pub fn with_target(mut self, target: Label) -> Self {
        self.targets.push(target);
        self
    }

    pub fn with_imm(mut self, imm: i64) -> Self {
        self.imms.push(imm);
        self
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.branch_probability = Some(probability);
        self
    }

    pub fn mnemonic(&self) -> &'static str {
        self.mnemonic
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    /// Iterate the operands declared in one role.
    pub fn operands_in_mode(&self, mode: OperandMode) -> impl Iterator<Item = &Operand> {
        self.operands.iter().filter(move |op| op.mode == mode)
    }

    pub fn targets(&self) -> &[Label] {
        &self.targets
    }

    pub fn imms(&self) -> &[i64] {
        &self.imms
    }

    pub fn branch_probability(&self) -> Option<f64> {
        self.branch_probability
    }

    pub fn position(&self) -> Option<SourcePosition> {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Option<SourcePosition>) {
        self.position = position;
    }
}

impl fmt::Display for LirInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic)?;
        for op in &self.operands {
            write!(f, " {:?}", op.value)?;
        }
        for imm in &self.imms {
            write!(f, " #{}", imm)?;
        }
        for target in &self.targets {
            write!(f, " ->{}", target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Value;

    #[test]
    fn test_label_op_shape() {
        let label = LirInst::label(BlockId(4), 16);
        assert_eq!(label.mnemonic(), "label");
        assert_eq!(label.imms(), &[4, 16]);
        assert!(label.operands().is_empty());
    }

    #[test]
    fn test_operand_declarations() {
        let inst = LirInst::new("add")
            .input(Value::Virtual(0), OperandFlags::REG | OperandFlags::CONST)
            .input(Value::Constant(1), OperandFlags::REG | OperandFlags::CONST)
            .def(Value::Virtual(1), OperandFlags::REG);

        assert_eq!(inst.operands().len(), 3);
        assert_eq!(inst.operands_in_mode(OperandMode::Input).count(), 2);
        assert_eq!(inst.operands_in_mode(OperandMode::Def).count(), 1);
        assert_eq!(inst.operands_in_mode(OperandMode::Temp).count(), 0);
    }

    #[test]
    fn test_flags_display() {
        let flags = OperandFlags::REG | OperandFlags::CONST;
        assert_eq!(format!("{}", flags), "REG|CONST");
        assert_eq!(format!("{}", OperandFlags::empty()), "NONE");
        assert!(flags.contains(OperandFlags::REG));
        assert!(!flags.contains(OperandFlags::STACK));
    }

    #[test]
    fn test_position_stamping() {
        let mut inst = LirInst::new("nop");
        assert_eq!(inst.position(), None);
        inst.set_position(Some(SourcePosition { line: 3, column: 9 }));
        assert_eq!(inst.position(), Some(SourcePosition { line: 3, column: 9 }));
    }
}
