//! Test utilities for exercising the generator without a machine backend.
//!
//! This module provides a recording backend that satisfies every capability
//! by constructing plain LIR instructions, simulating how an architecture
//! backend will be embedded in a full compiler.

use super::backend::LowerBackend;
use super::error::LowerResult;
use super::gen::BlockScope;
use super::inst::{LirInst, OperandFlags};
use super::lir::Label;
use super::value::Value;

/// A backend that records every emission as a generic instruction.
///
/// Instruction shapes, for assertions:
/// - `jump`: one target.
/// - `cmp_branch`: key input, imm = case key, one target, branch probability.
/// - `range_switch`: key input, imm = low key, targets = default then table.
/// - `hash_switch`: key and hash inputs, imms = recorded keys, targets =
///   default then table.
/// - `mul`/`shr`/`and`: two inputs, one fresh virtual def.
///
/// Constants are inlined rather than loaded, so constant materialization
/// appends nothing.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_virtual: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start virtual numbering above the caller's own values.
    pub fn with_first_virtual(next_virtual: u32) -> Self {
        Self { next_virtual }
    }

    fn fresh(&mut self) -> Value {
        let value = Value::Virtual(self.next_virtual);
        self.next_virtual += 1;
        value
    }

    fn binary(
        &mut self,
        scope: &mut BlockScope<'_, '_, '_>,
        mnemonic: &'static str,
        left: &Value,
        right: &Value,
    ) -> LowerResult<Value> {
        let dst = self.fresh();
        scope.append(
            LirInst::new(mnemonic)
                .input(left.clone(), OperandFlags::REG | OperandFlags::CONST)
                .input(right.clone(), OperandFlags::REG | OperandFlags::CONST)
                .def(dst.clone(), OperandFlags::REG),
        )?;
        Ok(dst)
    }
}

impl LowerBackend for RecordingBackend {
    fn emit_jump(&mut self, scope: &mut BlockScope<'_, '_, '_>, target: Label) -> LowerResult<()> {
        scope.append(LirInst::new("jump").with_target(target))?;
        Ok(())
    }

    fn emit_compare_branch(
        &mut self,
        scope: &mut BlockScope<'_, '_, '_>,
        key: &Value,
        case_key: i32,
        target: Label,
        probability: f64,
    ) -> LowerResult<()> {
        scope.append(
            LirInst::new("cmp_branch")
                .input(key.clone(), OperandFlags::REG)
                .with_imm(case_key as i64)
                .with_target(target)
                .with_probability(probability),
        )?;
        Ok(())
    }

    fn emit_range_table_switch(
        &mut self,
        scope: &mut BlockScope<'_, '_, '_>,
        low_key: i32,
        default: Label,
        targets: &[Label],
        key: &Value,
    ) -> LowerResult<()> {
        let mut inst = LirInst::new("range_switch")
            .input(key.clone(), OperandFlags::REG)
            .with_imm(low_key as i64)
            .with_target(default);
        for &target in targets {
            inst = inst.with_target(target);
        }
        scope.append(inst)?;
        Ok(())
    }

    fn emit_hash_table_switch(
        &mut self,
        scope: &mut BlockScope<'_, '_, '_>,
        keys: &[i32],
        default: Label,
        targets: &[Label],
        key: &Value,
        hash: &Value,
    ) -> LowerResult<()> {
        let mut inst = LirInst::new("hash_switch")
            .input(key.clone(), OperandFlags::REG)
            .input(hash.clone(), OperandFlags::REG)
            .with_target(default);
        for &recorded in keys {
            inst = inst.with_imm(recorded as i64);
        }
        for &target in targets {
            inst = inst.with_target(target);
        }
        scope.append(inst)?;
        Ok(())
    }

    fn emit_constant(
        &mut self,
        _scope: &mut BlockScope<'_, '_, '_>,
        value: i64,
    ) -> LowerResult<Value> {
        Ok(Value::Constant(value))
    }

    fn emit_mul(
        &mut self,
        scope: &mut BlockScope<'_, '_, '_>,
        left: &Value,
        right: &Value,
    ) -> LowerResult<Value> {
        self.binary(scope, "mul", left, right)
    }

    fn emit_shr(
        &mut self,
        scope: &mut BlockScope<'_, '_, '_>,
        left: &Value,
        right: &Value,
    ) -> LowerResult<Value> {
        self.binary(scope, "shr", left, right)
    }

    fn emit_and(
        &mut self,
        scope: &mut BlockScope<'_, '_, '_>,
        left: &Value,
        right: &Value,
    ) -> LowerResult<Value> {
        self.binary(scope, "and", left, right)
    }
}

/// A backend providing no capabilities at all, for missing-coverage tests.
#[derive(Debug, Default)]
pub struct EmptyBackend;

impl LowerBackend for EmptyBackend {}
