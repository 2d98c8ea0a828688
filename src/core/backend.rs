// This module defines the capability interface concrete machine backends implement.
// The generator is written purely against this trait: it never encodes machine
// instructions itself, it only asks the backend for a conditional branch, an
// unconditional jump, a bounds-checked range-table dispatch, a hashed dispatch
// with stored-key verification, a materialized constant, or one of the three
// arithmetic steps the hash sequence needs. Every method receives the open block
// scope so each instruction a backend constructs flows through the single append
// choke point and its operand-role verification. Every method defaults to a
// NotImplemented error naming the capability, so a backend missing coverage is
// diagnosed at the call site instead of producing corrupt output.

//! The backend capability trait.

use super::error::{LowerError, LowerResult};
use super::gen::BlockScope;
use super::lir::Label;
use super::value::Value;

/// Architecture-specific emitters consumed by the generator.
///
/// A concrete backend overrides the capabilities its architecture supports;
/// anything left at the default surfaces [`LowerError::NotImplemented`]
/// immediately rather than being attempted.
pub trait LowerBackend {
    /// Unconditional jump to `target`.
    fn emit_jump(&mut self, _scope: &mut BlockScope<'_, '_, '_>, _target: Label) -> LowerResult<()> {
        Err(LowerError::not_implemented("jump"))
    }

    /// One decision-tree step: branch to `target` when `key` equals
    /// `case_key`, otherwise fall through to the next comparison.
    /// `probability` is the branch-taken probability, preserved for
    /// downstream layout heuristics.
    fn emit_compare_branch(
        &mut self,
        _scope: &mut BlockScope<'_, '_, '_>,
        _key: &Value,
        _case_key: i32,
        _target: Label,
        _probability: f64,
    ) -> LowerResult<()> {
        Err(LowerError::not_implemented("compare-branch"))
    }

    /// Bounds-checked dense dispatch: index `targets` by `key - low_key`,
    /// falling through to `default` when out of range.
    fn emit_range_table_switch(
        &mut self,
        _scope: &mut BlockScope<'_, '_, '_>,
        _low_key: i32,
        _default: Label,
        _targets: &[Label],
        _key: &Value,
    ) -> LowerResult<()> {
        Err(LowerError::not_implemented("range-table-switch"))
    }

    /// Hashed dispatch: index `targets` by the precomputed `hash`, compare
    /// the slot's recorded key in `keys` against `key`, and fall through to
    /// `default` on mismatch. The hash is not perfect outside the original
    /// key set, so the comparison is mandatory.
    fn emit_hash_table_switch(
        &mut self,
        _scope: &mut BlockScope<'_, '_, '_>,
        _keys: &[i32],
        _default: Label,
        _targets: &[Label],
        _key: &Value,
        _hash: &Value,
    ) -> LowerResult<()> {
        Err(LowerError::not_implemented("hash-table-switch"))
    }

    /// Materialize an integer constant into a usable value. Backends may
    /// inline the constant or emit a load.
    fn emit_constant(
        &mut self,
        _scope: &mut BlockScope<'_, '_, '_>,
        _value: i64,
    ) -> LowerResult<Value> {
        Err(LowerError::not_implemented("constant-materialization"))
    }

    /// Multiply, for the hash sequence.
    fn emit_mul(
        &mut self,
        _scope: &mut BlockScope<'_, '_, '_>,
        _left: &Value,
        _right: &Value,
    ) -> LowerResult<Value> {
        Err(LowerError::not_implemented("mul"))
    }

    /// Logical shift right, for the hash sequence.
    fn emit_shr(
        &mut self,
        _scope: &mut BlockScope<'_, '_, '_>,
        _left: &Value,
        _right: &Value,
    ) -> LowerResult<Value> {
        Err(LowerError::not_implemented("shr"))
    }

    /// Bitwise and, for the hash sequence.
    fn emit_and(
        &mut self,
        _scope: &mut BlockScope<'_, '_, '_>,
        _left: &Value,
        _right: &Value,
    ) -> LowerResult<Value> {
        Err(LowerError::not_implemented("and"))
    }
}
