// This module defines the value model used by LIR instructions. A Value is a runtime
// location or immediate: a physical register (AsmReg, a bank/id pair), a virtual
// register awaiting allocation, a stack slot (fixed frame offset or virtual slot to
// be assigned during frame finalization), an inlined integer constant, or the
// distinguished Illegal value. Values may additionally be wrapped by a cast; role
// checking always inspects the unwrapped form via strip_cast. ValueKind collapses
// the variants into the four classes the operand-role checker reasons about:
// Register, Stack, Constant, and Illegal. Virtual registers count as Register kind
// since they occupy a register once allocation has run.

//! Runtime values referenced by LIR instructions.

use std::fmt;

/// Type for register bank indices (general purpose, floating point, ...).
pub type RegBank = u8;

/// Type for register IDs within a bank.
pub type RegId = u8;

/// Combined physical register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AsmReg {
    pub bank: RegBank,
    pub id: RegId,
}

impl AsmReg {
    pub const fn new(bank: RegBank, id: RegId) -> Self {
        Self { bank, id }
    }
}

impl fmt::Display for AsmReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}.{}", self.bank, self.id)
    }
}

/// A stack location. Fixed slots carry a frame offset; virtual slots are
/// placeholders resolved when the frame is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackSlot {
    Fixed(i32),
    Virtual(u32),
}

/// The four value classes the operand-role checker distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Register,
    Stack,
    Constant,
    Illegal,
}

/// A runtime location or immediate referenced by an instruction operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A physical register.
    Register(AsmReg),
    /// A virtual register, not yet assigned by register allocation.
    Virtual(u32),
    /// A stack slot, fixed or virtual.
    Stack(StackSlot),
    /// An inlined integer constant.
    Constant(i64),
    /// The distinguished illegal value.
    Illegal,
    /// A reinterpreting cast around another value. Role checking looks
    /// through casts; the wrapped value determines the kind.
    Cast(Box<Value>),
}

impl Value {
    /// Strip any cast wrappers and return the underlying value.
    pub fn strip_cast(&self) -> &Value {
        let mut value = self;
        while let Value::Cast(inner) = value {
            value = inner;
        }
        value
    }

    /// The kind of the unwrapped value.
    pub fn kind(&self) -> ValueKind {
        match self.strip_cast() {
            Value::Register(_) | Value::Virtual(_) => ValueKind::Register,
            Value::Stack(_) => ValueKind::Stack,
            Value::Constant(_) => ValueKind::Constant,
            Value::Illegal => ValueKind::Illegal,
            Value::Cast(_) => unreachable!("strip_cast returned a cast"),
        }
    }

    /// The constant payload, if the unwrapped value is a constant.
    pub fn as_constant(&self) -> Option<i64> {
        match self.strip_cast() {
            Value::Constant(c) => Some(*c),
            _ => None,
        }
    }

    pub fn is_illegal(&self) -> bool {
        self.kind() == ValueKind::Illegal
    }

    /// Wrap this value in a cast.
    pub fn cast(self) -> Value {
        Value::Cast(Box::new(self))
    }
}
