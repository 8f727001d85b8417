//! Payload layouts and allocation size arithmetic.
//!
//! Each object kind stores a fixed `#[repr(C)]` payload right after the
//! header; variable-length kinds keep their element count in the payload
//! and the elements inline after it. The walker iterates tagged fields
//! using these layouts, and the allocator sizes requests with
//! [`alloc_size`].
//!
//! Element counts are set by the typed allocation helpers on
//! [`crate::Gc`]; a raw allocation starts zeroed, which reads as a length
//! of zero and all-nil fields.

use std::mem;

use static_assertions::{const_assert, const_assert_eq};

use super::header::{ObjRef, GC_ALIGNMENT, HEADER_SIZE};
use crate::util::Alignment;
use crate::value::Value;

/// Base of one bigint digit. Smaller than 2^32 so digit products cannot
/// overflow a u64 during arithmetic.
pub const BIGINT_BASE: u64 = 100_000_000;

/// Number of parent slots kept inline in environments and activation
/// records. Chains shorter than this resolve a parent lookup with a single
/// index instead of a pointer walk.
pub const BATCH_FATHER_SIZE: usize = 60;

// Tagged values are stored directly in raw object memory.
const_assert_eq!(mem::align_of::<Value>(), GC_ALIGNMENT);
const_assert!(mem::size_of::<Value>() % GC_ALIGNMENT == 0);

/// Round a payload request up to a full aligned object size.
///
/// Mirrors the allocator contract: align the payload, add the header,
/// align again.
pub const fn alloc_size(payload_bytes: usize) -> usize {
    let payload = Alignment::align_up(payload_bytes, GC_ALIGNMENT);
    Alignment::align_up(payload + HEADER_SIZE, GC_ALIGNMENT)
}

// === Payloads ===

/// Arbitrary-precision integer: `len` digits, least significant first.
#[repr(C)]
pub struct BigintPayload {
    pub len: usize,
    /// -1, 0, or 1
    pub sign: i64,
}

#[repr(C)]
pub struct RationalPayload {
    pub numerator: Value,
    pub denominator: Value,
}

#[repr(C)]
pub struct ComplexPayload {
    pub real: Value,
    pub imaginary: Value,
}

#[repr(C)]
pub struct PairPayload {
    pub car: Value,
    pub cdr: Value,
}

#[repr(C)]
pub struct VectorPayload {
    pub len: usize,
}

#[repr(C)]
pub struct BytevectorPayload {
    pub len: usize,
}

/// String of Unicode code points, one `u32` each.
#[repr(C)]
pub struct StringPayload {
    pub len: usize,
}

/// Lexical environment: compacted parent chain plus bindings.
///
/// `fathers[i]` is the environment `i + 1` levels up, for the first
/// `BATCH_FATHER_SIZE` levels; deeper ancestors are reached through the
/// last father.
#[repr(C)]
pub struct EnvironmentPayload {
    pub fathers: [Value; BATCH_FATHER_SIZE],
    pub len: usize,
}

/// Activation record: same parent-chain shape as an environment, with the
/// frame's value slots inline.
#[repr(C)]
pub struct ActivationRecordPayload {
    pub fathers: [Value; BATCH_FATHER_SIZE],
    pub len: usize,
}

#[repr(C)]
pub struct ProcedurePayload {
    pub formals: Value,
    pub env: Value,
    pub body: Value,
    pub code: Value,
}

#[repr(C)]
pub struct MacroPayload {
    pub len: usize,
}

#[repr(C)]
pub struct TransformerPayload {
    pub env: Value,
    pub pattern: Value,
    pub template: Value,
}

#[repr(C)]
pub struct StructPayload {
    pub type_id: u64,
    pub len: usize,
}

#[repr(C)]
pub struct CodePayload {
    pub len: usize,
}

/// Bytecode opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Opcode {
    Jump = 0,
    Load,
    CreateActivationRecord,
}

/// Handler invoked by the evaluator to execute one instruction.
pub type InstrFn = fn(Value, *mut Instruction);

/// One bytecode instruction.
///
/// Operands are tagged values but the walker treats code objects as
/// scalar: the compiler only emits immediates into operand slots, so code
/// never keeps heap objects alive.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: [Value; 4],
    pub handler: Option<InstrFn>,
}

// === Payload size helpers ===

pub const fn bigint_bytes(digits: usize) -> usize {
    mem::size_of::<BigintPayload>() + digits * mem::size_of::<u64>()
}

pub const fn rational_bytes() -> usize {
    mem::size_of::<RationalPayload>()
}

pub const fn complex_bytes() -> usize {
    mem::size_of::<ComplexPayload>()
}

pub const fn pair_bytes() -> usize {
    mem::size_of::<PairPayload>()
}

pub const fn vector_bytes(len: usize) -> usize {
    mem::size_of::<VectorPayload>() + len * mem::size_of::<Value>()
}

pub const fn bytevector_bytes(len: usize) -> usize {
    mem::size_of::<BytevectorPayload>() + len
}

pub const fn string_bytes(len: usize) -> usize {
    mem::size_of::<StringPayload>() + len * mem::size_of::<u32>()
}

pub const fn environment_bytes(len: usize) -> usize {
    mem::size_of::<EnvironmentPayload>() + len * mem::size_of::<Value>()
}

pub const fn activation_record_bytes(len: usize) -> usize {
    mem::size_of::<ActivationRecordPayload>() + len * mem::size_of::<Value>()
}

pub const fn procedure_bytes() -> usize {
    mem::size_of::<ProcedurePayload>()
}

pub const fn macro_bytes(transformers: usize) -> usize {
    mem::size_of::<MacroPayload>() + transformers * mem::size_of::<Value>()
}

pub const fn transformer_bytes() -> usize {
    mem::size_of::<TransformerPayload>()
}

pub const fn struct_bytes(fields: usize) -> usize {
    mem::size_of::<StructPayload>() + fields * mem::size_of::<Value>()
}

pub const fn code_bytes(instructions: usize) -> usize {
    mem::size_of::<CodePayload>() + instructions * mem::size_of::<Instruction>()
}

// === Typed payload access ===
//
// Each accessor reinterprets the payload bytes; tail accessors return the
// first element of the inline array. All of them require that the object
// actually has the corresponding kind.

impl ObjRef {
    /// # Safety
    /// `self` must be a live Bigint object.
    #[inline]
    pub unsafe fn bigint(self) -> *mut BigintPayload {
        self.payload() as *mut BigintPayload
    }

    /// # Safety
    /// `self` must be a live Bigint object.
    #[inline]
    pub unsafe fn bigint_digits(self) -> *mut u64 {
        (self.payload() + mem::size_of::<BigintPayload>()) as *mut u64
    }

    /// # Safety
    /// `self` must be a live Rational object.
    #[inline]
    pub unsafe fn rational(self) -> *mut RationalPayload {
        self.payload() as *mut RationalPayload
    }

    /// # Safety
    /// `self` must be a live Complex object.
    #[inline]
    pub unsafe fn complex(self) -> *mut ComplexPayload {
        self.payload() as *mut ComplexPayload
    }

    /// # Safety
    /// `self` must be a live Pair object.
    #[inline]
    pub unsafe fn pair(self) -> *mut PairPayload {
        self.payload() as *mut PairPayload
    }

    /// # Safety
    /// `self` must be a live Vector object.
    #[inline]
    pub unsafe fn vector(self) -> *mut VectorPayload {
        self.payload() as *mut VectorPayload
    }

    /// # Safety
    /// `self` must be a live Vector object.
    #[inline]
    pub unsafe fn vector_elems(self) -> *mut Value {
        (self.payload() + mem::size_of::<VectorPayload>()) as *mut Value
    }

    /// # Safety
    /// `self` must be a live Bytevector object.
    #[inline]
    pub unsafe fn bytevector(self) -> *mut BytevectorPayload {
        self.payload() as *mut BytevectorPayload
    }

    /// # Safety
    /// `self` must be a live Bytevector object.
    #[inline]
    pub unsafe fn bytevector_bytes_ptr(self) -> *mut u8 {
        (self.payload() + mem::size_of::<BytevectorPayload>()) as *mut u8
    }

    /// # Safety
    /// `self` must be a live String object.
    #[inline]
    pub unsafe fn string(self) -> *mut StringPayload {
        self.payload() as *mut StringPayload
    }

    /// # Safety
    /// `self` must be a live String object.
    #[inline]
    pub unsafe fn string_chars(self) -> *mut u32 {
        (self.payload() + mem::size_of::<StringPayload>()) as *mut u32
    }

    /// # Safety
    /// `self` must be a live Environment object.
    #[inline]
    pub unsafe fn environment(self) -> *mut EnvironmentPayload {
        self.payload() as *mut EnvironmentPayload
    }

    /// # Safety
    /// `self` must be a live Environment object.
    #[inline]
    pub unsafe fn environment_entries(self) -> *mut Value {
        (self.payload() + mem::size_of::<EnvironmentPayload>()) as *mut Value
    }

    /// # Safety
    /// `self` must be a live ActivationRecord object.
    #[inline]
    pub unsafe fn activation_record(self) -> *mut ActivationRecordPayload {
        self.payload() as *mut ActivationRecordPayload
    }

    /// # Safety
    /// `self` must be a live ActivationRecord object.
    #[inline]
    pub unsafe fn activation_record_values(self) -> *mut Value {
        (self.payload() + mem::size_of::<ActivationRecordPayload>()) as *mut Value
    }

    /// # Safety
    /// `self` must be a live Procedure object.
    #[inline]
    pub unsafe fn procedure(self) -> *mut ProcedurePayload {
        self.payload() as *mut ProcedurePayload
    }

    /// # Safety
    /// `self` must be a live Macro object.
    #[inline]
    pub unsafe fn macro_payload(self) -> *mut MacroPayload {
        self.payload() as *mut MacroPayload
    }

    /// # Safety
    /// `self` must be a live Macro object.
    #[inline]
    pub unsafe fn macro_transformers(self) -> *mut Value {
        (self.payload() + mem::size_of::<MacroPayload>()) as *mut Value
    }

    /// # Safety
    /// `self` must be a live Transformer object.
    #[inline]
    pub unsafe fn transformer(self) -> *mut TransformerPayload {
        self.payload() as *mut TransformerPayload
    }

    /// # Safety
    /// `self` must be a live Struct object.
    #[inline]
    pub unsafe fn struct_payload(self) -> *mut StructPayload {
        self.payload() as *mut StructPayload
    }

    /// # Safety
    /// `self` must be a live Struct object.
    #[inline]
    pub unsafe fn struct_fields(self) -> *mut Value {
        (self.payload() + mem::size_of::<StructPayload>()) as *mut Value
    }

    /// # Safety
    /// `self` must be a live Code object.
    #[inline]
    pub unsafe fn code(self) -> *mut CodePayload {
        self.payload() as *mut CodePayload
    }

    /// # Safety
    /// `self` must be a live Code object.
    #[inline]
    pub unsafe fn code_instructions(self) -> *mut Instruction {
        (self.payload() + mem::size_of::<CodePayload>()) as *mut Instruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_size_is_aligned() {
        for payload in [0, 1, 7, 8, 9, 16, 100, 4095] {
            let size = alloc_size(payload);
            assert_eq!(size % GC_ALIGNMENT, 0, "payload {payload}");
            assert!(size >= HEADER_SIZE + payload);
        }
    }

    #[test]
    fn test_alloc_size_monotonic() {
        let mut prev = 0;
        for payload in 0..256 {
            let size = alloc_size(payload);
            assert!(size >= prev);
            prev = size;
        }
    }

    #[test]
    fn test_pair_payload_layout() {
        assert_eq!(pair_bytes(), 2 * mem::size_of::<Value>());
        assert_eq!(
            mem::offset_of!(PairPayload, cdr),
            mem::size_of::<Value>()
        );
    }

    #[test]
    fn test_environment_layout() {
        // Fathers sit first, then the binding count, then the bindings.
        assert_eq!(mem::offset_of!(EnvironmentPayload, fathers), 0);
        assert_eq!(
            mem::offset_of!(EnvironmentPayload, len),
            BATCH_FATHER_SIZE * mem::size_of::<Value>()
        );
        assert_eq!(
            environment_bytes(3),
            mem::size_of::<EnvironmentPayload>() + 3 * mem::size_of::<Value>()
        );
    }

    #[test]
    fn test_variable_kinds_scale_by_element() {
        assert_eq!(
            vector_bytes(10) - vector_bytes(9),
            mem::size_of::<Value>()
        );
        assert_eq!(bytevector_bytes(10) - bytevector_bytes(9), 1);
        assert_eq!(string_bytes(10) - string_bytes(9), 4);
        assert_eq!(
            code_bytes(4) - code_bytes(3),
            mem::size_of::<Instruction>()
        );
    }

    #[test]
    fn test_instruction_zeroed_is_valid() {
        // Code payloads come out of the allocator zeroed; the zero pattern
        // must decode to a harmless instruction.
        let instr: Instruction = unsafe { mem::zeroed() };
        assert_eq!(instr.opcode, Opcode::Jump);
        assert!(instr.handler.is_none());
        assert!(instr.operands.iter().all(|v| v.is_nil()));
    }
}
