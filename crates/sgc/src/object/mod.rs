//! Object model - headers, payload layouts, and the field walker.
//!
//! Every heap allocation is a uniform header followed by a kind-specific
//! payload, laid out in raw region memory so the collector can copy and
//! slide objects as plain byte ranges.
//!
//! - [`header`]: the object header, kind tags, and the [`ObjRef`] handle
//! - [`layout`]: per-kind payload layouts and allocation size arithmetic
//! - [`walker`]: the single policy table that visits pointer-bearing fields

pub mod header;
pub mod layout;
pub mod walker;

pub use header::{ObjHeader, ObjKind, ObjRef, GC_ALIGNMENT, HEADER_SIZE};
pub use layout::{Instruction, Opcode, BATCH_FATHER_SIZE, BIGINT_BASE};
pub use walker::{any_field, for_each_field};
