//! # SGC - The Silt Runtime Memory Manager
//!
//! SGC is the memory subsystem of the Silt interpreter: a generational,
//! moving garbage collector together with the uniform tagged-value
//! representation and the symbol table the rest of the interpreter sits
//! on top of.
//!
//! ## Overview
//!
//! - **Tagged values**: every runtime value is a small `Copy` sum
//!   ([`Value`]); only the heap-pointer variant is traced.
//! - **Bump allocation** into a young semispace; collection is the only
//!   way memory comes back.
//! - **Minor GC**: Cheney-style copying of the young generation, rooted
//!   in the shadow stack and the remembered set.
//! - **Tenuring**: objects that survive enough minor collections move to
//!   the old generation.
//! - **Major GC**: sliding mark-compact over both generations.
//! - **Heap growth**: both regions double and every pointer in the
//!   system is relocated through a pair of move transforms.
//!
//! ## Quick Start
//!
//! ```rust
//! use sgc::{Ctx, Value};
//!
//! fn main() -> Result<(), sgc::GcError> {
//!     let mut ctx = Ctx::new()?;
//!
//!     // Symbols are interned to dense, stable indices.
//!     let sym = ctx.intern("lambda");
//!     assert_eq!(ctx.intern("lambda"), sym);
//!
//!     // Pin locals that live across allocations; the collector updates
//!     // the cell in place when the object moves.
//!     let mut pair = ctx.with_heap(|gc| gc.alloc_pair());
//!     ctx.preserve(&mut pair);
//!     unsafe { (*pair.as_ptr().unwrap().pair()).car = Value::Fixnum(42) };
//!
//!     ctx.with_heap(|gc| gc.collect_minor());
//!
//!     // The local was rewritten; the contents survived the move.
//!     let obj = pair.as_ptr().unwrap();
//!     assert_eq!(unsafe { (*obj.pair()).car }, Value::Fixnum(42));
//!     ctx.release(1);
//!     Ok(())
//! }
//! ```
//!
//! ## Mutator rules
//!
//! 1. **Pin across allocation**: any `alloc` may move any heap object.
//!    Raw heap pointers held in locals are invalid after an allocation
//!    unless the local was preserved.
//! 2. **Balance preserve/release**: every preserved cell is released on
//!    every return path. [`Gc::with_roots`] scopes the pair.
//! 3. **Write barrier on old-to-young stores**: storing a young pointer
//!    into an old object requires [`Gc::write_barrier`] on the parent
//!    before the next collection.
//!
//! ## Failure model
//!
//! The collector is single-threaded and cooperative; a collection runs to
//! completion atomically from the mutator's point of view. Errors beyond
//! configuration validation (host allocation failure, heap corruption,
//! ordering violations) indicate a broken memory-manager invariant and
//! abort the process with a diagnostic.
//!
//! ## Modules
//!
//! - [`config`]: tuning parameters and validation
//! - [`error`]: error types and the fatal-abort path
//! - [`gc`]: allocation, minor/major collection, heap growth
//! - [`heap`]: raw regions and move transforms
//! - [`object`]: headers, payload layouts, and the field walker
//! - [`remset`]: the remembered set
//! - [`roots`]: the shadow stack
//! - [`runtime`]: the interpreter-facing context
//! - [`stats`]: collector activity counters
//! - [`util`]: alignment helpers
//! - [`value`]: the tagged value representation

// Core GC modules
pub mod config;
pub mod error;
pub mod gc;

// Memory model
pub mod heap;
pub mod object;
pub mod value;

// Collector support structures
pub mod remset;
pub mod roots;

// Runtime integration and monitoring
pub mod runtime;
pub mod stats;

// Utilities
pub mod util;

pub use config::{
    GcConfig, GC_GROW_RATIO, GC_INITIAL_SIZE, GC_OLD_TO_YOUNG_RATIO, GC_THRESHOLD_AGE,
};
pub use error::{GcError, Result};
pub use gc::Gc;
pub use object::{ObjKind, ObjRef, BATCH_FATHER_SIZE, BIGINT_BASE, GC_ALIGNMENT, HEADER_SIZE};
pub use runtime::Ctx;
pub use stats::GcStats;
pub use value::Value;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
