//! Runtime context - the interpreter-facing surface of the memory
//! subsystem.
//!
//! [`Ctx`] bundles the collector, the symbol table, and the global
//! environment register into the single handle the evaluator threads
//! through every call. The environment register is rooted automatically
//! around allocations made through the context, so the evaluator never
//! loses its world to a collection it did not expect.

use silt_util::Obarray;

use crate::config::GcConfig;
use crate::error::Result;
use crate::gc::Gc;
use crate::object::{ObjKind, ObjRef};
use crate::value::Value;

/// The interpreter's runtime context.
pub struct Ctx {
    gc: Gc,
    obarray: Obarray,
    /// The global environment register. Kept alive across any allocation
    /// made through the context.
    pub env: Value,
}

impl Ctx {
    /// Create a context with the default memory configuration.
    pub fn new() -> Result<Ctx> {
        Self::with_config(GcConfig::default())
    }

    /// Create a context with an explicit memory configuration.
    pub fn with_config(config: GcConfig) -> Result<Ctx> {
        Ok(Ctx {
            gc: Gc::new(config)?,
            obarray: Obarray::new(),
            env: Value::Nil,
        })
    }

    /// Run `f` against the collector with the environment register
    /// rooted. Any heap operation that might collect belongs inside.
    pub fn with_heap<R>(&mut self, f: impl FnOnce(&mut Gc) -> R) -> R {
        let env_cell: *mut Value = &mut self.env;
        self.gc.preserve(env_cell);
        let result = f(&mut self.gc);
        self.gc.release(1);
        result
    }

    /// Allocate an object; see [`Gc::alloc`]. The environment register is
    /// rooted for the duration.
    pub fn alloc(&mut self, kind: ObjKind, payload_bytes: usize) -> Value {
        self.with_heap(|gc| gc.alloc(kind, payload_bytes))
    }

    /// Intern a symbol, returning its tagged value.
    pub fn intern(&mut self, name: &str) -> Value {
        Value::Symbol(self.obarray.intern(name))
    }

    /// The text of an interned symbol value, if it is one.
    pub fn symbol_name(&self, value: Value) -> Option<&str> {
        value.as_symbol().and_then(|sym| self.obarray.resolve(sym))
    }

    /// Register a mutator root cell; see [`Gc::preserve`].
    pub fn preserve(&mut self, cell: *mut Value) {
        self.gc.preserve(cell);
    }

    /// Unregister the most recent `count` root cells.
    pub fn release(&mut self, count: usize) {
        self.gc.release(count);
    }

    /// Remember a possible old-to-young edge; see [`Gc::write_barrier`].
    pub fn write_barrier(&mut self, parent: ObjRef) {
        self.gc.write_barrier(parent);
    }

    pub fn gc(&self) -> &Gc {
        &self.gc
    }

    pub fn gc_mut(&mut self) -> &mut Gc {
        &mut self.gc
    }

    pub fn obarray(&self) -> &Obarray {
        &self.obarray
    }
}
