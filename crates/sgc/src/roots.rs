//! Shadow Stack - the explicit root registry.
//!
//! The collector cannot see native stack frames, so any local that holds a
//! heap pointer across an allocation must be registered: push the address
//! of the local's tagged-value cell with [`ShadowStack::preserve`] before
//! the call, pop it with [`ShadowStack::release`] before returning. During
//! a collection the GC reads roots through these cells and writes the
//! relocated pointers back, so the caller's local is correct afterwards.
//!
//! The contract is balance: every `preserve` is matched by exactly one
//! `release` on every return path. [`crate::Gc::with_roots`] wraps a scope
//! so the pair cannot be forgotten on the normal path; fatal errors abort
//! rather than unwind, so there is no exceptional path to cover.

use crate::value::Value;

/// Registry of mutator root cells.
pub struct ShadowStack {
    cells: Vec<*mut Value>,
}

impl ShadowStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    /// Register a root cell. The cell must stay valid until released.
    #[inline]
    pub fn preserve(&mut self, cell: *mut Value) {
        self.cells.push(cell);
    }

    /// Unregister the `count` most recently preserved cells.
    pub fn release(&mut self, count: usize) {
        let len = self.cells.len();
        if count > len {
            crate::fatal!("shadow stack underflow: releasing {count} of {len} roots");
        }
        self.cells.truncate(len - count);
    }

    /// Number of registered root cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The `i`-th root cell, oldest first.
    #[inline]
    pub fn get(&self, i: usize) -> *mut Value {
        self.cells[i]
    }
}
