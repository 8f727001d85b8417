//! Obarray implementation - the content-addressed symbol table.
//!
//! The obarray maps identifier strings to dense [`Symbol`] indices. The
//! runtime is single-threaded, so the table is a plain owned structure that
//! lives in the interpreter context; there is no global state and no
//! locking.
//!
//! # Memory Model
//!
//! Interned strings are stored once, in the reverse table, and referenced
//! by the forward map. Entries are never removed: symbol storage is owned
//! outside the GC heap and is immortal, which is what lets the collector
//! skip symbols entirely.

use rustc_hash::FxHashMap;
use std::rc::Rc;

use super::{InternerStats, Symbol};

/// The symbol intern table.
///
/// Maps strings to symbols and symbols back to strings. Indices are
/// assigned monotonically starting at 1 and are stable for the life of the
/// obarray.
///
/// # Examples
///
/// ```
/// use silt_util::Obarray;
///
/// let mut obarray = Obarray::new();
/// let foo = obarray.intern("foo");
/// let bar = obarray.intern("bar");
///
/// assert_eq!(foo.index(), 1);
/// assert_eq!(bar.index(), 2);
/// assert_eq!(obarray.intern("foo"), foo);
/// ```
pub struct Obarray {
    /// Forward map: string -> symbol.
    map: FxHashMap<Rc<str>, Symbol>,

    /// Reverse table: `strings[index - 1]` is the text of symbol `index`.
    strings: Vec<Rc<str>>,

    /// Lookups that found an existing entry.
    hits: usize,

    /// Lookups that allocated a new entry.
    misses: usize,
}

impl Obarray {
    /// Create an empty obarray.
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Intern a string, returning its symbol.
    ///
    /// Returns the existing symbol if `name` was interned before, otherwise
    /// assigns the next dense index. Indices start at 1.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&sym) = self.map.get(name) {
            self.hits += 1;
            return sym;
        }

        self.misses += 1;
        let text: Rc<str> = Rc::from(name);
        self.strings.push(Rc::clone(&text));
        let sym = Symbol::new(self.strings.len() as u32);
        self.map.insert(text, sym);
        sym
    }

    /// Look up the text of a symbol.
    ///
    /// Returns `None` only for symbols that did not come from this obarray.
    pub fn resolve(&self, sym: Symbol) -> Option<&str> {
        self.strings
            .get(sym.index() as usize - 1)
            .map(|s| s.as_ref())
    }

    /// Number of unique symbols interned so far.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// True if nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Snapshot of the intern statistics.
    pub fn stats(&self) -> InternerStats {
        InternerStats {
            count: self.strings.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

impl Default for Obarray {
    fn default() -> Self {
        Self::new()
    }
}
