//! GC Core Module - Allocation and Collection
//!
//! The collector that owns all runtime heap memory. New objects are
//! bump-allocated into the young semispace; collection proceeds in three
//! escalating stages, each triggered by the one before it:
//!
//! 1. **Minor GC** (copying): evacuates live young objects into a fresh
//!    to-space by Cheney scan, rooted in the shadow stack and the
//!    remembered set, then tenures survivors past the age threshold into
//!    the old generation.
//! 2. **Major GC** (mark-compact): marks both generations from the shadow
//!    stack and slides live objects down within their own region. Runs
//!    when tenuring had to grow the old generation.
//! 3. **Heap growth**: doubles both regions and relocates every pointer
//!    in the system through a pair of move transforms. Runs when the
//!    young semispace cannot hold an allocation even after collecting.
//!
//! ## States
//!
//! The young generation is either *idle* (`young_to` absent; allocation
//! and growth permitted) or *copying* (`young_to` present; only the
//! Cheney scan and root fixup may run). Growing while copying would have
//! to relocate a half-built to-space, so it is a fatal precondition
//! violation.
//!
//! ## Mutator contract
//!
//! Any `alloc` call may move any heap object. A local that holds a heap
//! pointer across an allocation must be registered with
//! [`Gc::preserve`] so the collector can update it in place, and any
//! store of a young pointer into an old object must be followed by
//! [`Gc::write_barrier`] on the parent.

use std::ptr;

use crate::config::GcConfig;
use crate::error::Result;
use crate::heap::{MoveTransform, Region};
use crate::object::layout;
use crate::object::walker::{any_field, for_each_field};
use crate::object::{ObjKind, ObjRef, GC_ALIGNMENT, HEADER_SIZE};
use crate::remset::RememberedSet;
use crate::roots::ShadowStack;
use crate::stats::GcStats;
use crate::value::Value;

/// The generational garbage collector.
pub struct Gc {
    /// Young semispace currently in use for allocation.
    young_from: Region,
    /// Young to-space; present exactly while a minor collection copies.
    young_to: Option<Region>,
    /// Old generation, filled by tenuring and compacted in place.
    old: Region,
    /// Registered mutator root cells.
    roots: ShadowStack,
    /// Old objects that may reference young objects.
    remset: RememberedSet,
    config: GcConfig,
    stats: GcStats,
}

impl Gc {
    /// Create a collector with the given configuration.
    pub fn new(config: GcConfig) -> Result<Gc> {
        config.validate()?;
        let young_from = Region::new(config.young_size, "young semispace");
        let old = Region::new(config.old_size, "old generation");
        let roots = ShadowStack::new(config.root_capacity);
        log::debug!(
            "gc init: young {} bytes, old {} bytes",
            config.young_size,
            config.old_size
        );
        Ok(Gc {
            young_from,
            young_to: None,
            old,
            roots,
            remset: RememberedSet::new(),
            config,
            stats: GcStats::default(),
        })
    }

    // === Allocation ===

    /// Allocate an object of `kind` with room for `payload_bytes` of
    /// payload. The payload is zeroed, so tagged fields read as nil.
    ///
    /// May run any number of collections; every raw heap pointer not held
    /// through a preserved cell is invalid after this returns.
    pub fn alloc(&mut self, kind: ObjKind, payload_bytes: usize) -> Value {
        let size = layout::alloc_size(payload_bytes);

        if let Some(addr) = self.young_from.bump(size) {
            return self.finish_alloc(addr, kind, size);
        }

        let old_grew = self.collect_minor();
        if old_grew {
            self.collect_major();
        }

        // Grow until the semispace has capacity for the request.
        loop {
            if let Some(addr) = self.young_from.bump(size) {
                return self.finish_alloc(addr, kind, size);
            }
            self.grow_heap();
        }
    }

    fn finish_alloc(&mut self, addr: usize, kind: ObjKind, size: usize) -> Value {
        self.stats.bytes_allocated += size as u64;
        let obj = ObjRef::from_addr(addr);
        unsafe {
            obj.init_header(kind, size);
            ptr::write_bytes((addr + HEADER_SIZE) as *mut u8, 0, size - HEADER_SIZE);
        }
        Value::Ptr(obj)
    }

    // === Typed allocation helpers ===
    //
    // These size the request from the element count and initialize the
    // count field the walker iterates by.

    pub fn alloc_bigint(&mut self, digits: usize) -> Value {
        let value = self.alloc(ObjKind::Bigint, layout::bigint_bytes(digits));
        if let Value::Ptr(obj) = value {
            unsafe { (*obj.bigint()).len = digits };
        }
        value
    }

    pub fn alloc_rational(&mut self) -> Value {
        self.alloc(ObjKind::Rational, layout::rational_bytes())
    }

    pub fn alloc_complex(&mut self) -> Value {
        self.alloc(ObjKind::Complex, layout::complex_bytes())
    }

    pub fn alloc_pair(&mut self) -> Value {
        self.alloc(ObjKind::Pair, layout::pair_bytes())
    }

    pub fn alloc_vector(&mut self, len: usize) -> Value {
        let value = self.alloc(ObjKind::Vector, layout::vector_bytes(len));
        if let Value::Ptr(obj) = value {
            unsafe { (*obj.vector()).len = len };
        }
        value
    }

    pub fn alloc_bytevector(&mut self, len: usize) -> Value {
        let value = self.alloc(ObjKind::Bytevector, layout::bytevector_bytes(len));
        if let Value::Ptr(obj) = value {
            unsafe { (*obj.bytevector()).len = len };
        }
        value
    }

    pub fn alloc_string(&mut self, len: usize) -> Value {
        let value = self.alloc(ObjKind::String, layout::string_bytes(len));
        if let Value::Ptr(obj) = value {
            unsafe { (*obj.string()).len = len };
        }
        value
    }

    pub fn alloc_environment(&mut self, bindings: usize) -> Value {
        let value = self.alloc(ObjKind::Environment, layout::environment_bytes(bindings));
        if let Value::Ptr(obj) = value {
            unsafe { (*obj.environment()).len = bindings };
        }
        value
    }

    pub fn alloc_activation_record(&mut self, values: usize) -> Value {
        let value = self.alloc(
            ObjKind::ActivationRecord,
            layout::activation_record_bytes(values),
        );
        if let Value::Ptr(obj) = value {
            unsafe { (*obj.activation_record()).len = values };
        }
        value
    }

    pub fn alloc_procedure(&mut self) -> Value {
        self.alloc(ObjKind::Procedure, layout::procedure_bytes())
    }

    pub fn alloc_macro(&mut self, transformers: usize) -> Value {
        let value = self.alloc(ObjKind::Macro, layout::macro_bytes(transformers));
        if let Value::Ptr(obj) = value {
            unsafe { (*obj.macro_payload()).len = transformers };
        }
        value
    }

    pub fn alloc_transformer(&mut self) -> Value {
        self.alloc(ObjKind::Transformer, layout::transformer_bytes())
    }

    pub fn alloc_struct(&mut self, type_id: u64, fields: usize) -> Value {
        let value = self.alloc(ObjKind::Struct, layout::struct_bytes(fields));
        if let Value::Ptr(obj) = value {
            unsafe {
                (*obj.struct_payload()).type_id = type_id;
                (*obj.struct_payload()).len = fields;
            }
        }
        value
    }

    pub fn alloc_code(&mut self, instructions: usize) -> Value {
        let value = self.alloc(ObjKind::Code, layout::code_bytes(instructions));
        if let Value::Ptr(obj) = value {
            unsafe { (*obj.code()).len = instructions };
        }
        value
    }

    // === Roots ===

    /// Register a root cell; the collector updates it in place when the
    /// referent moves. The cell must stay valid until released.
    pub fn preserve(&mut self, cell: *mut Value) {
        self.roots.preserve(cell);
    }

    /// Unregister the `count` most recently preserved cells.
    pub fn release(&mut self, count: usize) {
        self.roots.release(count);
    }

    /// Run `f` with `cells` preserved, releasing them afterwards. Keeps
    /// preserve/release balanced for a scope.
    pub fn with_roots<R>(&mut self, cells: &[*mut Value], f: impl FnOnce(&mut Gc) -> R) -> R {
        for &cell in cells {
            self.roots.preserve(cell);
        }
        let result = f(&mut *self);
        self.roots.release(cells.len());
        result
    }

    // === Write barrier ===

    /// Record that `parent` may now hold a young pointer. Must be called
    /// after any field store that creates an old-to-young edge; calling it
    /// for stores that do not is allowed and cheap.
    pub fn write_barrier(&mut self, parent: ObjRef) {
        if self.old.contains(parent.addr()) {
            self.remset.insert(parent);
        }
    }

    // === Queries ===

    pub fn is_young(&self, obj: ObjRef) -> bool {
        self.young_from.contains(obj.addr())
    }

    pub fn is_old(&self, obj: ObjRef) -> bool {
        self.old.contains(obj.addr())
    }

    pub fn young_capacity(&self) -> usize {
        self.young_from.capacity()
    }

    pub fn young_used(&self) -> usize {
        self.young_from.used()
    }

    pub fn old_capacity(&self) -> usize {
        self.old.capacity()
    }

    pub fn old_used(&self) -> usize {
        self.old.used()
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    pub fn remset_len(&self) -> usize {
        self.remset.len()
    }

    pub fn remset_contains(&self, parent: ObjRef) -> bool {
        self.remset.contains(parent)
    }

    pub fn stats(&self) -> &GcStats {
        &self.stats
    }

    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    fn is_young_value(&self, value: Value) -> bool {
        matches!(value, Value::Ptr(obj) if self.young_from.contains(obj.addr()))
    }

    // === Minor collection ===

    /// Evacuate a value's referent into the to-space.
    ///
    /// Non-pointers and pointers outside the from-space pass through.
    /// Already-moved referents resolve to their forwarding address; fresh
    /// ones are bump-copied, stamped with forwarding, and the rewritten
    /// value is returned.
    fn copy_young(&mut self, value: Value) -> Value {
        let Value::Ptr(obj) = value else { return value };
        if !self.young_from.contains(obj.addr()) {
            return value;
        }
        unsafe {
            if obj.is_moved() {
                return Value::Ptr(obj.forward());
            }
            let size = obj.size();
            let to = match self.young_to.as_mut() {
                Some(to) => to,
                None => crate::fatal!("gc_copy outside of the copying state"),
            };
            let dst = match to.bump(size) {
                Some(dst) => dst,
                // The to-space matches the from-space capacity, so this is
                // only reachable through a corrupted size field.
                None => crate::fatal!("to-space exhausted copying an object of {size} bytes"),
            };
            ptr::copy_nonoverlapping(obj.addr() as *const u8, dst as *mut u8, size);
            let target = ObjRef::from_addr(dst);
            obj.set_moved(true);
            obj.set_forward(target);
            Value::Ptr(target)
        }
    }

    /// Run a minor (copying) collection.
    ///
    /// Returns true if tenuring had to grow the old generation, in which
    /// case the caller follows up with a major collection.
    pub fn collect_minor(&mut self) -> bool {
        if self.young_to.is_some() {
            crate::fatal!("minor collection requested while a to-space is active");
        }
        self.stats.minor_collections += 1;
        log::debug!(
            "minor GC: young {}/{} bytes, {} roots, {} remembered",
            self.young_from.used(),
            self.young_from.capacity(),
            self.roots.len(),
            self.remset.len()
        );

        // Enter the copying state.
        self.young_to = Some(Region::new(self.young_from.capacity(), "minor GC to-space"));

        // Evacuate the shadow-stack roots.
        for i in 0..self.roots.len() {
            let cell = self.roots.get(i);
            unsafe { *cell = self.copy_young(*cell) };
        }

        // Evacuate referents of remembered old objects. Entries whose
        // object no longer reaches the young generation are pruned; the
        // snapshot makes removal safe mid-walk.
        for parent in self.remset.entries() {
            let has_young = unsafe { any_field(parent, |v| self.is_young_value(v)) };
            if !has_young {
                self.remset.remove(parent);
                continue;
            }
            unsafe { for_each_field(parent, |field| *field = self.copy_young(*field)) };
        }

        // Cheney scan: walk the to-space, aging each survivor and copying
        // whatever its fields still reach in the from-space. The scan
        // frontier chases the allocation frontier until no gray objects
        // remain.
        let mut scan = 0usize;
        loop {
            let (start, used) = match self.young_to.as_ref() {
                Some(to) => (to.start(), to.used()),
                None => crate::fatal!("minor GC scan without an active to-space"),
            };
            if scan >= used {
                break;
            }
            let obj = ObjRef::from_addr(start + scan);
            unsafe {
                obj.bump_age();
                for_each_field(obj, |field| *field = self.copy_young(*field));
                scan += obj.size();
            }
        }

        // Swap semispaces; the from-space is freed and the to-space
        // becomes the new from-space. The copying state ends here, which
        // is what makes growth legal during tenuring below.
        let to = match self.young_to.take() {
            Some(to) => to,
            None => crate::fatal!("minor GC swap without an active to-space"),
        };
        let survivors = to.used();
        self.young_from = to;

        // Tenure survivors past the age threshold into the old
        // generation, growing it as needed.
        let mut old_grew = false;
        let tenure_watermark = self.old.used();
        let mut offset = 0usize;
        while offset < self.young_from.used() {
            let obj = ObjRef::from_addr(self.young_from.start() + offset);
            let (size, age) = unsafe { (obj.size(), obj.age()) };
            if age >= self.config.tenure_threshold {
                while self.old.remaining() < size {
                    old_grew = true;
                    self.grow_heap();
                }
                // Growth moves both regions; re-derive the object from its
                // offset before copying.
                let src = ObjRef::from_addr(self.young_from.start() + offset);
                let dst = match self.old.bump(size) {
                    Some(dst) => dst,
                    None => crate::fatal!("old generation exhausted after growth"),
                };
                unsafe {
                    ptr::copy_nonoverlapping(src.addr() as *const u8, dst as *mut u8, size);
                    src.set_moved(true);
                    src.set_forward(ObjRef::from_addr(dst));
                }
                self.stats.bytes_promoted += size as u64;
                self.stats.objects_promoted += 1;
            }
            offset += size;
        }

        // Resolve the forwarding left behind by tenuring: the shadow
        // stack, the remembered set, the surviving young objects, and the
        // newly tenured objects themselves.
        for i in 0..self.roots.len() {
            let cell = self.roots.get(i);
            unsafe { *cell = resolve_moved(*cell) };
        }
        for parent in self.remset.entries() {
            unsafe { for_each_field(parent, |field| *field = resolve_moved(*field)) };
        }
        let mut offset = 0usize;
        while offset < self.young_from.used() {
            let obj = ObjRef::from_addr(self.young_from.start() + offset);
            unsafe {
                if !obj.is_moved() {
                    for_each_field(obj, |field| *field = resolve_moved(*field));
                }
                offset += obj.size();
            }
        }
        // A tenured object may still reference young survivors; those
        // old-to-young edges must be remembered or the next minor
        // collection would reclaim the survivors under it.
        let mut offset = tenure_watermark;
        while offset < self.old.used() {
            let obj = ObjRef::from_addr(self.old.start() + offset);
            let size = unsafe {
                for_each_field(obj, |field| *field = resolve_moved(*field));
                obj.size()
            };
            let has_young = unsafe { any_field(obj, |v| self.is_young_value(v)) };
            if has_young {
                self.remset.insert(obj);
            }
            offset += size;
        }

        log::debug!(
            "minor GC done: {survivors} bytes survive, old {}/{} bytes, old grew: {old_grew}",
            self.old.used(),
            self.old.capacity()
        );
        old_grew
    }

    // === Major collection ===

    /// Run a major (mark-compact) collection over both generations.
    ///
    /// Objects slide toward lower addresses within their own region; no
    /// object crosses generations.
    pub fn collect_major(&mut self) {
        if self.young_to.is_some() {
            crate::fatal!("major collection requested while a to-space is active");
        }
        self.stats.major_collections += 1;
        let before = self.young_from.used() + self.old.used();
        log::debug!("major GC: {before} bytes in both generations");

        unsafe {
            // Clear stale marks everywhere first.
            clear_marks(&self.young_from);
            clear_marks(&self.old);

            // Mark everything reachable from the shadow stack. The
            // worklist keeps deep structures off the native stack.
            let mut worklist: Vec<ObjRef> = Vec::new();
            for i in 0..self.roots.len() {
                if let Value::Ptr(obj) = *self.roots.get(i) {
                    worklist.push(obj);
                }
            }
            while let Some(obj) = worklist.pop() {
                if obj.is_marked() {
                    continue;
                }
                obj.set_mark(true);
                for_each_field(obj, |field| {
                    if let Value::Ptr(child) = *field {
                        worklist.push(child);
                    }
                });
            }

            // Assign each marked object its slide destination.
            let young_live = compute_forwarding(&self.young_from);
            let old_live = compute_forwarding(&self.old);

            // Rewrite all pointers to the destinations, roots included.
            // Both regions' forwarding must exist before either is
            // rewritten because fields cross regions freely.
            rewrite_marked_fields(&self.young_from);
            rewrite_marked_fields(&self.old);
            for i in 0..self.roots.len() {
                let cell = self.roots.get(i);
                if let Value::Ptr(obj) = *cell {
                    *cell = Value::Ptr(obj.forward());
                }
            }

            // Slide, clearing marks as objects land.
            slide_marked(&self.young_from);
            slide_marked(&self.old);

            self.young_from.set_used(young_live);
            self.old.set_used(old_live);
        }

        // Compaction moved every old-to-young edge; rebuild the
        // remembered set from the compacted old generation so the next
        // minor collection sees the surviving edges.
        self.remset.clear();
        let mut offset = 0usize;
        while offset < self.old.used() {
            let obj = ObjRef::from_addr(self.old.start() + offset);
            let has_young = unsafe { any_field(obj, |v| self.is_young_value(v)) };
            if has_young {
                self.remset.insert(obj);
            }
            offset += unsafe { obj.size() };
        }

        let after = self.young_from.used() + self.old.used();
        self.stats.bytes_reclaimed += (before - after) as u64;
        log::debug!("major GC done: {before} -> {after} live bytes");
    }

    // === Heap growth ===

    /// Double both regions and relocate every pointer in the system.
    ///
    /// Each pointer runs through the young move transform and then the old
    /// one; addresses outside both windows pass through. Fatal if called
    /// while a to-space is active.
    pub fn grow_heap(&mut self) {
        if self.young_to.is_some() {
            crate::fatal!("heap growth attempted while the to-space is active");
        }
        self.stats.heap_growths += 1;
        let ratio = self.config.grow_ratio;
        let new_young_capacity = self.young_from.capacity() * ratio;
        let new_old_capacity = self.old.capacity() * ratio;
        log::info!(
            "growing heap: young {} -> {} bytes, old {} -> {} bytes",
            self.young_from.capacity(),
            new_young_capacity,
            self.old.capacity(),
            new_old_capacity
        );

        let mut new_young = Region::new(new_young_capacity, "young semispace growth");
        let mut new_old = Region::new(new_old_capacity, "old generation growth");

        unsafe {
            ptr::copy_nonoverlapping(
                self.young_from.start() as *const u8,
                new_young.start() as *mut u8,
                self.young_from.used(),
            );
            ptr::copy_nonoverlapping(
                self.old.start() as *const u8,
                new_old.start() as *mut u8,
                self.old.used(),
            );
        }
        new_young.set_used(self.young_from.used());
        new_old.set_used(self.old.used());

        let young_move = MoveTransform::new(
            self.young_from.start(),
            new_young.start(),
            self.young_from.capacity(),
        );
        let old_move = MoveTransform::new(self.old.start(), new_old.start(), self.old.capacity());
        let relocate = move |obj: ObjRef| old_move.apply_obj(young_move.apply_obj(obj));

        // Install the new regions; the old buffers are freed here. The
        // transforms only compare against the stale windows numerically.
        self.young_from = new_young;
        self.old = new_old;

        unsafe {
            relocate_region(&self.young_from, relocate);
            relocate_region(&self.old, relocate);
            for i in 0..self.roots.len() {
                let cell = self.roots.get(i);
                if let Value::Ptr(obj) = *cell {
                    *cell = Value::Ptr(relocate(obj));
                }
            }
        }
        // The remembered set is keyed by old-generation addresses, and
        // growth happens mid-tenure when it can be populated.
        self.remset.map_keys(relocate);
    }

    // === Verification ===

    /// Check the data-model invariants at a quiescent point.
    ///
    /// Panics on the first violation. For tests and debugging; never
    /// called on the production paths.
    pub fn verify_invariants(&self) {
        assert!(
            self.young_to.is_none(),
            "quiescent point reached with an active to-space"
        );
        unsafe {
            for i in 0..self.roots.len() {
                if let Value::Ptr(obj) = *self.roots.get(i) {
                    assert!(
                        self.is_young(obj) || self.is_old(obj),
                        "root {i} points outside the heap: {:#x}",
                        obj.addr()
                    );
                }
            }
            self.verify_region(&self.young_from, "young");
            self.verify_region(&self.old, "old");
        }
    }

    unsafe fn verify_region(&self, region: &Region, what: &str) {
        let mut offset = 0usize;
        while offset < region.used() {
            let obj = ObjRef::from_addr(region.start() + offset);
            assert!(
                obj.addr() % GC_ALIGNMENT == 0,
                "{what} object at {:#x} is misaligned",
                obj.addr()
            );
            assert!(
                !obj.is_marked(),
                "{what} object at {:#x} is marked outside a major GC",
                obj.addr()
            );
            // Forwarded husks awaiting the next semispace flip carry stale
            // fields by design; everything live is checked.
            if !obj.is_moved() {
                let mut has_young = false;
                for_each_field(obj, |field| {
                    if let Value::Ptr(child) = *field {
                        assert!(
                            self.is_young(child) || self.is_old(child),
                            "{what} object at {:#x} references {:#x} outside the heap",
                            obj.addr(),
                            child.addr()
                        );
                        if self.is_young(child) {
                            has_young = true;
                        }
                    }
                });
                if has_young && self.is_old(obj) {
                    assert!(
                        self.remset.contains(obj),
                        "old object at {:#x} holds a young reference but is not remembered",
                        obj.addr()
                    );
                }
            }
            offset += obj.size();
        }
    }
}

/// Rewrite a value whose referent was forwarded by tenuring.
unsafe fn resolve_moved(value: Value) -> Value {
    if let Value::Ptr(obj) = value {
        if obj.is_moved() {
            return Value::Ptr(obj.forward());
        }
    }
    value
}

unsafe fn clear_marks(region: &Region) {
    let mut offset = 0usize;
    while offset < region.used() {
        let obj = ObjRef::from_addr(region.start() + offset);
        obj.set_mark(false);
        offset += obj.size();
    }
}

/// Assign each marked object its post-slide address; returns the number
/// of live bytes the region will hold.
unsafe fn compute_forwarding(region: &Region) -> usize {
    let mut free = 0usize;
    let mut offset = 0usize;
    while offset < region.used() {
        let obj = ObjRef::from_addr(region.start() + offset);
        let size = obj.size();
        if obj.is_marked() {
            obj.set_forward(ObjRef::from_addr(region.start() + free));
            free += size;
        }
        offset += size;
    }
    free
}

unsafe fn rewrite_marked_fields(region: &Region) {
    let mut offset = 0usize;
    while offset < region.used() {
        let obj = ObjRef::from_addr(region.start() + offset);
        if obj.is_marked() {
            for_each_field(obj, |field| {
                if let Value::Ptr(child) = *field {
                    *field = Value::Ptr(child.forward());
                }
            });
        }
        offset += obj.size();
    }
}

/// Copy each marked object down to its forwarding address.
///
/// Destinations never exceed sources and the walk ascends, so later
/// sources are intact when reached; individual copies may still overlap
/// themselves, hence the memmove-style copy rather than memcpy.
unsafe fn slide_marked(region: &Region) {
    let mut offset = 0usize;
    while offset < region.used() {
        let obj = ObjRef::from_addr(region.start() + offset);
        let size = obj.size();
        if obj.is_marked() {
            let dst = obj.forward();
            ptr::copy(obj.addr() as *const u8, dst.addr() as *mut u8, size);
            dst.set_mark(false);
        }
        offset += size;
    }
}

/// Run every pointer field and forwarding address in a region through the
/// growth relocation.
unsafe fn relocate_region(region: &Region, relocate: impl Fn(ObjRef) -> ObjRef + Copy) {
    let mut offset = 0usize;
    while offset < region.used() {
        let obj = ObjRef::from_addr(region.start() + offset);
        for_each_field(obj, |field| {
            if let Value::Ptr(child) = *field {
                *field = Value::Ptr(relocate(child));
            }
        });
        // Tenured husks carry live forwarding that the resolution pass
        // still has to read.
        if obj.is_moved() {
            obj.set_forward(relocate(obj.forward()));
        }
        offset += obj.size();
    }
}
