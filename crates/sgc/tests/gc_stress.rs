//! Stress Tests - large object graphs, garbage floods, and mixed churn.

mod common;

use common::{cons, gc_with};
use sgc::object::layout;
use sgc::{Gc, GcConfig, Value};

/// A vector of a million fresh pairs, pinned only through the vector,
/// survives a minor and a major collection with every element intact.
#[test]
fn test_million_entry_vector_survives_collections() {
    let len: usize = 1_000_000;
    let mut gc = gc_with(1 << 20, 1 << 20);

    let mut vector_v = gc.alloc_vector(len);
    gc.preserve(&mut vector_v);

    for i in 0..len {
        let pair_v = gc.alloc_pair();
        unsafe { (*pair_v.as_ptr().unwrap().pair()).car = Value::Fixnum(i as i64) };

        // The allocation may have moved the vector; re-derive it from the
        // root before storing, and remember the possible old-to-young
        // edge once the vector has tenured.
        let vector = vector_v.as_ptr().unwrap();
        unsafe { *vector.vector_elems().add(i) = pair_v };
        gc.write_barrier(vector);
    }

    gc.collect_minor();
    gc.collect_major();

    let vector = vector_v.as_ptr().unwrap();
    unsafe {
        assert_eq!((*vector.vector()).len, len);
        for i in 0..len {
            let pair = (*vector.vector_elems().add(i))
                .as_ptr()
                .unwrap_or_else(|| panic!("element {i} is no longer a pointer"));
            assert_eq!(
                (*pair.pair()).car,
                Value::Fixnum(i as i64),
                "element {i} lost its contents"
            );
        }
    }
    gc.verify_invariants();
    gc.release(1);
}

/// 100 MiB of unreachable pairs: the resident heap stays bounded by the
/// (empty) live set, not by the bytes allocated.
#[test]
fn test_garbage_flood_keeps_heap_bounded() {
    let mut gc = Gc::new(GcConfig::default()).unwrap();
    let young_capacity = gc.young_capacity();
    let old_capacity = gc.old_capacity();

    let per_pair = layout::alloc_size(layout::pair_bytes());
    let total: usize = 100 * 1024 * 1024;
    for _ in 0..total / per_pair {
        gc.alloc_pair();
    }

    assert!(gc.stats().bytes_allocated as usize >= total - per_pair);
    assert_eq!(
        gc.young_capacity(),
        young_capacity,
        "garbage alone must never grow the young generation"
    );
    assert_eq!(gc.old_capacity(), old_capacity);
    assert_eq!(gc.old_used(), 0, "garbage must never tenure");
    assert!(gc.stats().minor_collections > 0);

    gc.collect_minor();
    assert_eq!(gc.young_used(), 0);
    gc.verify_invariants();
}

/// Mixed churn: rooted slots gain and lose chains while collections of
/// both kinds interleave. Invariants are checked throughout and every
/// surviving chain is verified at the end.
#[test]
fn test_mixed_churn_with_periodic_major_collections() {
    const SLOTS: usize = 64;
    const STEPS: u64 = 20_000;

    let mut gc = gc_with(64 * 1024, 128 * 1024);
    let mut slots = Box::new([Value::Nil; SLOTS]);
    for cell in slots.iter_mut() {
        gc.preserve(cell as *mut Value);
    }

    // Deterministic xorshift so failures reproduce.
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut rand = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    for step in 0..STEPS {
        let roll = rand();
        let slot = (roll % SLOTS as u64) as usize;
        match roll % 4 {
            // Push a pair onto the slot's chain, tagged with the slot id.
            0..=1 => slots[slot] = cons(&mut gc, Value::Fixnum(slot as i64), slots[slot]),
            // Drop a whole chain.
            2 => slots[slot] = Value::Nil,
            // Drop the tail of a chain.
            _ => {
                if let Value::Ptr(obj) = slots[slot] {
                    unsafe { (*obj.pair()).cdr = Value::Nil };
                }
            }
        }

        if step % 4096 == 0 {
            gc.collect_major();
            gc.verify_invariants();
        }
    }

    gc.verify_invariants();
    for (slot, value) in slots.iter().enumerate() {
        let mut cursor = *value;
        while let Value::Ptr(obj) = cursor {
            unsafe {
                assert_eq!(
                    (*obj.pair()).car,
                    Value::Fixnum(slot as i64),
                    "slot {slot} chain corrupted"
                );
                cursor = (*obj.pair()).cdr;
            }
        }
    }
    gc.release(SLOTS);
}
