//! Shared fixtures and helpers for the SGC integration suites.
#![allow(dead_code)]

use sgc::{Gc, GcConfig, Value};

/// Young semispace size for tests that want frequent collections.
pub const SMALL_YOUNG: usize = 64 * 1024;

/// Collector with a small heap so collections trigger quickly.
pub fn small_gc() -> Gc {
    gc_with(SMALL_YOUNG, 2 * SMALL_YOUNG)
}

/// Collector with explicit region sizes.
pub fn gc_with(young: usize, old: usize) -> Gc {
    let _ = env_logger::builder().is_test(true).try_init();
    Gc::new(GcConfig {
        young_size: young,
        old_size: old,
        ..Default::default()
    })
    .expect("test configuration should be valid")
}

/// Allocate a pair with the given car and cdr.
///
/// Both arguments are rooted across the allocation, so they may be heap
/// pointers and the allocation may collect.
pub fn cons(gc: &mut Gc, car: Value, cdr: Value) -> Value {
    let mut car = car;
    let mut cdr = cdr;
    gc.preserve(&mut car);
    gc.preserve(&mut cdr);
    let value = gc.alloc_pair();
    gc.release(2);
    let obj = value.as_ptr().expect("alloc_pair returns a pointer");
    unsafe {
        (*obj.pair()).car = car;
        (*obj.pair()).cdr = cdr;
    }
    value
}

/// Build a cdr-linked chain of `len` pairs. The head pair's car is
/// `len - 1`, counting down to 0 at the tail.
///
/// The returned head is not rooted; preserve it before the next
/// allocation.
pub fn build_chain(gc: &mut Gc, len: i64) -> Value {
    let mut head = Value::Nil;
    gc.preserve(&mut head);
    for i in 0..len {
        head = cons(gc, Value::Fixnum(i), head);
    }
    gc.release(1);
    head
}

/// Number of pairs reachable through cdr links from `head`.
///
/// # Safety
/// Every pointer in the chain must be a live pair.
pub unsafe fn chain_length(head: Value) -> usize {
    let mut count = 0;
    let mut cursor = head;
    while let Value::Ptr(obj) = cursor {
        count += 1;
        cursor = (*obj.pair()).cdr;
    }
    count
}

/// Assert a chain built by [`build_chain`] is intact: `len` pairs with
/// cars counting down from `len - 1`.
///
/// # Safety
/// Every pointer in the chain must be a live pair.
#[track_caller]
pub unsafe fn verify_chain(head: Value, len: i64) {
    let mut expected = len - 1;
    let mut cursor = head;
    while let Value::Ptr(obj) = cursor {
        assert_eq!(
            (*obj.pair()).car,
            Value::Fixnum(expected),
            "chain car mismatch {} links from the head",
            len - 1 - expected
        );
        cursor = (*obj.pair()).cdr;
        expected -= 1;
    }
    assert_eq!(expected, -1, "chain ended early: expected {len} pairs");
}

/// Snapshot of a chain as (address, car) pairs, for byte-stability
/// comparisons across collections.
///
/// # Safety
/// Every pointer in the chain must be a live pair.
pub unsafe fn snapshot_chain(head: Value) -> Vec<(usize, Value)> {
    let mut snapshot = Vec::new();
    let mut cursor = head;
    while let Value::Ptr(obj) = cursor {
        snapshot.push((obj.addr(), (*obj.pair()).car));
        cursor = (*obj.pair()).cdr;
    }
    snapshot
}

/// Assert that a value is a heap pointer into one of the live regions.
#[track_caller]
pub fn assert_in_heap(gc: &Gc, value: Value, context: &str) {
    let obj = value
        .as_ptr()
        .unwrap_or_else(|| panic!("{context}: expected a heap pointer, got {value:?}"));
    assert!(
        gc.is_young(obj) || gc.is_old(obj),
        "{context}: address {:#x} is outside both generations",
        obj.addr()
    );
}
