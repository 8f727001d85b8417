//! Object walker - the single policy table over pointer-bearing fields.
//!
//! Every collector phase that needs to see an object's tagged fields
//! (copying referents, marking, rewriting forwarded pointers, probing for
//! young references, relocating after growth) goes through [`walk_fields`]
//! with a different operation. The table lives in exactly one place so a
//! new object kind cannot be traced inconsistently.
//!
//! Scalar kinds (bigint, bytevector, string, code) expose no tagged
//! fields. Code objects do hold operand values, but the compiler only
//! emits immediates into operand slots, so code is scalar to the tracer.

use std::ops::ControlFlow;
use std::ptr::addr_of_mut;

use super::header::{ObjKind, ObjRef};
use super::layout::BATCH_FATHER_SIZE;
use crate::value::Value;

/// Apply `op` to each pointer-bearing field of `obj`, stopping early if
/// the operation breaks.
///
/// Aborts on an object whose kind tag decodes to nothing; that is heap
/// corruption.
///
/// # Safety
/// `obj` must be a live, fully initialized heap object.
pub unsafe fn walk_fields<B>(
    obj: ObjRef,
    op: &mut impl FnMut(*mut Value) -> ControlFlow<B>,
) -> ControlFlow<B> {
    match obj.kind() {
        ObjKind::Bigint | ObjKind::Bytevector | ObjKind::String | ObjKind::Code => {
            ControlFlow::Continue(())
        }
        ObjKind::Rational => {
            let p = obj.rational();
            op(addr_of_mut!((*p).numerator))?;
            op(addr_of_mut!((*p).denominator))
        }
        ObjKind::Complex => {
            let p = obj.complex();
            op(addr_of_mut!((*p).real))?;
            op(addr_of_mut!((*p).imaginary))
        }
        ObjKind::Pair => {
            let p = obj.pair();
            op(addr_of_mut!((*p).car))?;
            op(addr_of_mut!((*p).cdr))
        }
        ObjKind::Vector => {
            let len = (*obj.vector()).len;
            let elems = obj.vector_elems();
            walk_array(elems, len, op)
        }
        ObjKind::Environment => {
            let p = obj.environment();
            let fathers = addr_of_mut!((*p).fathers) as *mut Value;
            walk_array(fathers, BATCH_FATHER_SIZE, &mut *op)?;
            walk_array(obj.environment_entries(), (*p).len, op)
        }
        ObjKind::ActivationRecord => {
            let p = obj.activation_record();
            let fathers = addr_of_mut!((*p).fathers) as *mut Value;
            walk_array(fathers, BATCH_FATHER_SIZE, &mut *op)?;
            walk_array(obj.activation_record_values(), (*p).len, op)
        }
        ObjKind::Procedure => {
            let p = obj.procedure();
            op(addr_of_mut!((*p).formals))?;
            op(addr_of_mut!((*p).env))?;
            op(addr_of_mut!((*p).body))?;
            op(addr_of_mut!((*p).code))
        }
        ObjKind::Macro => {
            let len = (*obj.macro_payload()).len;
            walk_array(obj.macro_transformers(), len, op)
        }
        ObjKind::Transformer => {
            let p = obj.transformer();
            op(addr_of_mut!((*p).env))?;
            op(addr_of_mut!((*p).pattern))?;
            op(addr_of_mut!((*p).template))
        }
        ObjKind::Struct => {
            let len = (*obj.struct_payload()).len;
            walk_array(obj.struct_fields(), len, op)
        }
    }
}

unsafe fn walk_array<B>(
    base: *mut Value,
    len: usize,
    op: &mut impl FnMut(*mut Value) -> ControlFlow<B>,
) -> ControlFlow<B> {
    for i in 0..len {
        op(base.add(i))?;
    }
    ControlFlow::Continue(())
}

/// Apply `op` to every pointer-bearing field of `obj`.
///
/// # Safety
/// `obj` must be a live, fully initialized heap object.
pub unsafe fn for_each_field(obj: ObjRef, mut op: impl FnMut(*mut Value)) {
    let _ = walk_fields::<()>(obj, &mut |field| {
        op(field);
        ControlFlow::Continue(())
    });
}

/// True if `pred` holds for any tagged field of `obj`. Stops at the first
/// match.
///
/// # Safety
/// `obj` must be a live, fully initialized heap object.
pub unsafe fn any_field(obj: ObjRef, mut pred: impl FnMut(Value) -> bool) -> bool {
    walk_fields::<()>(obj, &mut |field| {
        if pred(*field) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .is_break()
}
