//! Object Header - Metadata for GC-managed objects
//!
//! Object Header Layout (24 bytes on 64-bit):
//! ┌─────────────────────────────────────────┐
//! │  Kind tag (4 bytes, raw u32)            │
//! │  Age (1 byte)                           │
//! │  Mark (1 byte, major GC only)           │
//! │  Moved (1 byte, forwarding valid)       │
//! │  (1 byte padding)                       │
//! ├─────────────────────────────────────────┤
//! │  Size (8 bytes, aligned, incl. header)  │
//! ├─────────────────────────────────────────┤
//! │  Forward (8 bytes, address of copy)     │
//! └─────────────────────────────────────────┘
//!
//! The kind is stored as a raw `u32` rather than the enum so that a
//! corrupted heap produces a diagnosable abort in [`ObjRef::kind`] instead
//! of undefined behavior at the load.
//!
//! `mark` is meaningful only inside a major collection and is clear at
//! every quiescent point. `forward` is scratch: it is valid while `moved`
//! is set, or transiently during mark-compact address computation, and
//! consumers must not rely on it between collections.

use std::mem;

use static_assertions::const_assert_eq;

/// Alignment of every object address and allocation size, equal to the
/// platform's widest integer alignment.
pub const GC_ALIGNMENT: usize = mem::align_of::<u64>();

/// Size of the object header in bytes
pub const HEADER_SIZE: usize = mem::size_of::<ObjHeader>();

const_assert_eq!(HEADER_SIZE % GC_ALIGNMENT, 0);
const_assert_eq!(mem::align_of::<ObjHeader>(), GC_ALIGNMENT);

/// Heap object kinds
///
/// Discriminants start at 1; a zeroed header byte range is therefore never
/// a valid object, which makes walking into uninitialized memory fail fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ObjKind {
    Bigint = 1,
    Rational,
    Complex,
    Pair,
    Vector,
    Bytevector,
    String,
    Environment,
    ActivationRecord,
    Procedure,
    Macro,
    Transformer,
    Struct,
    Code,
}

impl ObjKind {
    /// Decode a raw kind tag. Returns `None` for anything that is not a
    /// known kind.
    pub fn from_raw(raw: u32) -> Option<ObjKind> {
        match raw {
            1 => Some(ObjKind::Bigint),
            2 => Some(ObjKind::Rational),
            3 => Some(ObjKind::Complex),
            4 => Some(ObjKind::Pair),
            5 => Some(ObjKind::Vector),
            6 => Some(ObjKind::Bytevector),
            7 => Some(ObjKind::String),
            8 => Some(ObjKind::Environment),
            9 => Some(ObjKind::ActivationRecord),
            10 => Some(ObjKind::Procedure),
            11 => Some(ObjKind::Macro),
            12 => Some(ObjKind::Transformer),
            13 => Some(ObjKind::Struct),
            14 => Some(ObjKind::Code),
            _ => None,
        }
    }
}

/// Object header
///
/// Every heap object starts with this header. Field accesses go through
/// [`ObjRef`] so that call sites read as operations on the object.
#[repr(C)]
pub struct ObjHeader {
    /// Raw kind tag, decoded via [`ObjKind::from_raw`]
    pub kind: u32,
    /// Tenure counter: minor collections survived
    pub age: u8,
    /// Liveness bit used only during major GC
    pub mark: bool,
    /// Set when the object has been forwarded
    pub moved: bool,
    padding: u8,
    /// Total size in bytes, header included, `GC_ALIGNMENT`-aligned
    pub size: usize,
    /// Address of the post-move copy; valid while `moved` is set or during
    /// mark-compact address computation
    pub forward: usize,
}

/// Handle to a heap object: its address in one of the GC regions.
///
/// `ObjRef` is a plain address, not a borrow. Every accessor is `unsafe`
/// because nothing ties the handle's validity to the region it points
/// into; the collector is the arbiter of which addresses are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjRef(usize);

impl ObjRef {
    /// Construct a handle from a raw address.
    #[inline]
    pub fn from_addr(addr: usize) -> Self {
        ObjRef(addr)
    }

    /// The object's address.
    #[inline]
    pub fn addr(self) -> usize {
        self.0
    }

    /// Address of the payload, just past the header.
    #[inline]
    pub fn payload(self) -> usize {
        self.0 + HEADER_SIZE
    }

    #[inline]
    fn header(self) -> *mut ObjHeader {
        self.0 as *mut ObjHeader
    }

    /// Initialize the header of a freshly allocated object.
    ///
    /// # Safety
    /// `self` must point to at least `size` writable bytes.
    pub unsafe fn init_header(self, kind: ObjKind, size: usize) {
        let h = self.header();
        (*h).kind = kind as u32;
        (*h).age = 0;
        (*h).mark = false;
        (*h).moved = false;
        (*h).padding = 0;
        (*h).size = size;
        (*h).forward = 0;
    }

    /// The object's kind. Aborts on a tag no kind decodes to, which can
    /// only happen through heap corruption.
    ///
    /// # Safety
    /// `self` must point to a live object header.
    pub unsafe fn kind(self) -> ObjKind {
        let raw = (*self.header()).kind;
        match ObjKind::from_raw(raw) {
            Some(kind) => kind,
            None => crate::fatal!("object walker: unknown object kind {raw} at {:#x}", self.0),
        }
    }

    /// Total size in bytes, header included.
    ///
    /// # Safety
    /// `self` must point to a live object header.
    #[inline]
    pub unsafe fn size(self) -> usize {
        (*self.header()).size
    }

    /// # Safety
    /// `self` must point to a live object header.
    #[inline]
    pub unsafe fn age(self) -> u8 {
        (*self.header()).age
    }

    /// Bump the tenure counter, saturating so a long-lived young object
    /// can never wrap back below the threshold.
    ///
    /// # Safety
    /// `self` must point to a live object header.
    #[inline]
    pub unsafe fn bump_age(self) {
        let h = self.header();
        (*h).age = (*h).age.saturating_add(1);
    }

    /// # Safety
    /// `self` must point to a live object header.
    #[inline]
    pub unsafe fn is_marked(self) -> bool {
        (*self.header()).mark
    }

    /// # Safety
    /// `self` must point to a live object header.
    #[inline]
    pub unsafe fn set_mark(self, mark: bool) {
        (*self.header()).mark = mark;
    }

    /// # Safety
    /// `self` must point to a live object header.
    #[inline]
    pub unsafe fn is_moved(self) -> bool {
        (*self.header()).moved
    }

    /// # Safety
    /// `self` must point to a live object header.
    #[inline]
    pub unsafe fn set_moved(self, moved: bool) {
        (*self.header()).moved = moved;
    }

    /// The forwarding address.
    ///
    /// # Safety
    /// `self` must point to a live object header whose `forward` field has
    /// been written this collection.
    #[inline]
    pub unsafe fn forward(self) -> ObjRef {
        ObjRef((*self.header()).forward)
    }

    /// # Safety
    /// `self` must point to a live object header.
    #[inline]
    pub unsafe fn set_forward(self, target: ObjRef) {
        (*self.header()).forward = target.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Back an object with an ordinary aligned allocation for header tests.
    fn test_object(size: usize) -> (Vec<u64>, ObjRef) {
        let mut words = vec![0u64; size / 8 + 1];
        let obj = ObjRef::from_addr(words.as_mut_ptr() as usize);
        (words, obj)
    }

    #[test]
    fn test_header_size_constant() {
        assert_eq!(HEADER_SIZE, 24);
    }

    #[test]
    fn test_kind_roundtrip() {
        for raw in 1..=14 {
            let kind = ObjKind::from_raw(raw).unwrap();
            assert_eq!(kind as u32, raw);
        }
        assert_eq!(ObjKind::from_raw(0), None);
        assert_eq!(ObjKind::from_raw(15), None);
        assert_eq!(ObjKind::from_raw(u32::MAX), None);
    }

    #[test]
    fn test_init_header() {
        let (_backing, obj) = test_object(64);
        unsafe {
            obj.init_header(ObjKind::Pair, 64);
            assert_eq!(obj.kind(), ObjKind::Pair);
            assert_eq!(obj.size(), 64);
            assert_eq!(obj.age(), 0);
            assert!(!obj.is_marked());
            assert!(!obj.is_moved());
        }
    }

    #[test]
    fn test_age_saturates() {
        let (_backing, obj) = test_object(64);
        unsafe {
            obj.init_header(ObjKind::Pair, 64);
            for _ in 0..300 {
                obj.bump_age();
            }
            assert_eq!(obj.age(), u8::MAX);
        }
    }

    #[test]
    fn test_mark_and_moved_flags() {
        let (_backing, obj) = test_object(64);
        unsafe {
            obj.init_header(ObjKind::Vector, 64);

            obj.set_mark(true);
            assert!(obj.is_marked());
            obj.set_mark(false);
            assert!(!obj.is_marked());

            obj.set_moved(true);
            obj.set_forward(ObjRef::from_addr(0x5000));
            assert!(obj.is_moved());
            assert_eq!(obj.forward().addr(), 0x5000);
        }
    }

    #[test]
    fn test_payload_offset() {
        let obj = ObjRef::from_addr(0x1000);
        assert_eq!(obj.payload(), 0x1000 + HEADER_SIZE);
    }
}
