//! Scalar key types.
//!
//! A container is monomorphic in its key type, so the type tag that
//! classifies its keys ([`ScalarKind`]) is fixed by the key type itself.
//! Integer, double and byte-string keys carry a natural order and hash
//! ([`NaturalKey`]); opaque references do not, and containers keyed by them
//! must be built with an explicit comparator or hasher.

use std::cmp::Ordering;
use std::fmt;

use crate::hash::hash_bytes;

/// Type tag shared by every key of one container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Signed integer
    Int,
    /// Double-precision float
    Double,
    /// Byte string
    Str,
    /// Opaque, non-owning reference
    Ref,
}

impl ScalarKind {
    /// Single-letter code: `i`, `d`, `s` or `p`.
    pub fn code(self) -> char {
        match self {
            Self::Int => 'i',
            Self::Double => 'd',
            Self::Str => 's',
            Self::Ref => 'p',
        }
    }

    /// Inverse of [`ScalarKind::code`].
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'i' => Some(Self::Int),
            'd' => Some(Self::Double),
            's' => Some(Self::Str),
            'p' => Some(Self::Ref),
            _ => None,
        }
    }

    /// Whether keys of this kind have a default comparator and hash.
    pub fn has_natural_order(self) -> bool {
        !matches!(self, Self::Ref)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::Str => "string",
            Self::Ref => "reference",
        };
        f.write_str(name)
    }
}

/// A reference the container stores and compares but never owns or
/// dereferences. Keeping the referent alive is the caller's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpaqueRef(usize);

impl OpaqueRef {
    /// Capture the address of `value`.
    pub fn of<T: ?Sized>(value: &T) -> Self {
        Self(value as *const T as *const () as usize)
    }

    /// Wrap a raw handle (an address, an index into caller storage, ...).
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// The stored handle.
    pub const fn addr(self) -> usize {
        self.0
    }
}

/// A type usable as a container key.
pub trait Scalar {
    /// Tag reported by containers keyed by this type.
    const KIND: ScalarKind;
}

/// A key type with a default comparator and hash.
///
/// `natural_cmp` and `natural_hash` must agree: keys comparing `Equal` hash
/// the same.
pub trait NaturalKey: Scalar {
    /// Default total order.
    fn natural_cmp(&self, other: &Self) -> Ordering;

    /// Default hash of the key's bytes.
    fn natural_hash(&self) -> u64;
}

impl Scalar for i32 {
    const KIND: ScalarKind = ScalarKind::Int;
}

impl NaturalKey for i32 {
    #[inline]
    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    #[inline]
    fn natural_hash(&self) -> u64 {
        hash_bytes(&self.to_le_bytes())
    }
}

impl Scalar for i64 {
    const KIND: ScalarKind = ScalarKind::Int;
}

impl NaturalKey for i64 {
    #[inline]
    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    #[inline]
    fn natural_hash(&self) -> u64 {
        hash_bytes(&self.to_le_bytes())
    }
}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::Double;
}

// IEEE total order: -0.0 < 0.0 and NaNs are ordered, which keeps equality
// consistent with hashing the bit pattern.
impl NaturalKey for f64 {
    #[inline]
    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    #[inline]
    fn natural_hash(&self) -> u64 {
        hash_bytes(&self.to_bits().to_le_bytes())
    }
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::Str;
}

impl NaturalKey for String {
    #[inline]
    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }

    #[inline]
    fn natural_hash(&self) -> u64 {
        hash_bytes(self.as_bytes())
    }
}

impl Scalar for Vec<u8> {
    const KIND: ScalarKind = ScalarKind::Str;
}

impl NaturalKey for Vec<u8> {
    #[inline]
    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }

    #[inline]
    fn natural_hash(&self) -> u64 {
        hash_bytes(self)
    }
}

impl Scalar for OpaqueRef {
    const KIND: ScalarKind = ScalarKind::Ref;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_round_trip() {
        for kind in [
            ScalarKind::Int,
            ScalarKind::Double,
            ScalarKind::Str,
            ScalarKind::Ref,
        ] {
            assert_eq!(ScalarKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ScalarKind::from_code('x'), None);
    }

    #[test]
    fn test_natural_order_flags() {
        assert!(ScalarKind::Int.has_natural_order());
        assert!(ScalarKind::Str.has_natural_order());
        assert!(!ScalarKind::Ref.has_natural_order());
        assert_eq!(<OpaqueRef as Scalar>::KIND, ScalarKind::Ref);
        assert_eq!(<Vec<u8> as Scalar>::KIND, ScalarKind::Str);
    }

    #[test]
    fn test_double_total_order() {
        assert_eq!((-0.0f64).natural_cmp(&0.0), Ordering::Less);
        assert_eq!(f64::NAN.natural_cmp(&f64::NAN), Ordering::Equal);
        assert_eq!(1.5f64.natural_cmp(&2.5), Ordering::Less);
        assert_ne!((-0.0f64).natural_hash(), 0.0f64.natural_hash());
    }

    #[test]
    fn test_string_byte_order() {
        let a = "apple".to_string();
        let b = "apples".to_string();
        let upper = "Zebra".to_string();
        assert_eq!(a.natural_cmp(&b), Ordering::Less);
        assert_eq!(upper.natural_cmp(&a), Ordering::Less);
        assert_eq!(a.natural_hash(), crate::hash::hash_str("apple"));
    }

    #[test]
    fn test_opaque_ref_identity() {
        let x = 5u32;
        let y = 5u32;
        assert_eq!(OpaqueRef::of(&x), OpaqueRef::of(&x));
        assert_ne!(OpaqueRef::of(&x), OpaqueRef::of(&y));
        assert_eq!(OpaqueRef::from_raw(42).addr(), 42);
    }

    #[test]
    fn test_display() {
        assert_eq!(ScalarKind::Double.to_string(), "double");
        assert_eq!(ScalarKind::Ref.to_string(), "reference");
    }
}
