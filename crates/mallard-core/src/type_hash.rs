//! Deterministic hash-based type identity system.
//!
//! This module provides [`TypeHash`], a 64-bit hash that uniquely identifies
//! types and methods. Unlike sequential IDs, hashes are computed
//! deterministically from names and structure, enabling:
//!
//! - No registration order dependencies
//! - Same name = same hash across registries
//! - Single map lookups (no secondary name→id maps)
//! - Structural identity for derived types (`*T`, `[]T`) without interning
//!
//! # Hash Computation
//!
//! Uses XXHash64 with domain-specific mixing constants to prevent collisions
//! between different entity kinds (named types vs methods vs derived types).
//!
//! # Examples
//!
//! ```
//! use mallard_core::TypeHash;
//!
//! let point = TypeHash::from_name("Point");
//! assert_eq!(point, TypeHash::from_name("Point"));  // Deterministic
//!
//! // Derived types hash structurally from their base type.
//! let ptr = TypeHash::pointer_to(point);
//! let slice = TypeHash::slice_of(point);
//! assert_ne!(ptr, point);
//! assert_ne!(slice, ptr);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
///
/// These constants ensure that different entity kinds (named types, methods,
/// pointer types, slice types) produce distinct hashes even when they are
/// derived from the same name.
pub mod hash_constants {
    /// Separator constant used when folding parameter hashes.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for named type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for method hashes.
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for pointer types derived from a base type.
    pub const POINTER: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker for slice types derived from an element type.
    pub const SLICE: u64 = 0x3e9f5d2a8c7b1403;

    /// Parameter position mixing constants.
    /// Each parameter position gets a unique constant so parameter order matters.
    pub const PARAM_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x123456789abcdef0,
    ];
}

/// A deterministic 64-bit hash identifying a type or method.
///
/// Computed from the name (for named types), from the base type (for derived
/// pointer/slice types), or from owner + name + parameters (for methods).
/// The same input always produces the same hash, so identities are stable
/// across registries and registration orders.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a type name.
    ///
    /// The same name always produces the same hash.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a method hash from owner type, method name, and parameter
    /// type hashes.
    ///
    /// Methods are distinguished from types by a separate domain constant,
    /// and parameter order matters: `(int, string)` produces a different
    /// hash than `(string, int)`.
    #[inline]
    pub fn from_method(owner: TypeHash, name: &str, param_hashes: &[TypeHash]) -> Self {
        let mut hash = hash_constants::METHOD ^ owner.0 ^ xxh64(name.as_bytes(), 0);
        for (i, param) in param_hashes.iter().enumerate() {
            let marker = hash_constants::PARAM_MARKERS
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
            // wrapping_mul makes parameter order matter (not commutative like XOR)
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(marker ^ param.0);
        }
        TypeHash(hash)
    }

    /// Create the hash for the pointer type `*T` from the hash of `T`.
    #[inline]
    pub fn pointer_to(base: TypeHash) -> Self {
        TypeHash(hash_constants::POINTER ^ base.0.wrapping_mul(hash_constants::SEP))
    }

    /// Create the hash for the slice type `[]T` from the hash of `T`.
    #[inline]
    pub fn slice_of(elem: TypeHash) -> Self {
        TypeHash(hash_constants::SLICE ^ elem.0.wrapping_mul(hash_constants::SEP))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_hash_determinism() {
        assert_eq!(TypeHash::from_name("int"), TypeHash::from_name("int"));
        assert_eq!(TypeHash::from_name("Point"), TypeHash::from_name("Point"));
    }

    #[test]
    fn type_hash_uniqueness() {
        let int_hash = TypeHash::from_name("int");
        let string_hash = TypeHash::from_name("string");
        let point_hash = TypeHash::from_name("Point");

        assert_ne!(int_hash, string_hash);
        assert_ne!(int_hash, point_hash);
        assert_ne!(string_hash, point_hash);
    }

    #[test]
    fn method_hash_includes_owner() {
        let int_hash = TypeHash::from_name("int");
        let point = TypeHash::from_name("Point");
        let circle = TypeHash::from_name("Circle");

        // Same method name and params, different owners
        let point_scale = TypeHash::from_method(point, "Scale", &[int_hash]);
        let circle_scale = TypeHash::from_method(circle, "Scale", &[int_hash]);
        assert_ne!(point_scale, circle_scale);
    }

    #[test]
    fn method_hash_parameter_order_matters() {
        let int_hash = TypeHash::from_name("int");
        let string_hash = TypeHash::from_name("string");
        let point = TypeHash::from_name("Point");

        let m1 = TypeHash::from_method(point, "Set", &[int_hash, string_hash]);
        let m2 = TypeHash::from_method(point, "Set", &[string_hash, int_hash]);
        assert_ne!(m1, m2);
    }

    #[test]
    fn method_hash_overload_distinction() {
        let int_hash = TypeHash::from_name("int");
        let point = TypeHash::from_name("Point");

        let nullary = TypeHash::from_method(point, "Reset", &[]);
        let unary = TypeHash::from_method(point, "Reset", &[int_hash]);
        assert_ne!(nullary, unary);
    }

    #[test]
    fn derived_type_hashes() {
        let point = TypeHash::from_name("Point");

        let ptr = TypeHash::pointer_to(point);
        let slice = TypeHash::slice_of(point);

        assert_ne!(ptr, point);
        assert_ne!(slice, point);
        assert_ne!(ptr, slice);

        // Structural: same base yields the same derived hash.
        assert_eq!(ptr, TypeHash::pointer_to(point));
        assert_eq!(slice, TypeHash::slice_of(point));
    }

    #[test]
    fn derived_hashes_differ_by_base() {
        let a = TypeHash::from_name("A");
        let b = TypeHash::from_name("B");
        assert_ne!(TypeHash::pointer_to(a), TypeHash::pointer_to(b));
        assert_ne!(TypeHash::slice_of(a), TypeHash::slice_of(b));
    }

    #[test]
    fn empty_hash() {
        assert!(TypeHash::EMPTY.is_empty());
        assert!(!TypeHash::from_name("int").is_empty());
    }

    #[test]
    fn hash_display() {
        let hash = TypeHash::from_name("int");
        assert!(format!("{}", hash).starts_with("0x"));
        assert!(format!("{:?}", hash).starts_with("TypeHash(0x"));
    }

    #[test]
    fn many_parameters_supported() {
        let int_hash = TypeHash::from_name("int");
        let point = TypeHash::from_name("Point");
        let params: Vec<TypeHash> = (0..40).map(|_| int_hash).collect();

        // Should not panic with more params than mixing constants
        let m = TypeHash::from_method(point, "Variadic", &params);
        assert!(!m.is_empty());
    }
}
