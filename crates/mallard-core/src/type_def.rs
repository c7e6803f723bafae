//! TypeDef - type definitions for the mallard type system.
//!
//! This module provides `TypeDef`, an enum representing all type kinds the
//! semantic model knows about: primitives, structs (with embedded fields),
//! interfaces, pointers, and slices.
//!
//! # Example
//!
//! ```
//! use mallard_core::{PrimitiveKind, TypeDef};
//!
//! let int_type = TypeDef::Primitive {
//!     kind: PrimitiveKind::Int,
//!     type_hash: PrimitiveKind::Int.type_hash(),
//! };
//! assert!(int_type.is_primitive());
//! assert_eq!(int_type.name(), "int");
//! ```

use std::fmt;

use bitflags::bitflags;

use crate::{MethodSig, TypeHash};

/// Primitive type kinds.
///
/// These are the built-in scalar types of the modeled language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Int,
    Float,
    Str,
}

impl PrimitiveKind {
    /// All primitive kinds, in registration order.
    pub const ALL: [PrimitiveKind; 4] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Int,
        PrimitiveKind::Float,
        PrimitiveKind::Str,
    ];

    /// Get the name of this primitive type.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Str => "string",
        }
    }

    /// Get the TypeHash for this primitive type.
    pub fn type_hash(self) -> TypeHash {
        TypeHash::from_name(self.name())
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

bitflags! {
    /// Intrinsic per-type property flags.
    ///
    /// `COMPARABLE` here is the intrinsic answer for the type kind alone;
    /// for structs the registry refines it by checking every field type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypeFlags: u8 {
        /// Values of this type support structural equality.
        const COMPARABLE = 1 << 0;
        /// The type is an interface (no concrete values of its own).
        const INTERFACE = 1 << 1;
        /// The type is a single-level reference to a base type.
        const POINTER = 1 << 2;
        /// The type may appear as an embedded (anonymous) struct field.
        const EMBEDDABLE = 1 << 3;
    }
}

/// A field in a struct definition.
///
/// Embedded fields carry no explicit name; they take the name of their type
/// (the base type's name when embedding through a pointer).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Explicit field name; `None` for embedded fields.
    pub name: Option<String>,
    /// Field type.
    pub ty: TypeHash,
    /// Whether the field is embedded (anonymous).
    pub embedded: bool,
}

impl FieldDef {
    /// Create a named field.
    pub fn named(name: impl Into<String>, ty: TypeHash) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            embedded: false,
        }
    }

    /// Create an embedded (anonymous) field.
    pub fn embedded(ty: TypeHash) -> Self {
        Self {
            name: None,
            ty,
            embedded: true,
        }
    }
}

/// Type definition - represents a complete type in the system.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDef {
    /// Primitive type (bool, int, float, string).
    Primitive {
        kind: PrimitiveKind,
        type_hash: TypeHash,
    },

    /// Named struct with an ordered field list, possibly with embedded fields.
    Struct {
        /// Type name.
        name: String,
        /// Deterministic hash for this type.
        type_hash: TypeHash,
        /// Fields in declaration order.
        fields: Vec<FieldDef>,
    },

    /// Interface definition: declared method prototypes plus embedded
    /// interfaces. The flattened method set (embedding closure) is computed
    /// and validated by the registry at registration time.
    Interface {
        name: String,
        type_hash: TypeHash,
        /// Explicitly declared method prototypes.
        methods: Vec<MethodSig>,
        /// Embedded interface type hashes.
        embeds: Vec<TypeHash>,
    },

    /// Single-level reference type `*T`.
    Pointer {
        /// Display name (e.g. `*Point`).
        name: String,
        type_hash: TypeHash,
        /// The referenced base type.
        base: TypeHash,
    },

    /// Container type `[]T`. Not comparable: equality on a dynamic slice
    /// value is a runtime fault.
    Slice {
        /// Display name (e.g. `[]int`).
        name: String,
        type_hash: TypeHash,
        /// The element type.
        elem: TypeHash,
    },
}

impl TypeDef {
    /// Get the name of this type.
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Primitive { kind, .. } => kind.name(),
            TypeDef::Struct { name, .. } => name,
            TypeDef::Interface { name, .. } => name,
            TypeDef::Pointer { name, .. } => name,
            TypeDef::Slice { name, .. } => name,
        }
    }

    /// Get the type hash for this type.
    pub fn type_hash(&self) -> TypeHash {
        match self {
            TypeDef::Primitive { type_hash, .. } => *type_hash,
            TypeDef::Struct { type_hash, .. } => *type_hash,
            TypeDef::Interface { type_hash, .. } => *type_hash,
            TypeDef::Pointer { type_hash, .. } => *type_hash,
            TypeDef::Slice { type_hash, .. } => *type_hash,
        }
    }

    /// Check if this is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeDef::Primitive { .. })
    }

    /// Check if this is a struct type.
    pub fn is_struct(&self) -> bool {
        matches!(self, TypeDef::Struct { .. })
    }

    /// Check if this is an interface type.
    pub fn is_interface(&self) -> bool {
        matches!(self, TypeDef::Interface { .. })
    }

    /// Check if this is a pointer type.
    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeDef::Pointer { .. })
    }

    /// Check if this is a slice type.
    pub fn is_slice(&self) -> bool {
        matches!(self, TypeDef::Slice { .. })
    }

    /// Get the struct fields, if this is a struct.
    pub fn fields(&self) -> &[FieldDef] {
        match self {
            TypeDef::Struct { fields, .. } => fields,
            _ => &[],
        }
    }

    /// Get the pointer base type, if this is a pointer.
    pub fn pointer_base(&self) -> Option<TypeHash> {
        match self {
            TypeDef::Pointer { base, .. } => Some(*base),
            _ => None,
        }
    }

    /// Intrinsic flags for this type kind.
    ///
    /// Struct comparability is refined by the registry (a struct is
    /// comparable only if every field type is); the intrinsic answer for a
    /// struct is `COMPARABLE | EMBEDDABLE`.
    pub fn flags(&self) -> TypeFlags {
        match self {
            TypeDef::Primitive { .. } => TypeFlags::COMPARABLE | TypeFlags::EMBEDDABLE,
            TypeDef::Struct { .. } => TypeFlags::COMPARABLE | TypeFlags::EMBEDDABLE,
            TypeDef::Interface { .. } => {
                TypeFlags::COMPARABLE | TypeFlags::INTERFACE | TypeFlags::EMBEDDABLE
            }
            TypeDef::Pointer { .. } => TypeFlags::COMPARABLE | TypeFlags::POINTER,
            TypeDef::Slice { .. } => TypeFlags::empty(),
        }
    }
}

impl fmt::Display for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_kind_names() {
        assert_eq!(PrimitiveKind::Bool.name(), "bool");
        assert_eq!(PrimitiveKind::Int.name(), "int");
        assert_eq!(PrimitiveKind::Float.name(), "float");
        assert_eq!(PrimitiveKind::Str.name(), "string");
    }

    #[test]
    fn primitive_kind_hashes_match_names() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(kind.type_hash(), TypeHash::from_name(kind.name()));
        }
    }

    #[test]
    fn field_def_creation() {
        let int_hash = PrimitiveKind::Int.type_hash();

        let named = FieldDef::named("x", int_hash);
        assert_eq!(named.name.as_deref(), Some("x"));
        assert!(!named.embedded);

        let embedded = FieldDef::embedded(TypeHash::from_name("Base"));
        assert!(embedded.name.is_none());
        assert!(embedded.embedded);
    }

    #[test]
    fn typedef_primitive() {
        let def = TypeDef::Primitive {
            kind: PrimitiveKind::Int,
            type_hash: PrimitiveKind::Int.type_hash(),
        };
        assert_eq!(def.name(), "int");
        assert!(def.is_primitive());
        assert!(!def.is_struct());
        assert!(def.flags().contains(TypeFlags::COMPARABLE));
    }

    #[test]
    fn typedef_struct() {
        let hash = TypeHash::from_name("Point");
        let def = TypeDef::Struct {
            name: "Point".to_string(),
            type_hash: hash,
            fields: vec![
                FieldDef::named("x", PrimitiveKind::Int.type_hash()),
                FieldDef::named("y", PrimitiveKind::Int.type_hash()),
            ],
        };
        assert_eq!(def.name(), "Point");
        assert_eq!(def.type_hash(), hash);
        assert!(def.is_struct());
        assert_eq!(def.fields().len(), 2);
        assert!(def.flags().contains(TypeFlags::EMBEDDABLE));
    }

    #[test]
    fn typedef_interface() {
        let hash = TypeHash::from_name("Stringer");
        let def = TypeDef::Interface {
            name: "Stringer".to_string(),
            type_hash: hash,
            methods: vec![],
            embeds: vec![],
        };
        assert!(def.is_interface());
        assert!(def.flags().contains(TypeFlags::INTERFACE));
    }

    #[test]
    fn typedef_pointer() {
        let point = TypeHash::from_name("Point");
        let def = TypeDef::Pointer {
            name: "*Point".to_string(),
            type_hash: TypeHash::pointer_to(point),
            base: point,
        };
        assert!(def.is_pointer());
        assert_eq!(def.pointer_base(), Some(point));
        assert_eq!(def.name(), "*Point");
        assert!(!def.flags().contains(TypeFlags::EMBEDDABLE));
    }

    #[test]
    fn typedef_slice_not_comparable() {
        let int_hash = PrimitiveKind::Int.type_hash();
        let def = TypeDef::Slice {
            name: "[]int".to_string(),
            type_hash: TypeHash::slice_of(int_hash),
            elem: int_hash,
        };
        assert!(def.is_slice());
        assert!(!def.flags().contains(TypeFlags::COMPARABLE));
    }

    #[test]
    fn typedef_display() {
        let def = TypeDef::Primitive {
            kind: PrimitiveKind::Str,
            type_hash: PrimitiveKind::Str.type_hash(),
        };
        assert_eq!(format!("{}", def), "string");
    }
}
