//! Runtime value representation.
//!
//! `Value` is the unified runtime representation of every concrete
//! (non-interface) value in the model. Interface values never appear here:
//! boxing stores a `Value` plus a type tag, so the payload of an interface
//! value is always of a non-interface type.

use std::fmt;

use crate::error::RuntimeFault;
use crate::type_hash::TypeHash;

/// A concrete runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value (owned).
    Str(String),
    /// Slice value. Slices are not comparable: structural equality on a
    /// slice is a runtime fault, not `false`.
    Slice(Vec<Value>),
    /// Struct value: the struct's type plus its field values in
    /// declaration order (embedded fields included, recursively).
    Struct {
        type_hash: TypeHash,
        fields: Vec<Value>,
    },
}

impl Value {
    /// Get a human-readable name for this value's kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Slice(_) => "slice",
            Value::Struct { .. } => "struct",
        }
    }

    /// Check whether this value supports structural equality.
    ///
    /// Slices are incomparable; structs are comparable only if every field
    /// value is.
    pub fn is_comparable(&self) -> bool {
        match self {
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_) => true,
            Value::Slice(_) => false,
            Value::Struct { fields, .. } => fields.iter().all(Value::is_comparable),
        }
    }

    /// Structural equality with the incomparable-type fault.
    ///
    /// Comparing two slices (at any nesting depth) is a fault rather than a
    /// boolean answer. Values of different kinds are simply unequal.
    pub fn try_eq(&self, other: &Value) -> Result<bool, RuntimeFault> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
            (Value::Int(a), Value::Int(b)) => Ok(a == b),
            (Value::Float(a), Value::Float(b)) => Ok(a == b),
            (Value::Str(a), Value::Str(b)) => Ok(a == b),
            (Value::Slice(_), Value::Slice(_)) => Err(RuntimeFault::Incomparable {
                type_name: self.kind_name().to_string(),
            }),
            (
                Value::Struct {
                    type_hash: ta,
                    fields: fa,
                },
                Value::Struct {
                    type_hash: tb,
                    fields: fb,
                },
            ) => {
                if ta != tb || fa.len() != fb.len() {
                    return Ok(false);
                }
                for (a, b) in fa.iter().zip(fb.iter()) {
                    if !a.try_eq(b)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Walk a field index path (as produced by selector resolution) into
    /// nested struct values.
    pub fn project(&self, path: &[usize]) -> Option<&Value> {
        let mut current = self;
        for &idx in path {
            match current {
                Value::Struct { fields, .. } => current = fields.get(idx)?,
                _ => return None,
            }
        }
        Some(current)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Slice(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Struct { fields, .. } => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", field)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_equality() {
        assert!(Value::Int(3).try_eq(&Value::Int(3)).unwrap());
        assert!(!Value::Int(3).try_eq(&Value::Int(4)).unwrap());
        assert!(Value::Str("a".into()).try_eq(&Value::Str("a".into())).unwrap());
        assert!(!Value::Bool(true).try_eq(&Value::Bool(false)).unwrap());
    }

    #[test]
    fn cross_kind_unequal() {
        assert!(!Value::Int(1).try_eq(&Value::Bool(true)).unwrap());
        assert!(!Value::Str("1".into()).try_eq(&Value::Int(1)).unwrap());
    }

    #[test]
    fn slice_equality_faults() {
        let a = Value::Slice(vec![Value::Int(1)]);
        let b = Value::Slice(vec![Value::Int(1)]);
        let err = a.try_eq(&b).unwrap_err();
        assert!(matches!(err, RuntimeFault::Incomparable { .. }));
    }

    #[test]
    fn struct_equality_is_structural() {
        let hash = TypeHash::from_name("Point");
        let a = Value::Struct {
            type_hash: hash,
            fields: vec![Value::Int(1), Value::Int(2)],
        };
        let b = Value::Struct {
            type_hash: hash,
            fields: vec![Value::Int(1), Value::Int(2)],
        };
        let c = Value::Struct {
            type_hash: hash,
            fields: vec![Value::Int(1), Value::Int(3)],
        };
        assert!(a.try_eq(&b).unwrap());
        assert!(!a.try_eq(&c).unwrap());
    }

    #[test]
    fn struct_with_slice_field_faults() {
        let hash = TypeHash::from_name("Holder");
        let a = Value::Struct {
            type_hash: hash,
            fields: vec![Value::Slice(vec![])],
        };
        let b = a.clone();
        assert!(a.try_eq(&b).is_err());
        assert!(!a.is_comparable());
    }

    #[test]
    fn struct_different_types_unequal() {
        let a = Value::Struct {
            type_hash: TypeHash::from_name("A"),
            fields: vec![Value::Int(1)],
        };
        let b = Value::Struct {
            type_hash: TypeHash::from_name("B"),
            fields: vec![Value::Int(1)],
        };
        assert!(!a.try_eq(&b).unwrap());
    }

    #[test]
    fn project_walks_nested_fields() {
        let inner = Value::Struct {
            type_hash: TypeHash::from_name("Inner"),
            fields: vec![Value::Int(7)],
        };
        let outer = Value::Struct {
            type_hash: TypeHash::from_name("Outer"),
            fields: vec![Value::Str("label".into()), inner],
        };

        assert_eq!(outer.project(&[1, 0]), Some(&Value::Int(7)));
        assert_eq!(outer.project(&[0]), Some(&Value::Str("label".into())));
        assert_eq!(outer.project(&[]), Some(&outer));
        assert!(outer.project(&[2]).is_none());
        assert!(outer.project(&[0, 0]).is_none());
    }

    #[test]
    fn display_formatting() {
        let v = Value::Slice(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(format!("{}", v), "[1 2]");

        let s = Value::Struct {
            type_hash: TypeHash::from_name("Point"),
            fields: vec![Value::Int(3), Value::Int(4)],
        };
        assert_eq!(format!("{}", s), "{3 4}");
    }
}
