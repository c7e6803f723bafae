//! Method signatures and receiver kinds.

use std::fmt;

use crate::TypeHash;

/// Receiver kind for a concrete method.
///
/// Drives method-set membership: value-receiver methods belong to both the
/// value and pointer forms of the owner; pointer-receiver methods only to
/// the pointer form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Receiver {
    /// Method declared on the type itself.
    #[default]
    Value,
    /// Method declared on the single-level reference to the type.
    Pointer,
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Receiver::Value => write!(f, "value"),
            Receiver::Pointer => write!(f, "pointer"),
        }
    }
}

/// A method prototype: name, parameter types, and return type.
///
/// Signature identity deliberately excludes the receiver kind - satisfaction
/// compares an interface prototype against a concrete method by name,
/// parameters, and return type only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSig {
    /// Method name.
    pub name: String,
    /// Parameter types, in order.
    pub params: Vec<TypeHash>,
    /// Return type; `None` for methods that return nothing.
    pub ret: Option<TypeHash>,
}

impl MethodSig {
    /// Create a new method signature.
    pub fn new(name: impl Into<String>, params: Vec<TypeHash>, ret: Option<TypeHash>) -> Self {
        Self {
            name: name.into(),
            params,
            ret,
        }
    }

    /// Check whether two signatures agree on everything but the name.
    ///
    /// Used when a method set already matched by name and the shapes must
    /// line up for satisfaction.
    pub fn same_shape(&self, other: &MethodSig) -> bool {
        self.params == other.params && self.ret == other.ret
    }
}
