//! Interface values: a type tag plus a boxed payload.
//!
//! An `IfaceValue` is either the nil sentinel (no tag, no payload) or a
//! `(tag, payload)` pair. The payload is always a concrete value - boxing
//! an interface into a wider interface copies the tag and the payload
//! reference, never the payload itself, so there is no nested boxing and
//! interface→interface conversion costs the same regardless of how large
//! the stored value is.

use std::sync::Arc;

use mallard_core::{MallardError, RegistrationError, TypeHash, Value};
use mallard_registry::TypeRegistry;

/// An interface-typed slot: nil, or a tagged concrete value.
///
/// The zero value is the nil sentinel; assigning nil clears a slot.
#[derive(Debug, Clone, Default)]
pub enum IfaceValue {
    /// The empty sentinel: no dynamic type, no dynamic value.
    #[default]
    Nil,
    /// A boxed concrete value with its dynamic type tag.
    Boxed {
        /// The dynamic type.
        tag: TypeHash,
        /// The dynamic value; shared, never an interface value itself.
        value: Arc<Value>,
    },
}

impl IfaceValue {
    /// The nil sentinel.
    pub fn nil() -> Self {
        IfaceValue::Nil
    }

    /// Check if this is the nil sentinel.
    pub fn is_nil(&self) -> bool {
        matches!(self, IfaceValue::Nil)
    }

    /// The dynamic type tag, if any.
    pub fn tag(&self) -> Option<TypeHash> {
        match self {
            IfaceValue::Nil => None,
            IfaceValue::Boxed { tag, .. } => Some(*tag),
        }
    }

    /// The dynamic value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            IfaceValue::Nil => None,
            IfaceValue::Boxed { value, .. } => Some(value),
        }
    }

    /// The shared payload, if any. Two interface values hold the same
    /// payload exactly when one was re-boxed from the other.
    pub fn payload(&self) -> Option<&Arc<Value>> {
        match self {
            IfaceValue::Nil => None,
            IfaceValue::Boxed { value, .. } => Some(value),
        }
    }

    /// The dynamic type's name, or `"nil"` for the sentinel.
    pub fn type_name(&self, registry: &TypeRegistry) -> String {
        match self {
            IfaceValue::Nil => "nil".to_string(),
            IfaceValue::Boxed { tag, .. } => registry.display_name(*tag),
        }
    }

    /// Box a concrete value into an interface.
    ///
    /// The source type must satisfy the interface; an unsatisfied source is
    /// rejected here, before any value exists behind the interface (the
    /// compile-time-equivalent failure). The payload is copied once - the
    /// cost is proportional to the value's size - and tagged with the
    /// source type.
    pub fn box_value(
        registry: &TypeRegistry,
        iface: TypeHash,
        source: TypeHash,
        value: Value,
    ) -> Result<IfaceValue, MallardError> {
        let source_def = registry
            .get(source)
            .ok_or_else(|| RegistrationError::TypeNotFound(registry.display_name(source)))?;
        if source_def.is_interface() {
            return Err(RegistrationError::InvalidType(format!(
                "cannot box interface type {} as a dynamic value",
                source_def.name()
            ))
            .into());
        }
        if !payload_matches(source_def, &value) {
            return Err(RegistrationError::InvalidType(format!(
                "{} value cannot carry the tag {}",
                value.kind_name(),
                source_def.name()
            ))
            .into());
        }
        if let Some(unsatisfied) = registry.missing_method(source, iface)? {
            return Err(unsatisfied.into());
        }
        Ok(IfaceValue::Boxed {
            tag: source,
            value: Arc::new(value),
        })
    }
}

/// Whether a value's shape agrees with the tag it is being boxed under.
///
/// Reference types never match: the model has no runtime representation
/// for reference values, only for their method sets.
fn payload_matches(def: &mallard_core::TypeDef, value: &Value) -> bool {
    use mallard_core::{PrimitiveKind, TypeDef};
    match (def, value) {
        (TypeDef::Primitive { kind, .. }, value) => matches!(
            (kind, value),
            (PrimitiveKind::Bool, Value::Bool(_))
                | (PrimitiveKind::Int, Value::Int(_))
                | (PrimitiveKind::Float, Value::Float(_))
                | (PrimitiveKind::Str, Value::Str(_))
        ),
        (TypeDef::Slice { .. }, Value::Slice(_)) => true,
        (TypeDef::Struct { type_hash, .. }, Value::Struct { type_hash: tagged, .. }) => {
            type_hash == tagged
        }
        _ => false,
    }
}
