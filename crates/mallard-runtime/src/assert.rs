//! Type assertions on interface values.
//!
//! Assertions come in two forms with identical matching rules and different
//! failure behavior:
//!
//! - the two-result form (`try_assert_*`) never faults: a mismatch yields
//!   `(zero value, false)` for concrete targets, `(nil, false)` for
//!   interface targets;
//! - the single-result form (`assert_*`) returns an
//!   [`mallard_core::RuntimeFault::AssertionFailed`] fault on mismatch.
//!
//! A concrete target matches only when the dynamic tag equals it exactly,
//! and yields a copy of the stored value. An interface target matches when
//! the dynamic type satisfies it, and yields a new interface value sharing
//! the same payload.

use mallard_core::{MallardError, RegistrationError, RuntimeFault, TypeHash, Value};
use mallard_registry::TypeRegistry;

use crate::iface_value::IfaceValue;

impl IfaceValue {
    /// Two-result assertion against a concrete (non-interface) target.
    ///
    /// Never faults: returns `(copy, true)` when the tag matches the
    /// target exactly, `(zero value of the target, false)` otherwise.
    pub fn try_assert_concrete(
        &self,
        registry: &TypeRegistry,
        target: TypeHash,
    ) -> Result<(Value, bool), RegistrationError> {
        // zero_value also rejects interface and reference targets, which
        // have no concrete zero representation.
        let zero = registry.zero_value(target)?;
        match self {
            IfaceValue::Boxed { tag, value } if *tag == target => {
                Ok(((**value).clone(), true))
            }
            _ => Ok((zero, false)),
        }
    }

    /// Single-result assertion against a concrete target; faults on
    /// mismatch.
    pub fn assert_concrete(
        &self,
        registry: &TypeRegistry,
        target: TypeHash,
    ) -> Result<Value, MallardError> {
        let target_def = registry
            .get(target)
            .ok_or_else(|| RegistrationError::TypeNotFound(registry.display_name(target)))?;
        if target_def.is_interface() {
            return Err(RegistrationError::InvalidType(format!(
                "{} is an interface type, not a concrete assertion target",
                target_def.name()
            ))
            .into());
        }
        match self {
            IfaceValue::Boxed { tag, value } if *tag == target => Ok((**value).clone()),
            _ => Err(RuntimeFault::AssertionFailed {
                source_type: self.type_name(registry),
                target: registry.display_name(target),
            }
            .into()),
        }
    }

    /// Two-result assertion against an interface target.
    ///
    /// Never faults: returns `(re-boxed value, true)` when the dynamic
    /// type satisfies the target, `(nil, false)` otherwise. The re-boxed
    /// value shares the payload; no copy of the stored value is made.
    pub fn try_assert_iface(
        &self,
        registry: &TypeRegistry,
        target: TypeHash,
    ) -> Result<(IfaceValue, bool), RegistrationError> {
        match self {
            IfaceValue::Nil => {
                // Validate the target even when the source is nil.
                let target_def = registry.get(target).ok_or_else(|| {
                    RegistrationError::TypeNotFound(registry.display_name(target))
                })?;
                if !target_def.is_interface() {
                    return Err(RegistrationError::NotAnInterface {
                        name: target_def.name().to_string(),
                    });
                }
                Ok((IfaceValue::Nil, false))
            }
            IfaceValue::Boxed { tag, value } => {
                if registry.missing_method(*tag, target)?.is_none() {
                    Ok((
                        IfaceValue::Boxed {
                            tag: *tag,
                            value: value.clone(),
                        },
                        true,
                    ))
                } else {
                    Ok((IfaceValue::Nil, false))
                }
            }
        }
    }

    /// Single-result assertion against an interface target; faults on
    /// mismatch.
    pub fn assert_iface(
        &self,
        registry: &TypeRegistry,
        target: TypeHash,
    ) -> Result<IfaceValue, MallardError> {
        let (reboxed, ok) = self.try_assert_iface(registry, target)?;
        if ok {
            Ok(reboxed)
        } else {
            Err(RuntimeFault::AssertionFailed {
                source_type: self.type_name(registry),
                target: registry.display_name(target),
            }
            .into())
        }
    }
}
