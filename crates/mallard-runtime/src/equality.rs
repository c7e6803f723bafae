//! Equality between interface values.
//!
//! Two interface values are equal iff both are nil, or their tags match and
//! the stored values are structurally equal. Matching tags on a dynamic
//! type that does not support comparison is a runtime fault, not `false`.

use mallard_core::RuntimeFault;
use mallard_registry::TypeRegistry;

use crate::iface_value::IfaceValue;

/// Compare two interface values.
pub fn iface_eq(
    registry: &TypeRegistry,
    a: &IfaceValue,
    b: &IfaceValue,
) -> Result<bool, RuntimeFault> {
    match (a, b) {
        (IfaceValue::Nil, IfaceValue::Nil) => Ok(true),
        (IfaceValue::Nil, _) | (_, IfaceValue::Nil) => Ok(false),
        (
            IfaceValue::Boxed { tag: tag_a, value: value_a },
            IfaceValue::Boxed { tag: tag_b, value: value_b },
        ) => {
            if tag_a != tag_b {
                return Ok(false);
            }
            if !registry.is_comparable(*tag_a) {
                return Err(RuntimeFault::Incomparable {
                    type_name: registry.display_name(*tag_a),
                });
            }
            value_a.try_eq(value_b.as_ref())
        }
    }
}
