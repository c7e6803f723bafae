//! Dynamic dispatch through interface values.
//!
//! A call resolves the concrete implementation via the memoized interface
//! table for (dynamic tag, interface), projects the receiver (the stored
//! value, or the embedded field a promoted method belongs to), and invokes
//! the registered implementation. Calling any method on the nil sentinel is
//! a fault: there is nothing to dispatch to.

use mallard_core::{MallardError, RuntimeFault, TypeHash, Value};
use mallard_registry::TypeRegistry;

use crate::iface_value::IfaceValue;

/// Invoke an interface method on an interface value.
///
/// `iface` pins the method table: `name` must be one of that interface's
/// methods, and the value's dynamic type must satisfy the interface (which
/// it does for any value boxed into it).
pub fn call_method(
    registry: &TypeRegistry,
    value: &IfaceValue,
    iface: TypeHash,
    name: &str,
    args: &[Value],
) -> Result<Value, MallardError> {
    let IfaceValue::Boxed { tag, value: payload } = value else {
        return Err(RuntimeFault::NilDispatch {
            method: name.to_string(),
        }
        .into());
    };

    let table = registry
        .itable(*tag, iface)?
        .ok_or_else(|| RuntimeFault::UnknownMethod {
            type_name: registry.display_name(*tag),
            method: name.to_string(),
        })?;
    let slot = table.slot(name).ok_or_else(|| RuntimeFault::UnknownMethod {
        type_name: registry.display_name(iface),
        method: name.to_string(),
    })?;

    if args.len() != slot.sig.params.len() {
        return Err(RuntimeFault::ArgumentCountMismatch {
            method: name.to_string(),
            expected: slot.sig.params.len(),
            got: args.len(),
        }
        .into());
    }

    // Promoted methods receive the embedded field they were promoted from.
    let receiver = payload
        .project(&slot.path)
        .ok_or_else(|| RuntimeFault::UnknownMethod {
            type_name: registry.display_name(*tag),
            method: name.to_string(),
        })?;
    let entry = registry
        .method_entry(slot.owner, name)
        .ok_or_else(|| RuntimeFault::UnknownMethod {
            type_name: registry.display_name(slot.owner),
            method: name.to_string(),
        })?;

    entry.imp.call(receiver, args).map_err(MallardError::from)
}
