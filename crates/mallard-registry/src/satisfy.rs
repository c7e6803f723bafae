//! Interface satisfaction and memoized interface tables.
//!
//! Satisfaction is structural: a type satisfies an interface iff its
//! flattened method set is a superset of the interface's, signature shapes
//! included. The empty interface is satisfied by every type.
//!
//! For a satisfied (concrete, interface) pair an [`ITable`] maps each
//! interface method slot, in declaration order, to the concrete method that
//! implements it. Tables are built lazily on first use and memoized in the
//! registry; entries are written once per pair and shared behind an `Arc`,
//! so dispatch from multiple threads reads the same table.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use mallard_core::{MethodSig, RegistrationError, SatisfactionError, TypeHash};

use crate::registry::TypeRegistry;

/// One interface method slot, bound to its concrete implementation.
#[derive(Debug, Clone)]
pub struct ITableSlot {
    /// Method name.
    pub name: String,
    /// The interface prototype for the slot.
    pub sig: MethodSig,
    /// The named type declaring the implementing method.
    pub owner: TypeHash,
    /// Deterministic identity of the implementing method.
    pub method: TypeHash,
    /// Field index path from the concrete value to the receiver (empty for
    /// directly declared methods, the embedded field path for promoted
    /// ones).
    pub path: Vec<usize>,
}

/// Interface method table for a (concrete, interface) pair.
///
/// Slots follow the interface's declaration order.
#[derive(Debug, Clone)]
pub struct ITable {
    /// The concrete type the table dispatches for.
    pub concrete: TypeHash,
    /// The interface the table implements.
    pub iface: TypeHash,
    slots: Vec<ITableSlot>,
    index: FxHashMap<String, u16>,
}

impl ITable {
    /// Get a slot by method name.
    pub fn slot(&self, name: &str) -> Option<&ITableSlot> {
        self.index
            .get(name)
            .and_then(|&i| self.slots.get(i as usize))
    }

    /// Get the slot at an index.
    pub fn slot_at(&self, index: u16) -> Option<&ITableSlot> {
        self.slots.get(index as usize)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the table has no slots (empty interface).
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over the slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ITableSlot> {
        self.slots.iter()
    }
}

impl TypeRegistry {
    /// Check whether a type satisfies an interface.
    ///
    /// Both concrete and interface sources are accepted: the test is always
    /// a method-set superset check, so an interface satisfies a narrower
    /// interface the same way a concrete type does.
    pub fn satisfies(
        &self,
        source: TypeHash,
        iface: TypeHash,
    ) -> Result<bool, RegistrationError> {
        Ok(self.missing_method(source, iface)?.is_none())
    }

    /// The reason a type fails to satisfy an interface, if any.
    ///
    /// Returns `None` when the type satisfies; otherwise which method is
    /// missing or mismatched. The mismatch is reported for the first
    /// offending method in the interface's declaration order.
    pub fn missing_method(
        &self,
        source: TypeHash,
        iface: TypeHash,
    ) -> Result<Option<SatisfactionError>, RegistrationError> {
        let iface_def = self
            .get(iface)
            .ok_or_else(|| RegistrationError::TypeNotFound(self.display_name(iface)))?;
        if !iface_def.is_interface() {
            return Err(RegistrationError::NotAnInterface {
                name: iface_def.name().to_string(),
            });
        }
        let required = self.interface_methods(iface).unwrap_or(&[]);
        if required.is_empty() {
            // The empty interface is satisfied by every type.
            if !self.contains(source) {
                return Err(RegistrationError::TypeNotFound(self.display_name(source)));
            }
            return Ok(None);
        }

        let set = self.carried_method_set(source)?;
        for req in required {
            match set.get(&req.name) {
                None => {
                    return Ok(Some(SatisfactionError::MissingMethod {
                        type_name: self.display_name(source),
                        interface: self.display_name(iface),
                        method: req.name.clone(),
                    }));
                }
                Some(found) if !found.sig.same_shape(req) => {
                    return Ok(Some(SatisfactionError::WrongSignature {
                        type_name: self.display_name(source),
                        interface: self.display_name(iface),
                        method: req.name.clone(),
                    }));
                }
                Some(_) => {}
            }
        }
        Ok(None)
    }

    /// The memoized interface table for a (concrete, interface) pair.
    ///
    /// Returns `None` when the pair does not satisfy, or when the source is
    /// itself an interface (there is nothing to dispatch to). The result is
    /// cached either way; tables are written once per pair.
    pub fn itable(
        &self,
        concrete: TypeHash,
        iface: TypeHash,
    ) -> Result<Option<Arc<ITable>>, RegistrationError> {
        let key = (concrete, iface);
        if let Some(cached) = self.itable_cache().read().get(&key) {
            return Ok(cached.clone());
        }

        let computed = self.build_itable(concrete, iface)?;
        let mut cache = self.itable_cache().write();
        Ok(cache.entry(key).or_insert(computed).clone())
    }

    fn build_itable(
        &self,
        concrete: TypeHash,
        iface: TypeHash,
    ) -> Result<Option<Arc<ITable>>, RegistrationError> {
        if self.missing_method(concrete, iface)?.is_some() {
            return Ok(None);
        }
        let concrete_def = self
            .get(concrete)
            .ok_or_else(|| RegistrationError::TypeNotFound(self.display_name(concrete)))?;
        if concrete_def.is_interface() {
            return Ok(None);
        }

        let required = self.interface_methods(iface).unwrap_or(&[]);
        let set = self.carried_method_set(concrete)?;

        let mut slots = Vec::with_capacity(required.len());
        let mut index = FxHashMap::default();
        for req in required {
            // Present and shape-checked by missing_method above.
            let Some(found) = set.get(&req.name) else {
                continue;
            };
            // The selector walk recovers the field path to the promoted
            // method's receiver; it resolves uniquely for any method that
            // made it into the set.
            let path = match self.resolve_selector(concrete, &req.name)? {
                crate::selector::Resolution::Method { path, .. } => path,
                _ => return Ok(None),
            };
            index.insert(req.name.clone(), slots.len() as u16);
            slots.push(ITableSlot {
                name: req.name.clone(),
                sig: req.clone(),
                owner: found.owner,
                method: found.hash,
                path,
            });
        }

        Ok(Some(Arc::new(ITable {
            concrete,
            iface,
            slots,
            index,
        })))
    }
}
