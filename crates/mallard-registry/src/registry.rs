//! TypeRegistry - central storage for types and methods.
//!
//! The registry is the write side of the model: clients declare named
//! types, derive pointer and slice types, and attach concrete method
//! implementations. Everything the resolvers need - the embedding graph,
//! flattened interface method sets, per-type method lists - is built and
//! validated here, at registration time.
//!
//! # Thread Safety
//!
//! Registration takes `&mut self` and is single-threaded by design. The
//! query side (`method_set`, `itable`, `satisfies`, `resolve_selector`)
//! takes `&self` and memoizes into `parking_lot::RwLock`-guarded caches, so
//! a populated registry can serve concurrent readers; cached entries are
//! written once per key and read many times.
//!
//! # Example
//!
//! ```
//! use mallard_core::{FieldDef, PrimitiveKind};
//! use mallard_registry::TypeRegistry;
//!
//! let mut registry = TypeRegistry::with_primitives();
//! let int_hash = PrimitiveKind::Int.type_hash();
//!
//! let point = registry
//!     .register_struct("Point", vec![
//!         FieldDef::named("x", int_hash),
//!         FieldDef::named("y", int_hash),
//!     ])
//!     .unwrap();
//! assert!(registry.get(point).is_some());
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use mallard_core::{
    FieldDef, MethodFn, MethodSig, PrimitiveKind, Receiver, RegistrationError, TypeDef, TypeFlags,
    TypeHash, Value,
};

use crate::embed_graph::{EmbedEdge, EmbedGraph};
use crate::method_set::{Form, MethodSet};
use crate::satisfy::ITable;

/// Policy for two embedded interfaces contributing the same method with
/// identical signatures at the same level.
///
/// `Reject` mirrors the documented current-version restriction; `Merge`
/// collapses the duplicates into a single method. The restriction is
/// registry configuration, not a structural law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Reject registration with a duplicate-method error.
    #[default]
    Reject,
    /// Keep a single copy of the duplicated method.
    Merge,
}

/// A concrete method registered on a named type.
#[derive(Debug, Clone)]
pub struct MethodEntry {
    /// The owning type.
    pub owner: TypeHash,
    /// Receiver kind; drives which type form the method belongs to.
    pub receiver: Receiver,
    /// The method prototype.
    pub sig: MethodSig,
    /// Deterministic method identity (owner + name + params).
    pub hash: TypeHash,
    /// The native implementation.
    pub imp: MethodFn,
}

/// Central type and method registry.
pub struct TypeRegistry {
    /// Types stored by hash (primary storage).
    types: FxHashMap<TypeHash, TypeDef>,
    /// Reverse index: name -> hash.
    names: FxHashMap<String, TypeHash>,
    /// Concrete methods by owning type.
    methods: FxHashMap<TypeHash, Vec<MethodEntry>>,
    /// Flattened interface method sets (embedding closure), in declaration
    /// order. Computed and validated at registration.
    iface_sets: FxHashMap<TypeHash, Vec<MethodSig>>,
    /// Embedding graph over struct types.
    embed_graph: EmbedGraph,
    /// Policy for duplicate same-signature embedded interface methods.
    policy: DuplicatePolicy,
    /// Memoized flattened method sets per (type, form).
    method_sets: RwLock<FxHashMap<(TypeHash, Form), Arc<MethodSet>>>,
    /// Memoized interface tables per (concrete, interface) pair.
    /// `None` records a pair that does not satisfy.
    itables: RwLock<FxHashMap<(TypeHash, TypeHash), Option<Arc<ITable>>>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self {
            types: FxHashMap::default(),
            names: FxHashMap::default(),
            methods: FxHashMap::default(),
            iface_sets: FxHashMap::default(),
            embed_graph: EmbedGraph::new(),
            policy: DuplicatePolicy::default(),
            method_sets: RwLock::new(FxHashMap::default()),
            itables: RwLock::new(FxHashMap::default()),
        }
    }
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all primitives pre-registered.
    pub fn with_primitives() -> Self {
        let mut registry = Self::new();
        registry.register_all_primitives();
        registry
    }

    /// Set the duplicate-embedded-method policy for subsequent interface
    /// registrations.
    pub fn set_duplicate_policy(&mut self, policy: DuplicatePolicy) {
        self.policy = policy;
    }

    /// The active duplicate-embedded-method policy.
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.policy
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register every primitive type. Idempotent.
    pub fn register_all_primitives(&mut self) {
        for kind in PrimitiveKind::ALL {
            let hash = kind.type_hash();
            self.types.entry(hash).or_insert(TypeDef::Primitive {
                kind,
                type_hash: hash,
            });
            self.names.entry(kind.name().to_string()).or_insert(hash);
        }
    }

    /// Register a named struct with its field list.
    ///
    /// Field types must already be registered; embedded fields must name a
    /// struct or primitive, or a single-level reference to one. Duplicate
    /// field names (explicit or through an embedded field's implicit name)
    /// are rejected.
    pub fn register_struct(
        &mut self,
        name: &str,
        fields: Vec<FieldDef>,
    ) -> Result<TypeHash, RegistrationError> {
        if self.names.contains_key(name) {
            return Err(RegistrationError::DuplicateType(name.to_string()));
        }

        let hash = TypeHash::from_name(name);
        let mut seen_fields: Vec<String> = Vec::with_capacity(fields.len());
        let mut edges: Vec<(TypeHash, EmbedEdge)> = Vec::new();

        for (index, field) in fields.iter().enumerate() {
            let field_def = self
                .types
                .get(&field.ty)
                .ok_or_else(|| RegistrationError::TypeNotFound(self.display_name(field.ty)))?;

            let field_name = if field.embedded {
                let (target, via_pointer) = match field_def {
                    TypeDef::Pointer { base, .. } => (*base, true),
                    _ => (field.ty, false),
                };
                let target_def = self
                    .types
                    .get(&target)
                    .ok_or_else(|| RegistrationError::TypeNotFound(self.display_name(target)))?;
                if !target_def.flags().contains(TypeFlags::EMBEDDABLE)
                    || target_def.is_interface()
                {
                    return Err(RegistrationError::InvalidType(format!(
                        "cannot embed {} in struct {}",
                        target_def.name(),
                        name
                    )));
                }
                edges.push((
                    target,
                    EmbedEdge {
                        field_index: index,
                        via_pointer,
                    },
                ));
                target_def.name().to_string()
            } else {
                match &field.name {
                    Some(explicit) => explicit.clone(),
                    None => {
                        return Err(RegistrationError::InvalidType(format!(
                            "unnamed non-embedded field in struct {}",
                            name
                        )));
                    }
                }
            };

            if seen_fields.iter().any(|f| f == &field_name) {
                return Err(RegistrationError::DuplicateField {
                    type_name: name.to_string(),
                    field: field_name,
                });
            }
            seen_fields.push(field_name);
        }

        self.embed_graph.ensure_node(hash);
        for (target, edge) in edges {
            self.embed_graph.add_embed(hash, target, edge);
        }

        self.types.insert(
            hash,
            TypeDef::Struct {
                name: name.to_string(),
                type_hash: hash,
                fields,
            },
        );
        self.names.insert(name.to_string(), hash);
        self.invalidate_caches();
        Ok(hash)
    }

    /// Register a named interface from explicit method prototypes and
    /// embedded interfaces.
    ///
    /// The flattened method set (the embedding closure) is computed and
    /// validated here: embedded interfaces contributing the same name with
    /// different signatures conflict; identical signatures embedded
    /// simultaneously follow the registry's [`DuplicatePolicy`]. An
    /// explicit method shadows an embedded one of the same shape.
    pub fn register_interface(
        &mut self,
        name: &str,
        methods: Vec<MethodSig>,
        embeds: Vec<TypeHash>,
    ) -> Result<TypeHash, RegistrationError> {
        if self.names.contains_key(name) {
            return Err(RegistrationError::DuplicateType(name.to_string()));
        }

        let mut flattened: Vec<MethodSig> = Vec::with_capacity(methods.len());
        for sig in &methods {
            if flattened.iter().any(|m| m.name == sig.name) {
                return Err(RegistrationError::DuplicateMethod {
                    type_name: name.to_string(),
                    method: sig.name.clone(),
                });
            }
            flattened.push(sig.clone());
        }

        // Names contributed by embedding, to detect simultaneous embeds.
        let mut embedded_names: Vec<String> = Vec::new();
        for &embed in &embeds {
            let embed_def = self
                .types
                .get(&embed)
                .ok_or_else(|| RegistrationError::TypeNotFound(self.display_name(embed)))?;
            if !embed_def.is_interface() {
                return Err(RegistrationError::NotAnInterface {
                    name: embed_def.name().to_string(),
                });
            }
            let embed_set = self
                .iface_sets
                .get(&embed)
                .cloned()
                .unwrap_or_default();

            for sig in embed_set {
                if let Some(explicit) = methods.iter().find(|m| m.name == sig.name) {
                    // Explicit prototype shadows an embedded one of the
                    // same shape; diverging shapes conflict.
                    if !explicit.same_shape(&sig) {
                        return Err(RegistrationError::EmbeddedMethodConflict {
                            interface: name.to_string(),
                            method: sig.name,
                        });
                    }
                    continue;
                }
                if embedded_names.iter().any(|n| n == &sig.name) {
                    let existing = flattened
                        .iter()
                        .find(|m| m.name == sig.name)
                        .cloned();
                    match existing {
                        Some(existing) if existing.same_shape(&sig) => match self.policy {
                            DuplicatePolicy::Reject => {
                                return Err(RegistrationError::DuplicateEmbeddedMethod {
                                    interface: name.to_string(),
                                    method: sig.name,
                                });
                            }
                            DuplicatePolicy::Merge => continue,
                        },
                        _ => {
                            return Err(RegistrationError::EmbeddedMethodConflict {
                                interface: name.to_string(),
                                method: sig.name,
                            });
                        }
                    }
                }
                embedded_names.push(sig.name.clone());
                flattened.push(sig);
            }
        }

        let hash = TypeHash::from_name(name);
        self.types.insert(
            hash,
            TypeDef::Interface {
                name: name.to_string(),
                type_hash: hash,
                methods,
                embeds,
            },
        );
        self.names.insert(name.to_string(), hash);
        self.iface_sets.insert(hash, flattened);
        self.invalidate_caches();
        Ok(hash)
    }

    /// Attach a concrete method implementation to a named struct.
    pub fn register_method(
        &mut self,
        owner: TypeHash,
        receiver: Receiver,
        sig: MethodSig,
        imp: MethodFn,
    ) -> Result<TypeHash, RegistrationError> {
        let owner_def = self
            .types
            .get(&owner)
            .ok_or_else(|| RegistrationError::TypeNotFound(self.display_name(owner)))?;
        let owner_name = owner_def.name().to_string();

        if !owner_def.is_struct() {
            return Err(RegistrationError::InvalidType(format!(
                "cannot declare method {} on {}: methods require a named struct type",
                sig.name, owner_name
            )));
        }

        if self
            .methods
            .get(&owner)
            .map(|entries| entries.iter().any(|e| e.sig.name == sig.name))
            .unwrap_or(false)
        {
            return Err(RegistrationError::DuplicateMethod {
                type_name: owner_name,
                method: sig.name.clone(),
            });
        }

        if self.field_names(owner).iter().any(|f| f == &sig.name) {
            return Err(RegistrationError::DuplicateField {
                type_name: owner_name,
                field: sig.name.clone(),
            });
        }

        let hash = TypeHash::from_method(owner, &sig.name, &sig.params);
        self.methods.entry(owner).or_default().push(MethodEntry {
            owner,
            receiver,
            sig,
            hash,
            imp,
        });
        self.invalidate_caches();
        Ok(hash)
    }

    /// Get (or create) the single-level reference type `*base`.
    ///
    /// References to references, interfaces, and slices are rejected: the
    /// model only knows single-level references to named value types.
    pub fn pointer_to(&mut self, base: TypeHash) -> Result<TypeHash, RegistrationError> {
        let base_def = self
            .types
            .get(&base)
            .ok_or_else(|| RegistrationError::TypeNotFound(self.display_name(base)))?;
        if base_def.is_pointer() || base_def.is_interface() || base_def.is_slice() {
            return Err(RegistrationError::InvalidType(format!(
                "cannot take a reference to {}",
                base_def.name()
            )));
        }

        let hash = TypeHash::pointer_to(base);
        if !self.types.contains_key(&hash) {
            let name = format!("*{}", base_def.name());
            self.types.insert(
                hash,
                TypeDef::Pointer {
                    name: name.clone(),
                    type_hash: hash,
                    base,
                },
            );
            self.names.insert(name, hash);
        }
        Ok(hash)
    }

    /// Get (or create) the slice type `[]elem`.
    pub fn slice_of(&mut self, elem: TypeHash) -> Result<TypeHash, RegistrationError> {
        let elem_def = self
            .types
            .get(&elem)
            .ok_or_else(|| RegistrationError::TypeNotFound(self.display_name(elem)))?;

        let hash = TypeHash::slice_of(elem);
        if !self.types.contains_key(&hash) {
            let name = format!("[]{}", elem_def.name());
            self.types.insert(
                hash,
                TypeDef::Slice {
                    name: name.clone(),
                    type_hash: hash,
                    elem,
                },
            );
            self.names.insert(name, hash);
        }
        Ok(hash)
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Get a type by its hash.
    pub fn get(&self, hash: TypeHash) -> Option<&TypeDef> {
        self.types.get(&hash)
    }

    /// Get a type by its name.
    pub fn get_by_name(&self, name: &str) -> Option<&TypeDef> {
        self.names.get(name).and_then(|hash| self.types.get(hash))
    }

    /// Check if a type exists by hash.
    pub fn contains(&self, hash: TypeHash) -> bool {
        self.types.contains_key(&hash)
    }

    /// Get a type's name, if registered.
    pub fn type_name(&self, hash: TypeHash) -> Option<&str> {
        self.types.get(&hash).map(TypeDef::name)
    }

    /// The type's name, or its hash rendered in hex for unregistered hashes.
    pub fn display_name(&self, hash: TypeHash) -> String {
        match self.type_name(hash) {
            Some(name) => name.to_string(),
            None => hash.to_string(),
        }
    }

    /// The concrete methods declared directly on a type.
    pub fn methods_of(&self, owner: TypeHash) -> &[MethodEntry] {
        self.methods
            .get(&owner)
            .map(|entries| entries.as_slice())
            .unwrap_or(&[])
    }

    /// Find a directly declared method by name.
    pub fn method_entry(&self, owner: TypeHash, name: &str) -> Option<&MethodEntry> {
        self.methods_of(owner).iter().find(|e| e.sig.name == name)
    }

    /// The flattened (embedding-closed) method set of an interface, in
    /// declaration order.
    pub fn interface_methods(&self, iface: TypeHash) -> Option<&[MethodSig]> {
        self.iface_sets.get(&iface).map(|sigs| sigs.as_slice())
    }

    /// The embedding graph (read side, for resolvers).
    pub(crate) fn embed_graph(&self) -> &EmbedGraph {
        &self.embed_graph
    }

    /// Memoized method-set cache (read side, for resolvers).
    pub(crate) fn method_set_cache(
        &self,
    ) -> &RwLock<FxHashMap<(TypeHash, Form), Arc<MethodSet>>> {
        &self.method_sets
    }

    /// Memoized itable cache (read side, for resolvers).
    pub(crate) fn itable_cache(
        &self,
    ) -> &RwLock<FxHashMap<(TypeHash, TypeHash), Option<Arc<ITable>>>> {
        &self.itables
    }

    /// The effective field names of a struct, embedded fields under their
    /// implicit names, in declaration order.
    pub fn field_names(&self, owner: TypeHash) -> Vec<String> {
        let Some(TypeDef::Struct { fields, .. }) = self.types.get(&owner) else {
            return Vec::new();
        };
        fields
            .iter()
            .filter_map(|field| self.effective_field_name(field))
            .collect()
    }

    /// The effective name of a field: the explicit name, or the embedded
    /// target's name (the base name when embedding through a reference).
    pub fn effective_field_name(&self, field: &FieldDef) -> Option<String> {
        if let Some(name) = &field.name {
            return Some(name.clone());
        }
        if !field.embedded {
            return None;
        }
        let def = self.types.get(&field.ty)?;
        match def {
            TypeDef::Pointer { base, .. } => self.type_name(*base).map(str::to_string),
            other => Some(other.name().to_string()),
        }
    }

    // ==========================================================================
    // Zero Values & Comparability
    // ==========================================================================

    /// Construct the zero value for a type.
    ///
    /// Reference and interface types have no concrete zero representation
    /// in this model; asking for one is an invalid-type error.
    pub fn zero_value(&self, hash: TypeHash) -> Result<Value, RegistrationError> {
        let def = self
            .types
            .get(&hash)
            .ok_or_else(|| RegistrationError::TypeNotFound(self.display_name(hash)))?;
        match def {
            TypeDef::Primitive { kind, .. } => Ok(match kind {
                PrimitiveKind::Bool => Value::Bool(false),
                PrimitiveKind::Int => Value::Int(0),
                PrimitiveKind::Float => Value::Float(0.0),
                PrimitiveKind::Str => Value::Str(String::new()),
            }),
            TypeDef::Slice { .. } => Ok(Value::Slice(Vec::new())),
            TypeDef::Struct { fields, .. } => {
                let mut zeroed = Vec::with_capacity(fields.len());
                for field in fields {
                    zeroed.push(self.zero_value(field.ty)?);
                }
                Ok(Value::Struct {
                    type_hash: hash,
                    fields: zeroed,
                })
            }
            TypeDef::Pointer { name, .. } | TypeDef::Interface { name, .. } => Err(
                RegistrationError::InvalidType(format!("no zero value for {}", name)),
            ),
        }
    }

    /// Whether values of this type support structural equality.
    ///
    /// Slices are incomparable; a struct is comparable only if every field
    /// type is. Unregistered hashes answer `true` (nothing to refute).
    pub fn is_comparable(&self, hash: TypeHash) -> bool {
        match self.types.get(&hash) {
            Some(TypeDef::Slice { .. }) => false,
            Some(TypeDef::Struct { fields, .. }) => {
                fields.iter().all(|field| self.is_comparable(field.ty))
            }
            _ => true,
        }
    }

    /// Combined flags for a type: intrinsic kind flags, with struct
    /// comparability refined over the field types.
    pub fn flags(&self, hash: TypeHash) -> TypeFlags {
        let Some(def) = self.types.get(&hash) else {
            return TypeFlags::empty();
        };
        let mut flags = def.flags();
        if def.is_struct() && !self.is_comparable(hash) {
            flags.remove(TypeFlags::COMPARABLE);
        }
        flags
    }

    /// The method-set form a type's values carry: the pointer form for
    /// `*T`, the value form for everything else.
    pub fn form_of(&self, hash: TypeHash) -> Form {
        match self.types.get(&hash) {
            Some(TypeDef::Pointer { .. }) => Form::Pointer,
            _ => Form::Value,
        }
    }

    /// Drop memoized method sets and itables after a registration that may
    /// have changed them.
    fn invalidate_caches(&mut self) {
        self.method_sets.write().clear();
        self.itables.write().clear();
    }
}
