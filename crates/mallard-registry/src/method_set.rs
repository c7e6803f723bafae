//! Flattened method-set computation.
//!
//! The method set of a type is the name→method mapping the satisfaction
//! check and dispatch run against. It is computed as a breadth-first walk
//! over the embedding graph, one depth layer at a time:
//!
//! - methods found at a shallower depth shadow deeper ones;
//! - two candidates for the same name at the same depth collide and the
//!   name is excluded from the set;
//! - a field name at a depth blocks method promotion for that name at the
//!   same depth and below.
//!
//! Promotion through an embedded field depends on how it is embedded:
//! a plain embed (`T`) contributes T's value-form set (value-receiver
//! methods) to both forms of the embedding struct; an embed through a
//! reference (`*T`) contributes T's full pointer-form set to both forms.
//!
//! Results are memoized per `(type, form)` in the registry.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use mallard_core::{MethodSig, Receiver, RegistrationError, TypeDef, TypeHash};

use crate::registry::{MethodEntry, TypeRegistry};

/// Which form of a type a method set describes.
///
/// The value form carries only value-receiver methods; the pointer form
/// carries both value- and pointer-receiver methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    /// The type itself.
    Value,
    /// The single-level reference to the type.
    Pointer,
}

/// One method in a flattened method set.
#[derive(Debug, Clone)]
pub struct PromotedMethod {
    /// The method prototype.
    pub sig: MethodSig,
    /// Receiver kind of the concrete declaration.
    pub receiver: Receiver,
    /// The named type the method is declared on (the dispatch target).
    pub owner: TypeHash,
    /// Deterministic method identity on the owner.
    pub hash: TypeHash,
    /// Embedding depth the method was promoted from (0 = declared directly).
    pub depth: usize,
}

/// A flattened, depth-resolved method set.
#[derive(Debug, Default)]
pub struct MethodSet {
    by_name: FxHashMap<String, PromotedMethod>,
}

impl MethodSet {
    /// Look up a method by name.
    pub fn get(&self, name: &str) -> Option<&PromotedMethod> {
        self.by_name.get(name)
    }

    /// Check if the set contains a method name.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of methods in the set.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Method names, sorted for deterministic iteration.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over the promoted methods (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &PromotedMethod> {
        self.by_name.values()
    }

    fn insert(&mut self, method: PromotedMethod) {
        self.by_name.insert(method.sig.name.clone(), method);
    }
}

/// A candidate during one depth layer.
///
/// `Excluded` records a method whose receiver kind keeps it out of the
/// requested form: it still claims the name for shadowing and collision
/// purposes, it just never lands in the final set.
enum Candidate {
    Method(PromotedMethod),
    Excluded,
    Collision,
}

/// One entry in the breadth-first frontier.
struct Frontier {
    ty: TypeHash,
    form: Form,
    /// The same type was reached more than once at this depth; everything
    /// it contributes collides.
    multiples: bool,
}

/// Collapse duplicate frontier entries for the same type into a single
/// entry flagged as multiple.
fn consolidate_multiples(list: Vec<Frontier>) -> Vec<Frontier> {
    let mut out: Vec<Frontier> = Vec::new();
    let mut index: FxHashMap<TypeHash, usize> = FxHashMap::default();
    for entry in list {
        match index.entry(entry.ty) {
            Entry::Occupied(slot) => out[*slot.get()].multiples = true,
            Entry::Vacant(slot) => {
                slot.insert(out.len());
                out.push(entry);
            }
        }
    }
    out
}

fn add_candidate(
    layer: &mut FxHashMap<String, Candidate>,
    method: &MethodEntry,
    depth: usize,
    multiples: bool,
    included: bool,
) {
    match layer.entry(method.sig.name.clone()) {
        Entry::Occupied(mut slot) => {
            slot.insert(Candidate::Collision);
        }
        Entry::Vacant(slot) => {
            slot.insert(if multiples {
                Candidate::Collision
            } else if !included {
                Candidate::Excluded
            } else {
                Candidate::Method(PromotedMethod {
                    sig: method.sig.clone(),
                    receiver: method.receiver,
                    owner: method.owner,
                    hash: method.hash,
                    depth,
                })
            });
        }
    }
}

impl TypeRegistry {
    /// The flattened method set of a type form, memoized.
    ///
    /// For pointer types the base type's pointer form is used regardless of
    /// `form`; for interfaces the flattened interface set is returned.
    pub fn method_set(
        &self,
        ty: TypeHash,
        form: Form,
    ) -> Result<Arc<MethodSet>, RegistrationError> {
        let key = (ty, form);
        if let Some(cached) = self.method_set_cache().read().get(&key) {
            return Ok(cached.clone());
        }
        let computed = Arc::new(self.compute_method_set(ty, form)?);
        let mut cache = self.method_set_cache().write();
        Ok(cache.entry(key).or_insert(computed).clone())
    }

    /// The method set a value of this type carries: the pointer form for
    /// `*T` hashes, the value form otherwise.
    pub fn carried_method_set(&self, ty: TypeHash) -> Result<Arc<MethodSet>, RegistrationError> {
        self.method_set(ty, self.form_of(ty))
    }

    fn compute_method_set(
        &self,
        ty: TypeHash,
        form: Form,
    ) -> Result<MethodSet, RegistrationError> {
        let def = self
            .get(ty)
            .ok_or_else(|| RegistrationError::TypeNotFound(self.display_name(ty)))?;

        if def.is_interface() {
            let mut set = MethodSet::default();
            for sig in self.interface_methods(ty).unwrap_or(&[]) {
                set.insert(PromotedMethod {
                    sig: sig.clone(),
                    receiver: Receiver::Value,
                    owner: ty,
                    hash: TypeHash::from_method(ty, &sig.name, &sig.params),
                    depth: 0,
                });
            }
            return Ok(set);
        }

        let (root, root_form) = match def {
            TypeDef::Pointer { base, .. } => (*base, Form::Pointer),
            _ => (ty, form),
        };

        let mut result: FxHashMap<String, Candidate> = FxHashMap::default();
        let mut current = vec![Frontier {
            ty: root,
            form: root_form,
            multiples: false,
        }];
        let mut seen: FxHashSet<TypeHash> = FxHashSet::default();
        let mut depth = 0usize;

        while !current.is_empty() {
            let mut next: Vec<Frontier> = Vec::new();
            let mut layer_methods: FxHashMap<String, Candidate> = FxHashMap::default();
            let mut layer_fields: FxHashSet<String> = FxHashSet::default();

            for entry in &current {
                // Already handled at a shallower depth; shallower shadows.
                if !seen.insert(entry.ty) {
                    continue;
                }

                for method in self.methods_of(entry.ty) {
                    // Shadowing and collision are receiver-blind; only set
                    // membership is filtered by form.
                    let included = match entry.form {
                        Form::Pointer => true,
                        Form::Value => method.receiver == Receiver::Value,
                    };
                    add_candidate(&mut layer_methods, method, depth, entry.multiples, included);
                }

                if let Some(TypeDef::Struct { fields, .. }) = self.get(entry.ty) {
                    for field in fields {
                        if let Some(name) = self.effective_field_name(field) {
                            layer_fields.insert(name);
                        }
                    }
                }

                for (edge, target) in self.embed_graph().embeds_of(entry.ty) {
                    next.push(Frontier {
                        ty: target,
                        form: if edge.via_pointer {
                            Form::Pointer
                        } else {
                            Form::Value
                        },
                        multiples: entry.multiples,
                    });
                }
            }

            // Shallower layers already in `result` win. A field name at
            // this layer claims the name for field access, excluding any
            // method of the same name here or deeper.
            for (name, candidate) in layer_methods {
                let resolved = if layer_fields.contains(&name) {
                    Candidate::Collision
                } else {
                    candidate
                };
                result.entry(name).or_insert(resolved);
            }
            for name in layer_fields {
                result.entry(name).or_insert(Candidate::Collision);
            }

            current = consolidate_multiples(next);
            depth += 1;
        }

        let mut set = MethodSet::default();
        for candidate in result.into_values() {
            if let Candidate::Method(method) = candidate {
                set.insert(method);
            }
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mallard_core::{FieldDef, MethodFn, PrimitiveKind, Value};

    fn int_hash() -> TypeHash {
        PrimitiveKind::Int.type_hash()
    }

    fn noop() -> MethodFn {
        MethodFn::new(|_, _| Ok(Value::Int(0)))
    }

    fn sig(name: &str) -> MethodSig {
        MethodSig::new(name, vec![], Some(int_hash()))
    }

    #[test]
    fn direct_methods_by_form() {
        let mut registry = TypeRegistry::with_primitives();
        let point = registry.register_struct("Point", vec![]).unwrap();
        registry
            .register_method(point, Receiver::Value, sig("Norm"), noop())
            .unwrap();
        registry
            .register_method(point, Receiver::Pointer, sig("Grow"), noop())
            .unwrap();

        let value_set = registry.method_set(point, Form::Value).unwrap();
        assert!(value_set.contains("Norm"));
        assert!(!value_set.contains("Grow"));

        let pointer_set = registry.method_set(point, Form::Pointer).unwrap();
        assert!(pointer_set.contains("Norm"));
        assert!(pointer_set.contains("Grow"));
    }

    #[test]
    fn pointer_type_uses_pointer_form() {
        let mut registry = TypeRegistry::with_primitives();
        let point = registry.register_struct("Point", vec![]).unwrap();
        registry
            .register_method(point, Receiver::Pointer, sig("Grow"), noop())
            .unwrap();
        let ptr = registry.pointer_to(point).unwrap();

        let set = registry.carried_method_set(ptr).unwrap();
        assert!(set.contains("Grow"));

        let value_set = registry.carried_method_set(point).unwrap();
        assert!(!value_set.contains("Grow"));
    }

    #[test]
    fn plain_embed_promotes_value_receiver_only() {
        let mut registry = TypeRegistry::with_primitives();
        let base = registry.register_struct("Base", vec![]).unwrap();
        registry
            .register_method(base, Receiver::Value, sig("ByValue"), noop())
            .unwrap();
        registry
            .register_method(base, Receiver::Pointer, sig("ByPointer"), noop())
            .unwrap();

        let wrapper = registry
            .register_struct("Wrapper", vec![FieldDef::embedded(base)])
            .unwrap();

        // Value-receiver method reaches both forms of the wrapper.
        let value_set = registry.method_set(wrapper, Form::Value).unwrap();
        assert!(value_set.contains("ByValue"));
        assert!(!value_set.contains("ByPointer"));

        let pointer_set = registry.method_set(wrapper, Form::Pointer).unwrap();
        assert!(pointer_set.contains("ByValue"));
        assert!(!pointer_set.contains("ByPointer"));
    }

    #[test]
    fn pointer_embed_promotes_full_set() {
        let mut registry = TypeRegistry::with_primitives();
        let base = registry.register_struct("Base", vec![]).unwrap();
        registry
            .register_method(base, Receiver::Value, sig("ByValue"), noop())
            .unwrap();
        registry
            .register_method(base, Receiver::Pointer, sig("ByPointer"), noop())
            .unwrap();
        let base_ptr = registry.pointer_to(base).unwrap();

        let wrapper = registry
            .register_struct("Wrapper", vec![FieldDef::embedded(base_ptr)])
            .unwrap();

        for form in [Form::Value, Form::Pointer] {
            let set = registry.method_set(wrapper, form).unwrap();
            assert!(set.contains("ByValue"));
            assert!(set.contains("ByPointer"));
        }
    }

    #[test]
    fn shallower_method_shadows_deeper() {
        let mut registry = TypeRegistry::with_primitives();
        let base = registry.register_struct("Base", vec![]).unwrap();
        registry
            .register_method(base, Receiver::Value, sig("Name"), noop())
            .unwrap();

        let wrapper = registry
            .register_struct("Wrapper", vec![FieldDef::embedded(base)])
            .unwrap();
        registry
            .register_method(wrapper, Receiver::Value, sig("Name"), noop())
            .unwrap();

        let set = registry.method_set(wrapper, Form::Value).unwrap();
        let found = set.get("Name").unwrap();
        assert_eq!(found.owner, wrapper);
        assert_eq!(found.depth, 0);
    }

    #[test]
    fn equal_depth_collision_excludes_method() {
        let mut registry = TypeRegistry::with_primitives();
        let a = registry.register_struct("A", vec![]).unwrap();
        registry
            .register_method(a, Receiver::Value, sig("Shared"), noop())
            .unwrap();
        let b = registry.register_struct("B", vec![]).unwrap();
        registry
            .register_method(b, Receiver::Value, sig("Shared"), noop())
            .unwrap();

        let both = registry
            .register_struct(
                "Both",
                vec![FieldDef::embedded(a), FieldDef::embedded(b)],
            )
            .unwrap();

        let set = registry.method_set(both, Form::Value).unwrap();
        assert!(!set.contains("Shared"));
    }

    #[test]
    fn field_name_blocks_deeper_method() {
        let mut registry = TypeRegistry::with_primitives();
        let base = registry.register_struct("Base", vec![]).unwrap();
        registry
            .register_method(base, Receiver::Value, sig("Label"), noop())
            .unwrap();

        // Wrapper's own field "Label" claims the name at depth 0; Base's
        // method at depth 1 must not promote.
        let wrapper = registry
            .register_struct(
                "Wrapper",
                vec![
                    FieldDef::named("Label", int_hash()),
                    FieldDef::embedded(base),
                ],
            )
            .unwrap();

        let set = registry.method_set(wrapper, Form::Value).unwrap();
        assert!(!set.contains("Label"));
    }

    #[test]
    fn transitive_promotion() {
        let mut registry = TypeRegistry::with_primitives();
        let inner = registry.register_struct("Inner", vec![]).unwrap();
        registry
            .register_method(inner, Receiver::Value, sig("Deep"), noop())
            .unwrap();
        let middle = registry
            .register_struct("Middle", vec![FieldDef::embedded(inner)])
            .unwrap();
        let outer = registry
            .register_struct("Outer", vec![FieldDef::embedded(middle)])
            .unwrap();

        let set = registry.method_set(outer, Form::Value).unwrap();
        let found = set.get("Deep").unwrap();
        assert_eq!(found.depth, 2);
        assert_eq!(found.owner, inner);
    }

    #[test]
    fn interface_method_set_is_flattened() {
        let mut registry = TypeRegistry::with_primitives();
        let reader = registry
            .register_interface("Reader", vec![sig("Read")], vec![])
            .unwrap();
        let rw = registry
            .register_interface("ReadWriter", vec![sig("Write")], vec![reader])
            .unwrap();

        let set = registry.method_set(rw, Form::Value).unwrap();
        assert!(set.contains("Read"));
        assert!(set.contains("Write"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn method_sets_are_memoized() {
        let mut registry = TypeRegistry::with_primitives();
        let point = registry.register_struct("Point", vec![]).unwrap();
        registry
            .register_method(point, Receiver::Value, sig("Norm"), noop())
            .unwrap();

        let first = registry.method_set(point, Form::Value).unwrap();
        let second = registry.method_set(point, Form::Value).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn registration_invalidates_memoized_sets() {
        let mut registry = TypeRegistry::with_primitives();
        let point = registry.register_struct("Point", vec![]).unwrap();
        let before = registry.method_set(point, Form::Value).unwrap();
        assert!(before.is_empty());

        registry
            .register_method(point, Receiver::Value, sig("Norm"), noop())
            .unwrap();
        let after = registry.method_set(point, Form::Value).unwrap();
        assert!(after.contains("Norm"));
    }

    #[test]
    fn empty_set_for_primitives_and_slices() {
        let mut registry = TypeRegistry::with_primitives();
        let slice = registry.slice_of(int_hash()).unwrap();
        assert!(registry.method_set(int_hash(), Form::Value).unwrap().is_empty());
        assert!(registry.method_set(slice, Form::Value).unwrap().is_empty());
    }
}
