//! Selector resolution through embedded fields.
//!
//! Given a root type and a name, enumerate every path that reaches the name
//! by descending through embedded fields only, rank paths by depth, and
//! promote the unique shallowest one. Two or more paths at the minimum
//! depth collide: the short selector is unusable, though longer explicit
//! paths still resolve one step at a time.

use mallard_core::{MallardError, MethodSig, RegistrationError, SelectorError, TypeDef, TypeHash};
use rustc_hash::{FxHashMap, FxHashSet};

use std::collections::hash_map::Entry;

use crate::registry::TypeRegistry;

/// Outcome of resolving a selector against a type.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The name resolves to a field.
    Field {
        /// Field index path from the root value to the field.
        path: Vec<usize>,
        /// The field's type.
        ty: TypeHash,
        /// Embedding depth the field was found at.
        depth: usize,
    },
    /// The name resolves to a method.
    Method {
        /// Field index path from the root value to the receiver.
        path: Vec<usize>,
        /// The named type declaring the method.
        owner: TypeHash,
        /// The method prototype.
        sig: MethodSig,
        /// Embedding depth the method was found at.
        depth: usize,
    },
    /// Two or more paths tie at the minimum depth; the short selector does
    /// not resolve.
    Collision {
        /// The depth at which the tie occurred.
        depth: usize,
    },
    /// No path through embedded fields reaches the name.
    NotFound,
}

impl Resolution {
    /// Check if this resolution found a field or method.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Field { .. } | Resolution::Method { .. })
    }
}

struct Frontier {
    ty: TypeHash,
    path: Vec<usize>,
    multiples: bool,
}

/// Collapse duplicate frontier entries for the same type; a type reached
/// twice at one depth makes everything below it ambiguous.
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

impl TypeRegistry {
    /// Resolve a selector name against a type.
    ///
    /// Walks the embedding graph breadth-first; the first depth with a hit
    /// decides the outcome. Pointer roots resolve against their base type.
    pub fn resolve_selector(
        &self,
        root: TypeHash,
        name: &str,
    ) -> Result<Resolution, RegistrationError> {
        let root_def = self
            .get(root)
            .ok_or_else(|| RegistrationError::TypeNotFound(self.display_name(root)))?;
        let root = match root_def {
            TypeDef::Pointer { base, .. } => *base,
            _ => root,
        };

        let mut current = vec![Frontier {
            ty: root,
            path: Vec::new(),
            multiples: false,
        }];
        let mut seen: FxHashSet<TypeHash> = FxHashSet::default();
        let mut depth = 0usize;

        while !current.is_empty() {
            let mut next: Vec<Frontier> = Vec::new();
            let mut target: Option<Resolution> = None;

            for entry in &current {
                if !seen.insert(entry.ty) {
                    continue;
                }

                // Direct method on the named type. Receiver kind is
                // irrelevant for selector resolution.
                if let Some(method) = self.method_entry(entry.ty, name) {
                    if entry.multiples || target.is_some() {
                        return Ok(Resolution::Collision { depth });
                    }
                    target = Some(Resolution::Method {
                        path: entry.path.clone(),
                        owner: entry.ty,
                        sig: method.sig.clone(),
                        depth,
                    });
                    continue;
                }

                match self.get(entry.ty) {
                    Some(TypeDef::Struct { fields, .. }) => {
                        for (index, field) in fields.iter().enumerate() {
                            let field_name = self.effective_field_name(field);
                            if field_name.as_deref() == Some(name) {
                                if entry.multiples || target.is_some() {
                                    return Ok(Resolution::Collision { depth });
                                }
                                let mut path = entry.path.clone();
                                path.push(index);
                                target = Some(Resolution::Field {
                                    path,
                                    ty: field.ty,
                                    depth,
                                });
                            }
                        }
                        if target.is_none() {
                            for (edge, embedded) in self.embed_graph().embeds_of(entry.ty) {
                                let mut path = entry.path.clone();
                                path.push(edge.field_index);
                                next.push(Frontier {
                                    ty: embedded,
                                    path,
                                    multiples: entry.multiples,
                                });
                            }
                        }
                    }
                    Some(TypeDef::Interface { .. }) => {
                        let found = self
                            .interface_methods(entry.ty)
                            .and_then(|methods| methods.iter().find(|m| m.name == name));
                        if let Some(sig) = found {
                            if entry.multiples || target.is_some() {
                                return Ok(Resolution::Collision { depth });
                            }
                            target = Some(Resolution::Method {
                                path: entry.path.clone(),
                                owner: entry.ty,
                                sig: sig.clone(),
                                depth,
                            });
                        }
                    }
                    _ => {}
                }
            }

            if let Some(resolution) = target {
                return Ok(resolution);
            }

            current = consolidate_multiples(next);
            depth += 1;
        }

        Ok(Resolution::NotFound)
    }

    /// Resolve a selector, turning collisions and misses into errors.
    pub fn require_selector(
        &self,
        root: TypeHash,
        name: &str,
    ) -> Result<Resolution, MallardError> {
        match self.resolve_selector(root, name)? {
            Resolution::Collision { .. } => Err(SelectorError::Ambiguous {
                type_name: self.display_name(root),
                selector: name.to_string(),
            }
            .into()),
            Resolution::NotFound => Err(SelectorError::NotFound {
                type_name: self.display_name(root),
                selector: name.to_string(),
            }
            .into()),
            resolved => Ok(resolved),
        }
    }

    /// Resolve an explicit multi-segment path (e.g. `v.A.y` as
    /// `["A", "y"]`), one unambiguous step at a time.
    ///
    /// Intermediate segments must resolve to fields; the final segment may
    /// be a field or a method. The returned resolution carries the
    /// combined field index path from the root.
    pub fn resolve_path(
        &self,
        root: TypeHash,
        segments: &[&str],
    ) -> Result<Resolution, MallardError> {
        let mut current = root;
        let mut combined: Vec<usize> = Vec::new();
        let mut total_depth = 0usize;

        for (position, segment) in segments.iter().enumerate() {
            let last = position + 1 == segments.len();
            match self.require_selector(current, segment)? {
                Resolution::Field { path, ty, depth } => {
                    combined.extend(path);
                    total_depth += depth;
                    if last {
                        return Ok(Resolution::Field {
                            path: combined,
                            ty,
                            depth: total_depth,
                        });
                    }
                    current = ty;
                }
                Resolution::Method {
                    path,
                    owner,
                    sig,
                    depth,
                } => {
                    if !last {
                        return Err(SelectorError::NotFound {
                            type_name: self.display_name(current),
                            selector: segments[position + 1].to_string(),
                        }
                        .into());
                    }
                    combined.extend(path);
                    return Ok(Resolution::Method {
                        path: combined,
                        owner,
                        sig,
                        depth: total_depth + depth,
                    });
                }
                // require_selector already rejected these.
                Resolution::Collision { .. } | Resolution::NotFound => unreachable!(),
            }
        }

        Err(SelectorError::NotFound {
            type_name: self.display_name(root),
            selector: String::new(),
        }
        .into())
    }
}
