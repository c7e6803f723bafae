//! Type registry and resolvers for the mallard semantic model.
//!
//! This crate owns the static side of the model:
//!
//! - [`TypeRegistry`] - registration and lookup of named types, derived
//!   types, and concrete method implementations
//! - embedding graph construction and the flattened, depth-ranked
//!   [`MethodSet`] computation
//! - selector resolution with shallowest-unique-path promotion
//!   ([`Resolution`])
//! - structural interface satisfaction and memoized [`ITable`]s
//!
//! Everything here is resolvable before any value exists; runtime boxing,
//! assertion, equality, and dispatch live in `mallard-runtime`.

pub mod embed_graph;
pub mod method_set;
pub mod registry;
pub mod satisfy;
pub mod selector;

pub use embed_graph::{EmbedEdge, EmbedGraph};
pub use method_set::{Form, MethodSet, PromotedMethod};
pub use registry::{DuplicatePolicy, MethodEntry, TypeRegistry};
pub use satisfy::{ITable, ITableSlot};
pub use selector::Resolution;
