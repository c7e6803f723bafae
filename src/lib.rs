//! mallard - a structural-interface semantics engine.
//!
//! mallard models the type semantics of a language with structural
//! ("duck-typed") interface satisfaction and type embedding: method sets,
//! interface satisfaction as a set-inclusion check, value boxing with
//! dynamic type tags, type assertions, interface-value equality, selector
//! promotion with depth-ranked collision rules, and dynamic dispatch
//! through memoized method tables.
//!
//! The workspace splits into three layers, re-exported here:
//!
//! - `mallard-core` - type identity, definitions, signatures, values,
//!   errors
//! - `mallard-registry` - registration, embedding graph, method sets,
//!   selectors, satisfaction, interface tables
//! - `mallard-runtime` - interface values, assertions, equality, dispatch
//!
//! # Example
//!
//! ```
//! use mallard::{
//!     FieldDef, IfaceValue, MethodFn, MethodSig, PrimitiveKind, Receiver, TypeRegistry,
//!     Value, call_method,
//! };
//!
//! let mut registry = TypeRegistry::with_primitives();
//! let int_hash = PrimitiveKind::Int.type_hash();
//!
//! // interface Sizer { Size() int }
//! let sizer = registry
//!     .register_interface("Sizer", vec![MethodSig::new("Size", vec![], Some(int_hash))], vec![])
//!     .unwrap();
//!
//! // type Pair struct { a, b int }; func (p Pair) Size() int
//! let pair = registry
//!     .register_struct("Pair", vec![
//!         FieldDef::named("a", int_hash),
//!         FieldDef::named("b", int_hash),
//!     ])
//!     .unwrap();
//! registry
//!     .register_method(
//!         pair,
//!         Receiver::Value,
//!         MethodSig::new("Size", vec![], Some(int_hash)),
//!         MethodFn::new(|_, _| Ok(Value::Int(2))),
//!     )
//!     .unwrap();
//!
//! // Box a Pair into a Sizer and dispatch.
//! let value = Value::Struct { type_hash: pair, fields: vec![Value::Int(1), Value::Int(2)] };
//! let boxed = IfaceValue::box_value(&registry, sizer, pair, value).unwrap();
//! assert_eq!(call_method(&registry, &boxed, sizer, "Size", &[]).unwrap(), Value::Int(2));
//! ```

pub use mallard_core::{
    FieldDef, MallardError, MethodFn, MethodResult, MethodSig, PrimitiveKind, Receiver,
    RegistrationError, RuntimeFault, SatisfactionError, SelectorError, TypeDef, TypeFlags,
    TypeHash, Value,
};
pub use mallard_registry::{
    DuplicatePolicy, EmbedEdge, EmbedGraph, Form, ITable, ITableSlot, MethodEntry, MethodSet,
    PromotedMethod, Resolution, TypeRegistry,
};
pub use mallard_runtime::{IfaceValue, call_method, iface_eq};
