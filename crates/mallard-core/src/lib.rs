//! Core types for the mallard semantic model.
//!
//! This crate provides the shared vocabulary of the workspace: deterministic
//! type identity ([`TypeHash`]), type definitions ([`TypeDef`]), method
//! prototypes ([`MethodSig`]) with receiver kinds, native method
//! implementations ([`MethodFn`]), the runtime value representation
//! ([`Value`]), and the error hierarchy.
//!
//! The registry and runtime layers build on these types; nothing in this
//! crate performs registration, resolution, or dispatch itself.

pub mod error;
pub mod method_fn;
pub mod signature;
pub mod type_def;
pub mod type_hash;
pub mod value;

pub use error::{
    MallardError, RegistrationError, RuntimeFault, SatisfactionError, SelectorError,
};
pub use method_fn::{MethodFn, MethodResult};
pub use signature::{MethodSig, Receiver};
pub use type_def::{FieldDef, PrimitiveKind, TypeDef, TypeFlags};
pub use type_hash::{TypeHash, hash_constants};
pub use value::Value;
