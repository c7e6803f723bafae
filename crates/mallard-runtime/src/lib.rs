//! Runtime layer of the mallard semantic model.
//!
//! This crate owns everything that happens once values exist:
//!
//! - [`IfaceValue`] - the nil-or-boxed interface slot, with boxing from
//!   concrete values and O(1) re-boxing between interfaces
//! - type assertions in both the faulting and two-result forms
//! - interface-value equality ([`iface_eq`]) with the incomparable-type
//!   fault
//! - dynamic dispatch ([`call_method`]) through the registry's memoized
//!   interface tables
//!
//! Static questions (satisfaction, method sets, selector resolution) are
//! answered by `mallard-registry`; this crate only consumes them.

pub mod assert;
pub mod dispatch;
pub mod equality;
pub mod iface_value;

pub use dispatch::call_method;
pub use equality::iface_eq;
pub use iface_value::IfaceValue;
