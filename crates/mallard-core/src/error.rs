//! Unified error types for mallard.
//!
//! This module provides a consistent error hierarchy for the phases of the
//! semantic model:
//!
//! ```text
//! MallardError (top-level wrapper)
//! ├── RegistrationError - type/method registration and lookup errors
//! ├── SatisfactionError - a conversion site's type does not satisfy the
//! │                       required interface (static rejection)
//! ├── SelectorError     - selector resolution failures (static rejection)
//! └── RuntimeFault      - genuinely dynamic faults (assertion mismatch,
//!                         incomparable equality, nil dispatch)
//! ```
//!
//! Anything resolvable before execution (registration conflicts,
//! satisfaction failures, selector collisions) is reported through the
//! first three enums; only dynamic mismatches produce a `RuntimeFault`.

use thiserror::Error;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors that occur during type and method registration or lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// A referenced type was not found.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// A type with this name already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A method with this name is already declared on the type.
    #[error("duplicate method: {type_name} already declares {method}")]
    DuplicateMethod {
        /// The owning type name.
        type_name: String,
        /// The duplicated method name.
        method: String,
    },

    /// A struct declares two fields with the same name (explicit or via an
    /// embedded field's implicit name).
    #[error("duplicate field: {type_name} already declares {field}")]
    DuplicateField {
        /// The struct name.
        type_name: String,
        /// The duplicated field name.
        field: String,
    },

    /// Two embedded interfaces contribute the same method name with
    /// different signatures.
    #[error("interface {interface}: embedded interfaces declare conflicting signatures for {method}")]
    EmbeddedMethodConflict {
        /// The embedding interface name.
        interface: String,
        /// The conflicting method name.
        method: String,
    },

    /// Two embedded interfaces contribute the same method with identical
    /// signatures at the same level, and the registry policy rejects
    /// duplicates.
    #[error("interface {interface}: duplicate method {method} from simultaneous embedding")]
    DuplicateEmbeddedMethod {
        /// The embedding interface name.
        interface: String,
        /// The duplicated method name.
        method: String,
    },

    /// The operation requires a different kind of type (e.g. declaring a
    /// method on a non-struct, or embedding a slice).
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// The type is an interface where a concrete type was required, or
    /// vice versa.
    #[error("{name} is not an interface type")]
    NotAnInterface {
        /// The offending type name.
        name: String,
    },
}

// ============================================================================
// Satisfaction Errors
// ============================================================================

/// A concrete type does not satisfy a required interface.
///
/// This is a static rejection: it is reported at the conversion site before
/// any value is boxed, never as a runtime fault.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SatisfactionError {
    /// The type is missing a method the interface requires.
    #[error("{type_name} does not satisfy {interface}: missing method {method}")]
    MissingMethod {
        /// The concrete type name.
        type_name: String,
        /// The interface name.
        interface: String,
        /// The missing method name.
        method: String,
    },

    /// The type declares the method with a different signature.
    #[error("{type_name} does not satisfy {interface}: wrong signature for {method}")]
    WrongSignature {
        /// The concrete type name.
        type_name: String,
        /// The interface name.
        interface: String,
        /// The mismatched method name.
        method: String,
    },
}

// ============================================================================
// Selector Errors
// ============================================================================

/// Errors from selector resolution through embedded fields.
///
/// Both variants are static rejections; a collision never surfaces at
/// runtime because the short selector simply does not resolve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectorError {
    /// Two or more embedding paths reach the name at the same minimum
    /// depth, so the shorthand selector is unusable.
    #[error("ambiguous selector {type_name}.{selector}")]
    Ambiguous {
        /// The root type name.
        type_name: String,
        /// The selector name.
        selector: String,
    },

    /// No path through embedded fields reaches the name.
    #[error("{type_name} has no field or method {selector}")]
    NotFound {
        /// The root type name.
        type_name: String,
        /// The selector name.
        selector: String,
    },
}

// ============================================================================
// Runtime Faults
// ============================================================================

/// Genuinely dynamic faults.
///
/// These correspond to conditions that cannot be rejected statically: the
/// single-result assertion form on a mismatched tag, equality on an
/// incomparable dynamic type, and method dispatch on the nil sentinel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeFault {
    /// Single-result type assertion failed.
    #[error("interface conversion: {source_type} is not {target}")]
    AssertionFailed {
        /// The dynamic type name, or "nil" for the empty sentinel.
        source_type: String,
        /// The asserted target type name.
        target: String,
    },

    /// Equality was requested on a dynamic type that does not support it.
    #[error("comparing uncomparable type {type_name}")]
    Incomparable {
        /// The incomparable type name.
        type_name: String,
    },

    /// A method was invoked on the nil interface sentinel.
    #[error("invalid method call {method} on nil interface value")]
    NilDispatch {
        /// The method that was called.
        method: String,
    },

    /// Dispatch was requested for a method name outside the method table.
    #[error("unknown method {method} on {type_name}")]
    UnknownMethod {
        /// The dynamic type name.
        type_name: String,
        /// The method name.
        method: String,
    },

    /// A method implementation was invoked with the wrong argument count.
    #[error("{method} expects {expected} argument(s), got {got}")]
    ArgumentCountMismatch {
        /// The method name.
        method: String,
        /// Expected number of arguments.
        expected: usize,
        /// Actual number of arguments provided.
        got: usize,
    },
}

// ============================================================================
// Top-Level Wrapper
// ============================================================================

/// Top-level error wrapper for unified handling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MallardError {
    /// Registration or lookup error.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// Satisfaction failure at a conversion site.
    #[error(transparent)]
    Satisfaction(#[from] SatisfactionError),

    /// Selector resolution failure.
    #[error(transparent)]
    Selector(#[from] SelectorError),

    /// Dynamic runtime fault.
    #[error(transparent)]
    Fault(#[from] RuntimeFault),
}
