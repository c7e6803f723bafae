//! Native method implementation storage.
//!
//! Concrete methods are implemented as Rust closures registered alongside
//! their signatures. `MethodFn` wraps any such callable behind an `Arc` so
//! implementations of different shapes are stored uniformly and cheap to
//! clone into dispatch tables.

use std::fmt;
use std::sync::Arc;

use crate::error::RuntimeFault;
use crate::value::Value;

/// Result of invoking a method implementation.
pub type MethodResult = Result<Value, RuntimeFault>;

/// Type-erased native method implementation.
///
/// The callable receives the receiver value (the payload stored in the
/// dispatching interface value) and the argument list.
#[derive(Clone)]
pub struct MethodFn {
    inner: Arc<dyn Fn(&Value, &[Value]) -> MethodResult + Send + Sync>,
}

impl MethodFn {
    /// Create a new MethodFn from a callable.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> MethodResult + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Invoke this method with the given receiver and arguments.
    pub fn call(&self, receiver: &Value, args: &[Value]) -> MethodResult {
        (self.inner)(receiver, args)
    }
}

impl fmt::Debug for MethodFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodFn").finish_non_exhaustive()
    }
}
