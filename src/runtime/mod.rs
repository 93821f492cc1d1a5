//! Invocation core: values, descriptors, coercion, and calls.
//!
//! # Pipeline
//! An invocation runs, in order:
//! - [`introspect`]: the handler's declared signature (`NotCallable` if none)
//! - arity check against the signature (`ArityMismatch`)
//! - [`coerce`]: each argument adapted to its parameter (`TypeMismatch`)
//! - [`invoke`]: the call itself, producing one raw value per return slot
//! - [`extract`]: the trailing-error convention (`Invocation`)
//!
//! [`cumin`] runs all of it per call; a [`Curry`] caches the signature and
//! name so only the last four steps repeat.
use crate::runtime::{error::CuminError, value::Value};

pub mod coerce;
pub mod curry;
pub mod error;
pub mod extract;
pub mod handler;
pub mod introspect;
pub mod invoke;
pub mod json;
pub mod naming;
pub mod registry;
pub mod types;
pub mod value;

pub use curry::{Curry, cumin};

/// Type-erased callable: coerced arguments in, one value per return slot out.
pub type RawFn = dyn Fn(Vec<Value>) -> Result<Vec<Value>, CuminError> + Send + Sync;
