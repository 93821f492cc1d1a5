//! Dynamic invocation of statically typed Rust functions.
//!
//! Loosely-typed values (typically decoded JSON, where every number may be a
//! float) are adapted to a function's declared parameter types, the function
//! is called, and its results are normalized. A function whose last return
//! slot is an error (`Result<_, E>`) reports failure through that slot.
//!
//! ```
//! use cumin::{Curry, Value};
//!
//! fn add(a: i32, b: i32) -> i32 {
//!     a + b
//! }
//!
//! let curry = Curry::from_fn(add).unwrap();
//! let result = curry.invoke(&[Value::Float(2.0), Value::Int(3)]).unwrap();
//! assert_eq!(result, vec![Value::Int(5)]);
//! ```
pub mod runtime;

pub use runtime::{
    Curry, cumin,
    error::CuminError,
    handler::{Handler, IntoHandler},
    registry::Registry,
    types::{FloatKind, IntKind, IntoValue, Kind, Param, Returns, Signature, TypeDescriptor},
    value::{Map, Value},
};
