use thiserror::Error;

/// Everything that can go wrong while adapting and invoking a callable.
///
/// A failed invocation yields exactly one of these and no results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CuminError {
    /// The reference does not denote invokable logic.
    #[error("Handler is not a function!")]
    NotCallable,

    /// Argument count differs from the declared parameter count.
    #[error("Cumin Type Error: expected {expected} args for function {signature}, got {got}")]
    ArityMismatch {
        expected: usize,
        name: String,
        signature: String,
        got: usize,
    },

    /// An argument could not be adapted to its parameter type.
    #[error(
        "Cumin Type Error: expected {expected} for arg[{index}] in ({signature}), got {actual}."
    )]
    TypeMismatch {
        index: usize,
        expected: String,
        actual: String,
        signature: String,
    },

    /// The callable reported failure through its trailing error slot.
    #[error("{0}")]
    Invocation(String),

    /// The callable broke its own declared return shape.
    #[error("Cumin Fault: {name} returned {got} values, declared {expected}")]
    Fault {
        name: String,
        expected: usize,
        got: usize,
    },

    /// A JSON argument list could not be decoded.
    #[error("Cumin Decode Error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for CuminError {
    fn from(err: serde_json::Error) -> Self {
        CuminError::Decode(err.to_string())
    }
}
