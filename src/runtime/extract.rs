use crate::runtime::{error::CuminError, types::TypeDescriptor, value::Value};

/// Applies the trailing-error convention to a raw result list.
///
/// Only the declared type of the last return slot is consulted. When it is an
/// error slot, `Null` means success and the slot is dropped; any other value
/// discards every result and is surfaced as [`CuminError::Invocation`] with
/// the value's plain text. Error slots in earlier positions are ordinary
/// results.
pub fn extract(mut raw: Vec<Value>, returns: &[TypeDescriptor]) -> Result<Vec<Value>, CuminError> {
    if !returns.last().is_some_and(TypeDescriptor::is_fallible) {
        return Ok(raw);
    }

    match raw.pop() {
        None | Some(Value::Null) => Ok(raw),
        Some(err) => {
            let message = err.to_string_value();
            tracing::debug!(%message, "callable reported an error");
            Err(CuminError::Invocation(message))
        }
    }
}
