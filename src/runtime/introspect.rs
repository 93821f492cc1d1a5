use crate::runtime::{error::CuminError, handler::Handler, types::Signature};

/// Returns the declared signature of `handler`.
///
/// Fails with [`CuminError::NotCallable`] for a null handler, and for a
/// malformed one whose parameter list contains an error slot (such a handler
/// could never be given a conforming argument).
pub fn introspect(handler: &Handler) -> Result<&Signature, CuminError> {
    let signature = handler.signature().ok_or(CuminError::NotCallable)?;
    if signature.params().iter().any(|p| p.is_fallible()) {
        tracing::debug!(?handler, "rejecting handler with an error-typed parameter");
        return Err(CuminError::NotCallable);
    }
    Ok(signature)
}
