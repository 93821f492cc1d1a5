use crate::runtime::{error::CuminError, handler::Handler, naming::function_name, value::Value};

/// Executes `handler` against an already coerced, arity-correct argument
/// list and returns its raw results, one value per declared return slot.
///
/// Errors raised by the callable's own logic come back inside the raw list
/// under the trailing-error convention. Panics are not caught.
pub fn call(handler: &Handler, args: Vec<Value>) -> Result<Vec<Value>, CuminError> {
    let (Some(func), Some(signature)) = (handler.raw(), handler.signature()) else {
        return Err(CuminError::NotCallable);
    };

    tracing::trace!(?handler, args = args.len(), "calling");
    let raw = func(args)?;

    let declared = signature.returns().len();
    if raw.len() != declared {
        return Err(CuminError::Fault {
            name: function_name(handler),
            expected: declared,
            got: raw.len(),
        });
    }
    Ok(raw)
}
