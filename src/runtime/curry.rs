use crate::runtime::{
    coerce::coerce_all,
    error::CuminError,
    extract::extract,
    handler::{Handler, IntoHandler},
    introspect::introspect,
    invoke::call,
    json::decode_args,
    naming::function_name,
    types::Signature,
    value::Value,
};

/// Adapts `args` to `handler`'s parameters, calls it, and normalizes the
/// results.
///
/// The one-shot form of [`Curry::invoke`]: the signature and name are derived
/// on every call.
pub fn cumin(handler: &Handler, args: &[Value]) -> Result<Vec<Value>, CuminError> {
    let signature = introspect(handler)?;
    run(handler, signature, || function_name(handler), args)
}

fn run(
    handler: &Handler,
    signature: &Signature,
    name: impl FnOnce() -> String,
    args: &[Value],
) -> Result<Vec<Value>, CuminError> {
    if args.len() != signature.arity() {
        let name = name();
        tracing::debug!(%name, expected = signature.arity(), got = args.len(), "arity mismatch");
        return Err(CuminError::ArityMismatch {
            expected: signature.arity(),
            name,
            signature: signature.to_string(),
            got: args.len(),
        });
    }

    let coerced = coerce_all(args, signature)?;
    let raw = call(handler, coerced)?;
    extract(raw, signature.returns())
}

/// A callable bound to its cached name and signature for repeated use.
///
/// Read-only after construction; `Clone`, `Send`, and `Sync`, so one wrapper
/// can serve any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct Curry {
    name: String,
    signature: Signature,
    handler: Handler,
}

impl Curry {
    pub fn new(handler: Handler) -> Result<Self, CuminError> {
        let signature = introspect(&handler)?.clone();
        let name = function_name(&handler);
        tracing::debug!(%name, %signature, "curried");
        Ok(Self {
            name,
            signature,
            handler,
        })
    }

    pub fn from_fn<F, Args>(func: F) -> Result<Self, CuminError>
    where
        F: IntoHandler<Args>,
    {
        Self::new(Handler::new(func))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn arity(&self) -> usize {
        self.signature.arity()
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Invokes the wrapped callable with `args`.
    ///
    /// Returns the declared results minus a successful trailing error slot,
    /// or exactly one error.
    pub fn invoke(&self, args: &[Value]) -> Result<Vec<Value>, CuminError> {
        run(&self.handler, &self.signature, || self.name.clone(), args)
    }

    /// Decodes `text` as a JSON argument array and invokes with it.
    pub fn invoke_json(&self, text: &str) -> Result<Vec<Value>, CuminError> {
        let args = decode_args(text)?;
        self.invoke(&args)
    }

    /// Invokes once per argument set; results keep the input order.
    #[cfg(feature = "parallel")]
    pub fn invoke_batch(&self, batch: &[Vec<Value>]) -> Vec<Result<Vec<Value>, CuminError>> {
        use rayon::prelude::*;

        batch.par_iter().map(|args| self.invoke(args)).collect()
    }

    /// Invokes once per argument set; results keep the input order.
    #[cfg(not(feature = "parallel"))]
    pub fn invoke_batch(&self, batch: &[Vec<Value>]) -> Vec<Result<Vec<Value>, CuminError>> {
        batch.iter().map(|args| self.invoke(args)).collect()
    }
}
