use std::{borrow::Cow, fmt, sync::Arc};

use crate::runtime::{
    RawFn,
    error::CuminError,
    naming::short_name,
    types::{Param, Returns, Signature},
    value::Value,
};

/// Opaque reference to a callable together with its declared signature.
///
/// Cloning is cheap and shares the underlying logic. A handler built with
/// [`Handler::null`] refers to nothing; every operation that needs the
/// callable reports [`CuminError::NotCallable`] for it instead of touching it.
#[derive(Clone, Default)]
pub struct Handler {
    inner: Option<Arc<Callable>>,
}

struct Callable {
    path: Cow<'static, str>,
    signature: Signature,
    func: Box<RawFn>,
}

impl Handler {
    /// Wraps a Rust function or closure.
    ///
    /// The signature is derived from the parameter and return types, and the
    /// fully qualified path from the function's type name.
    pub fn new<F, Args>(func: F) -> Self
    where
        F: IntoHandler<Args>,
    {
        Self::from_raw(
            std::any::type_name::<F>(),
            <F as IntoHandler<Args>>::signature(),
            move |args| IntoHandler::call(&func, args),
        )
    }

    /// Wraps logic described by a hand-written signature.
    ///
    /// `func` receives the coerced argument list and must return one value per
    /// declared return slot.
    pub fn from_raw<F>(
        path: impl Into<Cow<'static, str>>,
        signature: Signature,
        func: F,
    ) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Vec<Value>, CuminError> + Send + Sync + 'static,
    {
        Self {
            inner: Some(Arc::new(Callable {
                path: path.into(),
                signature,
                func: Box::new(func),
            })),
        }
    }

    /// A reference to nothing.
    pub fn null() -> Self {
        Self { inner: None }
    }

    /// Replaces the qualified path the display name is derived from.
    pub fn named(self, path: impl Into<Cow<'static, str>>) -> Self {
        match self.inner {
            Some(callable) => {
                let func = Arc::clone(&callable);
                Self::from_raw(path, callable.signature.clone(), move |args| {
                    (func.func)(args)
                })
            }
            None => self,
        }
    }

    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Fully qualified path of the callable, if there is one.
    pub fn path(&self) -> Option<&str> {
        self.inner.as_deref().map(|c| c.path.as_ref())
    }

    pub(crate) fn signature(&self) -> Option<&Signature> {
        self.inner.as_deref().map(|c| &c.signature)
    }

    pub(crate) fn raw(&self) -> Option<&RawFn> {
        self.inner.as_deref().map(|c| c.func.as_ref())
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.as_deref() {
            Some(callable) => write!(f, "Handler({}: {})", callable.path, callable.signature),
            None => write!(f, "Handler(null)"),
        }
    }
}

/// Functions that can be lowered to a [`Handler`].
///
/// Implemented for every `Fn` of up to eight parameters whose parameter types
/// implement [`Param`] and whose return type implements [`Returns`]. `Args` is
/// the parameter tuple and only exists to keep the impls apart.
pub trait IntoHandler<Args>: Send + Sync + 'static {
    fn signature() -> Signature;

    /// Runs the function against a coerced argument list.
    fn call(&self, args: Vec<Value>) -> Result<Vec<Value>, CuminError>;
}

fn arity_error<Args, F: IntoHandler<Args>>(got: usize) -> CuminError {
    let signature = F::signature();
    CuminError::ArityMismatch {
        expected: signature.arity(),
        name: short_name(std::any::type_name::<F>()),
        signature: signature.to_string(),
        got,
    }
}

fn unexpected_arg<Args, F: IntoHandler<Args>>(index: usize, actual: &str) -> CuminError {
    let signature = F::signature();
    let expected = signature
        .params()
        .get(index)
        .map(|p| p.name())
        .unwrap_or("nothing");
    CuminError::TypeMismatch {
        index,
        expected: expected.to_string(),
        actual: actual.to_string(),
        signature: signature.to_string(),
    }
}

macro_rules! impl_into_handler {
    ($count:expr; $($ty:ident),*) => {
        impl<F, R, $($ty,)*> IntoHandler<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
            R: Returns,
            $($ty: Param,)*
        {
            fn signature() -> Signature {
                Signature::new(vec![$(<$ty as Param>::descriptor()),*], R::descriptors())
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn call(&self, args: Vec<Value>) -> Result<Vec<Value>, CuminError> {
                let arity = |got: usize| arity_error::<($($ty,)*), F>(got);
                let mismatch =
                    |index: usize, actual: &str| unexpected_arg::<($($ty,)*), F>(index, actual);
                let got = args.len();
                if got != $count {
                    return Err(arity(got));
                }
                let mut args = args.into_iter().enumerate();
                $(
                    let Some((index, value)) = args.next() else {
                        return Err(arity(got));
                    };
                    let actual = value.type_name();
                    let Some($ty) = <$ty as Param>::from_value(value) else {
                        return Err(mismatch(index, actual));
                    };
                )*
                Ok((self)($($ty),*).into_raw())
            }
        }
    };
}

impl_into_handler!(0;);
impl_into_handler!(1; A);
impl_into_handler!(2; A, B);
impl_into_handler!(3; A, B, C);
impl_into_handler!(4; A, B, C, D);
impl_into_handler!(5; A, B, C, D, E);
impl_into_handler!(6; A, B, C, D, E, G);
impl_into_handler!(7; A, B, C, D, E, G, H);
impl_into_handler!(8; A, B, C, D, E, G, H, I);
