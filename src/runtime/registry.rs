use std::collections::HashMap;

use crate::runtime::{curry::Curry, error::CuminError, handler::Handler, value::Value};

/// Name-keyed table of curried callables.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    curries: HashMap<String, Curry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Curries `handler` and files it under its display name.
    ///
    /// Returns the wrapper previously registered under that name, if any.
    pub fn register(&mut self, handler: Handler) -> Result<Option<Curry>, CuminError> {
        let curry = Curry::new(handler)?;
        Ok(self.curries.insert(curry.name().to_string(), curry))
    }

    /// Curries `handler` and files it under `name` instead of its own name.
    pub fn register_as(
        &mut self,
        name: impl Into<String>,
        handler: Handler,
    ) -> Result<Option<Curry>, CuminError> {
        let curry = Curry::new(handler)?;
        Ok(self.curries.insert(name.into(), curry))
    }

    pub fn get(&self, name: &str) -> Option<&Curry> {
        self.curries.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.curries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.curries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curries.is_empty()
    }

    /// Invokes the callable registered under `name`.
    ///
    /// An unknown name does not denote invokable logic, so it fails the same
    /// way a null handler does.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Vec<Value>, CuminError> {
        match self.get(name) {
            Some(curry) => curry.invoke(args),
            None => {
                tracing::debug!(name, "no callable registered under this name");
                Err(CuminError::NotCallable)
            }
        }
    }
}
