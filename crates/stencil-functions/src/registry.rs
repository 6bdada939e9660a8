//! Name-to-callable function registry.

use std::collections::HashMap;
use std::fmt;

use crate::builtin;
use crate::error::FunctionError;
use crate::store::ValueStore;

/// Boxed function callable: parameters in, string out, with mutable access
/// to the document's named-value store.
pub type FunctionFn =
    Box<dyn Fn(&[String], &mut ValueStore) -> Result<String, FunctionError> + Send + Sync>;

/// Registry mapping function names to callables.
pub struct Functions {
    functions: HashMap<String, FunctionFn>,
}

impl Default for Functions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Functions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Functions")
            .field("registered", &self.functions.len())
            .finish()
    }
}

impl Functions {
    /// Registry pre-populated with the built-in function set.
    #[must_use]
    pub fn new() -> Self {
        builtin::register(Self::empty())
    }

    /// Registry with no functions registered at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Register `f` under `name`, replacing any previous registration.
    #[must_use]
    pub fn with_function<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[String], &mut ValueStore) -> Result<String, FunctionError> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Box::new(f));
        self
    }

    /// Whether a function is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Resolve `name` and invoke it with `params` and the shared store.
    pub fn call(
        &self,
        name: &str,
        params: &[String],
        store: &mut ValueStore,
    ) -> Result<String, FunctionError> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| FunctionError::NotFound(name.to_owned()))?;
        function(params, store)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn unknown_function() {
        let functions = Functions::empty();
        let mut store = ValueStore::new();
        let err = functions
            .call("doesNotExist", &[], &mut store)
            .unwrap_err();
        assert!(matches!(err, FunctionError::NotFound(name) if name == "doesNotExist"));
    }

    #[test]
    fn custom_registration_overrides_builtin() {
        let functions =
            Functions::new().with_function("pickRandom", |_params, _store| Ok("fixed".to_owned()));
        let mut store = ValueStore::new();
        let result = functions
            .call("pickRandom", &params(&["a", "b"]), &mut store)
            .unwrap();
        assert_eq!(result, "fixed");
    }

    #[test]
    fn custom_function_sees_store() {
        let functions = Functions::empty().with_function("recall", |params, store| {
            Ok(store.get(&params[0]).unwrap_or("<unset>").to_owned())
        });
        let mut store = ValueStore::new();
        store.set("greeting", "hello");

        let result = functions
            .call("recall", &params(&["greeting"]), &mut store)
            .unwrap();
        assert_eq!(result, "hello");
    }
}
