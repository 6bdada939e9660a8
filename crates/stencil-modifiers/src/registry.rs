//! Name-to-transform modifier registry.

use std::collections::HashMap;
use std::fmt;

use crate::builtin;
use crate::error::ModifierError;

/// Boxed modifier callable: one string in, one string out.
pub type ModifierFn = Box<dyn Fn(&str) -> Result<String, ModifierError> + Send + Sync>;

/// Registry mapping modifier names to transforms.
pub struct Modifiers {
    modifiers: HashMap<String, ModifierFn>,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modifiers")
            .field("registered", &self.modifiers.len())
            .finish()
    }
}

impl Modifiers {
    /// Registry pre-populated with the built-in modifier set.
    #[must_use]
    pub fn new() -> Self {
        builtin::register(Self::empty())
    }

    /// Registry with no modifiers registered at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            modifiers: HashMap::new(),
        }
    }

    /// Register `f` under `name`, replacing any previous registration.
    #[must_use]
    pub fn with_modifier<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> Result<String, ModifierError> + Send + Sync + 'static,
    {
        self.modifiers.insert(name.into(), Box::new(f));
        self
    }

    /// Whether a modifier is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.modifiers.contains_key(name)
    }

    /// Resolve `name` and apply it to `value`.
    pub fn call(&self, name: &str, value: &str) -> Result<String, ModifierError> {
        let modifier = self
            .modifiers
            .get(name)
            .ok_or_else(|| ModifierError::NotFound(name.to_owned()))?;
        modifier(value)
    }

    /// Apply a sequence of modifiers left to right.
    pub fn call_chain<'a>(
        &self,
        value: &str,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<String, ModifierError> {
        let mut value = value.to_owned();
        for name in names {
            value = self.call(name, &value)?;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn unknown_modifier() {
        let modifiers = Modifiers::new();
        let err = modifiers.call("doesNotExist", "value").unwrap_err();
        assert!(matches!(err, ModifierError::NotFound(name) if name == "doesNotExist"));
    }

    #[test]
    fn chain_applies_left_to_right() {
        let modifiers = Modifiers::new();
        // title first, then hash: the digest is of the title-cased text.
        let chained = modifiers
            .call_chain("my string in title case", ["title", "sha256"])
            .unwrap();
        let direct = modifiers.call("sha256", "My String In Title Case").unwrap();
        assert_eq!(chained, direct);
    }

    #[test]
    fn custom_registration() {
        let modifiers =
            Modifiers::empty().with_modifier("reverse", |v| Ok(v.chars().rev().collect()));
        assert_eq!(modifiers.call("reverse", "abc").unwrap(), "cba");
        assert!(!modifiers.contains("upper"));
    }
}
