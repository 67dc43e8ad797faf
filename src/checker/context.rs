//! Locations used to pin proof errors.
//!
//! A [`ModuleContext`] names a module and a dotted path inside it, such as
//! `proof.line[2].reason.reference1`. Contexts are immutable; every
//! extension returns a new value.

use std::fmt;

/// A module identity plus a path to a node inside that module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleContext {
    module: String,
    location: String,
}

impl ModuleContext {
    /// Creates a context for `location` inside `module`.
    #[must_use]
    pub fn new(module: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            location: location.into(),
        }
    }

    /// Returns the module identity.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Returns the path inside the module.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Extends the path by a named segment.
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        let location = if self.location.is_empty() {
            name.to_owned()
        } else {
            format!("{}.{name}", self.location)
        };
        Self {
            module: self.module.clone(),
            location,
        }
    }

    /// Extends the path by an indexed segment, `name[index]`.
    #[must_use]
    pub fn indexed(&self, name: &str, index: usize) -> Self {
        self.field(&format!("{name}[{index}]"))
    }

    /// Extends the path by a child-index path into a formula, one
    /// `element[i]` segment per step.
    #[must_use]
    pub fn formula_path(&self, path: &[usize]) -> Self {
        path.iter()
            .fold(self.clone(), |context, &index| context.indexed("element", index))
    }
}

impl fmt::Display for ModuleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.location)
    }
}
