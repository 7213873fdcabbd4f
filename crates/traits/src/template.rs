//! TemplateProvider trait for abstracting template storage.
//!
//! The pipeline loads standee templates by name without knowing whether
//! they come from a directory, an embedded asset or a test fixture.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;

/// Error type for template loading operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Failed to load template '{name}': {message}")]
    LoadFailed { name: String, message: String },

    #[error("Template '{0}' is not valid UTF-8")]
    InvalidEncoding(String),
}

/// A source of raw standee template text.
///
/// # Implementations
///
/// - `FilesystemTemplateProvider` (standee-resource): a template directory
/// - `InMemoryTemplateProvider`: pre-populated memory, used by tests and the
///   bundled default template
pub trait TemplateProvider: Send + Sync + Debug {
    /// Load the raw text of the template called `name`.
    fn load_template(&self, name: &str) -> Result<String, TemplateError>;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An in-memory template provider.
#[derive(Debug, Default)]
pub struct InMemoryTemplateProvider {
    templates: RwLock<HashMap<String, String>>,
}

impl InMemoryTemplateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper that registers one template.
    pub fn with_template(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        // A freshly built provider cannot have a poisoned lock.
        let _ = self.add(name, text);
        self
    }

    /// Add or replace a template.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, name: impl Into<String>, text: impl Into<String>) -> Result<(), TemplateError> {
        let name = name.into();
        let mut templates = self.templates.write().map_err(|_| TemplateError::LoadFailed {
            name: name.clone(),
            message: "template store lock poisoned".to_string(),
        })?;
        templates.insert(name, text.into());
        Ok(())
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.templates.read().map(|t| t.len()).unwrap_or(0)
    }

    /// Returns `true` if the lock is poisoned.
    pub fn is_empty(&self) -> bool {
        self.templates.read().map(|t| t.is_empty()).unwrap_or(true)
    }
}

impl TemplateProvider for InMemoryTemplateProvider {
    fn load_template(&self, name: &str) -> Result<String, TemplateError> {
        let templates = self.templates.read().map_err(|_| TemplateError::LoadFailed {
            name: name.to_string(),
            message: "template store lock poisoned".to_string(),
        })?;
        templates
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    fn name(&self) -> &'static str {
        "InMemoryTemplateProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_provider_add_and_load() {
        let provider = InMemoryTemplateProvider::new();
        provider.add("standee.html", "<p>{{name}}</p>").unwrap();

        let text = provider.load_template("standee.html").unwrap();
        assert_eq!(text, "<p>{{name}}</p>");
    }

    #[test]
    fn test_in_memory_provider_not_found() {
        let provider = InMemoryTemplateProvider::new();
        let result = provider.load_template("missing.html");
        assert_eq!(result, Err(TemplateError::NotFound("missing.html".into())));
    }

    #[test]
    fn test_in_memory_provider_overwrite() {
        let provider = InMemoryTemplateProvider::new()
            .with_template("t", "original")
            .with_template("t", "updated");

        assert_eq!(provider.load_template("t").unwrap(), "updated");
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn test_template_error_display() {
        let err = TemplateError::NotFound("tablestandee.html".to_string());
        assert!(err.to_string().contains("tablestandee.html"));

        let err = TemplateError::LoadFailed {
            name: "a.html".to_string(),
            message: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("a.html"));
        assert!(err.to_string().contains("permission denied"));
    }
}
