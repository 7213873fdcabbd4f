//! Directory-backed template provider.
//!
//! # Security
//!
//! Template names are resolved relative to the base directory and may not
//! escape it (e.g. `../../../etc/passwd`).

use standee_traits::{TemplateError, TemplateProvider};
use std::path::{Component, Path, PathBuf};

/// Loads templates from files under a base directory.
#[derive(Debug)]
pub struct FilesystemTemplateProvider {
    base_path: PathBuf,
    /// Canonicalized base path for security checks
    canonical_base: Option<PathBuf>,
}

impl FilesystemTemplateProvider {
    /// The base path is canonicalized when it exists so resolved template
    /// paths can be checked against it.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Returns `None` if the name would escape the base directory.
    fn resolve_path_safe(&self, name: &str) -> Option<PathBuf> {
        if Path::new(name).is_absolute() {
            return None;
        }

        let full_path = self.base_path.join(name);

        if let (Ok(canonical), Some(base)) = (full_path.canonicalize(), &self.canonical_base) {
            return canonical.starts_with(base).then_some(canonical);
        }

        // Not on disk yet: fall back to a component check.
        if Path::new(name)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return None;
        }

        Some(full_path)
    }
}

impl TemplateProvider for FilesystemTemplateProvider {
    fn load_template(&self, name: &str) -> Result<String, TemplateError> {
        let full_path = self
            .resolve_path_safe(name)
            .ok_or_else(|| TemplateError::NotFound(format!("{} (path traversal blocked)", name)))?;

        let bytes = std::fs::read(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TemplateError::NotFound(name.to_string())
            } else {
                TemplateError::LoadFailed {
                    name: name.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        log::debug!("Loaded template '{}' from {}", name, full_path.display());
        String::from_utf8(bytes).map_err(|_| TemplateError::InvalidEncoding(name.to_string()))
    }

    fn name(&self) -> &'static str {
        "FilesystemTemplateProvider"
    }
}
