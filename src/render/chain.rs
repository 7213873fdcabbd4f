use super::{
    LocalPdfBackend, MarkupBackend, RemoteConversionBackend, RenderBackend, VectorBackend,
};
use crate::config::RemoteConfig;
use crate::markup::PrintSheet;
use crate::pipeline::BackendKind;
use standee_types::{ListingRecord, RenderArtifact};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Name recorded on the artifact produced when every backend failed.
pub const EXHAUSTED_BACKEND: &str = "markup";

/// An ordered list of rendering backends with fallback-on-failure.
#[derive(Debug, Clone, Default)]
pub struct BackendChain {
    backends: Vec<Arc<dyn RenderBackend>>,
}

impl BackendChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard backends in the given order. The remote backend
    /// stops polling when `cancel` fires.
    pub fn from_kinds(kinds: &[BackendKind], remote: &RemoteConfig, cancel: CancellationToken) -> Self {
        let backends = kinds
            .iter()
            .map(|kind| -> Arc<dyn RenderBackend> {
                match kind {
                    BackendKind::Remote => Arc::new(
                        RemoteConversionBackend::new(remote.clone()).with_cancellation(cancel.clone()),
                    ),
                    BackendKind::Local => Arc::new(LocalPdfBackend::new()),
                    BackendKind::Vector => Arc::new(VectorBackend::new()),
                    BackendKind::Markup => Arc::new(MarkupBackend),
                }
            })
            .collect();
        Self { backends }
    }

    pub fn with_backend(mut self, backend: Arc<dyn RenderBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Tries each backend in order and returns the first artifact produced.
    ///
    /// Failures are logged and skipped. Backends after the first success are
    /// never invoked. If all fail the result is a markup artifact holding
    /// the sheet markup.
    pub async fn render_artifact(&self, sheet: &PrintSheet, listing: &ListingRecord) -> RenderArtifact {
        for backend in &self.backends {
            log::info!("Rendering listing {} with backend '{}'", listing.id, backend.name());
            match backend.render(sheet, listing).await {
                Ok(artifact) => {
                    log::info!(
                        "Backend '{}' produced {} bytes of {:?}",
                        backend.name(),
                        artifact.bytes.len(),
                        artifact.kind
                    );
                    return artifact;
                }
                Err(e) => {
                    log::warn!("Backend '{}' failed, trying next: {}", backend.name(), e);
                }
            }
        }

        log::warn!(
            "All rendering backends failed for listing {}; delivering print markup",
            listing.id
        );
        RenderArtifact::markup(sheet.as_str(), EXHAUSTED_BACKEND)
    }
}
