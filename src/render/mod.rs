//! Rendering backends and the fallback chain that drives them.
//!
//! Every backend turns a [`PrintSheet`] into a [`RenderArtifact`]. The
//! [`BackendChain`] tries them in order and never fails: when every backend
//! errors the sheet markup itself becomes the artifact.

pub mod chain;
mod drawing;
pub mod fallback;
pub mod local;
pub mod remote;
pub mod vector;

pub use chain::BackendChain;
pub use fallback::MarkupBackend;
pub use local::LocalPdfBackend;
pub use remote::RemoteConversionBackend;
pub use vector::VectorBackend;

use crate::markup::PrintSheet;
use async_trait::async_trait;
use standee_types::{ListingRecord, RenderArtifact};
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;

/// A4 portrait in points.
pub(crate) const A4_WIDTH_PT: f32 = 595.28;
pub(crate) const A4_HEIGHT_PT: f32 = 841.89;

/// Errors a single backend can report. The chain logs them and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Backend is not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Conversion job did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Rendering was cancelled")]
    Cancelled,

    #[error("Conversion job failed: {0}")]
    Job(String),

    #[error("Rendering failed: {0}")]
    Render(String),
}

/// One strategy for producing an artifact from a print sheet.
#[async_trait]
pub trait RenderBackend: Send + Sync + Debug {
    /// Short, stable name recorded on produced artifacts and in logs.
    fn name(&self) -> &'static str;

    async fn render(
        &self,
        sheet: &PrintSheet,
        listing: &ListingRecord,
    ) -> Result<RenderArtifact, BackendError>;
}

/// Runs CPU-bound rendering off the async workers.
pub(crate) async fn run_blocking<F>(work: F) -> Result<Vec<u8>, BackendError>
where
    F: FnOnce() -> Result<Vec<u8>, BackendError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| BackendError::Render(format!("render task failed: {}", e)))?
}
