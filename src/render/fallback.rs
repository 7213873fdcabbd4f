use super::{BackendError, RenderBackend};
use crate::markup::PrintSheet;
use async_trait::async_trait;
use standee_types::{ListingRecord, RenderArtifact};

/// Hands back the print sheet markup unchanged. Always succeeds, so it is
/// the natural last entry of a chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupBackend;

#[async_trait]
impl RenderBackend for MarkupBackend {
    fn name(&self) -> &'static str {
        "markup"
    }

    async fn render(
        &self,
        sheet: &PrintSheet,
        _listing: &ListingRecord,
    ) -> Result<RenderArtifact, BackendError> {
        Ok(RenderArtifact::markup(sheet.as_str(), self.name()))
    }
}
