pub mod fixtures;
pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use standee::{
    BackendChain, MessagePolicy, PipelineBuilder, RecordingTransport, StandeePipeline,
};
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    /// Create a GeneratedPdf from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    /// Get the number of pages in the PDF
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn audit_policy() -> MessagePolicy {
    MessagePolicy::new(fixtures::SENDER, fixtures::AUDIT_BCC).expect("valid policy")
}

/// A pipeline over the bundled template and the fixture listings, rendering
/// through `chain` and delivering into `transport`.
pub fn pipeline_with(chain: BackendChain, transport: Arc<RecordingTransport>) -> StandeePipeline {
    init_logging();
    PipelineBuilder::new()
        .with_listing_provider(Arc::new(fixtures::listing_provider()))
        .with_chain(chain)
        .with_policy(audit_policy())
        .with_transport(transport)
        .build()
        .expect("pipeline builds")
}
