mod common;

use common::fixtures::{self, CAFE_FILE_NAME, CAFE_ID};
use common::pdf_assertions::{count_operator, image_count, shown_strings};
use common::{GeneratedPdf, TestResult, pipeline_with};
use standee::render::{LocalPdfBackend, MarkupBackend, VectorBackend};
use standee::{
    ArtifactKind, BackendChain, ListingId, PipelineError, RecordingTransport, TransportError,
};
use std::sync::Arc;

fn local_chain() -> BackendChain {
    BackendChain::new()
        .with_backend(Arc::new(LocalPdfBackend::new()))
        .with_backend(Arc::new(MarkupBackend))
}

#[tokio::test]
async fn tech_hub_cafe_renders_four_units_on_one_page() -> TestResult {
    let pipeline = pipeline_with(local_chain(), Arc::new(RecordingTransport::new()));
    let listing = fixtures::tech_hub_cafe();

    let artifact = pipeline.generate(&ListingId::from(CAFE_ID)).await?;
    assert_eq!(artifact.kind, ArtifactKind::Pdf);
    assert_eq!(artifact.backend, "local");
    assert_eq!(artifact.file_name(&listing), CAFE_FILE_NAME);

    let pdf = GeneratedPdf::from_bytes(artifact.bytes)?;
    assert_eq!(pdf.page_count(), 1);
    let shown = shown_strings(&pdf.doc, 1);
    assert_eq!(shown.iter().filter(|s| s.as_str() == "Tech Hub Cafe").count(), 4);
    assert!(shown.iter().filter(|s| s.contains("abc12345")).count() >= 4);
    assert!(!shown.iter().any(|s| s.contains("Download")));
    Ok(())
}

#[tokio::test]
async fn vector_backend_embeds_the_code_image() -> TestResult {
    let chain = BackendChain::new().with_backend(Arc::new(VectorBackend::new()));
    let pipeline = pipeline_with(chain, Arc::new(RecordingTransport::new()));

    let artifact = pipeline.generate(&ListingId::from(CAFE_ID)).await?;
    assert_eq!(artifact.kind, ArtifactKind::Pdf);
    assert_eq!(artifact.backend, "vector");

    let pdf = GeneratedPdf::from_bytes(artifact.bytes)?;
    assert_eq!(pdf.page_count(), 1);
    assert_eq!(image_count(&pdf.doc), 1);
    assert_eq!(count_operator(&pdf.doc, 1, "Do"), 4);
    Ok(())
}

#[tokio::test]
async fn sending_attaches_pdf_and_copies_audit_address() -> TestResult {
    let transport = Arc::new(RecordingTransport::new());
    let pipeline = pipeline_with(local_chain(), transport.clone());

    let receipt = pipeline.send(&ListingId::from(CAFE_ID)).await?;
    assert_eq!(receipt.to, "owner@techhub.example");
    assert_eq!(receipt.cc.as_deref(), Some("manager@techhub.example"));
    assert_eq!(receipt.kind, ArtifactKind::Pdf);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let message = &sent[0];
    assert_eq!(message.from, fixtures::SENDER);
    assert_eq!(message.bcc, fixtures::AUDIT_BCC);
    assert!(!message.text_body.is_empty());
    let attachment = message.attachment.as_ref().ok_or("missing attachment")?;
    assert_eq!(attachment.filename, CAFE_FILE_NAME);
    assert_eq!(attachment.content_type, "application/pdf");
    assert!(attachment.bytes.starts_with(b"%PDF"));
    Ok(())
}

#[tokio::test]
async fn exhausted_chain_sends_inline_markup() -> TestResult {
    let transport = Arc::new(RecordingTransport::new());
    let pipeline = pipeline_with(BackendChain::new(), transport.clone());

    let receipt = pipeline.send(&ListingId::from(CAFE_ID)).await?;
    assert_eq!(receipt.kind, ArtifactKind::Markup);

    let sent = transport.sent();
    let message = &sent[0];
    assert!(message.attachment.is_none());
    assert!(message.html_body.contains("grid-item"));
    assert_eq!(message.html_body.matches("Tech Hub Cafe").count(), 4);
    assert_eq!(message.bcc, fixtures::AUDIT_BCC);
    Ok(())
}

#[tokio::test]
async fn listing_without_email_is_never_sent() {
    let transport = Arc::new(RecordingTransport::new());
    let pipeline = pipeline_with(local_chain(), transport.clone());
    let bistro = fixtures::unreachable_bistro();

    let err = pipeline.send(&bistro.id).await.unwrap_err();
    assert!(matches!(err, PipelineError::Delivery(_)));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn transport_failure_is_surfaced() {
    let transport = Arc::new(RecordingTransport::failing(TransportError::Rejected(
        "550 mailbox unavailable".to_string(),
    )));
    let pipeline = pipeline_with(local_chain(), transport);

    let err = pipeline.send(&ListingId::from(CAFE_ID)).await.unwrap_err();
    assert!(matches!(err, PipelineError::Transport(TransportError::Rejected(_))));
}

#[tokio::test]
async fn unknown_listing_is_not_found() {
    let pipeline = pipeline_with(local_chain(), Arc::new(RecordingTransport::new()));
    let err = pipeline.generate(&ListingId::from("missing")).await.unwrap_err();
    assert!(matches!(err, PipelineError::Listing(standee::ListingError::NotFound(_))));
}

#[test]
fn composed_sheet_is_deterministic() -> TestResult {
    let pipeline = pipeline_with(local_chain(), Arc::new(RecordingTransport::new()));
    let listing = fixtures::tech_hub_cafe();

    let first = pipeline.compose(&listing)?;
    let second = pipeline.compose(&listing)?;
    assert_eq!(first.as_str(), second.as_str());

    let cells = first.cells();
    assert_eq!(cells.len(), 4);
    assert!(cells.iter().all(|cell| *cell == cells[0]));
    assert!(first.as_str().matches("cutting-guide").count() >= 2);
    Ok(())
}
