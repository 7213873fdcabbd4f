//! Standee generation and delivery orchestration.
//!
//! - [`PipelineBuilder`]: wires providers, the backend chain and delivery
//! - [`StandeePipeline`]: runs listing → markup → sheet → artifact → message,
//!   and mails per-listing quiz analytics reports
//! - [`BackendKind`]: names a rendering backend in configuration
//!
//! # Example
//!
//! ```ignore
//! use standee::{PipelineBuilder, StandeeConfig};
//!
//! let config = StandeeConfig::load()?;
//! let pipeline = PipelineBuilder::new().with_config(&config).build()?;
//! let artifact = pipeline.generate(&"abc12345-6789".into()).await?;
//! ```

mod builder;
pub mod config;

pub use builder::PipelineBuilder;
pub use config::BackendKind;

use crate::analytics::{AnalyticsReport, ReportPeriod};
use crate::config::ConfigError;
use crate::delivery::{DeliveryError, MessagePolicy, build_message, build_report_message};
use crate::error::PipelineError;
use crate::markup::{PrintSheet, compose_grid, extract_unit, strip_non_printable};
use crate::render::BackendChain;
use crate::templating::{self, Placeholder};
use chrono::Utc;
use standee_traits::{ListingProvider, NotificationTransport, ResponseProvider, TemplateProvider};
use standee_types::{
    ArtifactKind, ListingId, ListingRecord, ListingStats, ListingUpdate, RenderArtifact,
};
use std::sync::Arc;

/// Template shipped with the crate, used when no template directory exists.
pub const BUNDLED_TEMPLATE: &str = include_str!("../../templates/tablestandee.html");

/// What a successful send delivered, and to whom. The audit copy is not
/// reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub listing_id: ListingId,
    pub to: String,
    pub cc: Option<String>,
    pub kind: ArtifactKind,
    pub backend: &'static str,
}

/// What an analytics send delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsReceipt {
    pub listing_id: ListingId,
    pub to: String,
    pub cc: Option<String>,
    pub response_count: usize,
    pub file_name: String,
}

/// Outcome of mailing reports to every listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReportSummary {
    pub sent: usize,
    /// Names of the listings whose report could not be sent.
    pub failed: Vec<String>,
}

/// A fully configured standee pipeline.
///
/// Holds no per-request state: every call builds its own markup, sheet and
/// artifact.
#[derive(Debug)]
pub struct StandeePipeline {
    templates: Arc<dyn TemplateProvider>,
    listings: Arc<dyn ListingProvider>,
    chain: BackendChain,
    template_name: String,
    responses: Option<Arc<dyn ResponseProvider>>,
    policy: Option<MessagePolicy>,
    transport: Option<Arc<dyn NotificationTransport>>,
}

impl StandeePipeline {
    pub fn chain(&self) -> &BackendChain {
        &self.chain
    }

    /// Renders the configured template for `listing` and lays four copies of
    /// its printable unit onto a sheet.
    pub fn compose(&self, listing: &ListingRecord) -> Result<PrintSheet, PipelineError> {
        let template = self.templates.load_template(&self.template_name)?;
        let full = templating::render(&template, listing);
        let unit = extract_unit(&strip_non_printable(&full));
        Ok(compose_grid(&unit))
    }

    pub fn listing(&self, id: &ListingId) -> Result<ListingRecord, PipelineError> {
        Ok(self.listings.get_listing(id)?)
    }

    pub async fn generate(&self, id: &ListingId) -> Result<RenderArtifact, PipelineError> {
        let listing = self.listings.get_listing(id)?;
        self.generate_for(&listing).await
    }

    /// Produces the artifact for an already loaded listing. Backend failures
    /// degrade the artifact kind; only template or listing errors surface.
    pub async fn generate_for(&self, listing: &ListingRecord) -> Result<RenderArtifact, PipelineError> {
        let sheet = self.compose(listing)?;
        let artifact = self.chain.render_artifact(&sheet, listing).await;
        log::info!(
            "Generated {:?} standee for listing {} via '{}' ({} bytes)",
            artifact.kind,
            listing.short_id(),
            artifact.backend,
            artifact.bytes.len()
        );
        Ok(artifact)
    }

    /// The placeholders the configured template uses and the ones it lacks.
    pub fn template_placeholders(&self) -> Result<(Vec<Placeholder>, Vec<Placeholder>), PipelineError> {
        let template = self.templates.load_template(&self.template_name)?;
        let present = templating::placeholders_in(&template);
        let missing = Placeholder::ALL
            .into_iter()
            .filter(|p| !present.contains(p))
            .collect();
        Ok((present, missing))
    }

    /// The full substituted template, action region included.
    pub fn preview(&self, id: &ListingId) -> Result<String, PipelineError> {
        let listing = self.listings.get_listing(id)?;
        let template = self.templates.load_template(&self.template_name)?;
        Ok(templating::render(&template, &listing))
    }

    pub async fn send(&self, id: &ListingId) -> Result<DeliveryReceipt, PipelineError> {
        let listing = self.listings.get_listing(id)?;
        self.send_for(&listing).await
    }

    /// Generates and delivers the standee for `listing`.
    ///
    /// Configuration and recipient problems are reported before anything is
    /// rendered, so no remote job is started for a message that cannot go out.
    pub async fn send_for(&self, listing: &ListingRecord) -> Result<DeliveryReceipt, PipelineError> {
        let (policy, transport) = self.delivery()?;
        if listing.primary_email().is_none() {
            return Err(DeliveryError::MissingRecipient(listing.id.clone()).into());
        }

        let artifact = self.generate_for(listing).await?;
        let message = build_message(listing, &artifact, policy)?;
        transport.send(&message).await?;

        log::info!(
            "Delivered standee for listing {} to {} via {}",
            listing.short_id(),
            message.to,
            transport.name()
        );
        Ok(DeliveryReceipt {
            listing_id: listing.id.clone(),
            to: message.to,
            cc: message.cc,
            kind: artifact.kind,
            backend: artifact.backend,
        })
    }

    fn delivery(&self) -> Result<(&MessagePolicy, &Arc<dyn NotificationTransport>), ConfigError> {
        let policy = self.policy.as_ref().ok_or_else(|| {
            ConfigError::Invalid("no message policy: smtp.email and smtp.bcc must be set".to_string())
        })?;
        let transport = self
            .transport
            .as_ref()
            .ok_or_else(|| ConfigError::Invalid("no notification transport configured".to_string()))?;
        Ok((policy, transport))
    }

    pub async fn send_analytics(
        &self,
        id: &ListingId,
        period: &ReportPeriod,
    ) -> Result<AnalyticsReceipt, PipelineError> {
        let listing = self.listings.get_listing(id)?;
        self.send_analytics_for(&listing, period).await
    }

    /// Mails `listing` its quiz responses for `period` as a summary plus a
    /// CSV attachment. A period without responses still sends a report.
    pub async fn send_analytics_for(
        &self,
        listing: &ListingRecord,
        period: &ReportPeriod,
    ) -> Result<AnalyticsReceipt, PipelineError> {
        let (policy, transport) = self.delivery()?;
        let responses = self
            .responses
            .as_ref()
            .ok_or_else(|| ConfigError::Invalid("no response provider configured".to_string()))?;
        if listing.primary_email().is_none() {
            return Err(DeliveryError::MissingRecipient(listing.id.clone()).into());
        }

        let now = Utc::now();
        let found = responses.responses_for(&listing.id, &period.range(now))?;
        let report = AnalyticsReport::new(listing, &found, period, now)?;
        let message = build_report_message(listing, &report, policy)?;
        transport.send(&message).await?;

        log::info!(
            "Delivered analytics for listing {} ({} responses, {}) to {}",
            listing.short_id(),
            report.response_count,
            report.period_label,
            message.to
        );
        Ok(AnalyticsReceipt {
            listing_id: listing.id.clone(),
            to: message.to,
            cc: message.cc,
            response_count: report.response_count,
            file_name: report.file_name,
        })
    }

    /// Sends a report to every listing. A failure for one listing is logged
    /// and counted; it does not stop the others.
    pub async fn send_bulk_analytics(&self, period: &ReportPeriod) -> Result<BulkReportSummary, PipelineError> {
        self.delivery()?;
        let mut summary = BulkReportSummary::default();
        for listing in self.listings.list_listings()? {
            match self.send_analytics_for(&listing, period).await {
                Ok(_) => summary.sent += 1,
                Err(e) => {
                    log::warn!("Analytics for listing {} not sent: {}", listing.short_id(), e);
                    summary.failed.push(listing.name);
                }
            }
        }
        log::info!(
            "Bulk analytics: {} sent, {} failed",
            summary.sent,
            summary.failed.len()
        );
        Ok(summary)
    }

    /// Sends a standee for [`sample_listing`] addressed to `recipient`.
    pub async fn send_sample(&self, recipient: &str) -> Result<DeliveryReceipt, PipelineError> {
        self.send_for(&sample_listing(recipient)).await
    }

    pub fn approve(&self, id: &ListingId, approved: bool) -> Result<ListingRecord, PipelineError> {
        let listing = self
            .listings
            .update_listing(id, ListingUpdate::approval(approved))?;
        log::info!(
            "Listing {} {}",
            listing.short_id(),
            if approved { "approved" } else { "approval revoked" }
        );
        Ok(listing)
    }

    /// Applies field edits to a listing and returns the stored result.
    pub fn update(&self, id: &ListingId, update: ListingUpdate) -> Result<ListingRecord, PipelineError> {
        let listing = self.listings.update_listing(id, update)?;
        log::info!("Listing {} updated", listing.short_id());
        Ok(listing)
    }

    /// All listings, newest first.
    pub fn list(&self) -> Result<Vec<ListingRecord>, PipelineError> {
        Ok(self.listings.list_listings()?)
    }

    pub fn stats(&self) -> Result<ListingStats, PipelineError> {
        let listings = self.listings.list_listings()?;
        Ok(ListingStats::from_listings(&listings))
    }
}

/// The listing used for test emails.
pub fn sample_listing(recipient: &str) -> ListingRecord {
    let mut listing = ListingRecord::new("test1234-5678-90ab-cdef-1234567890ab");
    listing.name = "Test AI Spot Cafe".to_string();
    listing.category = "Testing Facility".to_string();
    listing.manager_name = "Test Manager".to_string();
    listing.email = recipient.trim().to_string();
    listing.reference_link = "https://example.com/spot/test".to_string();
    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MarkupBackend;
    use chrono::Duration;
    use standee_traits::{
        InMemoryListingProvider, InMemoryResponseProvider, InMemoryTemplateProvider, RecordingTransport,
    };
    use standee_types::QuizResponse;

    const TEMPLATE: &str = r#"<html><head><style>.page{color:red}</style></head><body>
<div class="page"><h1>{{name}}</h1><p>{{aispot_id}}</p></div>
<div class="download-section"><button>Download</button></div>
</body></html>"#;

    fn listing() -> ListingRecord {
        let mut listing = ListingRecord::new("abc12345-6789");
        listing.name = "Tech Hub Cafe".into();
        listing.email = "owner@example.com".into();
        listing
    }

    fn pipeline(transport: Arc<RecordingTransport>) -> StandeePipeline {
        PipelineBuilder::new()
            .with_template_provider(Arc::new(
                InMemoryTemplateProvider::new().with_template("standee.html", TEMPLATE),
            ))
            .with_template_name("standee.html")
            .with_listing_provider(Arc::new(InMemoryListingProvider::with_listings([listing()])))
            .with_response_provider(Arc::new(InMemoryResponseProvider::with_responses([
                recent_response("Asha", 2),
                recent_response("Ravi", 30),
            ])))
            .with_chain(BackendChain::new().with_backend(Arc::new(MarkupBackend)))
            .with_policy(MessagePolicy::new("standees@example.com", "audit@example.com").unwrap())
            .with_transport(transport)
            .build()
            .unwrap()
    }

    fn recent_response(name: &str, hours_ago: i64) -> QuizResponse {
        QuizResponse {
            listing_id: "abc12345-6789".into(),
            name: name.into(),
            created_at: Some(Utc::now() - Duration::hours(hours_ago)),
            ..Default::default()
        }
    }

    #[test]
    fn compose_keeps_unit_and_drops_action_region() {
        let pipeline = pipeline(Arc::new(RecordingTransport::new()));
        let sheet = pipeline.compose(&listing()).unwrap();
        assert_eq!(sheet.cells().len(), 4);
        assert!(!sheet.as_str().contains("Download"));
        assert_eq!(sheet.as_str().matches(".page{color:red}").count(), 1);
    }

    #[test]
    fn preview_keeps_action_region() {
        let pipeline = pipeline(Arc::new(RecordingTransport::new()));
        let preview = pipeline.preview(&"abc12345-6789".into()).unwrap();
        assert!(preview.contains("Download"));
        assert!(preview.contains("<p>abc12345</p>"));
    }

    #[tokio::test]
    async fn send_without_recipient_never_reaches_transport() {
        let transport = Arc::new(RecordingTransport::new());
        let pipeline = pipeline(transport.clone());
        let mut no_email = listing();
        no_email.email.clear();

        let err = pipeline.send_for(&no_email).await.unwrap_err();
        assert!(matches!(err, PipelineError::Delivery(_)));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn send_reports_delivery() {
        let transport = Arc::new(RecordingTransport::new());
        let pipeline = pipeline(transport.clone());
        let receipt = pipeline.send(&"abc12345-6789".into()).await.unwrap();

        assert_eq!(receipt.to, "owner@example.com");
        assert_eq!(receipt.kind, ArtifactKind::Markup);
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].bcc, "audit@example.com");
    }

    #[test]
    fn sample_listing_is_addressed_to_recipient() {
        let sample = sample_listing(" qa@example.com ");
        assert_eq!(sample.primary_email(), Some("qa@example.com"));
        assert_eq!(sample.short_id(), "test1234");
    }

    #[test]
    fn template_placeholders_reports_missing_tokens() {
        let pipeline = pipeline(Arc::new(RecordingTransport::new()));
        let (present, missing) = pipeline.template_placeholders().unwrap();
        assert_eq!(present, vec![Placeholder::Name, Placeholder::ShortId]);
        assert_eq!(
            missing,
            vec![Placeholder::Category, Placeholder::ManagerName, Placeholder::ReferenceLink]
        );
    }

    #[tokio::test]
    async fn analytics_report_covers_last_day_only() {
        let transport = Arc::new(RecordingTransport::new());
        let pipeline = pipeline(transport.clone());

        let receipt = pipeline
            .send_analytics(&"abc12345-6789".into(), &ReportPeriod::LastDay)
            .await
            .unwrap();
        assert_eq!(receipt.response_count, 1);
        assert!(receipt.file_name.starts_with("aispot_Tech_Hub_Cafe_"));

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].bcc, "audit@example.com");
        let csv = String::from_utf8(sent[0].attachment.as_ref().unwrap().bytes.clone()).unwrap();
        assert!(csv.contains("Asha"));
        assert!(!csv.contains("Ravi"));
    }

    #[tokio::test]
    async fn analytics_without_response_provider_is_a_config_error() {
        let transport = Arc::new(RecordingTransport::new());
        let pipeline = PipelineBuilder::new()
            .with_listing_provider(Arc::new(InMemoryListingProvider::with_listings([listing()])))
            .with_policy(MessagePolicy::new("standees@example.com", "audit@example.com").unwrap())
            .with_transport(transport.clone())
            .build()
            .unwrap();

        let err = pipeline
            .send_analytics(&"abc12345-6789".into(), &ReportPeriod::LastDay)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
        assert!(transport.sent().is_empty());
    }
}
