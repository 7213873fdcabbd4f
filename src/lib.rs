//! Printable table standees for registered business listings.
//!
//! A listing is substituted into a markup template, its printable unit is
//! laid out four times on an A4 sheet, the sheet is rendered through a chain
//! of fallback backends, and the result can be mailed to the listing's owner
//! with a mandatory audit copy. The same delivery path mails owners a
//! report of the quiz responses their standees collected.

pub mod analytics;
pub mod code;
pub mod config;
pub mod delivery;
pub mod error;
pub mod markup;
pub mod pipeline;
pub mod render;
pub mod templating;

pub use analytics::{AnalyticsReport, ReportPeriod};
pub use config::StandeeConfig;
pub use delivery::{MessagePolicy, SmtpNotificationTransport, build_message, build_report_message};
pub use error::PipelineError;
pub use pipeline::{
    AnalyticsReceipt, BackendKind, BulkReportSummary, DeliveryReceipt, PipelineBuilder, StandeePipeline,
};
pub use render::{BackendChain, BackendError, RenderBackend};

pub use standee_resource::{FilesystemTemplateProvider, JsonListingProvider, JsonResponseProvider};
pub use standee_traits::{
    InMemoryListingProvider, InMemoryResponseProvider, InMemoryTemplateProvider, ListingError,
    ListingProvider, NotificationTransport, RecordingTransport, ResponseError, ResponseProvider,
    TemplateError, TemplateProvider, TransportError,
};
pub use standee_types::{
    ArtifactKind, DateRange, ListingId, ListingRecord, ListingStats, ListingUpdate, OutboundMessage,
    QuizResponse, RenderArtifact,
};
