use crate::analytics::AnalyticsError;
use crate::config::ConfigError;
use crate::delivery::DeliveryError;
use standee_traits::{ListingError, ResponseError, TemplateError, TransportError};
use thiserror::Error;

/// A comprehensive error type for the standee generation and delivery pipeline.
///
/// Rendering backend failures never appear here: the backend chain recovers
/// from them and degrades to a markup artifact.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Listing error: {0}")]
    Listing(#[from] ListingError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Response store error: {0}")]
    Responses(#[from] ResponseError),

    #[error("Analytics report failed: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
