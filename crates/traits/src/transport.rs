//! NotificationTransport trait for outbound message delivery.

use async_trait::async_trait;
use standee_types::OutboundMessage;
use std::fmt::Debug;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Transport is not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    #[error("Authentication with the mail server failed: {0}")]
    Authentication(String),

    #[error("Message rejected: {0}")]
    Rejected(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),
}

/// Delivers assembled messages. Failures are reported, never retried here.
#[async_trait]
pub trait NotificationTransport: Send + Sync + Debug {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;

    fn name(&self) -> &'static str;
}

/// A transport that keeps every message in memory instead of sending it.
///
/// Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutboundMessage>>,
    fail_with: Option<TransportError>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that rejects every message with `error`.
    pub fn failing(error: TransportError) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(error),
        }
    }

    /// Messages accepted so far. Empty if the lock is poisoned.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NotificationTransport for RecordingTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| TransportError::Rejected("outbox lock poisoned".to_string()))?;
        sent.push(message.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "RecordingTransport"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> OutboundMessage {
        OutboundMessage {
            from: "ops@example.com".into(),
            to: "owner@example.com".into(),
            cc: None,
            bcc: "audit@example.com".into(),
            subject: "Standee".into(),
            html_body: "<p>hi</p>".into(),
            text_body: "hi".into(),
            attachment: None,
        }
    }

    #[tokio::test]
    async fn recording_transport_keeps_messages() {
        let transport = RecordingTransport::new();
        transport.send(&message()).await.unwrap();
        assert_eq!(transport.sent(), vec![message()]);
    }

    #[tokio::test]
    async fn failing_transport_records_nothing() {
        let transport = RecordingTransport::failing(TransportError::Rejected("550".into()));
        let err = transport.send(&message()).await.unwrap_err();
        assert_eq!(err, TransportError::Rejected("550".into()));
        assert!(transport.sent().is_empty());
    }
}
