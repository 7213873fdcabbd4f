//! Turns a rendered artifact or an analytics report into an outbound
//! message.
//!
//! The copy policy is enforced here, not by transports: every message is
//! addressed to the listing's primary email, copies a distinct secondary
//! email, and blind-copies the operator audit address from configuration.

pub mod smtp;

pub use smtp::SmtpNotificationTransport;

use crate::analytics::AnalyticsReport;
use crate::config::{ConfigError, SmtpConfig};
use standee_types::{ArtifactKind, Attachment, ListingId, ListingRecord, OutboundMessage, RenderArtifact};
use thiserror::Error;

pub const PDF_SUBJECT: &str =
    "AI Spot Standee - Print this in color and display on your tables (6inch x 4inch)";
pub const MARKUP_SUBJECT: &str = "AI Spot Standee - Your table standee is ready to print";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Listing {0} has no recipient email")]
    MissingRecipient(ListingId),

    #[error("Markup artifact for listing {0} is not valid UTF-8")]
    UnreadableMarkup(ListingId),
}

/// Sender identity and the mandatory audit copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePolicy {
    from: String,
    operator_bcc: String,
}

impl MessagePolicy {
    /// Fails when either address is blank: a policy without an audit
    /// address cannot exist.
    pub fn new(from: impl Into<String>, operator_bcc: impl Into<String>) -> Result<Self, ConfigError> {
        let from = from.into().trim().to_string();
        let operator_bcc = operator_bcc.into().trim().to_string();
        if from.is_empty() {
            return Err(ConfigError::Invalid("sender address is empty".to_string()));
        }
        if operator_bcc.is_empty() {
            return Err(ConfigError::Invalid("operator bcc address is empty".to_string()));
        }
        Ok(Self { from, operator_bcc })
    }

    pub fn from_smtp(config: &SmtpConfig) -> Result<Self, ConfigError> {
        Self::new(config.email.as_str(), config.bcc.as_str())
    }

    pub fn from_address(&self) -> &str {
        &self.from
    }

    pub fn operator_bcc(&self) -> &str {
        &self.operator_bcc
    }
}

/// Assembles the message for `listing` carrying `artifact`.
///
/// - `Pdf`: print instructions as the body, the document attached as
///   `standee_{name}_{short id}.pdf`.
/// - `Markup`: the artifact markup is the HTML body and nothing is attached.
///
/// A plain-text alternative is always included.
pub fn build_message(
    listing: &ListingRecord,
    artifact: &RenderArtifact,
    policy: &MessagePolicy,
) -> Result<OutboundMessage, DeliveryError> {
    let (to, cc) = recipients(listing)?;

    let (subject, html_body, attachment) = match artifact.kind {
        ArtifactKind::Pdf => (
            PDF_SUBJECT,
            pdf_html_body(listing),
            Some(Attachment {
                filename: artifact.file_name(listing),
                content_type: artifact.kind.content_type().to_string(),
                bytes: artifact.bytes.clone(),
            }),
        ),
        ArtifactKind::Markup => {
            let markup = artifact
                .as_markup()
                .ok_or_else(|| DeliveryError::UnreadableMarkup(listing.id.clone()))?;
            (MARKUP_SUBJECT, markup.to_string(), None)
        }
    };

    Ok(OutboundMessage {
        from: policy.from.clone(),
        to,
        cc,
        bcc: policy.operator_bcc.clone(),
        subject: subject.to_string(),
        html_body,
        text_body: text_body(listing, artifact.kind),
        attachment,
    })
}

/// Assembles the analytics mail for `listing`: the report summary as the
/// body and the response rows attached as CSV. Addressing and the audit copy
/// follow the same rules as [`build_message`].
pub fn build_report_message(
    listing: &ListingRecord,
    report: &AnalyticsReport,
    policy: &MessagePolicy,
) -> Result<OutboundMessage, DeliveryError> {
    let (to, cc) = recipients(listing)?;
    Ok(OutboundMessage {
        from: policy.from.clone(),
        to,
        cc,
        bcc: policy.operator_bcc.clone(),
        subject: format!(
            "AI Spot, {}, Your customer data and analytics for {}",
            listing.name, report.period_label
        ),
        html_body: report.html_body.clone(),
        text_body: report.text_body.clone(),
        attachment: Some(Attachment {
            filename: report.file_name.clone(),
            content_type: "text/csv".to_string(),
            bytes: report.csv.clone(),
        }),
    })
}

/// Primary recipient and optional copy.
fn recipients(listing: &ListingRecord) -> Result<(String, Option<String>), DeliveryError> {
    let to = listing
        .primary_email()
        .ok_or_else(|| DeliveryError::MissingRecipient(listing.id.clone()))?
        .to_string();
    let cc = copy_recipient(listing, &to);
    Ok((to, cc))
}

/// The secondary email, unless blank or the same mailbox as `to`.
fn copy_recipient(listing: &ListingRecord, to: &str) -> Option<String> {
    listing
        .secondary_email
        .as_deref()
        .map(str::trim)
        .filter(|cc| !cc.is_empty() && !cc.eq_ignore_ascii_case(to))
        .map(str::to_string)
}

fn pdf_html_body(listing: &ListingRecord) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #1f2937;">
    <p>Dear {manager},</p>
    <p>Your table standee for <strong>{name}</strong> is attached as a PDF.</p>
    <ol>
        <li>Print the attached PDF in color on A4 paper.</li>
        <li>Cut along the dashed guides into four 6 inch x 4 inch standees.</li>
        <li>Display them on your tables.</li>
    </ol>
    <p>AI Spot ID: {short_id}</p>
    <p>Best regards,<br>The AI Spot Team</p>
</body>
</html>"#,
        manager = listing.manager_name,
        name = listing.name,
        short_id = listing.short_id(),
    )
}

fn text_body(listing: &ListingRecord, kind: ArtifactKind) -> String {
    let instructions = match kind {
        ArtifactKind::Pdf => {
            "Instructions:\n\
             1. Open the attached PDF\n\
             2. Print in color on A4 paper\n\
             3. Cut along the dashed guides to 6 inch x 4 inch\n\
             4. Display on your tables"
        }
        ArtifactKind::Markup => {
            "Please open this email in an email client that supports HTML to view your standee.\n\n\
             Instructions:\n\
             1. Open this email on a computer\n\
             2. Print in color on A4 paper\n\
             3. Cut along the dashed guides to 6 inch x 4 inch\n\
             4. Display on your tables"
        }
    };

    format!(
        "AI Spot Standee\n\n\
         Dear {manager},\n\n\
         {instructions}\n\n\
         Your AI Spot Details:\n\
         - Name: {name}\n\
         - Type: {category}\n\
         - Manager: {manager}\n\
         - AI Spot ID: {short_id}\n\n\
         Best regards,\n\
         The AI Spot Team\n",
        manager = listing.manager_name,
        instructions = instructions,
        name = listing.name,
        category = listing.category,
        short_id = listing.short_id(),
    )
}
