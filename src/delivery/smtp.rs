//! SMTP delivery through `lettre`.

use crate::config::SmtpConfig;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MailAttachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use standee_traits::{NotificationTransport, TransportError};
use standee_types::OutboundMessage;
use std::fmt;

pub struct SmtpNotificationTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    port: u16,
    timeout_secs: u64,
}

impl fmt::Debug for SmtpNotificationTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpNotificationTransport")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl SmtpNotificationTransport {
    /// Builds the transport, refusing incomplete settings with every
    /// missing field listed in the error.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, TransportError> {
        let issues = config.issues();
        if !issues.is_empty() {
            return Err(TransportError::NotConfigured(issues.join(", ")));
        }
        let password = config
            .password()
            .ok_or_else(|| TransportError::NotConfigured("smtp.password not set".to_string()))?;

        let builder = if config.use_ssl {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| TransportError::NotConfigured(format!("smtp.host: {}", e)))?;

        let mailer = builder
            .port(config.port)
            .credentials(Credentials::new(config.email.clone(), password.to_string()))
            .timeout(Some(config.timeout()))
            .build();

        Ok(Self {
            mailer,
            host: config.host.clone(),
            port: config.port,
            timeout_secs: config.timeout_secs,
        })
    }
}

fn mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address.parse().map_err(|e: lettre::address::AddressError| TransportError::InvalidAddress {
        address: address.to_string(),
        message: e.to_string(),
    })
}

/// Converts to a MIME message. The bcc address only reaches the envelope;
/// lettre strips the header when formatting.
pub(crate) fn to_mail(message: &OutboundMessage) -> Result<Message, TransportError> {
    let mut builder = Message::builder()
        .from(mailbox(&message.from)?)
        .to(mailbox(&message.to)?)
        .bcc(mailbox(&message.bcc)?)
        .subject(message.subject.as_str());
    if let Some(cc) = &message.cc {
        builder = builder.cc(mailbox(cc)?);
    }

    let alternative =
        MultiPart::alternative_plain_html(message.text_body.clone(), message.html_body.clone());
    let body = match &message.attachment {
        Some(attachment) => {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|e| TransportError::Rejected(format!("content type: {}", e)))?;
            MultiPart::mixed().multipart(alternative).singlepart(
                MailAttachment::new(attachment.filename.clone())
                    .body(attachment.bytes.clone(), content_type),
            )
        }
        None => alternative,
    };

    builder
        .multipart(body)
        .map_err(|e| TransportError::Rejected(e.to_string()))
}

fn classify(error: lettre::transport::smtp::Error, timeout_secs: u64) -> TransportError {
    if error.is_timeout() {
        return TransportError::Timeout(timeout_secs);
    }
    let status = error.status().map(|code| code.to_string());
    match status.as_deref() {
        Some(code) if code.starts_with("53") => TransportError::Authentication(error.to_string()),
        _ => TransportError::Rejected(error.to_string()),
    }
}

#[async_trait]
impl NotificationTransport for SmtpNotificationTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        let mail = to_mail(message)?;
        log::debug!(
            "Sending '{}' to {} via {}:{}",
            message.subject,
            message.to,
            self.host,
            self.port
        );
        self.mailer
            .send(mail)
            .await
            .map(|_| ())
            .map_err(|e| classify(e, self.timeout_secs))
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use standee_types::Attachment;

    fn message() -> OutboundMessage {
        OutboundMessage {
            from: "standees@example.com".into(),
            to: "owner@example.com".into(),
            cc: Some("manager@example.com".into()),
            bcc: "audit@example.com".into(),
            subject: "Your standee".into(),
            html_body: "<p>Hello</p>".into(),
            text_body: "Hello".into(),
            attachment: Some(Attachment {
                filename: "standee_Tech_Hub_Cafe_abc12345.pdf".into(),
                content_type: "application/pdf".into(),
                bytes: b"%PDF-1.7".to_vec(),
            }),
        }
    }

    #[test]
    fn bcc_reaches_envelope_but_not_headers() {
        let mail = to_mail(&message()).unwrap();
        let recipients: Vec<String> = mail.envelope().to().iter().map(|a| a.to_string()).collect();
        assert!(recipients.contains(&"audit@example.com".to_string()));
        assert!(recipients.contains(&"manager@example.com".to_string()));

        let formatted = String::from_utf8_lossy(&mail.formatted()).to_string();
        assert!(!formatted.contains("Bcc:"));
        assert!(formatted.contains("standee_Tech_Hub_Cafe_abc12345.pdf"));
    }

    #[test]
    fn invalid_address_is_reported() {
        let mut msg = message();
        msg.to = "not-an-address".into();
        assert!(matches!(
            to_mail(&msg),
            Err(TransportError::InvalidAddress { address, .. }) if address == "not-an-address"
        ));
    }

    #[test]
    fn incomplete_settings_list_every_issue() {
        let err = SmtpNotificationTransport::from_config(&SmtpConfig::default()).unwrap_err();
        match err {
            TransportError::NotConfigured(issues) => {
                assert!(issues.contains("smtp.email not set"));
                assert!(issues.contains("smtp.password not set"));
                assert!(issues.contains("smtp.bcc not set"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
