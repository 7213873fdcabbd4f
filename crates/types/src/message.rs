/// A file carried by an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A fully assembled notification, ready for a transport.
///
/// `bcc` is not optional: every message carries the operator audit copy.
/// Transports must deliver it through the envelope only, never as a visible
/// header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from: String,
    pub to: String,
    pub cc: Option<String>,
    pub bcc: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    pub attachment: Option<Attachment>,
}

impl OutboundMessage {
    /// All envelope recipients in delivery order: primary, copy, blind copy.
    pub fn envelope_recipients(&self) -> Vec<&str> {
        let mut rcpts = vec![self.to.as_str()];
        if let Some(cc) = &self.cc {
            rcpts.push(cc.as_str());
        }
        rcpts.push(self.bcc.as_str());
        rcpts
    }
}
