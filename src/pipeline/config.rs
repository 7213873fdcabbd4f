use serde::Deserialize;
use std::fmt;

/// An enum to select a rendering backend. Backends are tried in the
/// configured order until one succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// HTML-to-PDF conversion job on the remote conversion service.
    Remote,
    /// In-process `lopdf` document built from the sheet's text content.
    Local,
    /// Fixed-coordinate `printpdf` drawing with embedded QR codes.
    Vector,
    /// The print sheet markup itself. Never fails.
    Markup,
}

impl BackendKind {
    pub const DEFAULT_ORDER: [BackendKind; 4] = [
        BackendKind::Remote,
        BackendKind::Local,
        BackendKind::Vector,
        BackendKind::Markup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Remote => "remote",
            BackendKind::Local => "local",
            BackendKind::Vector => "vector",
            BackendKind::Markup => "markup",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
