use crate::listing::ListingRecord;

/// What a rendering backend produced.
///
/// `Markup` is the reduced-fidelity result of the fallback path: the composed
/// print sheet itself, handed on so the user still gets something printable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Pdf,
    Markup,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "pdf",
            ArtifactKind::Markup => "html",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "application/pdf",
            ArtifactKind::Markup => "text/html; charset=utf-8",
        }
    }
}

/// The output of the rendering backend chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderArtifact {
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
    /// Name of the backend that produced this artifact.
    pub backend: &'static str,
}

impl RenderArtifact {
    pub fn pdf(bytes: Vec<u8>, backend: &'static str) -> Self {
        Self {
            kind: ArtifactKind::Pdf,
            bytes,
            backend,
        }
    }

    pub fn markup(markup: impl Into<String>, backend: &'static str) -> Self {
        Self {
            kind: ArtifactKind::Markup,
            bytes: markup.into().into_bytes(),
            backend,
        }
    }

    /// The markup body of a `Markup` artifact. `None` for binary artifacts.
    pub fn as_markup(&self) -> Option<&str> {
        match self.kind {
            ArtifactKind::Markup => std::str::from_utf8(&self.bytes).ok(),
            ArtifactKind::Pdf => None,
        }
    }

    /// `standee_{name with spaces as underscores}_{short id}.{ext}`
    pub fn file_name(&self, listing: &ListingRecord) -> String {
        artifact_file_name(listing, self.kind)
    }
}

pub fn artifact_file_name(listing: &ListingRecord, kind: ArtifactKind) -> String {
    format!(
        "standee_{}_{}.{}",
        listing.name.replace(' ', "_"),
        listing.short_id(),
        kind.extension()
    )
}
