pub mod artifact;
pub mod ids;
pub mod listing;
pub mod message;
pub mod response;

pub use artifact::{ArtifactKind, RenderArtifact, artifact_file_name};
pub use ids::{ListingId, SHORT_ID_LEN};
pub use listing::{ListingRecord, ListingStats, ListingUpdate};
pub use message::{Attachment, OutboundMessage};
pub use response::{DateRange, QuizResponse};
