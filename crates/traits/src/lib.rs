pub mod listing;
pub mod response;
pub mod template;
pub mod transport;

pub use listing::{InMemoryListingProvider, ListingError, ListingProvider, sort_newest_first};
pub use response::{InMemoryResponseProvider, ResponseError, ResponseProvider, select_responses};
pub use template::{InMemoryTemplateProvider, TemplateError, TemplateProvider};
pub use transport::{NotificationTransport, RecordingTransport, TransportError};
