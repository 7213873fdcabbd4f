//! Filesystem-backed providers for the standee pipeline.
//!
//! This crate provides native implementations of the provider traits from
//! standee-traits.
//!
//! ## Available Providers
//!
//! - [`FilesystemTemplateProvider`]: Loads templates from a directory
//! - [`JsonListingProvider`]: Listing store persisted as a JSON array
//! - [`JsonResponseProvider`]: Quiz responses read from a JSON array
//!
//! ## Re-exports
//!
//! For convenience, the in-memory providers from standee-traits are
//! re-exported as well.

mod json_responses;
mod json_store;
mod template_dir;

pub use json_responses::JsonResponseProvider;
pub use json_store::JsonListingProvider;
pub use template_dir::FilesystemTemplateProvider;

pub use standee_traits::{InMemoryListingProvider, InMemoryResponseProvider, InMemoryTemplateProvider};
