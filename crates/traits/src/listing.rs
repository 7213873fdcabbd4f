//! ListingProvider trait for the external listing store.

use chrono::Utc;
use standee_types::{ListingId, ListingRecord, ListingUpdate};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;

/// Error type for listing store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("Listing not found: {0}")]
    NotFound(ListingId),

    #[error("Listing store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to update listing {id}: {message}")]
    UpdateFailed { id: ListingId, message: String },
}

/// Read/write access to listing records owned by the data store.
///
/// Implementations that cache reads must treat `update_listing` as an
/// invalidation point: a `get_listing` or `list_listings` issued after a
/// successful update observes the new values.
pub trait ListingProvider: Send + Sync + Debug {
    fn get_listing(&self, id: &ListingId) -> Result<ListingRecord, ListingError>;

    /// Apply `update` to the listing and return the stored result.
    fn update_listing(
        &self,
        id: &ListingId,
        update: ListingUpdate,
    ) -> Result<ListingRecord, ListingError>;

    /// All listings, newest first.
    fn list_listings(&self) -> Result<Vec<ListingRecord>, ListingError>;

    fn name(&self) -> &'static str;
}

/// Sorts newest first by `created_at`; undated records go last.
pub fn sort_newest_first(listings: &mut [ListingRecord]) {
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// A listing store held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryListingProvider {
    listings: RwLock<HashMap<ListingId, ListingRecord>>,
}

impl InMemoryListingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listings(listings: impl IntoIterator<Item = ListingRecord>) -> Self {
        let map = listings.into_iter().map(|l| (l.id.clone(), l)).collect();
        Self {
            listings: RwLock::new(map),
        }
    }

    /// Insert or replace a record.
    pub fn insert(&self, listing: ListingRecord) -> Result<(), ListingError> {
        let mut listings = self.write_lock()?;
        listings.insert(listing.id.clone(), listing);
        Ok(())
    }

    fn write_lock(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<ListingId, ListingRecord>>, ListingError>
    {
        self.listings
            .write()
            .map_err(|_| ListingError::Unavailable("listing store lock poisoned".to_string()))
    }
}

impl ListingProvider for InMemoryListingProvider {
    fn get_listing(&self, id: &ListingId) -> Result<ListingRecord, ListingError> {
        let listings = self
            .listings
            .read()
            .map_err(|_| ListingError::Unavailable("listing store lock poisoned".to_string()))?;
        listings
            .get(id)
            .cloned()
            .ok_or_else(|| ListingError::NotFound(id.clone()))
    }

    fn update_listing(
        &self,
        id: &ListingId,
        update: ListingUpdate,
    ) -> Result<ListingRecord, ListingError> {
        let mut listings = self.write_lock()?;
        let listing = listings
            .get_mut(id)
            .ok_or_else(|| ListingError::NotFound(id.clone()))?;
        listing.apply(update, Utc::now());
        Ok(listing.clone())
    }

    fn list_listings(&self) -> Result<Vec<ListingRecord>, ListingError> {
        let listings = self
            .listings
            .read()
            .map_err(|_| ListingError::Unavailable("listing store lock poisoned".to_string()))?;
        let mut all: Vec<_> = listings.values().cloned().collect();
        sort_newest_first(&mut all);
        Ok(all)
    }

    fn name(&self) -> &'static str {
        "InMemoryListingProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn listing(id: &str, name: &str) -> ListingRecord {
        let mut l = ListingRecord::new(id);
        l.name = name.to_string();
        l
    }

    #[test]
    fn get_returns_not_found_for_unknown_id() {
        let provider = InMemoryListingProvider::new();
        let id = ListingId::new("nope");
        assert_eq!(provider.get_listing(&id), Err(ListingError::NotFound(id)));
    }

    #[test]
    fn update_is_visible_to_subsequent_reads() {
        let provider = InMemoryListingProvider::with_listings([listing("a", "Cafe")]);
        let id = ListingId::new("a");

        let updated = provider
            .update_listing(&id, ListingUpdate::approval(true))
            .unwrap();
        assert!(updated.is_approved);
        assert!(updated.updated_at.is_some());
        assert!(provider.get_listing(&id).unwrap().is_approved);
    }

    #[test]
    fn list_is_newest_first() {
        let mut old = listing("old", "Old");
        old.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let mut new = listing("new", "New");
        new.created_at = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let undated = listing("undated", "Undated");

        let provider = InMemoryListingProvider::with_listings([old, undated, new]);
        let names: Vec<_> = provider
            .list_listings()
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["New", "Old", "Undated"]);
    }
}
