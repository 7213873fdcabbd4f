//! Listing store persisted as a JSON array on disk.
//!
//! Reads are served from a cache that is dropped on every successful write,
//! so `update_listing` always invalidates what earlier reads loaded.

use chrono::Utc;
use standee_traits::{ListingError, ListingProvider, sort_newest_first};
use standee_types::{ListingId, ListingRecord, ListingUpdate};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug)]
pub struct JsonListingProvider {
    path: PathBuf,
    cache: RwLock<Option<Vec<ListingRecord>>>,
}

impl JsonListingProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Vec<ListingRecord>, ListingError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ListingError::Unavailable(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )));
            }
        };
        serde_json::from_slice(&bytes).map_err(|e| {
            ListingError::Unavailable(format!("{} is not a listing array: {}", self.path.display(), e))
        })
    }

    fn write_file(&self, listings: &[ListingRecord]) -> Result<(), String> {
        let json = serde_json::to_vec_pretty(listings).map_err(|e| e.to_string())?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| e.to_string())?;
        std::fs::rename(&tmp, &self.path).map_err(|e| e.to_string())
    }

    fn cached(&self) -> Result<Vec<ListingRecord>, ListingError> {
        if let Some(listings) = self.cache.read().map_err(|_| poisoned())?.as_ref() {
            return Ok(listings.clone());
        }

        // Filled under the write lock so a load cannot race an update.
        let mut cache = self.cache.write().map_err(|_| poisoned())?;
        if let Some(listings) = cache.as_ref() {
            return Ok(listings.clone());
        }
        let listings = self.read_file()?;
        log::debug!("Loaded {} listings from {}", listings.len(), self.path.display());
        *cache = Some(listings.clone());
        Ok(listings)
    }
}

fn poisoned() -> ListingError {
    ListingError::Unavailable("listing cache lock poisoned".to_string())
}

impl ListingProvider for JsonListingProvider {
    fn get_listing(&self, id: &ListingId) -> Result<ListingRecord, ListingError> {
        self.cached()?
            .into_iter()
            .find(|l| &l.id == id)
            .ok_or_else(|| ListingError::NotFound(id.clone()))
    }

    fn update_listing(
        &self,
        id: &ListingId,
        update: ListingUpdate,
    ) -> Result<ListingRecord, ListingError> {
        // Held across read, modify and write: updates serialize here.
        let mut cache = self.cache.write().map_err(|_| poisoned())?;
        let mut listings = self.read_file()?;
        let listing = listings
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or_else(|| ListingError::NotFound(id.clone()))?;
        listing.apply(update, Utc::now());
        let updated = listing.clone();

        let result = self.write_file(&listings);
        *cache = None;
        drop(cache);
        result.map_err(|message| ListingError::UpdateFailed {
            id: id.clone(),
            message,
        })?;

        log::info!("Updated listing {}", id);
        Ok(updated)
    }

    fn list_listings(&self) -> Result<Vec<ListingRecord>, ListingError> {
        let mut listings = self.cached()?;
        sort_newest_first(&mut listings);
        Ok(listings)
    }

    fn name(&self) -> &'static str {
        "JsonListingProvider"
    }
}
