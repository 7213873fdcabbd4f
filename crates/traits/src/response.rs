//! ResponseProvider trait for quiz submissions gathered per listing.

use standee_types::{DateRange, ListingId, QuizResponse};
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    #[error("Response store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the quiz responses collected for listings.
pub trait ResponseProvider: Send + Sync + Debug {
    /// Responses for `id` created within `range`, newest first.
    fn responses_for(
        &self,
        id: &ListingId,
        range: &DateRange,
    ) -> Result<Vec<QuizResponse>, ResponseError>;

    fn name(&self) -> &'static str;
}

/// Keeps responses for `id` inside `range` and orders them newest first.
pub fn select_responses(
    responses: impl IntoIterator<Item = QuizResponse>,
    id: &ListingId,
    range: &DateRange,
) -> Vec<QuizResponse> {
    let mut selected: Vec<_> = responses
        .into_iter()
        .filter(|r| &r.listing_id == id && range.covers(r))
        .collect();
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    selected
}

#[derive(Debug, Default)]
pub struct InMemoryResponseProvider {
    responses: RwLock<Vec<QuizResponse>>,
}

impl InMemoryResponseProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: impl IntoIterator<Item = QuizResponse>) -> Self {
        Self {
            responses: RwLock::new(responses.into_iter().collect()),
        }
    }

    pub fn insert(&self, response: QuizResponse) -> Result<(), ResponseError> {
        self.responses
            .write()
            .map_err(|_| ResponseError::Unavailable("response store lock poisoned".to_string()))?
            .push(response);
        Ok(())
    }
}

impl ResponseProvider for InMemoryResponseProvider {
    fn responses_for(
        &self,
        id: &ListingId,
        range: &DateRange,
    ) -> Result<Vec<QuizResponse>, ResponseError> {
        let responses = self
            .responses
            .read()
            .map_err(|_| ResponseError::Unavailable("response store lock poisoned".to_string()))?;
        Ok(select_responses(responses.iter().cloned(), id, range))
    }

    fn name(&self) -> &'static str {
        "InMemoryResponseProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn response(listing: &str, name: &str, hours_ago: i64) -> QuizResponse {
        let now = Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap();
        QuizResponse {
            listing_id: ListingId::new(listing),
            name: name.to_string(),
            created_at: Some(now - Duration::hours(hours_ago)),
            ..Default::default()
        }
    }

    #[test]
    fn filters_by_listing_and_window_newest_first() {
        let now = Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap();
        let provider = InMemoryResponseProvider::with_responses([
            response("a", "older", 20),
            response("b", "other listing", 1),
            response("a", "newer", 2),
            response("a", "too old", 30),
        ]);

        let names: Vec<_> = provider
            .responses_for(&ListingId::new("a"), &DateRange::last_day(now))
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["newer", "older"]);
    }
}
