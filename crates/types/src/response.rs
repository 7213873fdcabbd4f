use crate::ids::ListingId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One guest's quiz submission, collected through a listing's standee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizResponse {
    #[serde(alias = "aispot_id")]
    pub listing_id: ListingId,
    pub name: String,
    pub email: String,
    pub mobile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub occupation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    pub readiness_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// An inclusive time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The 24 hours ending at `now`.
    pub fn last_day(now: DateTime<Utc>) -> Self {
        Self::new(now - Duration::days(1), now)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Whether `response` was created inside the window. Undated responses
    /// are never inside any window.
    pub fn covers(&self, response: &QuizResponse) -> bool {
        response.created_at.is_some_and(|at| self.contains(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn deserializes_store_field_names() {
        let json = r#"{
            "aispot_id": "abc12345-0000",
            "name": "Asha",
            "score": 8,
            "created_at": "2025-03-01T10:00:00Z"
        }"#;
        let response: QuizResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.listing_id.as_str(), "abc12345-0000");
        assert_eq!(response.score, Some(8));
        assert_eq!(response.age, None);
        assert!(response.occupation.is_empty());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
        let range = DateRange::new(start, end);
        assert!(range.contains(start));
        assert!(range.contains(end));
        assert!(!range.contains(end + Duration::seconds(1)));
    }

    #[test]
    fn undated_response_is_outside_every_range() {
        let now = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
        let range = DateRange::last_day(now);
        let mut response = QuizResponse::default();
        assert!(!range.covers(&response));
        response.created_at = Some(now - Duration::hours(3));
        assert!(range.covers(&response));
    }
}
