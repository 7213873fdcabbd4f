use chrono::{DateTime, Duration, Utc};
use standee::{InMemoryListingProvider, ListingId, ListingRecord, QuizResponse};

pub const SENDER: &str = "standees@aispot.example";
pub const AUDIT_BCC: &str = "audit@aispot.example";

pub const CAFE_ID: &str = "abc12345-def6-7890-abcd-ef1234567890";
pub const CAFE_FILE_NAME: &str = "standee_Tech_Hub_Cafe_abc12345.pdf";

/// The reference listing used across the integration tests.
pub fn tech_hub_cafe() -> ListingRecord {
    let mut listing = ListingRecord::new(CAFE_ID);
    listing.name = "Tech Hub Cafe".to_string();
    listing.category = "Cafe".to_string();
    listing.manager_name = "Priya Sharma".to_string();
    listing.email = "owner@techhub.example".to_string();
    listing.secondary_email = Some("manager@techhub.example".to_string());
    listing.city = "Bengaluru".to_string();
    listing.reference_link = format!("https://aispot.example/spot/{}", CAFE_ID);
    listing
}

/// A listing with nobody to send to.
pub fn unreachable_bistro() -> ListingRecord {
    let mut listing = ListingRecord::new("ffff0000-1111-2222-3333-444455556666");
    listing.name = "Quiet Bistro".to_string();
    listing.category = "Restaurant".to_string();
    listing
}

pub fn listing_provider() -> InMemoryListingProvider {
    InMemoryListingProvider::with_listings([tech_hub_cafe(), unreachable_bistro()])
}

/// Quiz responses for the cafe: two from the last day, one older, plus one
/// for a different listing.
pub fn cafe_responses(now: DateTime<Utc>) -> Vec<QuizResponse> {
    let response = |listing: &str, name: &str, hours_ago: i64| QuizResponse {
        listing_id: ListingId::from(listing),
        name: name.to_string(),
        email: format!("{}@guest.example", name.to_lowercase()),
        mobile: "+91 98450 00000".to_string(),
        score: Some(7),
        readiness_level: "Explorer".to_string(),
        created_at: Some(now - Duration::hours(hours_ago)),
        ..Default::default()
    };
    vec![
        response(CAFE_ID, "Asha", 3),
        response(CAFE_ID, "Vikram", 20),
        response(CAFE_ID, "Older", 24 * 10),
        response("ffff0000-1111-2222-3333-444455556666", "Elsewhere", 1),
    ]
}
