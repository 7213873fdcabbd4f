use crate::ids::ListingId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered business listing as held by the external data store.
///
/// Every field except `id` is optional. The pipeline receives records by
/// value and never writes them back itself; changes go through a
/// `ListingProvider` as a [`ListingUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingRecord {
    #[serde(alias = "aispot_id")]
    pub id: ListingId,
    pub name: String,
    #[serde(alias = "type_of_place")]
    pub category: String,
    #[serde(alias = "owner_manager_name")]
    pub manager_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_email: Option<String>,
    pub mobile: String,
    pub telephone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(alias = "pin_zip")]
    pub postal_code: String,
    pub price: String,
    #[serde(alias = "qr_code_link")]
    pub reference_link: String,
    pub is_approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ListingRecord {
    pub fn new(id: impl Into<ListingId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn short_id(&self) -> &str {
        self.id.short()
    }

    /// The primary contact address, if one is recorded.
    pub fn primary_email(&self) -> Option<&str> {
        let email = self.email.trim();
        (!email.is_empty()).then_some(email)
    }

    /// Applies a partial update in place and stamps `updated_at`.
    pub fn apply(&mut self, update: ListingUpdate, now: DateTime<Utc>) {
        let ListingUpdate {
            name,
            category,
            manager_name,
            email,
            secondary_email,
            mobile,
            telephone,
            address,
            city,
            state,
            country,
            postal_code,
            price,
            is_approved,
        } = update;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = category {
            self.category = v;
        }
        if let Some(v) = manager_name {
            self.manager_name = v;
        }
        if let Some(v) = email {
            self.email = v;
        }
        if let Some(v) = secondary_email {
            self.secondary_email = (!v.trim().is_empty()).then_some(v);
        }
        if let Some(v) = mobile {
            self.mobile = v;
        }
        if let Some(v) = telephone {
            self.telephone = v;
        }
        if let Some(v) = address {
            self.address = v;
        }
        if let Some(v) = city {
            self.city = v;
        }
        if let Some(v) = state {
            self.state = v;
        }
        if let Some(v) = country {
            self.country = v;
        }
        if let Some(v) = postal_code {
            self.postal_code = v;
        }
        if let Some(v) = price {
            self.price = v;
        }
        if let Some(v) = is_approved {
            self.is_approved = v;
        }
        self.updated_at = Some(now);
    }
}

/// A partial set of field changes for a listing. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub manager_name: Option<String>,
    pub email: Option<String>,
    /// An empty string clears the secondary contact.
    pub secondary_email: Option<String>,
    pub mobile: Option<String>,
    pub telephone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub price: Option<String>,
    pub is_approved: Option<bool>,
}

impl ListingUpdate {
    pub fn approval(approved: bool) -> Self {
        Self {
            is_approved: Some(approved),
            ..Default::default()
        }
    }
}

/// Approval counts across a set of listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListingStats {
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
}

impl ListingStats {
    pub fn from_listings<'a>(listings: impl IntoIterator<Item = &'a ListingRecord>) -> Self {
        let (total, approved) = listings
            .into_iter()
            .fold((0, 0), |(total, approved), l| {
                (total + 1, approved + usize::from(l.is_approved))
            });
        Self {
            total,
            approved,
            pending: total - approved,
        }
    }
}
