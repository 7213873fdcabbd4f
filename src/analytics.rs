//! Customer analytics reports.
//!
//! A report covers the quiz responses one listing collected over a period:
//! an HTML summary for the owner plus the raw rows as a CSV attachment.
//! Mailing goes through [`crate::delivery::build_report_message`], which
//! applies the same copy policy as standee delivery.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, Utc};
use standee_types::{DateRange, ListingRecord, QuizResponse};
use std::fmt::Write as _;
use thiserror::Error;

/// Reports with at most this many responses nudge the owner to onboard
/// their staff.
pub const LOW_ACTIVITY_THRESHOLD: usize = 5;

pub const CSV_HEADER: [&str; 9] = [
    "Responder Name",
    "Email",
    "Mobile",
    "Age",
    "Occupation",
    "Score",
    "Readiness Level",
    "Created At",
    "AI Spot Name",
];

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Report period starts after it ends: {start} > {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    #[error("Failed to write response CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// The window a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// The 24 hours before the report is generated.
    LastDay,
    /// Whole calendar days (UTC), both ends included.
    Between { start: NaiveDate, end: NaiveDate },
}

impl ReportPeriod {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::InvalidPeriod { start, end });
        }
        Ok(Self::Between { start, end })
    }

    pub fn range(&self, now: DateTime<Utc>) -> DateRange {
        match *self {
            Self::LastDay => DateRange::last_day(now),
            Self::Between { start, end } => {
                let first = start.and_time(NaiveTime::MIN).and_utc();
                let last = end.and_time(NaiveTime::MIN).and_utc() + Duration::days(1)
                    - Duration::nanoseconds(1);
                DateRange::new(first, last)
            }
        }
    }

    /// How the period reads in a subject line, e.g. `Mar 01 - Mar 05, 2025`.
    pub fn label(&self) -> String {
        match self {
            Self::LastDay => "today (last 24 hours)".to_string(),
            Self::Between { start, end } => {
                format!("{} - {}", start.format("%b %d"), end.format("%b %d, %Y"))
            }
        }
    }
}

/// A rendered report, ready to be addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsReport {
    pub period_label: String,
    pub response_count: usize,
    pub csv: Vec<u8>,
    pub file_name: String,
    pub html_body: String,
    pub text_body: String,
}

impl AnalyticsReport {
    pub fn new(
        listing: &ListingRecord,
        responses: &[QuizResponse],
        period: &ReportPeriod,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, AnalyticsError> {
        let period_label = period.label();
        Ok(Self {
            csv: responses_csv(responses, &listing.name)?,
            file_name: report_file_name(listing, generated_at),
            html_body: html_body(listing, responses, &period_label),
            text_body: text_body(listing, responses.len(), &period_label),
            response_count: responses.len(),
            period_label,
        })
    }
}

/// `aispot_{name_with_underscores}_{YYYYmmdd_HHMMSS}.csv`
pub fn report_file_name(listing: &ListingRecord, generated_at: DateTime<Utc>) -> String {
    format!(
        "aispot_{}_{}.csv",
        listing.name.replace(' ', "_"),
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

/// One header row, then one row per response in the given order.
pub fn responses_csv(responses: &[QuizResponse], listing_name: &str) -> Result<Vec<u8>, AnalyticsError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for response in responses {
        let age = optional(response.age);
        let score = optional(response.score);
        let created = response
            .created_at
            .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default();
        writer.write_record([
            response.name.as_str(),
            response.email.as_str(),
            response.mobile.as_str(),
            age.as_str(),
            response.occupation.as_str(),
            score.as_str(),
            response.readiness_level.as_str(),
            created.as_str(),
            listing_name,
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| AnalyticsError::Csv(e.into_error().into()))
}

fn optional(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn activity_note(count: usize) -> &'static str {
    if count <= LOW_ACTIVITY_THRESHOLD {
        r#"<div style="background: #fff4e6; padding: 16px; border-left: 4px solid #ff9800;">
            <strong>Quick action needed:</strong> your guests have barely started using AI Spot.
            Let us help you train your team so every table invites guests to take the quiz.
        </div>"#
    } else {
        r#"<div style="background: #e8f5e9; padding: 16px; border-left: 4px solid #4caf50;">
            <strong>Great progress!</strong> Your guests are engaging. Use this list to run
            follow-up campaigns; every responder consented to be contacted.
        </div>"#
    }
}

fn html_body(listing: &ListingRecord, responses: &[QuizResponse], period_label: &str) -> String {
    let mut rows = String::new();
    for response in responses {
        let created = response
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        let _ = write!(
            rows,
            "\n                <tr><td>{}</td><td>{}</td><td>{}</td><td><strong>{}</strong></td><td>{}</td><td>{}</td><td>{}</td></tr>",
            response.name,
            response.email,
            response.mobile,
            optional(response.score),
            optional(response.age),
            response.occupation,
            created,
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>AI Spot Analytics - {name}</title>
</head>
<body style="font-family: Arial, sans-serif; color: #333;">
    <h1 style="color: #0055aa;">AI Spot Analytics</h1>
    <p>{name}</p>
    <h2>Dear {manager},</h2>
    <p><strong>{count}</strong> of your guests submitted the quiz <strong>{period}</strong>.</p>
    <p>Every responder agreed to be contacted, so you can invite each of them back.</p>
    {note}
    <h3>Customer Data</h3>
    <table style="width: 100%; border-collapse: collapse;">
        <thead>
            <tr><th>Name</th><th>Email</th><th>Mobile</th><th>Score</th><th>Age</th><th>Occupation</th><th>Created At</th></tr>
        </thead>
        <tbody>{rows}
        </tbody>
    </table>
    <p>The same data is attached as a CSV file.</p>
    <p>Best regards,<br>The AI Spot Team</p>
</body>
</html>"#,
        name = listing.name,
        manager = listing.manager_name,
        count = responses.len(),
        period = period_label,
        note = activity_note(responses.len()),
        rows = rows,
    )
}

fn text_body(listing: &ListingRecord, count: usize, period_label: &str) -> String {
    format!(
        "AI Spot Analytics - {name}\n\n\
         Dear {manager},\n\n\
         {count} of your guests submitted the quiz {period}.\n\
         Their details are attached as a CSV file.\n\n\
         Best regards,\n\
         The AI Spot Team\n",
        name = listing.name,
        manager = listing.manager_name,
        count = count,
        period = period_label,
    )
}
