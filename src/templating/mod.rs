//! Placeholder substitution for standee templates.
//!
//! Templates are plain markup carrying a fixed set of `{{token}}`
//! placeholders. Substitution is literal and total over that set: every
//! occurrence of every known token is replaced, missing fields become the
//! empty string, and unknown `{{...}}` sequences pass through untouched.
//!
//! ```
//! use standee::templating::render;
//! use standee_types::ListingRecord;
//!
//! let mut listing = ListingRecord::new("abc12345-6789");
//! listing.name = "Tech Hub Cafe".to_string();
//!
//! let markup = render("<h1>{{name}}</h1><p>{{aispot_id}}</p>", &listing);
//! assert_eq!(markup, "<h1>Tech Hub Cafe</h1><p>abc12345</p>");
//! ```
//!
//! Field values are inserted without escaping, so a value containing markup
//! reaches the rendered document as markup.

use standee_types::ListingRecord;

/// The placeholders a standee template may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Name,
    Category,
    ManagerName,
    ShortId,
    ReferenceLink,
}

impl Placeholder {
    pub const ALL: [Placeholder; 5] = [
        Placeholder::Name,
        Placeholder::Category,
        Placeholder::ManagerName,
        Placeholder::ShortId,
        Placeholder::ReferenceLink,
    ];

    /// The literal token as it appears in template text.
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Name => "{{name}}",
            Placeholder::Category => "{{type_of_place}}",
            Placeholder::ManagerName => "{{manager_name}}",
            Placeholder::ShortId => "{{aispot_id}}",
            Placeholder::ReferenceLink => "{{qr_code_link}}",
        }
    }

    /// The listing value substituted for this placeholder.
    pub fn value(self, listing: &ListingRecord) -> &str {
        match self {
            Placeholder::Name => &listing.name,
            Placeholder::Category => &listing.category,
            Placeholder::ManagerName => &listing.manager_name,
            Placeholder::ShortId => listing.short_id(),
            Placeholder::ReferenceLink => &listing.reference_link,
        }
    }

    fn match_at(text: &str) -> Option<Placeholder> {
        Self::ALL.into_iter().find(|p| text.starts_with(p.token()))
    }
}

/// Substitutes every placeholder in `template` with the listing's values.
///
/// The template is scanned once, so a value that itself looks like a token
/// is never substituted again and the result does not depend on the order
/// placeholders are processed in.
pub fn render(template: &str, listing: &ListingRecord) -> String {
    let mut out = String::with_capacity(template.len() + 128);
    let mut rest = template;

    while let Some(pos) = rest.find("{{") {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match Placeholder::match_at(candidate) {
            Some(placeholder) => {
                out.push_str(placeholder.value(listing));
                rest = &candidate[placeholder.token().len()..];
            }
            None => {
                out.push_str("{{");
                rest = &candidate[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Returns the tokens from the fixed set that appear in `template`.
pub fn placeholders_in(template: &str) -> Vec<Placeholder> {
    Placeholder::ALL
        .into_iter()
        .filter(|p| template.contains(p.token()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cafe() -> ListingRecord {
        let mut listing = ListingRecord::new("abc12345-xxxx");
        listing.name = "Tech Hub Cafe".into();
        listing.category = "Cafe".into();
        listing.manager_name = "Priya".into();
        listing.reference_link = "https://example.com/spot/abc12345-xxxx".into();
        listing
    }

    #[test]
    fn substitutes_every_placeholder() {
        let template = "{{name}}|{{type_of_place}}|{{manager_name}}|{{aispot_id}}|{{qr_code_link}}";
        assert_eq!(
            render(template, &cafe()),
            "Tech Hub Cafe|Cafe|Priya|abc12345|https://example.com/spot/abc12345-xxxx"
        );
    }

    #[test]
    fn no_known_token_survives() {
        let template = "<p>{{name}} {{name}}</p>{{aispot_id}}{{qr_code_link}}{{qr_code_link}}";
        let out = render(template, &ListingRecord::new("id"));
        for p in Placeholder::ALL {
            assert!(!out.contains(p.token()), "{} left in {}", p.token(), out);
        }
    }

    #[test]
    fn missing_fields_become_empty() {
        let out = render("[{{manager_name}}][{{type_of_place}}]", &ListingRecord::new("x"));
        assert_eq!(out, "[][]");
    }

    #[test]
    fn short_identity_is_whole_id_when_short() {
        assert_eq!(render("{{aispot_id}}", &ListingRecord::new("abc")), "abc");
    }

    #[test]
    fn values_are_not_rescanned() {
        let mut listing = cafe();
        listing.name = "{{manager_name}}".into();
        assert_eq!(render("{{name}}/{{manager_name}}", &listing), "{{manager_name}}/Priya");
    }

    #[test]
    fn unknown_tokens_and_stray_braces_pass_through() {
        let out = render("{{unknown}} {{ {{name}}", &cafe());
        assert_eq!(out, "{{unknown}} {{ Tech Hub Cafe");
    }

    #[test]
    fn values_are_inserted_unescaped() {
        let mut listing = cafe();
        listing.name = "<b>Bold & Co</b>".into();
        assert_eq!(render("{{name}}", &listing), "<b>Bold & Co</b>");
    }

    #[test]
    fn reports_present_placeholders() {
        assert_eq!(
            placeholders_in("{{qr_code_link}} {{name}}"),
            vec![Placeholder::Name, Placeholder::ReferenceLink]
        );
    }
}
