use super::RenderedUnit;

/// Opening of the element that wraps one printable unit.
pub const UNIT_START_MARKER: &str = r#"<div class="page""#;

/// Opening of the interactive-only region (download/print affordances).
/// It bounds the unit search and is hidden on print paths.
pub const NON_PRINTABLE_MARKER: &str = r#"<div class="download-section""#;

const HIDDEN_STYLE: &str = r#" style="display: none;""#;

/// Isolates the printable unit and the style block from a full document.
///
/// 1. The unit starts at the first [`UNIT_START_MARKER`].
/// 2. It ends after the `</div>` that balances the start tag. When a
///    [`NON_PRINTABLE_MARKER`] follows the start, the search stops there.
/// 3. If no balancing close is found the unit runs to the non-printable
///    marker, else to `</body>`, else to the end of the document.
/// 4. Without a start marker the whole document is the unit.
pub fn extract_unit(full_markup: &str) -> RenderedUnit {
    let style_block = style_block(full_markup).to_string();

    let Some(start) = full_markup.find(UNIT_START_MARKER) else {
        log::debug!("No unit marker in template output; using the whole document");
        return RenderedUnit {
            markup: full_markup.to_string(),
            style_block,
        };
    };

    let marker = full_markup[start..]
        .find(NON_PRINTABLE_MARKER)
        .map(|pos| start + pos);
    let limit = marker.unwrap_or(full_markup.len());

    let end = match balanced_div_end(&full_markup[start..limit]) {
        Some(len) => start + len,
        None => {
            log::debug!("Unit start tag is never closed; falling back to the nearest boundary");
            marker
                .or_else(|| full_markup[start..].find("</body>").map(|pos| start + pos))
                .unwrap_or(full_markup.len())
        }
    };

    RenderedUnit {
        markup: full_markup[start..end].to_string(),
        style_block,
    }
}

/// Hides every non-printable region by adding an inline `display: none`.
pub fn strip_non_printable(full_markup: &str) -> String {
    full_markup.replace(
        NON_PRINTABLE_MARKER,
        &format!("{}{}", NON_PRINTABLE_MARKER, HIDDEN_STYLE),
    )
}

/// The first `<style ...>...</style>` element, or `""`.
fn style_block(markup: &str) -> &str {
    let bytes = markup.as_bytes();
    let mut from = 0;
    while let Some(pos) = markup[from..].find('<') {
        let start = from + pos;
        if tag_at(&bytes[start..], b"<style") {
            return markup[start..]
                .find("</style>")
                .map(|end| &markup[start..start + end + "</style>".len()])
                .unwrap_or("");
        }
        from = start + 1;
    }
    ""
}

/// Length of the prefix of `s` that ends with the `</div>` balancing the
/// `<div` that `s` starts with. `None` if `s` runs out first.
fn balanced_div_end(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        let rest = &bytes[i..];
        if tag_at(rest, b"</div") {
            let close = rest.iter().position(|&b| b == b'>')?;
            i += close + 1;
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(i);
            }
        } else if tag_at(rest, b"<div") {
            depth += 1;
            i += "<div".len();
        } else {
            i += 1;
        }
    }
    None
}

/// `rest` starts with `tag` (ASCII case-insensitive) followed by the end of
/// the tag name.
fn tag_at(rest: &[u8], tag: &[u8]) -> bool {
    rest.len() > tag.len()
        && rest[..tag.len()].eq_ignore_ascii_case(tag)
        && matches!(rest[tag.len()], b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREVIEW: &str = r#"<!DOCTYPE html>
<html><head><style>.page { color: red; }</style></head>
<body>
<div class="page"><div class="header"><h1>Cafe</h1></div><div class="qr"></div></div>
<div class="download-section"><button>Download</button></div>
</body></html>"#;

    #[test]
    fn extracts_balanced_unit_before_download_section() {
        let unit = extract_unit(PREVIEW);
        assert_eq!(
            unit.markup,
            r#"<div class="page"><div class="header"><h1>Cafe</h1></div><div class="qr"></div></div>"#
        );
        assert_eq!(unit.style_block, "<style>.page { color: red; }</style>");
    }

    #[test]
    fn without_start_marker_whole_document_is_the_unit() {
        let doc = "<html><body><p>plain</p></body></html>";
        let unit = extract_unit(doc);
        assert_eq!(unit.markup, doc);
        assert_eq!(unit.style_block, "");
    }

    #[test]
    fn without_download_section_balances_to_close() {
        let doc = r#"<body><div class="page"><div>a</div></div><footer>x</footer></body>"#;
        assert_eq!(
            extract_unit(doc).markup,
            r#"<div class="page"><div>a</div></div>"#
        );
    }

    #[test]
    fn unbalanced_unit_runs_to_body_close() {
        let doc = r#"<body><div class="page"><div>a</div>tail</body>"#;
        assert_eq!(
            extract_unit(doc).markup,
            r#"<div class="page"><div>a</div>tail"#
        );
    }

    #[test]
    fn unbalanced_unit_stops_at_download_section() {
        let doc = r#"<div class="page"><p>a</p><div class="download-section">x</div></div>"#;
        assert_eq!(extract_unit(doc).markup, r#"<div class="page"><p>a</p>"#);
    }

    #[test]
    fn uppercase_tags_and_divider_elements() {
        let doc = r#"<div class="page"><DIV>x</DIV><divider></divider></div>rest"#;
        assert_eq!(
            extract_unit(doc).markup,
            r#"<div class="page"><DIV>x</DIV><divider></divider></div>"#
        );
    }

    #[test]
    fn style_with_attributes_is_kept_verbatim() {
        let doc = r#"<style media="print">a{}</style><stylex></stylex>"#;
        assert_eq!(extract_unit(doc).style_block, r#"<style media="print">a{}</style>"#);
    }

    #[test]
    fn unterminated_style_is_ignored() {
        assert_eq!(extract_unit("<style>a{}").style_block, "");
    }

    #[test]
    fn strip_hides_download_section() {
        let out = strip_non_printable(PREVIEW);
        assert!(out.contains(r#"<div class="download-section" style="display: none;">"#));
        assert_eq!(strip_non_printable("<p>no marker</p>"), "<p>no marker</p>");
    }

    #[test]
    fn extraction_is_deterministic() {
        assert_eq!(extract_unit(PREVIEW), extract_unit(PREVIEW));
    }
}
