/// Tags that end the current line when they open or close.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "br", "dd", "div", "dl", "dt", "footer", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "main", "ol", "p", "section", "table", "td", "th", "tr", "ul",
];

/// Elements whose content is never text.
const SKIPPED_ELEMENTS: &[&str] = &["head", "script", "style", "svg", "title"];

/// Reduces markup to its visible text, one entry per block-level line.
///
/// Whitespace inside a line is collapsed, common entities are decoded and
/// empty lines are dropped.
pub fn flatten_to_lines(markup: &str) -> Vec<String> {
    let mut raw_lines = Vec::new();
    let mut current = String::new();
    let mut rest = markup;

    while let Some(lt) = rest.find('<') {
        current.push_str(&rest[..lt]);
        let tag_src = &rest[lt..];
        let Some(gt) = tag_src.find('>') else {
            // A lone '<' is text.
            current.push_str(tag_src);
            rest = "";
            break;
        };

        let tag = &tag_src[1..gt];
        rest = &tag_src[gt + 1..];

        if tag.starts_with('!') {
            if tag.starts_with("!--") && !tag.ends_with("--") {
                rest = rest.find("-->").map(|end| &rest[end + 3..]).unwrap_or("");
            }
            continue;
        }

        let closing = tag.starts_with('/');
        let name = tag_name(tag);

        if !closing && !tag.ends_with('/') && SKIPPED_ELEMENTS.contains(&name.as_str()) {
            rest = skip_element(rest, &name);
            continue;
        }

        if BLOCK_TAGS.contains(&name.as_str()) {
            raw_lines.push(std::mem::take(&mut current));
        }
    }
    current.push_str(rest);
    raw_lines.push(current);

    raw_lines
        .into_iter()
        .map(|line| {
            decode_entities(&line)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect()
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('/')
        .split(|c: char| c.is_ascii_whitespace() || c == '/')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Returns the text after the closing tag of `name`, or `""` if it is
/// never closed.
fn skip_element<'a>(rest: &'a str, name: &str) -> &'a str {
    let closing = format!("</{}", name);
    let lower = rest.to_ascii_lowercase();
    match lower.find(&closing) {
        Some(pos) => {
            let after = &rest[pos..];
            after.find('>').map(|gt| &after[gt + 1..]).unwrap_or("")
        }
        None => "",
    }
}

/// Decodes the named entities templates commonly use plus numeric ones.
/// Unknown entities are left as written.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let decoded = candidate
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&candidate[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &candidate[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" | "#39" => Some('\''),
        "nbsp" => Some(' '),
        "copy" => Some('\u{a9}'),
        "middot" => Some('\u{b7}'),
        "bull" => Some('\u{2022}'),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        _ => {
            let num = entity.strip_prefix('#')?;
            let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
