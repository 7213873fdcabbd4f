use lopdf::{Document as LopdfDocument, Object};

/// Decoded content operations of a 1-based page.
pub fn page_operations(doc: &LopdfDocument, page: u32) -> Vec<lopdf::content::Operation> {
    let pages = doc.get_pages();
    let Some(page_id) = pages.get(&page) else {
        return Vec::new();
    };
    doc.get_and_decode_page_content(*page_id)
        .map(|content| content.operations)
        .unwrap_or_default()
}

/// Number of times `operator` appears on a page.
pub fn count_operator(doc: &LopdfDocument, page: u32, operator: &str) -> usize {
    page_operations(doc, page)
        .iter()
        .filter(|op| op.operator == operator)
        .count()
}

/// Every string shown with `Tj` or `TJ` on a page, in drawing order.
pub fn shown_strings(doc: &LopdfDocument, page: u32) -> Vec<String> {
    let mut shown = Vec::new();
    for op in page_operations(doc, page) {
        match op.operator.as_str() {
            "Tj" | "'" => shown.extend(op.operands.iter().filter_map(string_of)),
            "TJ" => {
                for operand in &op.operands {
                    if let Ok(items) = operand.as_array() {
                        let joined: String = items.iter().filter_map(string_of).collect();
                        shown.push(joined);
                    }
                }
            }
            _ => {}
        }
    }
    shown
}

fn string_of(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).to_string()),
        _ => None,
    }
}

/// Number of image XObjects stored in the document.
pub fn image_count(doc: &LopdfDocument) -> usize {
    doc.objects
        .values()
        .filter(|object| match object {
            Object::Stream(stream) => stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .map(|name| name == b"Image")
                .unwrap_or(false),
            _ => false,
        })
        .count()
}
