// src/llm/xml.rs

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RESPONSE_BLOCK: Regex = Regex::new(r"(?s)<response>(.*?)</response>").unwrap();
    static ref OPEN_TAG: Regex = Regex::new(r"<([A-Za-z][A-Za-z0-9_\-]*)>").unwrap();
}

/// Parses the leaf `<tag>value</tag>` pairs of a model reply.
///
/// The `<response>` block is used when present, otherwise the whole text.
/// Values are trimmed; empty values and the literal `null` are dropped.
/// Returns `None` when no tag could be read at all.
pub fn parse_key_value_xml(text: &str) -> Option<HashMap<String, String>> {
    let body = RESPONSE_BLOCK
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text);

    let mut out = HashMap::new();
    let mut found_any = false;
    let mut cursor = 0;

    while let Some(caps) = OPEN_TAG.captures_at(body, cursor) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let close = format!("</{}>", name.as_str());
        let content_start = whole.end();

        let Some(rel_end) = body[content_start..].find(&close) else {
            cursor = content_start;
            continue;
        };
        let content = &body[content_start..content_start + rel_end];

        // Container tags (e.g. a stray <response>) are descended into.
        if OPEN_TAG.is_match(content) {
            cursor = content_start;
            continue;
        }

        found_any = true;
        let value = content.trim();
        if !value.is_empty() && !value.eq_ignore_ascii_case("null") {
            out.entry(name.as_str().to_string())
                .or_insert_with(|| value.to_string());
        }
        cursor = content_start + rel_end + close.len();
    }

    found_any.then_some(out)
}
