use std::sync::LazyLock;

use regex::{Captures, Regex};

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#x?[0-9a-fA-F]+|[a-z]+);").expect("valid regex"));

fn decode_entity(caps: &Captures<'_>) -> String {
    let body = &caps[1];
    let decoded = match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "ndash" => Some('–'),
        "mdash" => Some('—'),
        _ => {
            let code = if let Some(hex) = body.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse().ok()
            } else {
                None
            };
            code.and_then(char::from_u32)
        }
    };
    decoded.map_or_else(|| caps[0].to_string(), String::from)
}

/// Plain text of an HTML fragment: tags dropped, entities decoded,
/// whitespace collapsed.
pub fn strip_html(fragment: &str) -> String {
    let text = TAG.replace_all(fragment, "");
    let text = ENTITY.replace_all(&text, decode_entity);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
