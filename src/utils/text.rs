//! Cleanup helpers for values lifted out of minified JSON embedded in pages.

const ESCAPES: &[(&str, &str)] = &[
    ("\\u002F", "/"),
    ("\\u002f", "/"),
    ("\\u0026", "&"),
    ("\\u0027", "'"),
    ("\\u0022", "\""),
    ("\\/", "/"),
    ("&amp;", "&"),
    ("&#39;", "'"),
    ("&quot;", "\""),
];

/// Replace the literal escape sequences retailers leave in their embedded
/// state blobs (`/`, `\/`, `&`, `&amp;`, ...).
pub fn unescape_embedded(raw: &str) -> String {
    let mut out = raw.to_string();
    for (escaped, plain) in ESCAPES {
        if out.contains(escaped) {
            out = out.replace(escaped, plain);
        }
    }
    out
}

/// Unescape, collapse internal whitespace runs to a single space and trim.
pub fn clean_name(raw: &str) -> String {
    unescape_embedded(raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
