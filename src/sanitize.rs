//! Output sanitization for free-text bookmark fields.
//!
//! Titles and descriptions are escaped once, at write time, so whatever is
//! stored (and therefore returned on every later read) renders as inert text
//! in a browser. Existing character references are left alone, which keeps
//! the filter idempotent: escaping already-escaped text is a no-op.

use std::borrow::Cow;

pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['<', '>', '&']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for (i, ch) in input.char_indices() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' if starts_char_reference(&input[i + 1..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

pub fn escape_optional(input: Option<String>) -> Option<String> {
    input.map(|s| escape_html(&s).into_owned())
}

// `rest` is the text right after an '&'.
fn starts_char_reference(rest: &str) -> bool {
    let Some(end) = rest.find(';') else {
        return false;
    };
    let body = &rest[..end];

    if let Some(num) = body.strip_prefix('#') {
        return match num.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()),
        };
    }

    let mut chars = body.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}
