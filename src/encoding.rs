//! Percent-encoding for the path component of a URI
//!
//! Literal template text is encoded before it becomes part of a pattern, so
//! a template written as `/a b` matches the request path `/a%20b`. The
//! allowed set is RFC 3986 `pchar` plus `/`.

use crate::error::{Result, RoutingError};
use std::borrow::Cow;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Sub-delimiters, legal inside a path without encoding
const SUB_DELIMS: &str = "!$&'()*+,;=";

/// Check whether a character may appear unencoded in a URI path
pub fn is_path_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || "-._~:@/".contains(ch) || SUB_DELIMS.contains(ch)
}

/// Encode every character that is not legal in a path, including `%`.
///
/// ```
/// use uri_dispatch::encoding::encode_path;
///
/// assert_eq!(encode_path("/a b"), "/a%20b");
/// assert_eq!(encode_path("100%"), "100%25");
/// ```
pub fn encode_path(value: &str) -> Cow<'_, str> {
    encode_with(value, false)
}

/// Encode characters that are not legal in a path, keeping existing
/// `%XX` escapes intact so that already encoded text is not encoded twice.
///
/// ```
/// use uri_dispatch::encoding::recognize_encode_path;
///
/// assert_eq!(recognize_encode_path("/a%20b c"), "/a%20b%20c");
/// assert_eq!(recognize_encode_path("50%"), "50%25");
/// ```
pub fn recognize_encode_path(value: &str) -> Cow<'_, str> {
    encode_with(value, true)
}

/// Decode `%XX` escapes into a UTF-8 string
pub fn decode(value: &str) -> Result<String> {
    urlencoding::decode(value)
        .map(Cow::into_owned)
        .map_err(|_| RoutingError::InvalidEncoding {
            value: value.to_string(),
        })
}

fn encode_with(value: &str, keep_encoded: bool) -> Cow<'_, str> {
    let bytes = value.as_bytes();
    let mut encoded = String::with_capacity(value.len());
    let mut changed = false;
    let mut chars = value.char_indices();

    while let Some((idx, ch)) = chars.next() {
        if ch == '%' && keep_encoded && is_percent_triplet(bytes, idx) {
            encoded.push_str(&value[idx..idx + 3]);
            // Both hex digits are ASCII, one char each.
            chars.next();
            chars.next();
        } else if is_path_char(ch) {
            encoded.push(ch);
        } else {
            changed = true;
            push_percent_encoded(&mut encoded, ch);
        }
    }

    if changed {
        Cow::Owned(encoded)
    } else {
        Cow::Borrowed(value)
    }
}

fn is_percent_triplet(bytes: &[u8], idx: usize) -> bool {
    matches!(
        (bytes.get(idx + 1), bytes.get(idx + 2)),
        (Some(a), Some(b)) if a.is_ascii_hexdigit() && b.is_ascii_hexdigit()
    )
}

fn push_percent_encoded(out: &mut String, ch: char) {
    let mut buf = [0u8; 4];
    for byte in ch.encode_utf8(&mut buf).bytes() {
        out.push('%');
        out.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
        out.push(char::from(HEX_DIGITS[usize::from(byte & 0x0F)]));
    }
}
