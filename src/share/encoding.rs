//! Percent-encoding rules for share URLs.
//!
//! Two encodings are in play, mirroring what browsers do with the gallery's
//! links:
//!
//! - **Component** encoding (`encodeURIComponent`): everything except
//!   `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped, including `/`. Used for the
//!   `/image-page/…` segment and the `?img=` query value.
//! - **Path** encoding: like `encodeURI`, reserved characters such as `/`, `:`
//!   and `@` stay literal so the URL keeps its directory shape, except `?` and
//!   `#`, which are escaped so a file name can never cut the path short.
//!
//! Decoding follows `decodeURIComponent`: `+` is not a space, and a malformed
//! escape makes the whole input literal text rather than an error.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::borrow::Cow;

const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const PATH: &AsciiSet = &COMPONENT
    .remove(b'/')
    .remove(b';')
    .remove(b',')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$');

/// Escape a value for use as a single URL component (`/` becomes `%2F`).
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Escape a slash-separated path, keeping the slashes.
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH).to_string()
}

/// Decode a client-supplied fragment, falling back to the raw text.
///
/// Returns the input unchanged when it contains a `%` that is not followed by
/// two hex digits, or when the decoded bytes are not valid UTF-8.
pub fn decode_or_raw(raw: &str) -> Cow<'_, str> {
    if !escapes_well_formed(raw) {
        return Cow::Borrowed(raw);
    }
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(raw),
    }
}

fn escapes_well_formed(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}
