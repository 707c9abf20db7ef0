use std::borrow::Cow;

use memchr::{memchr2_iter, memchr3_iter};
use rand::Rng;

use crate::{Error, Result};

pub(crate) const DASHES: [u8; 2] = [b'-', b'-']; // `--`
pub(crate) const CRLF: [u8; 2] = [b'\r', b'\n']; // `\r\n`
pub(crate) const CRLFS: [u8; 4] = [b'\r', b'\n', b'\r', b'\n']; // `\r\n\r\n`

/// The literal prefix of every boundary used by the encoder.
pub const BOUNDARY_PREFIX: &str = "form-data-boundary-";

/// The length of a generated boundary token.
pub const BOUNDARY_SIZE: usize = 16;

// RFC 2046
const MAX_BOUNDARY_LEN: usize = 70;

// Uppercase letters are left out, some servers compare boundaries case-insensitively.
const ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a random boundary token.
///
/// ```
/// let boundary = form_data_encoder::create_boundary();
///
/// assert_eq!(boundary.len(), 16);
/// assert!(boundary.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
/// ```
#[must_use]
pub fn create_boundary() -> String {
    let mut rng = rand::thread_rng();

    (0..BOUNDARY_SIZE)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect()
}

/// Escapes `\r`, `\n` and `"` in a field name or a filename,
/// so that it can be put into a quoted header parameter.
///
/// ```
/// use form_data_encoder::escape_name;
///
/// assert_eq!(escape_name("a\"b\r\nc"), "a%22b%0D%0Ac");
/// assert_eq!(escape_name("plain"), "plain");
/// ```
#[must_use]
pub fn escape_name(name: &str) -> Cow<'_, str> {
    let bytes = name.as_bytes();
    let mut escaped: Option<String> = None;
    let mut last = 0;

    for i in memchr3_iter(b'\r', b'\n', b'"', bytes) {
        let buf = escaped.get_or_insert_with(|| String::with_capacity(name.len() + 6));
        buf.push_str(&name[last..i]);
        buf.push_str(match bytes[i] {
            b'\r' => "%0D",
            b'\n' => "%0A",
            _ => "%22",
        });
        last = i + 1;
    }

    match escaped {
        None => Cow::Borrowed(name),
        Some(mut buf) => {
            buf.push_str(&name[last..]);
            Cow::Owned(buf)
        }
    }
}

/// Normalizes line breaks of a text value: every lone `\r` and every lone `\n`
/// becomes `\r\n`, existing `\r\n` pairs are kept.
///
/// ```
/// use form_data_encoder::normalize_value;
///
/// assert_eq!(normalize_value("a\rb\nc\r\nd"), "a\r\nb\r\nc\r\nd");
/// ```
#[must_use]
pub fn normalize_value(value: &str) -> Cow<'_, str> {
    let bytes = value.as_bytes();
    let mut normalized: Option<String> = None;
    let mut last = 0;

    for i in memchr2_iter(b'\r', b'\n', bytes) {
        // looks around in the original value, not in the rewritten one
        let lone = if bytes[i] == b'\r' {
            bytes.get(i + 1) != Some(&b'\n')
        } else {
            i == 0 || bytes[i - 1] != b'\r'
        };

        if lone {
            let buf = normalized.get_or_insert_with(|| String::with_capacity(value.len() + 8));
            buf.push_str(&value[last..i]);
            buf.push_str("\r\n");
            last = i + 1;
        }
    }

    match normalized {
        None => Cow::Borrowed(value),
        Some(mut buf) => {
            buf.push_str(&value[last..]);
            Cow::Owned(buf)
        }
    }
}

/// Returns the prefixed boundary, generating a token when `token` is empty.
pub(crate) fn prefixed_boundary(token: Option<&str>) -> Result<String> {
    let token = match token {
        Some(t) if !t.is_empty() => {
            if !t.bytes().all(is_boundary_char) {
                return Err(Error::InvalidBoundary(t.to_string()));
            }
            Cow::Borrowed(t)
        }
        _ => Cow::Owned(create_boundary()),
    };

    let boundary = format!("{BOUNDARY_PREFIX}{token}");

    if boundary.len() > MAX_BOUNDARY_LEN {
        return Err(Error::InvalidBoundary(token.into_owned()));
    }

    Ok(boundary)
}

fn is_boundary_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'\'' | b'+' | b'_' | b'-' | b'.')
}
