//! URL fragment codec for deep links.
//!
//! A fragment is either empty (the album index) or
//! `<percent-encoded album id>/<photo number>`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::fmt;

/// Characters left unescaped by `encodeURIComponent`.
const FRAGMENT_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a single path component (album id).
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, FRAGMENT_COMPONENT).to_string()
}

/// Decodes a percent-encoded component. Returns `None` if the decoded bytes
/// are not valid UTF-8.
pub fn decode_component(value: &str) -> Option<String> {
    percent_decode_str(value)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Decoded form of a location fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Index,
    /// `number` is the raw value from the fragment; it is not yet checked
    /// against any catalog.
    Photo { album: String, number: u64 },
}

impl Location {
    /// Parses a fragment, with or without the leading `#`.
    ///
    /// Returns `None` for anything that is neither empty nor exactly
    /// `<album>/<digits>`.
    pub fn parse(fragment: &str) -> Option<Location> {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if fragment.is_empty() {
            return Some(Location::Index);
        }

        let mut parts = fragment.split('/');
        let (Some(encoded_album), Some(number), None) = (parts.next(), parts.next(), parts.next())
        else {
            return None;
        };

        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Digit strings too long for u64 are still valid positive numbers.
        let number = number.parse::<u64>().unwrap_or(u64::MAX);
        let album = decode_component(encoded_album)?;

        Some(Location::Photo { album, number })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Index => Ok(()),
            Location::Photo { album, number } => {
                write!(f, "{}/{}", encode_component(album), number)
            }
        }
    }
}
