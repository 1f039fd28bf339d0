//! Identifier codec for filesystem-safe dataset filenames
//!
//! Dataset ids may contain arbitrary characters, including path separators.
//! The codec percent-escapes every non-alphanumeric byte, which makes the
//! encoding total on all legal ids, injective, and exactly inverted by
//! percent-decoding. All store filename construction goes through it.

use crate::{Error, Result};
use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Encode a dataset id into a single safe filename segment
pub fn encode(id: &str) -> String {
    utf8_percent_encode(id, NON_ALPHANUMERIC).to_string()
}

/// Decode a filename segment back into the original dataset id
pub fn decode(fname: &str) -> Result<String> {
    percent_decode_str(fname)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| Error::internal(format!("undecodable dataset filename '{fname}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_identity() {
        let ids = [
            "sections",
            "ubc courses",
            "a/b/c",
            "100%",
            "dots.and.more",
            "tabs\tand\nnewlines",
            "naïve-résumé",
            "..",
        ];

        for id in ids {
            assert_eq!(decode(&encode(id)).unwrap(), id, "round trip of {id:?}");
        }
    }

    #[test]
    fn test_encoded_form_is_filename_safe() {
        let encoded = encode("a/b\\c:d sections");
        assert!(!encoded.contains('/'));
        assert!(!encoded.contains('\\'));
        assert!(!encoded.contains(':'));
        assert!(!encoded.contains(' '));
        assert!(encoded.chars().all(|c| c.is_ascii_alphanumeric() || c == '%'));
    }

    #[test]
    fn test_distinct_ids_encode_distinctly() {
        // The percent sign itself is escaped, so a pre-escaped id cannot
        // collide with the id it would decode to.
        assert_ne!(encode("a%2Fb"), encode("a/b"));
        assert_ne!(encode("a b"), encode("a+b"));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert!(decode("%FF%FE").is_err());
    }
}
