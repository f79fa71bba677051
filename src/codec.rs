//! Text encodings for documents read from and written to disk.
//!
//! Encodings are named by WHATWG label (`utf-8`, `windows-1252`,
//! `shift_jis`, `utf-16le`, ...). Decoding is strict: bytes that are not
//! valid in the chosen encoding fail instead of turning into U+FFFD. A byte
//! order mark is kept as text, so a document round-trips byte for byte.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};

use crate::error::RuleditError;

/// Encoding used when neither the command line nor the settings name one.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Look up an encoding by label. Labels are case-insensitive.
pub fn encoding_for(label: &str) -> Result<&'static Encoding, RuleditError> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| RuleditError::UnknownEncoding {
        label: label.to_string(),
    })
}

/// Decode `bytes`. `origin` names the input in error messages.
pub fn decode(
    bytes: &[u8],
    encoding: &'static Encoding,
    origin: &str,
) -> Result<String, RuleditError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
        .ok_or_else(|| RuleditError::Decode {
            origin: origin.to_string(),
            encoding: encoding.name(),
        })
}

/// Encode `text`. Characters the encoding cannot represent are an error.
pub fn encode(
    text: &str,
    encoding: &'static Encoding,
    target: &str,
) -> Result<Vec<u8>, RuleditError> {
    // encoding_rs only encodes UTF-16 as UTF-8.
    if encoding == UTF_16LE {
        return Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == UTF_16BE {
        return Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }

    let (bytes, used, unmappable) = encoding.encode(text);
    if unmappable || used != encoding {
        return Err(RuleditError::Encode {
            target: target.to_string(),
            encoding: encoding.name(),
        });
    }
    Ok(bytes.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{SHIFT_JIS, UTF_8, WINDOWS_1252};

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(encoding_for("UTF-8").unwrap(), UTF_8);
        assert_eq!(encoding_for(" latin1 ").unwrap(), WINDOWS_1252);
        assert_eq!(encoding_for("cp1252").unwrap(), WINDOWS_1252);
    }

    #[test]
    fn unknown_label() {
        let err = encoding_for("klingon").unwrap_err();
        assert!(matches!(err, RuleditError::UnknownEncoding { ref label } if label == "klingon"));
    }

    #[test]
    fn windows_1252_round_trip() {
        let bytes = b"name = caf\xe9";
        let text = decode(bytes, WINDOWS_1252, "doc.ini").unwrap();
        assert_eq!(text, "name = café");
        assert_eq!(encode(&text, WINDOWS_1252, "out.ini").unwrap(), bytes);
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = decode(b"name = caf\xe9", UTF_8, "doc.ini").unwrap_err();
        match err {
            RuleditError::Decode { origin, encoding } => {
                assert_eq!(origin, "doc.ini");
                assert_eq!(encoding, "UTF-8");
            }
            other => panic!("Expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn bom_is_kept() {
        let text = decode(b"\xef\xbb\xbf[A]", UTF_8, "doc.ini").unwrap();
        assert_eq!(text, "\u{feff}[A]");
        assert_eq!(encode(&text, UTF_8, "out.ini").unwrap(), b"\xef\xbb\xbf[A]");
    }

    #[test]
    fn unmappable_characters_are_rejected() {
        let err = encode("run = 日本", WINDOWS_1252, "out.ini").unwrap_err();
        assert!(matches!(err, RuleditError::Encode { .. }));
    }

    #[test]
    fn shift_jis_encodes() {
        let bytes = encode("日本", SHIFT_JIS, "out.ini").unwrap();
        assert_eq!(decode(&bytes, SHIFT_JIS, "out.ini").unwrap(), "日本");
    }

    #[test]
    fn utf16_is_written_as_utf16() {
        let le = encoding_for("utf-16le").unwrap();
        assert_eq!(encode("[A]", le, "out.ini").unwrap(), b"[\0A\0]\0");
        assert_eq!(decode(b"[\0A\0]\0", le, "doc.ini").unwrap(), "[A]");
        let be = encoding_for("utf-16be").unwrap();
        assert_eq!(encode("A", be, "out.ini").unwrap(), b"\0A");
    }
}
