//! MIME decoding utilities.
//!
//! Supports Base64, Quoted-Printable, charset conversion, RFC 2047 encoded
//! words and RFC 2231 extended parameter values.
//!
//! Body decoders are lenient in the way mail software has to be: stray
//! characters and broken escapes are tolerated where the intent is still
//! recoverable.

use crate::error::{Error, Result};
use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use charset::Charset;

/// Decoder used for transfer-encoded bodies, after padding and noise have
/// been stripped from the input.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data.
///
/// Whitespace, padding and characters outside the Base64 alphabet are
/// ignored.
///
/// # Errors
///
/// Returns an error if the remaining input ends in a truncated quantum
/// (a single dangling character).
pub fn decode_base64(data: &[u8]) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| b.is_ascii_alphanumeric() || *b == b'+' || *b == b'/')
        .collect();
    LENIENT.decode(cleaned).map_err(Into::into)
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

fn hex_pair(pair: &[u8]) -> Option<u8> {
    match pair {
        [hi, lo] => Some((hex_value(*hi)? << 4) | hex_value(*lo)?),
        _ => None,
    }
}

/// Decodes Quoted-Printable data (RFC 2045).
///
/// Soft line breaks are removed. An `=` that does not start a valid escape
/// is kept as a literal character.
#[must_use]
pub fn decode_quoted_printable(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let byte = input[i];
        if byte != b'=' {
            result.push(byte);
            i += 1;
            continue;
        }

        match input.get(i + 1..) {
            Some([b'\r', b'\n', ..]) => i += 3,
            Some([b'\n', ..]) => i += 2,
            _ => {
                if let Some(decoded) = input.get(i + 1..i + 3).and_then(hex_pair) {
                    result.push(decoded);
                    i += 3;
                } else {
                    result.push(b'=');
                    i += 1;
                }
            }
        }
    }

    result
}

/// Converts bytes in the named charset to a string.
///
/// Malformed sequences are replaced with U+FFFD.
///
/// # Errors
///
/// Returns [`Error::UnknownCharset`] if the label names no known charset.
pub fn decode_charset(bytes: &[u8], label: &str) -> Result<String> {
    let charset = Charset::for_label_no_replacement(label.trim().as_bytes())
        .ok_or_else(|| Error::UnknownCharset(label.to_string()))?;
    let (text, _malformed) = charset.decode_without_bom_handling(bytes);
    Ok(text.into_owned())
}

/// Decodes a single encoded word at the start of `text`.
///
/// Returns the decoded text and the number of bytes consumed.
fn decode_encoded_word(text: &str) -> Option<(String, usize)> {
    let inner = text.strip_prefix("=?")?;
    let (charset, after) = inner.split_once('?')?;
    let (encoding, after) = after.split_once('?')?;
    let end = after.find("?=")?;
    let payload = &after[..end];

    if charset.is_empty() || payload.contains(char::is_whitespace) {
        return None;
    }

    // RFC 2231 allows a language suffix: charset*lang
    let charset = charset.split('*').next()?;

    let bytes = match encoding {
        "B" | "b" => decode_base64(payload.as_bytes()).ok()?,
        "Q" | "q" => decode_quoted_printable(payload.replace('_', " ").as_bytes()),
        _ => return None,
    };
    let decoded = decode_charset(&bytes, charset).ok()?;

    let consumed = text.len() - after.len() + end + 2;
    Some((decoded, consumed))
}

/// Decodes RFC 2047 encoded words inside a header value.
///
/// Whitespace between two adjacent encoded words is dropped. Words that
/// cannot be decoded are left as they are.
#[must_use]
pub fn decode_rfc2047(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    let mut after_word = false;

    while let Some(start) = rest.find("=?") {
        let (before, candidate) = rest.split_at(start);
        if let Some((decoded, consumed)) = decode_encoded_word(candidate) {
            if !(after_word && before.chars().all(char::is_whitespace)) {
                result.push_str(before);
            }
            result.push_str(&decoded);
            rest = &candidate[consumed..];
            after_word = true;
        } else {
            result.push_str(before);
            result.push_str("=?");
            rest = &candidate[2..];
            after_word = false;
        }
    }

    result.push_str(rest);
    result
}

/// Decodes an RFC 2231 extended parameter value: `charset'language'%XX...`.
///
/// Values without the charset/language prefix are only percent-decoded and
/// read as UTF-8.
#[must_use]
pub fn decode_rfc2231(value: &str) -> String {
    let (charset, encoded) = match value.splitn(3, '\'').collect::<Vec<_>>()[..] {
        [charset, _language, encoded] => (charset, encoded),
        _ => ("", value),
    };

    let bytes = percent_decode(encoded.as_bytes());
    if charset.is_empty() {
        return String::from_utf8_lossy(&bytes).into_owned();
    }
    decode_charset(&bytes, charset)
        .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned())
}

fn percent_decode(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'%'
            && let Some(decoded) = input.get(i + 1..i + 3).and_then(hex_pair)
        {
            result.push(decoded);
            i += 3;
            continue;
        }
        result.push(input[i]);
        i += 1;
    }
    result
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_base64_decode() {
        let decoded = decode_base64(b"SGVsbG8sIFdvcmxkIQ==").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn test_base64_decode_lenient() {
        let decoded = decode_base64(b"SGVs\r\nbG8s IFdv\tcmxk*IQ").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn test_base64_truncated_quantum() {
        assert!(decode_base64(b"SGVsb").is_err());
    }

    #[test]
    fn test_quoted_printable_decode() {
        assert_eq!(decode_quoted_printable(b"Hello, World!"), b"Hello, World!");
        assert_eq!(decode_quoted_printable(b"H=C3=A9llo"), "Héllo".as_bytes());
    }

    #[test]
    fn test_quoted_printable_soft_line_break() {
        assert_eq!(decode_quoted_printable(b"Hello=\r\nWorld"), b"HelloWorld");
        assert_eq!(decode_quoted_printable(b"Hello=\nWorld"), b"HelloWorld");
    }

    #[test]
    fn test_quoted_printable_invalid_escape_kept() {
        assert_eq!(decode_quoted_printable(b"100=ZZ"), b"100=ZZ");
        assert_eq!(decode_quoted_printable(b"end="), b"end=");
    }

    #[test]
    fn test_decode_charset() {
        assert_eq!(decode_charset(b"caf\xe9", "iso-8859-1").unwrap(), "café");
        assert_eq!(decode_charset("café".as_bytes(), "UTF-8").unwrap(), "café");
        assert!(matches!(
            decode_charset(b"x", "x-no-such-charset"),
            Err(Error::UnknownCharset(_))
        ));
    }

    #[test]
    fn test_rfc2047_decode() {
        assert_eq!(decode_rfc2047("Hello"), "Hello");
        assert_eq!(decode_rfc2047("=?utf-8?B?SMOpbGxv?="), "Héllo");
        assert_eq!(decode_rfc2047("=?utf-8?Q?H=C3=A9llo_there?="), "Héllo there");
    }

    #[test]
    fn test_rfc2047_mixed_and_adjacent() {
        assert_eq!(
            decode_rfc2047("[1] =?utf-8?Q?caf=C3=A9?= =?utf-8?Q?-eicar?= tail"),
            "[1] café-eicar tail"
        );
    }

    #[test]
    fn test_rfc2047_malformed_left_alone() {
        assert_eq!(decode_rfc2047("=?utf-8?X?abc?="), "=?utf-8?X?abc?=");
        assert_eq!(decode_rfc2047("a =? b"), "a =? b");
    }

    #[test]
    fn test_rfc2231_decode() {
        assert_eq!(decode_rfc2231("utf-8''caf%C3%A9.txt"), "café.txt");
        assert_eq!(decode_rfc2231("iso-8859-1'en'caf%E9.txt"), "café.txt");
        assert_eq!(decode_rfc2231("plain%20name.zip"), "plain name.zip");
    }

    proptest! {
        #[test]
        fn quoted_printable_is_identity_without_equals(text in "[ -<>-~]*") {
            prop_assert_eq!(decode_quoted_printable(text.as_bytes()), text.as_bytes());
        }

        #[test]
        fn base64_decode_accepts_encoder_output(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(decode_base64(encode_base64(&data).as_bytes()).unwrap(), data);
        }

        #[test]
        fn rfc2047_never_panics(text in ".*") {
            let _ = decode_rfc2047(&text);
        }
    }
}
