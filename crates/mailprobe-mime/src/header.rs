//! MIME header handling.

use crate::defect::Defect;
use crate::encoding::decode_rfc2047;
use std::collections::HashMap;

/// Collection of email headers.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    headers: HashMap<String, Vec<String>>,
}

/// Result of splitting an entity into its header block and body.
#[derive(Debug)]
pub(crate) struct HeaderBlock {
    pub headers: Headers,
    /// Offset of the first body byte.
    pub body_start: usize,
    pub defects: Vec<Defect>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_lowercase();
        let value = value.into();
        self.headers.entry(name).or_default().push(value);
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|v| v.first().map(String::as_str))
    }

    /// Gets the first value for a header with RFC 2047 encoded words decoded.
    #[must_use]
    pub fn get_decoded(&self, name: &str) -> Option<String> {
        self.get(name).map(decode_rfc2047)
    }

    /// Gets all values for a header.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get(&name.to_lowercase())
            .map(|v| v.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns true if no header is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns an iterator over all headers.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name.as_str(), v.as_str())))
    }

    /// Splits the header block off the front of an entity.
    ///
    /// The block ends at the first empty line, which is consumed. A line that
    /// is neither a header field nor a continuation ends the block early and
    /// is recorded as a [`Defect::MissingHeaderBodySeparator`]; that line
    /// becomes the first line of the body. A leading mbox `From ` envelope
    /// line is skipped; a later one is recorded as a
    /// [`Defect::MisplacedEnvelopeHeader`] and skipped as well, unless it is
    /// the last line of the block, in which case it starts the body.
    pub(crate) fn parse_block(data: &[u8]) -> HeaderBlock {
        let mut headers = Self::new();
        let mut defects = Vec::new();
        let mut current: Option<(String, String)> = None;
        let mut offset = 0;
        let mut first = true;

        while offset < data.len() {
            let (line, end) = line_at(data, offset);

            if line.is_empty() {
                offset = end;
                break;
            }

            if line[0] == b' ' || line[0] == b'\t' {
                // Unfold: drop the line break, keep the leading whitespace
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&String::from_utf8_lossy(line));
                } else if first {
                    defects.push(Defect::FirstHeaderLineIsContinuation);
                }
            } else if let Some((name, value)) = split_field(line) {
                if let Some((name, value)) = current.take() {
                    headers.add(name, value.trim().to_string());
                }
                current = Some((name, value));
            } else if line.starts_with(b"From ") {
                if first {
                    // mbox envelope line
                } else if end < data.len() && is_header_line(line_at(data, end).0) {
                    defects.push(Defect::MisplacedEnvelopeHeader);
                } else {
                    break;
                }
            } else {
                defects.push(Defect::MissingHeaderBodySeparator);
                break;
            }

            offset = end;
            first = false;
        }

        if let Some((name, value)) = current {
            headers.add(name, value.trim().to_string());
        }

        HeaderBlock {
            headers,
            body_start: offset,
            defects,
        }
    }
}

/// Returns the line starting at `offset` without its line break, and the
/// offset just past it.
fn line_at(data: &[u8], offset: usize) -> (&[u8], usize) {
    let end = memchr::memchr(b'\n', &data[offset..]).map_or(data.len(), |p| offset + p + 1);
    (trim_eol(&data[offset..end]), end)
}

/// A line that can continue a header block.
fn is_header_line(line: &[u8]) -> bool {
    match line.first() {
        None => false,
        Some(b' ' | b'\t') => true,
        Some(_) => line.starts_with(b"From ") || split_field(line).is_some(),
    }
}

/// Strips a trailing LF or CRLF.
pub(crate) fn trim_eol(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Splits `Name: value`. Field names are printable ASCII without colon.
fn split_field(line: &[u8]) -> Option<(String, String)> {
    let colon = memchr::memchr(b':', line)?;
    let name = &line[..colon];
    if name.is_empty() || !name.iter().all(|b| (33..=126).contains(b)) {
        return None;
    }
    let value = String::from_utf8_lossy(&line[colon + 1..]);
    Some((
        String::from_utf8_lossy(name).into_owned(),
        value.trim_start().to_string(),
    ))
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

    #[test]
    fn test_headers_add_get() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "text/plain");
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.get("content-type"), Some("text/plain")); // Case insensitive
    }

    #[test]
    fn test_headers_get_all() {
        let mut headers = Headers::new();
        headers.add("Received", "from a");
        headers.add("received", "from b");
        assert_eq!(headers.get_all("RECEIVED"), vec!["from a", "from b"]);
        assert_eq!(headers.iter().count(), 2);
    }

    #[test]
    fn test_parse_block() {
        let text = concat!(
            "From: sender@example.com\r\n",
            "Subject: [1] sample\r\n",
            "Content-Type: text/plain;\r\n",
            " charset=utf-8\r\n",
            "\r\n",
            "body\r\n"
        );

        let block = Headers::parse_block(text.as_bytes());
        assert!(block.defects.is_empty());
        assert_eq!(block.headers.get("From"), Some("sender@example.com"));
        assert_eq!(block.headers.get("Subject"), Some("[1] sample"));
        assert_eq!(
            block.headers.get("Content-Type"),
            Some("text/plain; charset=utf-8")
        );
        assert_eq!(&text.as_bytes()[block.body_start..], b"body\r\n");
    }

    #[test]
    fn test_parse_block_bare_lf_and_no_body() {
        let block = Headers::parse_block(b"Subject: x\nX-Other: y");
        assert_eq!(block.headers.get("x-other"), Some("y"));
        assert_eq!(block.body_start, 21);
    }

    #[test]
    fn test_parse_block_skips_envelope() {
        let block = Headers::parse_block(b"From someone@example.com Mon Jan 1\nSubject: x\n\n");
        assert!(block.defects.is_empty());
        assert_eq!(block.headers.get("subject"), Some("x"));
    }

    #[test]
    fn test_parse_block_missing_separator() {
        let text = b"Subject: x\nthis is body text\nmore\n";
        let block = Headers::parse_block(text);
        assert_eq!(block.defects, vec![Defect::MissingHeaderBodySeparator]);
        assert_eq!(&text[block.body_start..], b"this is body text\nmore\n");
    }

    #[test]
    fn test_parse_block_leading_continuation() {
        let block = Headers::parse_block(b"  stray\nSubject: x\n\n");
        assert_eq!(block.defects, vec![Defect::FirstHeaderLineIsContinuation]);
        assert_eq!(block.headers.get("subject"), Some("x"));
    }

    #[test]
    fn test_parse_block_misplaced_envelope() {
        let text = b"X-A: b\nFrom a@b Mon Jan 1 12:00:00 2000\nSubject: [1] x\n\nbody\n";
        let block = Headers::parse_block(text);
        assert_eq!(block.defects, vec![Defect::MisplacedEnvelopeHeader]);
        assert_eq!(block.headers.get("x-a"), Some("b"));
        assert_eq!(block.headers.get("subject"), Some("[1] x"));
        assert_eq!(&text[block.body_start..], b"body\n");
    }

    #[test]
    fn test_parse_block_trailing_envelope_starts_body() {
        let text = b"Subject: x\nFrom the desk of someone\n\nrest\n";
        let block = Headers::parse_block(text);
        assert!(block.defects.is_empty());
        assert_eq!(&text[block.body_start..], b"From the desk of someone\n\nrest\n");
    }

    #[test]
    fn test_get_decoded() {
        let mut headers = Headers::new();
        headers.add("Subject", "=?utf-8?B?WzNdIG1hbHdhcmU=?=");
        assert_eq!(headers.get_decoded("subject").as_deref(), Some("[3] malware"));
    }
}
