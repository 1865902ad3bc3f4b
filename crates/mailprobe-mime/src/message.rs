//! MIME message structure and parsing.

use crate::content::{Content, Decoded};
use crate::content_type::{ContentDisposition, ContentType};
use crate::defect::{Defect, Defects};
use crate::encoding::{decode_base64, decode_charset, decode_quoted_printable, decode_rfc2047};
use crate::error::{Error, Result};
use crate::header::{Headers, trim_eol};
use std::fmt;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit, // Default (includes "7bit" and unknown encodings)
        }
    }

    /// Returns true for the identity encodings (7bit, 8bit, binary).
    #[must_use]
    pub const fn is_identity(self) -> bool {
        matches!(self, Self::SevenBit | Self::EightBit | Self::Binary)
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// MIME message part.
///
/// A part is a node in the message tree. Multipart parts own their
/// sub-parts as children; a message/rfc822 part owns the embedded message
/// as its single child.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body (raw bytes, still transfer-encoded).
    pub body: Vec<u8>,
    /// Child parts.
    pub children: Vec<Part>,
    content_type: ContentType,
    defects: Defects,
}

impl Part {
    /// Parses one entity (header block and body).
    ///
    /// `default_type` applies when the entity has no Content-Type header.
    fn parse_entity(data: &[u8], default_type: ContentType) -> Self {
        let block = Headers::parse_block(data);
        let mut defects = Defects::from(block.defects);

        let content_type = match block.headers.get("content-type") {
            None => default_type,
            Some(value) => ContentType::parse(value).unwrap_or_else(|_| {
                defects.push(Defect::InvalidContentType);
                ContentType::text_plain()
            }),
        };

        let mut part = Self {
            headers: block.headers,
            body: data[block.body_start..].to_vec(),
            children: Vec::new(),
            content_type,
            defects,
        };

        if part.content_type.is_multipart() {
            part.parse_multipart();
        } else if part.content_type.is_message()
            && part.content_type.sub_type == "rfc822"
            && part.transfer_encoding().is_identity()
        {
            part.children = vec![Self::parse_entity(&part.body, ContentType::text_plain())];
        }

        part
    }

    /// Splits a multipart body into child parts. Without a boundary or a
    /// start delimiter the entity keeps no children.
    fn parse_multipart(&mut self) {
        let Some(boundary) = self.content_type.boundary() else {
            self.defects.push(Defect::NoBoundaryInMultipart);
            return;
        };

        if !self.transfer_encoding().is_identity() {
            self.defects
                .push(Defect::InvalidMultipartContentTransferEncoding);
        }

        let Some(split) = split_multipart(&self.body, boundary) else {
            self.defects.push(Defect::StartBoundaryNotFound);
            return;
        };

        let child_type = if self.content_type.sub_type == "digest" {
            ContentType::message_rfc822()
        } else {
            ContentType::text_plain()
        };

        self.children = split
            .parts
            .iter()
            .map(|data| Self::parse_entity(data, child_type.clone()))
            .collect();

        if !split.closed {
            self.defects.push(Defect::CloseBoundaryNotFound);
        }
    }

    /// Gets the content type. Entities without a parseable Content-Type
    /// header get the default for their position (usually text/plain).
    #[must_use]
    pub const fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// Gets the transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Gets the parsed Content-Disposition header, if present.
    #[must_use]
    pub fn disposition(&self) -> Option<ContentDisposition> {
        self.headers
            .get("content-disposition")
            .map(ContentDisposition::parse)
    }

    /// Gets the attachment filename.
    ///
    /// Uses the Content-Disposition `filename` parameter, falling back to
    /// the Content-Type `name` parameter. Encoded words are decoded and
    /// surrounding whitespace removed. Empty names are reported as `None`.
    #[must_use]
    pub fn filename(&self) -> Option<String> {
        let raw = self
            .disposition()
            .and_then(|cd| cd.filename().map(str::to_string))
            .or_else(|| self.content_type.name().map(str::to_string))?;

        let name = decode_rfc2047(&raw);
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Defects found while parsing this entity.
    #[must_use]
    pub const fn defects(&self) -> &Defects {
        &self.defects
    }

    /// Decodes the body according to the transfer encoding.
    ///
    /// A Base64 body that ends in a truncated quantum cannot be decoded; it
    /// is returned with its line breaks removed but otherwise undecoded,
    /// together with [`Defect::InvalidBase64Length`].
    #[must_use]
    pub fn decode_body(&self) -> (Vec<u8>, Option<Defect>) {
        match self.transfer_encoding() {
            TransferEncoding::Base64 => match decode_base64(&self.body) {
                Ok(bytes) => (bytes, None),
                Err(_) => {
                    let raw = self
                        .body
                        .iter()
                        .copied()
                        .filter(|b| *b != b'\r' && *b != b'\n')
                        .collect();
                    (raw, Some(Defect::InvalidBase64Length))
                }
            },
            TransferEncoding::QuotedPrintable => (decode_quoted_printable(&self.body), None),
            _ => (self.body.clone(), None),
        }
    }

    /// Gets the decoded content of a leaf part.
    ///
    /// Shorthand for [`Part::decode`] that drops the decoding defects.
    ///
    /// # Errors
    ///
    /// See [`Part::decode`].
    pub fn content(&self) -> Result<Content> {
        self.decode().map(|decoded| decoded.content)
    }

    /// Decodes the content of a leaf part by media type:
    ///
    /// - `text/*` is transfer-decoded, then decoded with its charset
    ///   (us-ascii when absent);
    /// - `audio/*`, `image/*`, `video/*` and `application/*` are
    ///   transfer-decoded bytes;
    /// - `message/rfc822` and `message/external-body` are
    ///   [`Content::Message`]; other `message/*` subtypes are their raw
    ///   bytes.
    ///
    /// # Errors
    ///
    /// Returns an error for multipart containers, for other main types and
    /// for unknown charsets.
    pub fn decode(&self) -> Result<Decoded> {
        let ct = &self.content_type;
        let mut defects = Defects::default();

        let content = match ct.main_type.as_str() {
            "multipart" => return Err(Error::NotLeaf(ct.to_string())),
            "message" => match ct.sub_type.as_str() {
                "rfc822" | "external-body" => Content::Message(self.body.clone()),
                _ => Content::Binary(self.body.clone()),
            },
            "text" | "audio" | "image" | "video" | "application" => {
                let (bytes, defect) = self.decode_body();
                defects.extend(defect);
                if ct.is_text() {
                    let charset = ct.charset().unwrap_or("us-ascii");
                    Content::Text(decode_charset(&bytes, charset)?)
                } else {
                    Content::Binary(bytes)
                }
            }
            _ => return Err(Error::NoContentHandler(ct.to_string())),
        };

        Ok(Decoded { content, defects })
    }
}

/// Bodies of a multipart entity, split on its boundary.
struct Split<'a> {
    parts: Vec<&'a [u8]>,
    closed: bool,
}

/// Splits a multipart body on `--boundary` delimiter lines.
///
/// Returns `None` if no opening delimiter line precedes the first close
/// delimiter or the end of the body. The line break before a delimiter
/// belongs to the delimiter; whitespace after it is transport padding.
fn split_multipart<'a>(body: &'a [u8], boundary: &str) -> Option<Split<'a>> {
    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();
    let mut part_start: Option<usize> = None;
    let mut offset = 0;

    while offset < body.len() {
        let end = memchr::memchr(b'\n', &body[offset..]).map_or(body.len(), |p| offset + p + 1);
        let line = trim_eol(&body[offset..end]);

        if let Some(rest) = line.strip_prefix(delimiter.as_bytes()) {
            let (close, padding) = rest
                .strip_prefix(b"--")
                .map_or((false, rest), |tail| (true, tail));

            if padding.iter().all(|b| *b == b' ' || *b == b'\t') {
                if close {
                    let start = part_start?;
                    parts.push(trim_eol(&body[start..offset]));
                    return Some(Split {
                        parts,
                        closed: true,
                    });
                }
                if let Some(start) = part_start {
                    parts.push(trim_eol(&body[start..offset]));
                }
                part_start = Some(end);
            }
        }

        offset = end;
    }

    parts.push(&body[part_start?..]);
    Some(Split {
        parts,
        closed: false,
    })
}

/// MIME message.
#[derive(Debug, Clone)]
pub struct Message {
    root: Part,
}

impl Message {
    /// Parses a raw RFC 5322 message.
    ///
    /// Structural problems are recorded as defects rather than failing the
    /// parse. A multipart message from which no sub-part could be split
    /// also gets [`Defect::MultipartInvariantViolation`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the input contains no header field at all.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut root = Part::parse_entity(data, ContentType::text_plain());
        if root.headers.is_empty() {
            return Err(Error::Parse("no header fields found".to_string()));
        }
        if root.content_type.is_multipart() && root.children.is_empty() {
            root.defects.push(Defect::MultipartInvariantViolation);
        }
        Ok(Self { root })
    }

    /// Top-level headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.root.headers
    }

    /// The top-level entity.
    #[must_use]
    pub const fn root(&self) -> &Part {
        &self.root
    }

    /// Gets the Subject header with encoded words decoded.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        self.root.headers.get_decoded("subject")
    }

    /// Defects found while parsing the top-level entity.
    ///
    /// Defects of nested parts are available from each [`Part`].
    #[must_use]
    pub const fn defects(&self) -> &Defects {
        &self.root.defects
    }

    /// Iterates over every part, depth-first, starting with the top-level
    /// entity.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![&self.root],
        }
    }
}

/// Depth-first iterator over the parts of a [`Message`].
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<&'a Part>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Part;

    fn next(&mut self) -> Option<Self::Item> {
        let part = self.stack.pop()?;
        self.stack.extend(part.children.iter().rev());
        Some(part)
    }
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

    const MIXED: &str = concat!(
        "From: sender@example.com\r\n",
        "Subject: [1] sample-eicar\r\n",
        "MIME-Version: 1.0\r\n",
        "Content-Type: multipart/mixed; boundary=\"outer\"\r\n",
        "\r\n",
        "This is the preamble.\r\n",
        "--outer\r\n",
        "Content-Type: text/plain\r\n",
        "\r\n",
        "Hello\r\n",
        "--outer\r\n",
        "Content-Type: multipart/alternative; boundary=inner\r\n",
        "\r\n",
        "--inner\r\n",
        "Content-Type: text/plain\r\n",
        "\r\n",
        "plain\r\n",
        "--inner\r\n",
        "Content-Type: text/html\r\n",
        "\r\n",
        "<p>html</p>\r\n",
        "--inner--\r\n",
        "--outer  \r\n",
        "Content-Type: application/octet-stream; name=\"data.bin\"\r\n",
        "Content-Disposition: attachment; filename=\"virus.txt\"\r\n",
        "Content-Transfer-Encoding: base64\r\n",
        "\r\n",
        "SGVsbG8s\r\n",
        "IFdvcmxkIQ==\r\n",
        "--outer--\r\n",
        "epilogue\r\n",
    );

    #[test]
    fn test_transfer_encoding_parse() {
        assert_eq!(TransferEncoding::parse("7bit"), TransferEncoding::SevenBit);
        assert_eq!(TransferEncoding::parse(" Base64 "), TransferEncoding::Base64);
        assert_eq!(
            TransferEncoding::parse("quoted-printable"),
            TransferEncoding::QuotedPrintable
        );
        assert_eq!(TransferEncoding::parse("x-uuencode"), TransferEncoding::SevenBit);
        assert_eq!(TransferEncoding::Base64.to_string(), "base64");
    }

    #[test]
    fn test_parse_single_part() {
        let message = Message::parse(b"Subject: [2] clean\r\n\r\nHello, World!").unwrap();
        assert_eq!(message.subject().as_deref(), Some("[2] clean"));
        assert!(message.defects().is_empty());
        assert_eq!(message.walk().count(), 1);
        assert_eq!(
            message.root().content().unwrap(),
            Content::Text("Hello, World!".to_string())
        );
    }

    #[test]
    fn test_parse_multipart_tree() {
        let message = Message::parse(MIXED.as_bytes()).unwrap();
        assert!(message.defects().is_empty());

        let types: Vec<String> = message
            .walk()
            .map(|part| part.content_type().to_string())
            .collect();
        assert_eq!(
            types,
            vec![
                "multipart/mixed",
                "text/plain",
                "multipart/alternative",
                "text/plain",
                "text/html",
                "application/octet-stream",
            ]
        );
    }

    #[test]
    fn test_part_bodies_exclude_delimiter_line_break() {
        let message = Message::parse(MIXED.as_bytes()).unwrap();
        let parts: Vec<&Part> = message.walk().collect();
        assert_eq!(parts[1].body, b"Hello");
        assert_eq!(parts[4].body, b"<p>html</p>");
    }

    #[test]
    fn test_attachment_filename_and_content() {
        let message = Message::parse(MIXED.as_bytes()).unwrap();
        let attachment = message.walk().last().unwrap();
        // Content-Disposition filename wins over Content-Type name
        assert_eq!(attachment.filename().as_deref(), Some("virus.txt"));
        assert_eq!(
            attachment.content().unwrap(),
            Content::Binary(b"Hello, World!".to_vec())
        );
        assert!(message.walk().take(5).all(|part| part.filename().is_none()));
    }

    #[test]
    fn test_filename_fallback_to_name() {
        let message = Message::parse(
            b"Subject: x\nContent-Type: application/zip; name=\" archive.zip \"\n\nPK",
        )
        .unwrap();
        assert_eq!(message.root().filename().as_deref(), Some("archive.zip"));
    }

    #[test]
    fn test_filename_encoded_word() {
        let message = Message::parse(
            b"Subject: x\nContent-Disposition: attachment; filename=\"=?utf-8?Q?caf=C3=A9.txt?=\"\n\nx",
        )
        .unwrap();
        assert_eq!(message.root().filename().as_deref(), Some("café.txt"));
    }

    #[test]
    fn test_empty_filename_is_none() {
        let message = Message::parse(
            b"Subject: x\nContent-Disposition: attachment; filename=\"\"\nContent-Type: text/plain; name=real.txt\n\nx",
        )
        .unwrap();
        assert_eq!(message.root().filename(), None);
    }

    #[test]
    fn test_text_content_charset() {
        let message = Message::parse(
            b"Subject: x\nContent-Type: text/plain; charset=iso-8859-1\nContent-Transfer-Encoding: quoted-printable\n\ncaf=E9",
        )
        .unwrap();
        assert_eq!(
            message.root().content().unwrap(),
            Content::Text("café".to_string())
        );
    }

    #[test]
    fn test_unknown_charset_fails() {
        let message =
            Message::parse(b"Subject: x\nContent-Type: text/plain; charset=x-bogus\n\nabc")
                .unwrap();
        assert!(matches!(
            message.root().content(),
            Err(Error::UnknownCharset(_))
        ));
    }

    #[test]
    fn test_truncated_base64_kept_undecoded() {
        let message = Message::parse(
            b"Subject: x\nContent-Type: application/zip; name=a.zip\nContent-Transfer-Encoding: base64\n\nSGVs\r\nb\r\n",
        )
        .unwrap();
        let decoded = message.root().decode().unwrap();
        assert_eq!(decoded.content, Content::Binary(b"SGVsb".to_vec()));
        assert_eq!(decoded.defects.to_string(), "[InvalidBase64Length]");
        // Decoding defects are not parse defects
        assert!(message.defects().is_empty());
    }

    #[test]
    fn test_truncated_base64_text_decoded_as_charset() {
        let message = Message::parse(
            b"Subject: x\nContent-Type: text/plain; charset=utf-8\nContent-Transfer-Encoding: base64\n\nSGVsb",
        )
        .unwrap();
        let decoded = message.root().decode().unwrap();
        assert_eq!(decoded.content, Content::Text("SGVsb".to_string()));
        assert!(decoded.defects.contains(Defect::InvalidBase64Length));
    }

    #[test]
    fn test_valid_base64_has_no_decoding_defects() {
        let message = Message::parse(
            b"Subject: x\nContent-Type: application/octet-stream\nContent-Transfer-Encoding: base64\n\nSGVsbG8=",
        )
        .unwrap();
        let decoded = message.root().decode().unwrap();
        assert_eq!(decoded.content, Content::Binary(b"Hello".to_vec()));
        assert!(decoded.defects.is_empty());
    }

    #[test]
    fn test_content_by_media_type() {
        let content = |content_type: &str| {
            let raw = format!("Subject: x\nContent-Type: {content_type}\n\nbody");
            Message::parse(raw.as_bytes()).unwrap().root().content()
        };

        assert_eq!(content("image/png").unwrap(), Content::Binary(b"body".to_vec()));
        assert_eq!(content("audio/ogg").unwrap(), Content::Binary(b"body".to_vec()));
        assert_eq!(content("video/mp4").unwrap(), Content::Binary(b"body".to_vec()));
        assert_eq!(
            content("message/delivery-status").unwrap(),
            Content::Binary(b"body".to_vec())
        );
        assert!(matches!(
            content("font/ttf; name=a.zip"),
            Err(Error::NoContentHandler(_))
        ));
        assert!(matches!(
            content("model/gltf+json"),
            Err(Error::NoContentHandler(_))
        ));
    }

    #[test]
    fn test_multipart_content_is_not_leaf() {
        let message = Message::parse(MIXED.as_bytes()).unwrap();
        assert!(matches!(message.root().content(), Err(Error::NotLeaf(_))));
    }

    #[test]
    fn test_missing_boundary_defect() {
        let message =
            Message::parse(b"Subject: x\nContent-Type: multipart/mixed\n\nno parts").unwrap();
        assert_eq!(
            message.defects().to_string(),
            "[NoBoundaryInMultipart, MultipartInvariantViolation]"
        );
        assert_eq!(message.walk().count(), 1);
    }

    #[test]
    fn test_start_boundary_not_found() {
        let message = Message::parse(
            b"Subject: x\nContent-Type: multipart/mixed; boundary=b\n\njust text\n",
        )
        .unwrap();
        assert_eq!(
            message.defects().to_string(),
            "[StartBoundaryNotFound, MultipartInvariantViolation]"
        );
        assert!(message.root().children.is_empty());
    }

    #[test]
    fn test_close_boundary_not_found() {
        let message = Message::parse(
            b"Subject: x\nContent-Type: multipart/mixed; boundary=b\n\n--b\nContent-Type: text/plain\n\none\n--b\n\ntwo\n",
        )
        .unwrap();
        assert_eq!(message.defects().to_string(), "[CloseBoundaryNotFound]");
        let parts: Vec<&Part> = message.walk().collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].body, b"two\n");
    }

    #[test]
    fn test_multipart_without_parts() {
        let message =
            Message::parse(b"Subject: x\nContent-Type: multipart/mixed; boundary=b\n\n--b--\n")
                .unwrap();
        assert_eq!(
            message.defects().to_string(),
            "[StartBoundaryNotFound, MultipartInvariantViolation]"
        );
    }

    #[test]
    fn test_empty_part_is_still_a_part() {
        let message = Message::parse(
            b"Subject: x\nContent-Type: multipart/mixed; boundary=b\n\n--b\n--b--\n",
        )
        .unwrap();
        assert!(message.defects().is_empty());
        assert_eq!(message.root().children.len(), 1);
    }

    #[test]
    fn test_multipart_with_encoding_defect() {
        let message = Message::parse(
            b"Subject: x\nContent-Type: multipart/mixed; boundary=b\nContent-Transfer-Encoding: base64\n\n--b\n\nx\n--b--\n",
        )
        .unwrap();
        assert!(
            message
                .defects()
                .contains(Defect::InvalidMultipartContentTransferEncoding)
        );
    }

    #[test]
    fn test_nested_defects_stay_on_part() {
        let message = Message::parse(
            b"Subject: x\nContent-Type: multipart/mixed; boundary=b\n\n--b\nContent-Type: multipart/mixed\n\nx\n--b--\n",
        )
        .unwrap();
        assert!(message.defects().is_empty());
        let nested = message.walk().nth(1).unwrap();
        assert_eq!(nested.defects().to_string(), "[NoBoundaryInMultipart]");
    }

    #[test]
    fn test_invalid_content_type_defaults() {
        let message = Message::parse(b"Subject: x\nContent-Type: garbage\n\nbody").unwrap();
        assert_eq!(message.root().content_type(), &ContentType::text_plain());
        assert!(message.defects().contains(Defect::InvalidContentType));
    }

    #[test]
    fn test_embedded_message_is_walked() {
        let message = Message::parse(
            b"Subject: x\nContent-Type: message/rfc822\nContent-Disposition: attachment; filename=fwd.eml\n\nSubject: inner\nContent-Type: application/zip; name=inner.zip\n\nPK",
        )
        .unwrap();
        let parts: Vec<&Part> = message.walk().collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].content().unwrap().is_message());
        assert_eq!(parts[1].headers.get("subject"), Some("inner"));
        assert_eq!(parts[1].filename().as_deref(), Some("inner.zip"));
    }

    #[test]
    fn test_digest_children_default_to_rfc822() {
        let message = Message::parse(
            b"Subject: x\nContent-Type: multipart/digest; boundary=d\n\n--d\n\nSubject: one\n\nbody\n--d--\n",
        )
        .unwrap();
        let parts: Vec<&Part> = message.walk().collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].content_type(), &ContentType::message_rfc822());
        assert_eq!(parts[2].headers.get("subject"), Some("one"));
    }

    #[test]
    fn test_parse_rejects_headerless_input() {
        assert!(matches!(Message::parse(b""), Err(Error::Parse(_))));
        assert!(matches!(
            Message::parse(b"\x00\x01 binary junk\n"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_misplaced_envelope_keeps_headers() {
        let message = Message::parse(
            b"X-A: b\nFrom a@b Mon Jan 1 12:00:00 2000\nSubject: [1] x\nContent-Type: application/zip; name=a.zip\n\nPK",
        )
        .unwrap();
        assert_eq!(message.subject().as_deref(), Some("[1] x"));
        assert_eq!(message.defects().to_string(), "[MisplacedEnvelopeHeader]");
        assert_eq!(message.root().filename().as_deref(), Some("a.zip"));
    }

    #[test]
    fn test_missing_separator_recorded_on_message() {
        let message = Message::parse(b"Subject: [1] x\nnot a header\n").unwrap();
        assert_eq!(message.defects().to_string(), "[MissingHeaderBodySeparator]");
        assert_eq!(message.root().body, b"not a header\n");
    }

    proptest! {
        #[test]
        fn parse_never_panics(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            if let Ok(message) = Message::parse(&data) {
                for part in message.walk() {
                    let _ = part.filename();
                    let _ = part.content();
                }
            }
        }

        #[test]
        fn walk_visits_every_part_once(count in 1usize..8) {
            let mut raw = String::from("Subject: x\nContent-Type: multipart/mixed; boundary=b\n\n");
            for i in 0..count {
                raw.push_str(&format!("--b\nContent-Type: text/plain; name=f{i}.txt\n\n{i}\n"));
            }
            raw.push_str("--b--\n");
            let message = Message::parse(raw.as_bytes()).unwrap();
            prop_assert_eq!(message.walk().count(), count + 1);
            prop_assert_eq!(message.walk().filter(|p| p.filename().is_some()).count(), count);
        }
    }
}
