//! MIME content type and content disposition handling.

use crate::encoding::decode_rfc2231;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// MIME content type with parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "image", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "html", "jpeg").
    pub sub_type: String,
    /// Parameters (e.g., charset=utf-8, boundary=xxx).
    pub parameters: HashMap<String, String>,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: HashMap::new(),
        }
    }

    /// Creates a text/plain content type, the default for entities without
    /// a Content-Type header.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain")
    }

    /// Creates a message/rfc822 content type, the default for children of
    /// multipart/digest.
    #[must_use]
    pub fn message_rfc822() -> Self {
        Self::new("message", "rfc822")
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameters.get("charset").map(String::as_str)
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameters
            .get("boundary")
            .map(String::as_str)
            .filter(|b| !b.is_empty())
    }

    /// Returns the name parameter if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.parameters.get("name").map(String::as_str)
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type == "multipart"
    }

    /// Checks if this is a message content type (e.g., message/rfc822).
    #[must_use]
    pub fn is_message(&self) -> bool {
        self.main_type == "message"
    }

    /// Checks if this is a text content type.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.main_type == "text"
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2="value 2"`
    ///
    /// # Errors
    ///
    /// Returns an error if the type/subtype pair is malformed.
    pub fn parse(s: &str) -> Result<Self> {
        let (type_str, params) = s.split_once(';').unwrap_or((s, ""));

        let (main_type, sub_type) = type_str
            .trim()
            .split_once('/')
            .ok_or_else(|| Error::InvalidContentType(s.to_string()))?;
        let main_type = main_type.trim().to_lowercase();
        let sub_type = sub_type.trim().to_lowercase();

        if main_type.is_empty() || sub_type.is_empty() || sub_type.contains(char::is_whitespace) {
            return Err(Error::InvalidContentType(s.to_string()));
        }

        let mut content_type = Self::new(main_type, sub_type);
        content_type.parameters = parse_parameters(params);
        Ok(content_type)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)
    }
}

/// Content-Disposition header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    /// Disposition type (e.g., "attachment", "inline").
    pub disposition: String,
    /// Parameters (e.g., filename).
    pub parameters: HashMap<String, String>,
}

impl ContentDisposition {
    /// Parses a Content-Disposition header value. Never fails; a missing
    /// disposition type is left empty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let (disposition, params) = s.split_once(';').unwrap_or((s, ""));
        Self {
            disposition: disposition.trim().to_lowercase(),
            parameters: parse_parameters(params),
        }
    }

    /// Returns the filename parameter if present.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.parameters.get("filename").map(String::as_str)
    }

    /// Checks if this is an attachment disposition.
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.disposition == "attachment"
    }
}

/// Splits a parameter list on semicolons that are not inside quotes.
fn split_parameters(s: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                segments.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&s[start..]);
    segments
}

/// Removes surrounding quotes and backslash escapes from a parameter value.
fn unquote(value: &str) -> String {
    let Some(inner) = value.strip_prefix('"') else {
        return value.to_string();
    };

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            '"' => break,
            _ => result.push(c),
        }
    }
    result
}

/// One RFC 2231 section of a parameter: `name*N` or `name*N*`.
struct Section {
    index: u32,
    extended: bool,
    value: String,
}

/// Parses `; key=value` pairs, assembling RFC 2231 continuations and
/// extended values. Extended values take precedence over plain ones.
fn parse_parameters(s: &str) -> HashMap<String, String> {
    let mut plain = HashMap::new();
    let mut sectioned: HashMap<String, Vec<Section>> = HashMap::new();

    for segment in split_parameters(s) {
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = unquote(value.trim());

        let Some((base, rest)) = key.split_once('*') else {
            plain.insert(key, value);
            continue;
        };

        let (index, extended) = match rest {
            "" => (0, true),
            _ => {
                let extended = rest.ends_with('*');
                match rest.trim_end_matches('*').parse() {
                    Ok(index) => (index, extended),
                    Err(_) => continue,
                }
            }
        };
        sectioned.entry(base.to_string()).or_default().push(Section {
            index,
            extended,
            value,
        });
    }

    for (name, mut sections) in sectioned {
        sections.sort_by_key(|section| section.index);
        let value = if sections.first().is_some_and(|section| section.extended) {
            let combined: String = sections
                .iter()
                .map(|section| {
                    if section.extended {
                        section.value.clone()
                    } else {
                        section.value.replace('%', "%25")
                    }
                })
                .collect();
            decode_rfc2231(&combined)
        } else {
            sections.iter().map(|section| section.value.as_str()).collect()
        };
        plain.insert(name, value);
    }

    plain
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
    fn test_content_type_parse() {
        let ct = ContentType::parse("Text/Plain; charset=utf-8").unwrap();
        assert_eq!(ct.main_type, "text");
        assert_eq!(ct.sub_type, "plain");
        assert_eq!(ct.charset(), Some("utf-8"));
        assert!(ct.is_text());
    }

    #[test]
    fn test_content_type_parse_quoted() {
        let ct = ContentType::parse("multipart/mixed; boundary=\"----=_Part_123\"").unwrap();
        assert!(ct.is_multipart());
        assert_eq!(ct.boundary(), Some("----=_Part_123"));
    }

    #[test]
    fn test_content_type_semicolon_in_quotes() {
        let ct =
            ContentType::parse("application/octet-stream; name=\"a;b \\\"c\\\".zip\"").unwrap();
        assert_eq!(ct.name(), Some("a;b \"c\".zip"));
    }

    #[test]
    fn test_content_type_invalid() {
        assert!(ContentType::parse("text").is_err());
        assert!(ContentType::parse("/plain").is_err());
        assert!(ContentType::parse("").is_err());
    }

    #[test]
    fn test_content_type_empty_boundary() {
        let ct = ContentType::parse("multipart/mixed; boundary=\"\"").unwrap();
        assert_eq!(ct.boundary(), None);
    }

    #[test]
    fn test_content_type_display() {
        let ct = ContentType::parse("image/png; name=x.png").unwrap();
        assert_eq!(ct.to_string(), "image/png");
    }

    #[test]
    fn test_disposition_parse() {
        let cd = ContentDisposition::parse("Attachment; filename=\"virus.txt\"; size=68");
        assert!(cd.is_attachment());
        assert_eq!(cd.filename(), Some("virus.txt"));
        assert_eq!(cd.parameters.get("size"), Some(&"68".to_string()));
    }

    #[test]
    fn test_disposition_rfc2231_extended() {
        let cd = ContentDisposition::parse("attachment; filename*=utf-8''caf%C3%A9.zip");
        assert_eq!(cd.filename(), Some("café.zip"));
    }

    #[test]
    fn test_disposition_rfc2231_continuations() {
        let cd = ContentDisposition::parse(
            "attachment; filename*1=\"ple.txt\"; filename*0=\"exam\"",
        );
        assert_eq!(cd.filename(), Some("example.txt"));

        let cd = ContentDisposition::parse(
            "attachment; filename*0*=utf-8''%C3%A9t%C3%A9; filename*1=\"_100%.txt\"",
        );
        assert_eq!(cd.filename(), Some("été_100%.txt"));
    }

    #[test]
    fn test_disposition_extended_wins() {
        let cd = ContentDisposition::parse(
            "attachment; filename=\"fallback.bin\"; filename*=utf-8''real.zip",
        );
        assert_eq!(cd.filename(), Some("real.zip"));
    }

    #[test]
    fn test_disposition_without_type() {
        let cd = ContentDisposition::parse("");
        assert_eq!(cd.disposition, "");
        assert_eq!(cd.filename(), None);
    }
}
