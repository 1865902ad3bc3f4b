//! Decoded part content.

use crate::defect::Defects;

/// Decoded content of a leaf part.
///
/// Text parts are decoded through their charset; other media stay raw
/// bytes after transfer decoding. An embedded message is kept as a whole
/// and is not content that signatures are searched in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Charset-decoded text (text/* parts).
    Text(String),
    /// Transfer-decoded bytes.
    Binary(Vec<u8>),
    /// Raw bytes of an embedded message (message/rfc822,
    /// message/external-body).
    Message(Vec<u8>),
}

/// Content of a part together with the defects found while decoding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The decoded content.
    pub content: Content,
    /// Defects found while decoding, such as a truncated Base64 body.
    pub defects: Defects,
}

impl Content {
    /// Returns the content as bytes. Text is returned as its UTF-8 encoding.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) | Self::Message(bytes) => bytes,
        }
    }

    /// Returns the length of the content in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if the content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Checks if this is text content.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Checks if this is an embedded message.
    #[must_use]
    pub const fn is_message(&self) -> bool {
        matches!(self, Self::Message(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_normalizes_to_utf8() {
        let content = Content::Text("café".to_string());
        assert_eq!(content.as_bytes(), "café".as_bytes());
        assert_eq!(content.len(), 5);
        assert!(content.is_text());
    }

    #[test]
    fn test_binary_as_is() {
        let content = Content::Binary(vec![0xff, 0x00]);
        assert_eq!(content.as_bytes(), &[0xff, 0x00]);
        assert!(!content.is_text());
        assert!(!content.is_message());
        assert!(!content.is_empty());
    }

    #[test]
    fn test_message_content() {
        let content = Content::Message(b"Subject: inner\n\nbody".to_vec());
        assert!(content.is_message());
        assert_eq!(content.len(), 20);
    }
}
