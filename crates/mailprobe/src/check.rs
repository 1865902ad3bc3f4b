//! Attachment checks.
//!
//! A check decides whether one attachment, given its filename and decoded
//! content, is what the test corpus expects to be detected. Exactly one check
//! is active for a whole run.

use std::fmt;

use mailprobe_mime::Content;

/// The EICAR antivirus test file.
pub const EICAR: &[u8; 68] =
    b"X5O!P%@AP[4\\PZX54(P^)7CC)7}$EICAR-STANDARD-ANTIVIRUS-TEST-FILE!$H+H*";

/// Decides whether an attachment matches.
pub trait AttachmentCheck {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns true if the attachment matches.
    fn check(&self, filename: &str, content: &Content) -> bool;
}

fn has_suffix(filename: &str, suffix: &str, ignore_case: bool) -> bool {
    if ignore_case {
        filename.len() >= suffix.len()
            && filename.as_bytes()[filename.len() - suffix.len()..]
                .eq_ignore_ascii_case(suffix.as_bytes())
    } else {
        filename.ends_with(suffix)
    }
}

/// Matches `.txt` attachments whose content contains the EICAR string.
/// An embedded message is never searched.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureInText {
    ignore_case: bool,
}

impl SignatureInText {
    /// Creates the check; `ignore_case` relaxes the `.txt` suffix comparison.
    #[must_use]
    pub const fn new(ignore_case: bool) -> Self {
        Self { ignore_case }
    }
}

impl AttachmentCheck for SignatureInText {
    fn name(&self) -> &'static str {
        "eicar-txt"
    }

    fn check(&self, filename: &str, content: &Content) -> bool {
        has_suffix(filename, ".txt", self.ignore_case)
            && !content.is_message()
            && memchr::memmem::find(content.as_bytes(), EICAR).is_some()
    }
}

/// Matches attachments named `*.zip`, whatever their content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveByName {
    ignore_case: bool,
}

impl ArchiveByName {
    /// Creates the check; `ignore_case` relaxes the `.zip` suffix comparison.
    #[must_use]
    pub const fn new(ignore_case: bool) -> Self {
        Self { ignore_case }
    }
}

impl AttachmentCheck for ArchiveByName {
    fn name(&self) -> &'static str {
        "zip-name"
    }

    fn check(&self, filename: &str, _content: &Content) -> bool {
        has_suffix(filename, ".zip", self.ignore_case)
    }
}

/// Selects the check for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CheckKind {
    /// EICAR signature inside a `.txt` attachment.
    #[default]
    EicarTxt,
    /// Any attachment named `*.zip`.
    ZipName,
}

impl CheckKind {
    /// Builds the check.
    #[must_use]
    pub fn build(self, ignore_case: bool) -> Box<dyn AttachmentCheck> {
        match self {
            Self::EicarTxt => Box::new(SignatureInText::new(ignore_case)),
            Self::ZipName => Box::new(ArchiveByName::new(ignore_case)),
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EicarTxt => write!(f, "eicar-txt"),
            Self::ZipName => write!(f, "zip-name"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(s: &[u8]) -> Content {
        Content::Text(String::from_utf8(s.to_vec()).unwrap())
    }

    #[test]
    fn test_eicar_in_txt() {
        let check = SignatureInText::default();
        assert!(check.check("payload.txt", &text(EICAR)));
        assert!(check.check("payload.txt", &Content::Binary(EICAR.to_vec())));
    }

    #[test]
    fn test_embedded_message_never_carries_signature() {
        let mut raw = b"Subject: inner\r\n\r\n".to_vec();
        raw.extend_from_slice(EICAR);
        assert!(!SignatureInText::default().check("fwd.txt", &Content::Message(raw)));
    }

    #[test]
    fn test_eicar_embedded_in_larger_content() {
        let mut body = b"header line\r\n".to_vec();
        body.extend_from_slice(EICAR);
        body.extend_from_slice(b"\r\ntrailer");
        assert!(SignatureInText::default().check("x.txt", &Content::Binary(body)));
    }

    #[test]
    fn test_eicar_suffix_is_case_sensitive() {
        let check = SignatureInText::default();
        assert!(!check.check("payload.TXT", &text(EICAR)));
        assert!(SignatureInText::new(true).check("payload.TXT", &text(EICAR)));
    }

    #[test]
    fn test_eicar_requires_txt_and_signature() {
        let check = SignatureInText::default();
        assert!(!check.check("payload.bin", &text(EICAR)));
        assert!(!check.check("readme.txt", &text(b"just a readme")));
        assert!(!check.check("short.txt", &text(&EICAR[..67])));
    }

    #[test]
    fn test_archive_by_name() {
        let check = ArchiveByName::default();
        assert!(check.check("archive.zip", &Content::Binary(Vec::new())));
        assert!(check.check("archive.zip", &text(b"not a zip at all")));
        assert!(!check.check("archive.ZIP", &Content::Binary(Vec::new())));
        assert!(!check.check("archive.zip.txt", &Content::Binary(Vec::new())));
        assert!(ArchiveByName::new(true).check("ARCHIVE.ZIP", &Content::Binary(Vec::new())));
    }

    #[test]
    fn test_ignore_case_short_names() {
        assert!(!has_suffix("zip", ".zip", true));
        assert!(has_suffix(".ZIP", ".zip", true));
    }

    #[test]
    fn test_check_kind_build() {
        assert_eq!(CheckKind::default(), CheckKind::EicarTxt);
        assert_eq!(CheckKind::EicarTxt.build(false).name(), "eicar-txt");
        assert_eq!(CheckKind::ZipName.build(false).name(), "zip-name");
        assert_eq!(CheckKind::ZipName.to_string(), "zip-name");
    }

    proptest! {
        #[test]
        fn archive_check_ignores_content(content in proptest::collection::vec(any::<u8>(), 0..128)) {
            prop_assert!(ArchiveByName::default().check("a.zip", &Content::Binary(content)));
        }
    }
}
