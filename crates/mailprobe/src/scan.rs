//! Per-message scanning.

use std::path::Path;

use mailprobe_mime::{Defects, Message};
use tracing::debug;

use crate::check::AttachmentCheck;
use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::subject::SubjectTag;

/// Result of scanning one message.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Report label from the subject.
    pub tag: SubjectTag,
    /// Named parts whose content could be decoded.
    pub attachments: usize,
    /// Attachments accepted by the check.
    pub found: usize,
    /// Defects of the top-level entity, including those found while
    /// decoding its content.
    pub defects: Defects,
}

impl ScanOutcome {
    /// Returns true if at least one attachment matched.
    #[must_use]
    pub const fn matched(&self) -> bool {
        self.found > 0
    }
}

/// Applies one check to every attachment of a message.
pub struct Scanner {
    check: Box<dyn AttachmentCheck>,
}

impl Scanner {
    /// Creates a scanner around a check.
    #[must_use]
    pub fn new(check: Box<dyn AttachmentCheck>) -> Self {
        Self { check }
    }

    /// Creates a scanner using the check selected by the configuration.
    #[must_use]
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.check.build(config.ignore_case))
    }

    /// Name of the active check.
    #[must_use]
    pub fn check_name(&self) -> &'static str {
        self.check.name()
    }

    /// Scans a parsed message.
    ///
    /// Parts without a filename are never checked. Parts whose content
    /// cannot be decoded are skipped. Defects found while decoding the
    /// top-level entity are added to the outcome's defects.
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is missing or carries no tag.
    pub fn scan_message(&self, message: &Message) -> Result<ScanOutcome> {
        let tag = SubjectTag::extract(message.subject().as_deref())?;

        let mut attachments = 0;
        let mut found = 0;
        let mut defects = message.defects().clone();
        for part in message.walk() {
            let Some(name) = part.filename() else {
                continue;
            };
            let decoded = match part.decode() {
                Ok(decoded) => decoded,
                Err(err) => {
                    debug!(%tag, %name, %err, "cannot decode attachment, skipping");
                    continue;
                }
            };
            if std::ptr::eq(part, message.root()) {
                defects.extend(decoded.defects.iter());
            }
            let content = decoded.content;

            attachments += 1;
            let matched = self.check.check(&name, &content);
            debug!(
                %tag,
                %name,
                content_type = %part.content_type(),
                encoding = %part.transfer_encoding(),
                size = content.len(),
                matched,
                "attachment"
            );
            if matched {
                found += 1;
            }
        }

        Ok(ScanOutcome {
            tag,
            attachments,
            found,
            defects,
        })
    }

    /// Reads, parses and scans one message file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a message, or has
    /// no tagged subject.
    pub fn scan_file(&self, path: &Path) -> Result<ScanOutcome> {
        let data = std::fs::read(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let message = Message::parse(&data)?;
        let outcome = self.scan_message(&message)?;
        debug!(
            path = %path.display(),
            tag = %outcome.tag,
            found = outcome.found,
            "scanned file"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::check::{CheckKind, EICAR};
    use mailprobe_mime::encoding::encode_base64;

    fn eicar_text() -> String {
        String::from_utf8(EICAR.to_vec()).unwrap()
    }

    fn multipart(subject: &str, parts: &[String]) -> Vec<u8> {
        let mut raw = format!(
            "Subject: {subject}\r\nContent-Type: multipart/mixed; boundary=\"sep\"\r\n\r\n"
        );
        for part in parts {
            raw.push_str("--sep\r\n");
            raw.push_str(part);
            raw.push_str("\r\n");
        }
        raw.push_str("--sep--\r\n");
        raw.into_bytes()
    }

    fn attachment(name: &str, body: &str) -> String {
        format!(
            "Content-Type: text/plain\r\nContent-Disposition: attachment; filename=\"{name}\"\r\n\r\n{body}"
        )
    }

    fn scanner(kind: CheckKind) -> Scanner {
        Scanner::new(kind.build(false))
    }

    #[test]
    fn test_eicar_attachment_found() {
        let raw = multipart("[1] sample-eicar", &[attachment("virus.txt", &eicar_text())]);
        let message = Message::parse(&raw).unwrap();
        let outcome = scanner(CheckKind::EicarTxt).scan_message(&message).unwrap();
        assert_eq!(outcome.tag.as_str(), "[1] sample-eicar");
        assert_eq!(outcome.found, 1);
        assert!(outcome.matched());
    }

    #[test]
    fn test_base64_eicar_attachment_found() {
        let part = format!(
            "Content-Type: application/octet-stream; name=payload.txt\r\nContent-Transfer-Encoding: base64\r\n\r\n{}",
            encode_base64(EICAR)
        );
        let message = Message::parse(&multipart("[4] encoded", &[part])).unwrap();
        let outcome = scanner(CheckKind::EicarTxt).scan_message(&message).unwrap();
        assert_eq!(outcome.found, 1);
    }

    #[test]
    fn test_clean_attachment_not_found() {
        let raw = multipart("[2] clean-sample", &[attachment("readme.txt", "hello")]);
        let message = Message::parse(&raw).unwrap();
        let outcome = scanner(CheckKind::EicarTxt).scan_message(&message).unwrap();
        assert_eq!(outcome.attachments, 1);
        assert!(!outcome.matched());
    }

    #[test]
    fn test_unnamed_parts_never_checked() {
        let unnamed = format!("Content-Type: text/plain\r\n\r\n{}", eicar_text());
        let empty_name = attachment("", &eicar_text());
        let raw = multipart("[5] unnamed", &[unnamed, empty_name]);
        let message = Message::parse(&raw).unwrap();
        let outcome = scanner(CheckKind::EicarTxt).scan_message(&message).unwrap();
        assert_eq!(outcome.attachments, 0);
        assert_eq!(outcome.found, 0);
    }

    #[test]
    fn test_undecodable_part_skipped() {
        let bad = format!(
            "Content-Type: text/plain; charset=x-bogus; name=bad.txt\r\n\r\n{}",
            eicar_text()
        );
        let good = attachment("good.txt", &eicar_text());
        let message = Message::parse(&multipart("[6] mixed", &[bad, good])).unwrap();
        let outcome = scanner(CheckKind::EicarTxt).scan_message(&message).unwrap();
        assert_eq!(outcome.attachments, 1);
        assert_eq!(outcome.found, 1);
    }

    #[test]
    fn test_every_matching_part_counted() {
        let raw = multipart(
            "[7] zips",
            &[
                attachment("one.zip", "x"),
                attachment("two.zip", "y"),
                attachment("three.txt", "z"),
            ],
        );
        let message = Message::parse(&raw).unwrap();
        let outcome = scanner(CheckKind::ZipName).scan_message(&message).unwrap();
        assert_eq!(outcome.found, 2);
        assert_eq!(outcome.attachments, 3);
    }

    #[test]
    fn test_subject_errors_propagate() {
        let message = Message::parse(b"From: a@example.com\r\n\r\nbody").unwrap();
        assert!(matches!(
            scanner(CheckKind::EicarTxt).scan_message(&message),
            Err(Error::MissingSubject)
        ));

        let message = Message::parse(b"Subject: untagged\r\n\r\nbody").unwrap();
        assert!(matches!(
            scanner(CheckKind::EicarTxt).scan_message(&message),
            Err(Error::SubjectMismatch(_))
        ));
    }

    #[test]
    fn test_defects_carried() {
        let message = Message::parse(
            b"Subject: [8] broken\r\nContent-Type: multipart/mixed; boundary=b\r\n\r\nno delimiter\r\n",
        )
        .unwrap();
        let outcome = scanner(CheckKind::ZipName).scan_message(&message).unwrap();
        assert_eq!(
            outcome.defects.to_string(),
            "[StartBoundaryNotFound, MultipartInvariantViolation]"
        );
    }

    #[test]
    fn test_truncated_base64_root_still_checked() {
        let message = Message::parse(
            b"Subject: [1] x\r\nContent-Type: application/zip; name=a.zip\r\nContent-Transfer-Encoding: base64\r\n\r\nSGVsb\r\n",
        )
        .unwrap();
        let outcome = scanner(CheckKind::ZipName).scan_message(&message).unwrap();
        assert!(outcome.matched());
        assert_eq!(outcome.defects.to_string(), "[InvalidBase64Length]");
    }

    #[test]
    fn test_nested_decoding_defects_not_reported() {
        let part = concat!(
            "Content-Type: application/zip; name=a.zip\r\n",
            "Content-Transfer-Encoding: base64\r\n",
            "\r\n",
            "SGVsb",
        )
        .to_string();
        let message = Message::parse(&multipart("[1] nested", &[part])).unwrap();
        let outcome = scanner(CheckKind::ZipName).scan_message(&message).unwrap();
        assert_eq!(outcome.found, 1);
        assert!(outcome.defects.is_empty());
    }

    #[test]
    fn test_unknown_media_type_skipped() {
        let part = "Content-Type: font/ttf; name=a.zip\r\n\r\nglyphs".to_string();
        let message = Message::parse(&multipart("[2] font", &[part])).unwrap();
        let outcome = scanner(CheckKind::ZipName).scan_message(&message).unwrap();
        assert_eq!(outcome.attachments, 0);
        assert!(!outcome.matched());
    }

    #[test]
    fn test_embedded_message_not_searched() {
        let part = format!(
            "Content-Type: message/rfc822; name=a.txt\r\n\r\nSubject: inner\r\n\r\n{}",
            eicar_text()
        );
        let message = Message::parse(&multipart("[3] forwarded", &[part])).unwrap();
        let outcome = scanner(CheckKind::EicarTxt).scan_message(&message).unwrap();
        assert_eq!(outcome.attachments, 1);
        assert!(!outcome.matched());
    }

    #[test]
    fn test_scan_file_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = scanner(CheckKind::EicarTxt)
            .scan_file(&dir.path().join("missing.eml"))
            .unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
