//! Report labels taken from the Subject header.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

#[allow(clippy::expect_used)]
static SUBJECT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\d\] \S+").expect("subject tag pattern is valid"));

/// The `[N] name` prefix of a test message's subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectTag(String);

impl SubjectTag {
    /// Extracts the tag from a decoded Subject value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSubject`] if there is no subject and
    /// [`Error::SubjectMismatch`] if it does not start with the tag.
    pub fn extract(subject: Option<&str>) -> Result<Self> {
        let subject = subject.ok_or(Error::MissingSubject)?;
        SUBJECT_TAG
            .find(subject)
            .map(|m| Self(m.as_str().to_string()))
            .ok_or_else(|| Error::SubjectMismatch(subject.to_string()))
    }

    /// Returns the tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tag() {
        let tag = SubjectTag::extract(Some("[1] sample-eicar")).unwrap();
        assert_eq!(tag.as_str(), "[1] sample-eicar");
    }

    #[test]
    fn test_extract_stops_at_whitespace() {
        let tag = SubjectTag::extract(Some("[3] malware.eml and some words")).unwrap();
        assert_eq!(tag.to_string(), "[3] malware.eml");
    }

    #[test]
    fn test_missing_subject() {
        assert!(matches!(
            SubjectTag::extract(None),
            Err(Error::MissingSubject)
        ));
    }

    #[test]
    fn test_mismatched_subject() {
        for subject in [
            "",
            "no tag here",
            "[12] two-digits",
            "[1]no-space",
            "Re: [1] late",
            "[1] ",
        ] {
            assert!(
                matches!(SubjectTag::extract(Some(subject)), Err(Error::SubjectMismatch(_))),
                "{subject:?} should not match"
            );
        }
    }
}
