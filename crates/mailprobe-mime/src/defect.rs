//! Structural anomalies recorded while parsing.
//!
//! Defects never stop parsing. They are attached to the entity in which
//! they were found.

use std::fmt;

/// A structural anomaly found in a MIME entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defect {
    /// A multipart entity has no boundary parameter.
    NoBoundaryInMultipart,
    /// A multipart body contains no delimiter line for its boundary.
    StartBoundaryNotFound,
    /// A multipart body ends without its closing delimiter.
    CloseBoundaryNotFound,
    /// A line in the header block is neither a field nor a continuation.
    MissingHeaderBodySeparator,
    /// The header block starts with a continuation line.
    FirstHeaderLineIsContinuation,
    /// A multipart entity declares a transfer encoding other than 7bit,
    /// 8bit or binary.
    InvalidMultipartContentTransferEncoding,
    /// The top-level entity is multipart but no sub-part could be split
    /// off its body.
    MultipartInvariantViolation,
    /// The Content-Type header could not be parsed; text/plain is assumed.
    InvalidContentType,
    /// A `From ` envelope line appears after the first header line.
    MisplacedEnvelopeHeader,
    /// A Base64 body ends in a truncated quantum; the body is kept
    /// undecoded.
    InvalidBase64Length,
}

impl Defect {
    /// Returns the defect name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoBoundaryInMultipart => "NoBoundaryInMultipart",
            Self::StartBoundaryNotFound => "StartBoundaryNotFound",
            Self::CloseBoundaryNotFound => "CloseBoundaryNotFound",
            Self::MissingHeaderBodySeparator => "MissingHeaderBodySeparator",
            Self::FirstHeaderLineIsContinuation => "FirstHeaderLineIsContinuation",
            Self::InvalidMultipartContentTransferEncoding => {
                "InvalidMultipartContentTransferEncoding"
            }
            Self::MultipartInvariantViolation => "MultipartInvariantViolation",
            Self::InvalidContentType => "InvalidContentType",
            Self::MisplacedEnvelopeHeader => "MisplacedEnvelopeHeader",
            Self::InvalidBase64Length => "InvalidBase64Length",
        }
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered list of defects, displayed as `[Name, Name]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defects(Vec<Defect>);

impl Defects {
    /// Returns true if no defect was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of defects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the given defect was recorded.
    #[must_use]
    pub fn contains(&self, defect: Defect) -> bool {
        self.0.contains(&defect)
    }

    /// Returns an iterator over the defects.
    pub fn iter(&self) -> impl Iterator<Item = Defect> + '_ {
        self.0.iter().copied()
    }

    pub(crate) fn push(&mut self, defect: Defect) {
        self.0.push(defect);
    }
}

impl From<Vec<Defect>> for Defects {
    fn from(defects: Vec<Defect>) -> Self {
        Self(defects)
    }
}

impl Extend<Defect> for Defects {
    fn extend<T: IntoIterator<Item = Defect>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl fmt::Display for Defects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, defect) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{defect}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defects_display() {
        let defects = Defects::from(vec![
            Defect::StartBoundaryNotFound,
            Defect::CloseBoundaryNotFound,
        ]);
        assert_eq!(
            defects.to_string(),
            "[StartBoundaryNotFound, CloseBoundaryNotFound]"
        );
        assert_eq!(defects.len(), 2);
        assert!(defects.contains(Defect::CloseBoundaryNotFound));
    }

    #[test]
    fn test_defects_extend() {
        let mut defects = Defects::from(vec![Defect::MisplacedEnvelopeHeader]);
        defects.extend(Defects::from(vec![Defect::InvalidBase64Length]).iter());
        assert_eq!(
            defects.to_string(),
            "[MisplacedEnvelopeHeader, InvalidBase64Length]"
        );
    }

    #[test]
    fn test_empty_defects() {
        let defects = Defects::default();
        assert!(defects.is_empty());
        assert_eq!(defects.to_string(), "[]");
    }
}
