//! Per-file report lines.
//!
//! A matched file prints its tag on stdout, an unmatched one prints
//! `NOT <tag>` on stderr. Defects of the top-level entity add an
//! `ERR <defects>` line on stdout.

use std::io::{self, Stderr, Stdout, Write};

use crate::scan::ScanOutcome;

/// Writes report lines to an output and an error stream.
#[derive(Debug)]
pub struct Reporter<O, E> {
    out: O,
    err: E,
}

impl Reporter<Stdout, Stderr> {
    /// Reports to the process's stdout and stderr.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    /// Creates a reporter over the given streams.
    pub const fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// Writes the lines for one scanned file.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn report(&mut self, outcome: &ScanOutcome) -> io::Result<()> {
        if outcome.matched() {
            writeln!(self.out, "{}", outcome.tag)?;
        } else {
            writeln!(self.err, "NOT {}", outcome.tag)?;
        }
        if !outcome.defects.is_empty() {
            writeln!(self.out, "ERR {}", outcome.defects)?;
        }
        Ok(())
    }

    /// Returns the underlying streams.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::subject::SubjectTag;
    use mailprobe_mime::{Defect, Defects};

    fn outcome(found: usize, defects: Vec<Defect>) -> ScanOutcome {
        ScanOutcome {
            tag: SubjectTag::extract(Some("[1] sample")).unwrap(),
            attachments: 1,
            found,
            defects: Defects::from(defects),
        }
    }

    fn render(outcome: &ScanOutcome) -> (String, String) {
        let mut reporter = Reporter::new(Vec::new(), Vec::new());
        reporter.report(outcome).unwrap();
        let (out, err) = reporter.into_inner();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_match_goes_to_stdout() {
        assert_eq!(render(&outcome(2, vec![])), ("[1] sample\n".into(), String::new()));
    }

    #[test]
    fn test_miss_goes_to_stderr() {
        assert_eq!(
            render(&outcome(0, vec![])),
            (String::new(), "NOT [1] sample\n".into())
        );
    }

    #[test]
    fn test_defects_reported_on_stdout() {
        let (out, err) = render(&outcome(0, vec![Defect::CloseBoundaryNotFound]));
        assert_eq!(out, "ERR [CloseBoundaryNotFound]\n");
        assert_eq!(err, "NOT [1] sample\n");
    }
}
