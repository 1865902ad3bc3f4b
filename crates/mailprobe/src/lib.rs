//! # mailprobe
//!
//! Regression harness for attachment detection. Scans email message files,
//! applies one attachment check to every named MIME part, and reports per
//! file whether anything matched, labelled by the `[N] name` tag at the start
//! of the subject.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailprobe::{CheckKind, Reporter, ScanConfig};
//!
//! let config = ScanConfig::new(CheckKind::EicarTxt);
//! let summary = mailprobe::run(&config, ["fixtures/"], &mut Reporter::stdio())?;
//! println!("{} of {} files matched", summary.matched, summary.files);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod check;
pub mod collect;
pub mod config;
mod error;
pub mod report;
pub mod scan;
pub mod subject;

use std::io::Write;
use std::path::PathBuf;

use tracing::{error, info};

pub use check::{AttachmentCheck, ArchiveByName, CheckKind, SignatureInText};
pub use collect::InputQueue;
pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{Error, Result};
pub use report::Reporter;
pub use scan::{ScanOutcome, Scanner};
pub use subject::SubjectTag;

/// Counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files scanned and reported.
    pub files: usize,
    /// Reported files with at least one matching attachment.
    pub matched: usize,
    /// Files skipped because of an error (only with `keep_going`).
    pub failed: usize,
}

/// Scans every file reachable from `paths` and reports each one.
///
/// # Errors
///
/// Returns the first per-file error unless `config.keep_going` is set, and
/// any error writing the report.
pub fn run<I, P, O, E>(
    config: &ScanConfig,
    paths: I,
    reporter: &mut Reporter<O, E>,
) -> Result<RunSummary>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
    O: Write,
    E: Write,
{
    let scanner = Scanner::from_config(config);
    let mut summary = RunSummary::default();

    for path in InputQueue::new(paths) {
        let outcome = match scanner.scan_file(&path) {
            Ok(outcome) => outcome,
            Err(err) if config.keep_going => {
                error!(path = %path.display(), %err, "skipping file");
                summary.failed += 1;
                continue;
            }
            Err(err) => {
                return Err(Error::File {
                    path,
                    source: Box::new(err),
                });
            }
        };

        reporter.report(&outcome)?;
        summary.files += 1;
        if outcome.matched() {
            summary.matched += 1;
        }
    }

    info!(
        check = scanner.check_name(),
        files = summary.files,
        matched = summary.matched,
        failed = summary.failed,
        "scan complete"
    );
    Ok(summary)
}
