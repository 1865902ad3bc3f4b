//! Scan configuration types.

use crate::check::CheckKind;

/// Configuration for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanConfig {
    /// Check applied to every attachment.
    pub check: CheckKind,
    /// Compare filename suffixes without regard to ASCII case.
    pub ignore_case: bool,
    /// Skip files that fail to parse or carry no tagged subject instead of
    /// aborting the run.
    pub keep_going: bool,
}

impl ScanConfig {
    /// Creates a configuration using the given check and default options.
    #[must_use]
    pub fn new(check: CheckKind) -> Self {
        Self {
            check,
            ..Self::default()
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }
}

/// Builder for scan configuration.
#[derive(Debug, Clone, Default)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    /// Sets the check.
    #[must_use]
    pub const fn check(mut self, check: CheckKind) -> Self {
        self.config.check = check;
        self
    }

    /// Sets case-insensitive suffix matching.
    #[must_use]
    pub const fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.config.ignore_case = ignore_case;
        self
    }

    /// Sets whether per-file failures are skipped.
    #[must_use]
    pub const fn keep_going(mut self, keep_going: bool) -> Self {
        self.config.keep_going = keep_going;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub const fn build(self) -> ScanConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.check, CheckKind::EicarTxt);
        assert!(!config.ignore_case);
        assert!(!config.keep_going);
    }

    #[test]
    fn test_builder() {
        let config = ScanConfig::builder()
            .check(CheckKind::ZipName)
            .ignore_case(true)
            .keep_going(true)
            .build();
        assert_eq!(config.check, CheckKind::ZipName);
        assert!(config.ignore_case);
        assert!(config.keep_going);
        assert_eq!(ScanConfig::new(CheckKind::ZipName).check, CheckKind::ZipName);
    }
}
