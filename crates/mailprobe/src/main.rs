//! `mailprobe` - check email attachments against a test signature.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailprobe::{CheckKind, Reporter, ScanConfig};

/// Scan email messages and report, per file, whether any attachment
/// matches the selected check.
///
/// Matching files print their `[N] name` subject tag on stdout; the others
/// print `NOT [N] name` on stderr.
#[derive(Debug, Parser)]
#[command(version)]
struct Opt {
    /// Check applied to every named attachment.
    #[arg(long, value_enum, default_value_t = CheckKind::EicarTxt)]
    check: CheckKind,

    /// Ignore ASCII case when comparing filename suffixes.
    #[arg(long)]
    ignore_case: bool,

    /// Log and skip files that cannot be parsed instead of stopping.
    #[arg(long)]
    keep_going: bool,

    /// Increase log verbosity (repeatable).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Message files or directories to scan.
    paths: Vec<PathBuf>,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "mailprobe=warn,mailprobe_mime=warn",
        1 => "mailprobe=info,mailprobe_mime=info",
        2 => "mailprobe=debug,mailprobe_mime=debug",
        _ => "mailprobe=trace,mailprobe_mime=trace",
    };

    // stdout carries the report, logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();
    init_logging(opt.verbose);
    debug!(?opt, "starting");

    let config = ScanConfig::builder()
        .check(opt.check)
        .ignore_case(opt.ignore_case)
        .keep_going(opt.keep_going)
        .build();

    mailprobe::run(&config, opt.paths, &mut Reporter::stdio()).context("scan aborted")?;
    Ok(())
}
