//! Tests for the export subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_export() {
    match parse(&[
        "sitexport",
        "export",
        "http://project-gorbachev.local",
        "https://airbornesurfer.com/project-gorbachev",
    ]) {
        CliCommand::Export {
            origin,
            target,
            output_dir,
            jobs,
            skip_fetch,
        } => {
            assert_eq!(origin, "http://project-gorbachev.local");
            assert_eq!(target, "https://airbornesurfer.com/project-gorbachev");
            assert!(output_dir.is_none());
            assert!(jobs.is_none());
            assert!(!skip_fetch);
        }
        _ => panic!("expected Export"),
    }
}

#[test]
fn cli_parse_export_output_dir() {
    match parse(&[
        "sitexport",
        "export",
        "http://site.local",
        "https://example.com",
        "/tmp/export",
    ]) {
        CliCommand::Export { output_dir, .. } => {
            assert_eq!(output_dir.as_deref(), Some(Path::new("/tmp/export")));
        }
        _ => panic!("expected Export with output dir"),
    }
}

#[test]
fn cli_parse_export_flags() {
    match parse(&[
        "sitexport",
        "export",
        "http://site.local",
        "https://example.com",
        "--jobs",
        "4",
        "--skip-fetch",
    ]) {
        CliCommand::Export {
            jobs, skip_fetch, ..
        } => {
            assert_eq!(jobs, Some(4));
            assert!(skip_fetch);
        }
        _ => panic!("expected Export with flags"),
    }
}

#[test]
fn cli_export_requires_target() {
    assert!(Cli::try_parse_from(["sitexport", "export", "http://site.local"]).is_err());
}

#[test]
fn cli_rejects_non_numeric_jobs() {
    assert!(Cli::try_parse_from([
        "sitexport",
        "export",
        "http://site.local",
        "https://example.com",
        "--jobs",
        "many",
    ])
    .is_err());
}
