//! CLI command handlers. Each command is in its own file.

mod export;
mod repair;
mod rewrite;

use anyhow::Result;
use sitexport_core::config::ExportConfig;
use sitexport_core::mojibake::RepairReport;
use sitexport_core::rewrite::RewriteReport;
use sitexport_core::site_url::{OriginUrl, TargetUrl};
use sitexport_core::ExportPlan;
use std::path::PathBuf;

pub use export::run_export;
pub use repair::run_repair;
pub use rewrite::run_rewrite;

/// Arguments shared by the commands that work on a whole fetched site.
#[derive(Debug, Clone)]
pub struct SiteArgs {
    pub origin: String,
    pub target: String,
    pub output_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

/// Builds the run plan: command-line values first, then config, then defaults.
pub fn build_plan(cfg: &ExportConfig, site: &SiteArgs) -> Result<ExportPlan> {
    let origin = OriginUrl::parse(&site.origin)?;
    let target = TargetUrl::parse(&site.target)?;
    let output_dir = site
        .output_dir
        .clone()
        .unwrap_or_else(|| cfg.output_dir.clone());

    Ok(ExportPlan {
        rewrite_extensions: cfg.rewrite_extensions(),
        repair_extensions: cfg.repair_extensions(),
        mojibake: cfg.mojibake_table()?,
        jobs: site.jobs.or(cfg.jobs),
        ..ExportPlan::new(origin, target, output_dir)
    })
}

fn print_rewrite(report: &RewriteReport) {
    println!(
        "Rewrote {} reference(s) in {} of {} text file(s).",
        report.replacements, report.files_changed, report.files_scanned
    );
}

fn print_repair(report: &RepairReport) {
    println!(
        "Repaired {} mojibake sequence(s) in {} of {} file(s).",
        report.total_repairs(),
        report.files_changed,
        report.files_scanned
    );
    for (name, n) in &report.repairs {
        println!("  {:<20} {}", name, n);
    }
}
