//! `sitexport export <origin> <target> [output_dir]` – fetch, rewrite and repair.

use anyhow::{Context, Result};
use sitexport_core::config::ExportConfig;
use sitexport_core::fetch::Wget;
use sitexport_core::{Pipeline, Stage};
use std::fs;
use std::path::PathBuf;

use super::{build_plan, print_repair, print_rewrite, SiteArgs};

/// Runs the export and prints its summary. Returns the exported site root.
pub fn run_export(cfg: &ExportConfig, site: &SiteArgs, skip_fetch: bool) -> Result<PathBuf> {
    let plan = build_plan(cfg, site)?;
    let stages: &[Stage] = if skip_fetch {
        &[Stage::Rewrite, Stage::Repair]
    } else {
        &Stage::ALL
    };
    tracing::info!(
        origin = %plan.origin,
        target = %plan.target,
        output_dir = %plan.output_dir.display(),
        ?stages,
        "export requested"
    );

    let pipeline = Pipeline::new(plan, Wget::from_config(&cfg.fetch)).with_stages(stages);
    let summary = pipeline.run()?;

    if let Some(report) = &summary.rewrite {
        print_rewrite(report);
    }
    if let Some(report) = &summary.repair {
        print_repair(report);
    }

    let root = summary
        .root
        .context("export finished without locating the site root")?;
    let root = fs::canonicalize(&root).unwrap_or(root);
    println!("Static site exported to: {}", root.display());
    Ok(root)
}
