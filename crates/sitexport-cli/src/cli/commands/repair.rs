//! `sitexport repair <dir>` – mojibake repair only, over any directory.

use anyhow::{bail, Result};
use sitexport_core::config::ExportConfig;
use sitexport_core::pipeline::repair_tree;
use sitexport_core::Stage;
use std::path::Path;

use super::print_repair;

pub fn run_repair(cfg: &ExportConfig, dir: &Path, jobs: Option<usize>) -> Result<()> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    let table = cfg.mojibake_table()?;
    let report = repair_tree(dir, &table, &cfg.repair_extensions(), jobs.or(cfg.jobs))
        .map_err(|e| Stage::Repair.fail(e))?;
    print_repair(&report);
    Ok(())
}
