//! `sitexport rewrite <origin> <target> [output_dir]` – rewrite stage only.

use anyhow::Result;
use sitexport_core::config::ExportConfig;
use sitexport_core::fetch::Wget;
use sitexport_core::{Pipeline, Stage};

use super::{build_plan, print_rewrite, SiteArgs};

pub fn run_rewrite(cfg: &ExportConfig, site: &SiteArgs) -> Result<()> {
    let plan = build_plan(cfg, site)?;
    let summary = Pipeline::new(plan, Wget::from_config(&cfg.fetch))
        .with_stages(&[Stage::Rewrite])
        .run()?;

    if let Some(report) = &summary.rewrite {
        print_rewrite(report);
    }
    if let Some(root) = &summary.root {
        println!("Rewrote site at: {}", root.display());
    }
    Ok(())
}
