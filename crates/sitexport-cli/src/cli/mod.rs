//! CLI for sitexport.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sitexport_core::config;
use std::path::PathBuf;

use commands::{run_export, run_repair, run_rewrite, SiteArgs};

/// Top-level CLI for sitexport.
#[derive(Debug, Parser)]
#[command(name = "sitexport")]
#[command(
    about = "Export a locally served CMS site as a static mirror for another host and base path",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch the origin site, rewrite origin references and repair mojibake.
    Export {
        /// Base URL of the locally served site (e.g. http://project-gorbachev.local).
        origin: String,

        /// Base URL of the deployment, optionally with a path prefix.
        target: String,

        /// Directory the site is fetched into [default: static-site-export].
        output_dir: Option<PathBuf>,

        /// Worker threads for the rewrite and repair passes.
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,

        /// Skip fetching and process the tree already in the output directory.
        #[arg(long)]
        skip_fetch: bool,
    },

    /// Rewrite origin references in an already fetched tree.
    Rewrite {
        /// Base URL the tree was fetched from.
        origin: String,

        /// Base URL of the deployment, optionally with a path prefix.
        target: String,

        /// Directory the site was fetched into [default: static-site-export].
        output_dir: Option<PathBuf>,

        /// Worker threads.
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Repair mojibake in the HTML files under a directory.
    Repair {
        /// Fetched site root or any directory below it.
        dir: PathBuf,

        /// Worker threads.
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Export {
                origin,
                target,
                output_dir,
                jobs,
                skip_fetch,
            } => {
                let site = SiteArgs {
                    origin,
                    target,
                    output_dir,
                    jobs,
                };
                run_export(&cfg, &site, skip_fetch)?;
            }
            CliCommand::Rewrite {
                origin,
                target,
                output_dir,
                jobs,
            } => {
                let site = SiteArgs {
                    origin,
                    target,
                    output_dir,
                    jobs,
                };
                run_rewrite(&cfg, &site)?;
            }
            CliCommand::Repair { dir, jobs } => run_repair(&cfg, &dir, jobs)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
