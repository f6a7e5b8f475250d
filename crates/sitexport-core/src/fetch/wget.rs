//! `wget` as the recursive downloader.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::FetchConfig;
use crate::error::ExportError;
use crate::site_url::OriginUrl;

use super::Fetcher;

#[derive(Debug, Clone)]
pub struct Wget {
    program: String,
    depth: u32,
    extra_args: Vec<String>,
}

impl Default for Wget {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

impl Wget {
    pub fn from_config(cfg: &FetchConfig) -> Self {
        Wget {
            program: cfg.program.clone(),
            depth: cfg.depth,
            extra_args: cfg.extra_args.clone(),
        }
    }

    /// Locates the program on PATH (or checks the given path is executable).
    pub fn resolve(&self) -> Result<PathBuf, ExportError> {
        which::which(&self.program).map_err(|_| ExportError::MissingDependency {
            program: self.program.clone(),
        })
    }

    /// Full argument list for mirroring `origin` into `output_dir`.
    pub fn args(&self, origin: &OriginUrl, output_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "--recursive".to_string(),
            format!("--level={}", self.depth),
            "--page-requisites".to_string(),
            "--adjust-extension".to_string(),
            "--convert-links".to_string(),
            "--restrict-file-names=windows".to_string(),
            format!("--domains={}", origin.host()),
            "--no-clobber".to_string(),
            "--no-parent".to_string(),
            "--remote-encoding=UTF-8".to_string(),
            "--local-encoding=UTF-8".to_string(),
        ]
        .into_iter()
        .map(OsString::from)
        .collect();

        let mut prefix = OsString::from("--directory-prefix=");
        prefix.push(output_dir.as_os_str());
        args.push(prefix);
        args.extend(self.extra_args.iter().map(OsString::from));
        args.push(OsString::from(origin.start_url()));
        args
    }
}

impl Fetcher for Wget {
    fn fetch(&self, origin: &OriginUrl, output_dir: &Path) -> Result<(), ExportError> {
        let program = self.resolve()?;
        fs::create_dir_all(output_dir).map_err(|e| ExportError::file_io(output_dir, e))?;

        tracing::info!(
            program = %program.display(),
            origin = %origin,
            output_dir = %output_dir.display(),
            "starting fetch"
        );
        // stdio is inherited so the operator sees the crawl progress.
        let status = Command::new(&program)
            .args(self.args(origin, output_dir))
            .status()
            .map_err(|source| ExportError::FetchSpawn {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            tracing::error!(?status, "fetch tool failed");
            return Err(ExportError::FetchFailure {
                status: status.code(),
            });
        }
        tracing::info!("fetch finished");
        Ok(())
    }
}
