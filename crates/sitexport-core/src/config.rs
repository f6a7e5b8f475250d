use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::mojibake::{MojibakeEntry, MojibakeTable};
use crate::tree::{ExtensionSet, REPAIR_EXTENSIONS, REWRITE_EXTENSIONS};

/// Default directory the fetch tool writes into (relative to the working directory).
pub const DEFAULT_OUTPUT_DIR: &str = "static-site-export";

/// External fetch tool settings (`[fetch]` in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Program name or path of the recursive downloader.
    pub program: String,
    /// Recursion depth beyond the start page.
    pub depth: u32,
    /// Extra arguments inserted before the start URL.
    pub extra_args: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            program: "wget".to_string(),
            depth: 1,
            extra_args: Vec::new(),
        }
    }
}

/// Reference rewriting settings (`[rewrite]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Extensions of files whose origin references are rewritten.
    pub extensions: Vec<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            extensions: REWRITE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// An extra corrupted sequence to repair, in addition to the built-in table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraEntryConfig {
    pub name: String,
    pub corrupted: String,
    pub repaired: String,
}

/// Mojibake repair settings (`[repair]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Extensions of files that are repaired. HTML only unless widened here.
    pub extensions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_entries: Vec<ExtraEntryConfig>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            extensions: REPAIR_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            extra_entries: Vec::new(),
        }
    }
}

/// Global configuration loaded from `~/.config/sitexport/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output directory used when none is given on the command line.
    pub output_dir: PathBuf,
    /// Worker threads for the rewrite and repair passes (None = one per CPU).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
    pub fetch: FetchConfig,
    pub rewrite: RewriteConfig,
    pub repair: RepairConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            jobs: None,
            fetch: FetchConfig::default(),
            rewrite: RewriteConfig::default(),
            repair: RepairConfig::default(),
        }
    }
}

impl ExportConfig {
    pub fn rewrite_extensions(&self) -> ExtensionSet {
        ExtensionSet::new(&self.rewrite.extensions)
    }

    pub fn repair_extensions(&self) -> ExtensionSet {
        ExtensionSet::new(&self.repair.extensions)
    }

    /// Built-in mojibake table plus any `[[repair.extra_entries]]`.
    pub fn mojibake_table(&self) -> Result<MojibakeTable> {
        let extra: Vec<MojibakeEntry> = self
            .repair
            .extra_entries
            .iter()
            .map(|e| MojibakeEntry {
                name: e.name.clone(),
                corrupted: e.corrupted.clone(),
                repaired: e.repaired.clone(),
            })
            .collect();
        Ok(MojibakeTable::with_extra(&extra)?)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sitexport")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ExportConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ExportConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ExportConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
