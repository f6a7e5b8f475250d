//! The fetched tree on disk: locating its root and selecting eligible files.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ExportError;
use crate::site_url::OriginUrl;

/// Extensions of text files subject to origin rewriting.
pub const REWRITE_EXTENSIONS: &[&str] = &["html", "htm", "css", "js", "xml"];

/// Extensions of files subject to mojibake repair.
pub const REPAIR_EXTENSIONS: &[&str] = &["html"];

/// wget's Windows-safe naming writes a query string's `?` as `@`.
const QUERY_MARKER: char = '@';

/// Case-insensitive set of file extensions (without the leading dot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet(Vec<String>);

impl ExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut exts: Vec<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        exts.sort();
        exts.dedup();
        ExtensionSet(exts)
    }

    pub fn rewrite_default() -> Self {
        Self::new(REWRITE_EXTENSIONS)
    }

    pub fn repair_default() -> Self {
        Self::new(REPAIR_EXTENSIONS)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    fn contains(&self, ext: &str) -> bool {
        self.0.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// True if the file name's extension is in the set.
    ///
    /// `jquery.min.js@ver=3.7.1` is treated as `.js`: the extension before the
    /// query marker counts as well as the one after it.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if self.matches_name(name) {
            return true;
        }
        match name.split_once(QUERY_MARKER) {
            Some((stem, _)) => self.matches_name(stem),
            None => false,
        }
    }

    fn matches_name(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.contains(e))
    }
}

/// Walks `root` and returns every regular file matching `extensions`, sorted by path.
///
/// Symlinks are not followed, so a file is reached through one path only.
/// Any walk error aborts with `FileIo`.
pub fn collect_files(root: &Path, extensions: &ExtensionSet) -> Result<Vec<PathBuf>, ExportError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            ExportError::file_io(path, io::Error::from(e))
        })?;
        if entry.file_type().is_file() && extensions.matches(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Directory names wget may have used for the origin's host, most likely first.
///
/// Without an explicit port the directory is the bare host. With one, wget
/// writes `host:port`, which `--restrict-file-names=windows` turns into `host+port`.
pub fn host_dir_candidates(origin: &OriginUrl) -> Vec<String> {
    match origin.port() {
        Some(port) => vec![
            format!("{}+{}", origin.host(), port),
            format!("{}:{}", origin.host(), port),
            origin.host().to_string(),
        ],
        None => vec![origin.host().to_string()],
    }
}

/// Finds the root directory the fetch step wrote the origin's resources into.
pub fn locate_fetched_root(output_dir: &Path, origin: &OriginUrl) -> Result<PathBuf, ExportError> {
    let candidates = host_dir_candidates(origin);
    for name in &candidates {
        let dir = output_dir.join(name);
        if dir.is_dir() {
            tracing::debug!(root = %dir.display(), "located fetched site root");
            return Ok(dir);
        }
    }
    Err(ExportError::MissingFetchedRoot {
        output_dir: output_dir.to_path_buf(),
        tried: candidates,
    })
}
