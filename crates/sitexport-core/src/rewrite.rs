//! Origin-to-target reference rewriting.
//!
//! Replacement is plain substring substitution: the origin is matched as a
//! literal (no pattern language is involved, so `.`, `?`, `+` or `$` in a URL
//! mean nothing special) and every occurrence in the file is replaced, across
//! line boundaries. An origin that is a prefix of a longer, unrelated host
//! (`http://site.local` in `http://site.local.other`) is rewritten too.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::ExportError;
use crate::site_url::{OriginUrl, TargetUrl};
use crate::textfile;

/// Literal origin → target substitution.
#[derive(Debug, Clone)]
pub struct ReferenceRewriter {
    origin: OriginUrl,
    target: TargetUrl,
}

impl ReferenceRewriter {
    pub fn new(origin: OriginUrl, target: TargetUrl) -> Self {
        if target.contains_origin(&origin) {
            tracing::warn!(
                origin = %origin,
                target = %target,
                "target URL contains the origin URL; repeated rewrites will not be idempotent"
            );
        }
        ReferenceRewriter { origin, target }
    }

    /// Rewrites `text`. Returns the new text and the number of replacements,
    /// or `None` when the origin does not occur.
    pub fn rewrite(&self, text: &str) -> Option<(String, usize)> {
        let pattern = self.origin.as_str();
        let count = text.matches(pattern).count();
        if count == 0 {
            return None;
        }
        Some((text.replace(pattern, self.target.as_str()), count))
    }

    /// Rewrites one file in place; it is written back only if the origin occurred.
    pub fn rewrite_file(&self, path: &Path) -> Result<RewriteReport, ExportError> {
        let text = textfile::read_utf8(path)?;
        let mut report = RewriteReport {
            files_scanned: 1,
            ..RewriteReport::default()
        };
        let Some((new_text, count)) = self.rewrite(&text) else {
            return Ok(report);
        };

        textfile::write_utf8(path, &new_text)?;
        report.files_changed = 1;
        report.replacements = count;
        tracing::debug!(path = %path.display(), replacements = count, "rewrote references");
        Ok(report)
    }

    /// Rewrites every file in `files`, in parallel on the current rayon pool.
    ///
    /// The first failure aborts the batch; files already written stay written.
    pub fn rewrite_files(&self, files: &[PathBuf]) -> Result<RewriteReport, ExportError> {
        files
            .par_iter()
            .map(|path| self.rewrite_file(path))
            .try_reduce(RewriteReport::default, |a, b| Ok(a.merge(b)))
    }
}

/// Summary of one rewrite stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub replacements: usize,
}

impl RewriteReport {
    fn merge(self, other: RewriteReport) -> RewriteReport {
        RewriteReport {
            files_scanned: self.files_scanned + other.files_scanned,
            files_changed: self.files_changed + other.files_changed,
            replacements: self.replacements + other.replacements,
        }
    }
}
