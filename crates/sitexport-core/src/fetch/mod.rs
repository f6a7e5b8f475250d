//! Fetching the origin site into a local tree.
//!
//! Crawling is delegated to an external recursive downloader; this module only
//! owns the process boundary (argument and exit-code contract). The pipeline
//! depends on the `Fetcher` trait so it can also run against a tree produced
//! some other way.

mod wget;

use std::path::Path;

use crate::error::ExportError;
use crate::site_url::OriginUrl;

pub use wget::Wget;

/// Produces a mirror of `origin` under `output_dir`, named after the origin's host.
///
/// Returns only after the fetch has fully completed. Any error means the tree
/// must not be processed further.
pub trait Fetcher {
    fn fetch(&self, origin: &OriginUrl, output_dir: &Path) -> Result<(), ExportError>;
}
