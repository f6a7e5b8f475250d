pub mod config;
pub mod logging;

pub mod error;
pub mod fetch;
pub mod mojibake;
pub mod pipeline;
pub mod rewrite;
pub mod site_url;
pub mod textfile;
pub mod tree;

pub use error::ExportError;
pub use pipeline::{ExportPlan, ExportSummary, Pipeline, Stage};
