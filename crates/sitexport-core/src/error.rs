//! Error kinds for the export pipeline.
//!
//! Every failure is terminal for the run; nothing here is retried. The CLI
//! converts these into `anyhow` errors for display.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::Stage;

#[derive(Debug, Error)]
pub enum ExportError {
    /// Origin or target URL rejected before any work started.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The external fetch tool is not on PATH.
    #[error("required fetch tool `{program}` not found on PATH")]
    MissingDependency { program: String },

    /// The fetch tool was found but could not be started.
    #[error("failed to start fetch tool {}", .program.display())]
    FetchSpawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The fetch tool exited unsuccessfully. `status` is `None` when killed by a signal.
    #[error("fetch tool exited with {}", describe_status(.status))]
    FetchFailure { status: Option<i32> },

    /// None of the host-derived directory names exist under the output directory.
    #[error(
        "fetched site root not found under {}: tried {}",
        .output_dir.display(),
        .tried.join(", ")
    )]
    MissingFetchedRoot {
        output_dir: PathBuf,
        tried: Vec<String>,
    },

    /// A file in the tree could not be listed, read, decoded or written.
    #[error("{}", .path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An extra mojibake entry from the config is unusable.
    #[error("invalid mojibake entry `{name}`: {reason}")]
    InvalidMojibakeEntry { name: String, reason: String },

    /// Wraps the failure of one pipeline stage so the message names the phase.
    #[error("{stage} stage failed")]
    StageFailed {
        stage: Stage,
        #[source]
        source: Box<ExportError>,
    },
}

impl ExportError {
    pub(crate) fn file_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExportError::FileIo {
            path: path.into(),
            source,
        }
    }

    /// The stage a `StageFailed` error belongs to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ExportError::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match *status {
        Some(code) => format!("exit status {code}"),
        None => "termination by signal".to_string(),
    }
}
