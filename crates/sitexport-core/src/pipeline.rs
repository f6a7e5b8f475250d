//! The export as an ordered pipeline: fetch, then rewrite, then repair.
//!
//! Each stage runs to completion before the next one starts. Any subset of
//! stages can be selected (e.g. rewrite alone against an already fetched tree);
//! selected stages still run in pipeline order, and a stage only starts once
//! every earlier selected stage has completed.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::fetch::Fetcher;
use crate::mojibake::{self, MojibakeTable, RepairReport};
use crate::rewrite::{ReferenceRewriter, RewriteReport};
use crate::site_url::{OriginUrl, TargetUrl};
use crate::tree::{self, ExtensionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Fetch,
    Rewrite,
    Repair,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 3] = [Stage::Fetch, Stage::Rewrite, Stage::Repair];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Rewrite => "rewrite",
            Stage::Repair => "repair",
        }
    }

    /// Wraps `err` so it reports this stage as the one that failed.
    pub fn fail(self, err: ExportError) -> ExportError {
        ExportError::StageFailed {
            stage: self,
            source: Box::new(err),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracks which selected stages have completed.
#[derive(Debug)]
struct StageGate {
    selected: Vec<Stage>,
    completed: Vec<Stage>,
}

impl StageGate {
    fn new(stages: &[Stage]) -> Self {
        let mut selected = stages.to_vec();
        selected.sort();
        selected.dedup();
        StageGate {
            selected,
            completed: Vec::new(),
        }
    }

    fn is_selected(&self, stage: Stage) -> bool {
        self.selected.contains(&stage)
    }

    /// True once every selected stage ordered before `stage` has completed.
    fn is_open(&self, stage: Stage) -> bool {
        self.selected
            .iter()
            .filter(|s| **s < stage)
            .all(|s| self.completed.contains(s))
    }

    fn complete(&mut self, stage: Stage) {
        self.completed.push(stage);
    }
}

/// Inputs for one export run.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub origin: OriginUrl,
    pub target: TargetUrl,
    /// Directory the fetch tool writes into; the site root is a host-named child.
    pub output_dir: PathBuf,
    pub rewrite_extensions: ExtensionSet,
    pub repair_extensions: ExtensionSet,
    pub mojibake: MojibakeTable,
    /// Worker threads for rewrite/repair (None = rayon default).
    pub jobs: Option<usize>,
}

impl ExportPlan {
    /// Plan with the default extension sets and the built-in mojibake table.
    pub fn new(origin: OriginUrl, target: TargetUrl, output_dir: impl Into<PathBuf>) -> Self {
        ExportPlan {
            origin,
            target,
            output_dir: output_dir.into(),
            rewrite_extensions: ExtensionSet::rewrite_default(),
            repair_extensions: ExtensionSet::repair_default(),
            mojibake: MojibakeTable::builtin(),
            jobs: None,
        }
    }
}

/// What a pipeline run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Root of the fetched site, once located.
    pub root: Option<PathBuf>,
    pub stages_run: Vec<Stage>,
    pub rewrite: Option<RewriteReport>,
    pub repair: Option<RepairReport>,
}

pub struct Pipeline<F> {
    plan: ExportPlan,
    fetcher: F,
    stages: Vec<Stage>,
}

impl<F: Fetcher> Pipeline<F> {
    /// Pipeline running all three stages.
    pub fn new(plan: ExportPlan, fetcher: F) -> Self {
        Pipeline {
            plan,
            fetcher,
            stages: Stage::ALL.to_vec(),
        }
    }

    /// Restricts the run to `stages` (order and duplicates are irrelevant).
    pub fn with_stages(mut self, stages: &[Stage]) -> Self {
        self.stages = stages.to_vec();
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn run(&self) -> Result<ExportSummary, ExportError> {
        let plan = &self.plan;
        let mut gate = StageGate::new(&self.stages);
        let mut summary = ExportSummary::default();

        for stage in Stage::ALL {
            if !gate.is_selected(stage) {
                continue;
            }
            debug_assert!(gate.is_open(stage));
            tracing::info!(%stage, "stage started");

            match stage {
                Stage::Fetch => {
                    self.fetcher
                        .fetch(&plan.origin, &plan.output_dir)
                        .map_err(|e| stage.fail(e))?;
                }
                Stage::Rewrite => {
                    let root = self.root(&mut summary).map_err(|e| stage.fail(e))?;
                    let rewriter =
                        ReferenceRewriter::new(plan.origin.clone(), plan.target.clone());
                    let report =
                        rewrite_tree(&root, &rewriter, &plan.rewrite_extensions, plan.jobs)
                            .map_err(|e| stage.fail(e))?;
                    summary.rewrite = Some(report);
                }
                Stage::Repair => {
                    let root = self.root(&mut summary).map_err(|e| stage.fail(e))?;
                    let report =
                        repair_tree(&root, &plan.mojibake, &plan.repair_extensions, plan.jobs)
                            .map_err(|e| stage.fail(e))?;
                    summary.repair = Some(report);
                }
            }

            gate.complete(stage);
            summary.stages_run.push(stage);
            tracing::info!(%stage, "stage completed");
        }
        Ok(summary)
    }

    fn root(&self, summary: &mut ExportSummary) -> Result<PathBuf, ExportError> {
        if let Some(root) = &summary.root {
            return Ok(root.clone());
        }
        let root = tree::locate_fetched_root(&self.plan.output_dir, &self.plan.origin)?;
        summary.root = Some(root.clone());
        Ok(root)
    }
}

/// Rewrite stage over one tree.
pub fn rewrite_tree(
    root: &Path,
    rewriter: &ReferenceRewriter,
    extensions: &ExtensionSet,
    jobs: Option<usize>,
) -> Result<RewriteReport, ExportError> {
    let files = tree::collect_files(root, extensions)?;
    tracing::debug!(files = files.len(), root = %root.display(), "rewriting references");
    let report = with_workers(jobs, || rewriter.rewrite_files(&files))?;
    tracing::info!(
        scanned = report.files_scanned,
        changed = report.files_changed,
        replacements = report.replacements,
        "rewrite finished"
    );
    Ok(report)
}

/// Mojibake repair stage over one tree (or any subtree).
pub fn repair_tree(
    root: &Path,
    table: &MojibakeTable,
    extensions: &ExtensionSet,
    jobs: Option<usize>,
) -> Result<RepairReport, ExportError> {
    let files = tree::collect_files(root, extensions)?;
    tracing::debug!(files = files.len(), root = %root.display(), "repairing mojibake");
    let report = with_workers(jobs, || mojibake::repair_files(&files, table))?;
    tracing::info!(
        scanned = report.files_scanned,
        changed = report.files_changed,
        repairs = report.total_repairs(),
        "repair finished"
    );
    Ok(report)
}

/// Runs `op` on a dedicated pool of `jobs` threads, or on rayon's global pool.
fn with_workers<T, OP>(jobs: Option<usize>, op: OP) -> T
where
    OP: FnOnce() -> T + Send,
    T: Send,
{
    let Some(jobs) = jobs.filter(|n| *n > 0) else {
        return op();
    };
    match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
        Ok(pool) => pool.install(op),
        Err(e) => {
            tracing::warn!(error = %e, "could not build worker pool, using the global pool");
            op()
        }
    }
}
