//! Repair of UTF-8 text that was decoded as Windows-1252 somewhere upstream.
//!
//! Each entry maps the three characters a three-byte UTF-8 sequence turns into
//! under that misreading back to the one character it encoded. Byte 0x9D has no
//! Windows-1252 mapping and comes through as U+009D.
//!
//! Only the table's sequences are touched. This is not an encoding detector.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::ExportError;
use crate::textfile;

/// One corrupted sequence and the character it should have been.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MojibakeEntry {
    pub name: String,
    pub corrupted: String,
    pub repaired: String,
}

struct StaticEntry {
    name: &'static str,
    corrupted: &'static str,
    repaired: char,
}

const BUILTIN: &[StaticEntry] = &[
    StaticEntry {
        name: "em-dash",
        corrupted: "\u{e2}\u{20ac}\u{201d}",
        repaired: '\u{2014}',
    },
    StaticEntry {
        name: "en-dash",
        corrupted: "\u{e2}\u{20ac}\u{201c}",
        repaired: '\u{2013}',
    },
    StaticEntry {
        name: "right-single-quote",
        corrupted: "\u{e2}\u{20ac}\u{2122}",
        repaired: '\u{2019}',
    },
    StaticEntry {
        name: "left-single-quote",
        corrupted: "\u{e2}\u{20ac}\u{2dc}",
        repaired: '\u{2018}',
    },
    StaticEntry {
        name: "left-double-quote",
        corrupted: "\u{e2}\u{20ac}\u{153}",
        repaired: '\u{201c}',
    },
    StaticEntry {
        name: "right-double-quote",
        corrupted: "\u{e2}\u{20ac}\u{9d}",
        repaired: '\u{201d}',
    },
    StaticEntry {
        name: "euro-sign",
        corrupted: "\u{e2}\u{201a}\u{ac}",
        repaired: '\u{20ac}',
    },
];

/// The set of corrupted sequences to repair.
///
/// Each scan goes left to right and takes the longest key starting at each
/// position, so results do not depend on entry order.
#[derive(Debug, Clone)]
pub struct MojibakeTable {
    // Sorted by key length, longest first.
    entries: Vec<MojibakeEntry>,
}

impl Default for MojibakeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MojibakeTable {
    /// The seven sequences produced by the authoring pipeline.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|e| MojibakeEntry {
                name: e.name.to_string(),
                corrupted: e.corrupted.to_string(),
                repaired: e.repaired.to_string(),
            })
            .collect();
        Self::from_sorted(entries)
    }

    /// Built-in entries plus `extra`. Rejects empty keys, keys already in the
    /// table, and entries whose repair is not shorter than the key.
    pub fn with_extra(extra: &[MojibakeEntry]) -> Result<Self, ExportError> {
        let mut entries = Self::builtin().entries;
        for entry in extra {
            let reject = |reason: &str| ExportError::InvalidMojibakeEntry {
                name: entry.name.clone(),
                reason: reason.to_string(),
            };
            if entry.corrupted.is_empty() {
                return Err(reject("corrupted sequence is empty"));
            }
            if entry.repaired.chars().count() >= entry.corrupted.chars().count() {
                return Err(reject("repaired text must be shorter than the corrupted sequence"));
            }
            if let Some(existing) = entries.iter().find(|e| e.corrupted == entry.corrupted) {
                return Err(reject(&format!("duplicates entry `{}`", existing.name)));
            }
            entries.push(entry.clone());
        }
        Ok(Self::from_sorted(entries))
    }

    fn from_sorted(mut entries: Vec<MojibakeEntry>) -> Self {
        entries.sort_by(|a, b| b.corrupted.len().cmp(&a.corrupted.len()));
        MojibakeTable { entries }
    }

    pub fn entries(&self) -> &[MojibakeEntry] {
        &self.entries
    }

    fn match_at(&self, rest: &str) -> Option<(usize, &MojibakeEntry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, e)| rest.starts_with(e.corrupted.as_str()))
    }

    /// One left-to-right scan. Adds to `counts` and returns the new text, or
    /// `None` when no key occurs.
    fn repair_pass(&self, text: &str, counts: &mut [usize]) -> Option<String> {
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut pos = 0;

        while pos < text.len() {
            let rest = &text[pos..];
            match self.match_at(rest) {
                Some((idx, entry)) => {
                    out.push_str(&text[copied..pos]);
                    out.push_str(&entry.repaired);
                    counts[idx] += 1;
                    pos += entry.corrupted.len();
                    copied = pos;
                }
                None => {
                    // Advance one char; `rest` is non-empty here.
                    pos += rest.chars().next().map_or(1, char::len_utf8);
                }
            }
        }

        if copied == 0 {
            return None;
        }
        out.push_str(&text[copied..]);
        Some(out)
    }

    /// Repairs `text` until no key remains. Returns `None` when no key occurs.
    ///
    /// A repaired character can complete a key with its neighbours, so the scan
    /// repeats on its own output. Every entry shortens the text, which bounds the
    /// number of passes.
    pub fn repair(&self, text: &str) -> Option<Repaired> {
        let mut counts = vec![0usize; self.entries.len()];
        let mut current = self.repair_pass(text, &mut counts)?;
        while let Some(next) = self.repair_pass(&current, &mut counts) {
            current = next;
        }

        let counts = self
            .entries
            .iter()
            .zip(counts)
            .filter(|(_, n)| *n > 0)
            .map(|(e, n)| (e.name.clone(), n))
            .collect();
        Some(Repaired {
            text: current,
            counts,
        })
    }

    /// Number of key occurrences already present in `text`.
    pub fn count_keys(&self, text: &str) -> usize {
        let mut counts = vec![0usize; self.entries.len()];
        self.repair_pass(text, &mut counts);
        counts.iter().sum()
    }
}

/// Output of a successful repair of one text block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repaired {
    pub text: String,
    /// Repairs made, keyed by entry name.
    pub counts: BTreeMap<String, usize>,
}

/// Summary of one repair stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub repairs: BTreeMap<String, usize>,
}

impl RepairReport {
    pub fn total_repairs(&self) -> usize {
        self.repairs.values().sum()
    }

    fn merge(mut self, other: RepairReport) -> RepairReport {
        self.files_scanned += other.files_scanned;
        self.files_changed += other.files_changed;
        for (name, n) in other.repairs {
            *self.repairs.entry(name).or_default() += n;
        }
        self
    }
}

/// Repairs one file in place. The file is written back only if something changed.
pub fn repair_file(path: &Path, table: &MojibakeTable) -> Result<RepairReport, ExportError> {
    let text = textfile::read_utf8(path)?;
    // A BOM is dropped when the file is rewritten, never on its own.
    let body = text.strip_prefix(textfile::BOM).unwrap_or(&text);

    let mut report = RepairReport {
        files_scanned: 1,
        ..RepairReport::default()
    };
    let Some(repaired) = table.repair(body) else {
        return Ok(report);
    };

    textfile::write_utf8(path, &repaired.text)?;
    report.repairs = repaired.counts;
    report.files_changed = 1;
    tracing::debug!(
        path = %path.display(),
        repairs = report.total_repairs(),
        "repaired mojibake"
    );
    Ok(report)
}

/// Repairs every file in `files`, in parallel on the current rayon pool.
///
/// The first failure aborts the batch; files already written stay written.
pub fn repair_files(files: &[PathBuf], table: &MojibakeTable) -> Result<RepairReport, ExportError> {
    files
        .par_iter()
        .map(|path| repair_file(path, table))
        .try_reduce(RepairReport::default, |a, b| Ok(a.merge(b)))
}
