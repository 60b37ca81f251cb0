//! Filesystem reconciliation: walk the install root, compare against the
//! expected entry set, accumulate a report.
//!
//! Per-entry problems are reported, never fatal; only I/O failures (an
//! unreadable file, a broken walk) abort the run.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::checksum;
use crate::expected::ExpectedEntry;

/// Verification result for one expected entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Missing,
    /// Expected a file but found a directory, or the reverse.
    WrongType,
    Md5Mismatch { actual: String },
    Sha256Mismatch { actual: String },
    BothMismatch { md5: String, sha256: String },
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok)
    }
}

#[derive(Debug, Clone)]
pub struct EntryResult {
    pub entry: ExpectedEntry,
    pub outcome: Outcome,
}

impl EntryResult {
    /// Human-readable outcome for the report, e.g. "OK", "Missing",
    /// "MD5 mismatch (<hex>)".
    pub fn describe(&self) -> String {
        match &self.outcome {
            Outcome::Ok => "OK".to_string(),
            Outcome::Missing => "Missing".to_string(),
            Outcome::WrongType if self.entry.is_dir => "Not a directory".to_string(),
            Outcome::WrongType => "Not a file".to_string(),
            Outcome::Md5Mismatch { actual } => format!("MD5 mismatch ({actual})"),
            Outcome::Sha256Mismatch { actual } => format!("SHA256 mismatch ({actual})"),
            Outcome::BothMismatch { md5, sha256 } => {
                format!("MD5 and SHA256 mismatch. MD5 ({md5}), SHA256 ({sha256})")
            }
        }
    }
}

/// Full verification report. Recomputed from scratch on every run.
#[derive(Debug)]
pub struct Report {
    /// Per-entry outcomes in manifest order.
    pub entries: Vec<EntryResult>,
    /// On-disk files absent from the expected set. Informational only; they
    /// never flip the overall status.
    pub unexpected: Vec<PathBuf>,
}

impl Report {
    pub fn errors(&self) -> impl Iterator<Item = &EntryResult> {
        self.entries.iter().filter(|r| !r.outcome.is_ok())
    }

    /// True when every expected entry verified OK.
    pub fn is_clean(&self) -> bool {
        self.entries.iter().all(|r| r.outcome.is_ok())
    }
}

/// Leaf files under `root` as relative paths. Directories are not listed as
/// standalone entries; expected directories are checked individually later.
fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .context("walk entry outside root")?;
        files.push(rel.to_path_buf());
    }
    Ok(files)
}

fn verify_entry(root: &Path, entry: &ExpectedEntry) -> Result<Outcome> {
    let local = root.join(&entry.path);
    if !local.exists() {
        return Ok(Outcome::Missing);
    }
    if entry.is_dir {
        return Ok(if local.is_dir() {
            Outcome::Ok
        } else {
            Outcome::WrongType
        });
    }
    if !local.is_file() {
        return Ok(Outcome::WrongType);
    }

    let md5 = checksum::md5_path(&local)?;
    let sha256 = checksum::sha256_path(&local)?;
    let md5_bad = entry.md5.as_deref().is_some_and(|want| want != md5);
    // sha256 is only compared when the manifest provides one.
    let sha256_bad = entry.sha256.as_deref().is_some_and(|want| want != sha256);
    Ok(match (md5_bad, sha256_bad) {
        (true, true) => Outcome::BothMismatch { md5, sha256 },
        (true, false) => Outcome::Md5Mismatch { actual: md5 },
        (false, true) => Outcome::Sha256Mismatch { actual: sha256 },
        (false, false) => Outcome::Ok,
    })
}

/// Compares the live tree under `root` against `expected`, preserving
/// manifest order in the per-entry results.
pub fn reconcile(root: &Path, expected: &[ExpectedEntry]) -> Result<Report> {
    let known: HashSet<&Path> = expected.iter().map(|e| e.path.as_path()).collect();
    let unexpected = walk_files(root)?
        .into_iter()
        .filter(|p| !known.contains(p.as_path()))
        .collect();

    let mut entries = Vec::with_capacity(expected.len());
    for e in expected {
        let outcome = verify_entry(root, e)?;
        if !outcome.is_ok() {
            tracing::debug!("{}: {:?}", e.path.display(), outcome);
        }
        entries.push(EntryResult {
            entry: e.clone(),
            outcome,
        });
    }

    Ok(Report {
        entries,
        unexpected,
    })
}
