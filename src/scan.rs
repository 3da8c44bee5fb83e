//! Filesystem scanning.
//!
//! Two views of a lesson tree are produced here:
//!
//! - [`scan_module_dir`] lists one module directory (non-recursive) for
//!   assembly into lessons.
//! - [`walk_ranked`] walks a whole tree for renumbering, yielding only
//!   entries that carry a rank.
//!
//! ## Directory Structure
//!
//! ```text
//! lessons/                         # Scan root (never renamed itself)
//! ├── 01_basics/                   # Module (ranked = managed)
//! │   ├── README.md                # Module overview
//! │   ├── 01_intro.md              # Lesson content  ┐ paired into one
//! │   ├── 01_intro.ipynb           # Lesson exercise ┘ lesson "intro"
//! │   ├── 02_variables.py          # Exercise-only lesson
//! │   └── images/                  # Excluded
//! ├── 02_loops/
//! │   └── ...
//! └── drafts/                      # Unranked = outside the managed ordering
//!     └── 01_idea.md               # Ignored by renumbering
//! ```
//!
//! ## Classification
//!
//! In order: the overview stem (any case) is captured and excluded from
//! grouping; excluded names are dropped; everything else becomes a
//! [`NamedEntry`]. Entries are sorted by raw file name before anything else
//! looks at them, so results never depend on `read_dir` order.

use crate::config::{ArtifactConfig, ScanConfig};
use crate::naming::{self, RankToken};
use serde::Serialize;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Not a directory: {0}")]
    InvalidPath(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// What a file contributes to a lesson, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Content,
    Exercise,
    Assessment,
    Unknown,
}

/// A directory entry with its naming convention fields parsed out.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedEntry {
    pub path: PathBuf,
    /// File stem (name without the last extension).
    pub stem: String,
    pub rank: Option<RankToken>,
    /// Readable name, see [`naming::normalize_base`].
    pub base_name: String,
    /// Extension without the dot; empty when there is none.
    pub extension: String,
    /// Components between the scan root and this entry (direct child = 1).
    pub depth: usize,
    pub is_dir: bool,
    pub kind: ArtifactKind,
}

impl NamedEntry {
    /// Build an entry for `path`. Returns `None` for names that are not
    /// valid UTF-8.
    pub fn new(path: PathBuf, depth: usize, is_dir: bool, artifacts: &ArtifactConfig) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?.to_string();
        let extension = path
            .extension()
            .map(|e| e.to_str().map(str::to_string))
            .unwrap_or(Some(String::new()))?;
        let kind = if is_dir {
            ArtifactKind::Unknown
        } else {
            artifacts.kind_of(&extension)
        };
        Some(Self {
            rank: naming::parse_rank_prefix(&stem),
            base_name: naming::normalize_base(&stem),
            stem,
            extension,
            depth,
            is_dir,
            kind,
            path,
        })
    }

    /// Case-folded base name: entries with equal keys belong to one lesson.
    pub fn group_key(&self) -> String {
        naming::grouping_key(&self.stem)
    }
}

/// One module directory, classified.
#[derive(Debug, Default)]
pub struct DirScan {
    /// The overview (readme) entry, if any.
    pub overview: Option<PathBuf>,
    /// Remaining entries, sorted by file name.
    pub entries: Vec<NamedEntry>,
}

/// Classify the direct children of `path`.
pub fn scan_module_dir(
    path: &Path,
    scan: &ScanConfig,
    artifacts: &ArtifactConfig,
) -> Result<DirScan, ScanError> {
    if !path.is_dir() {
        return Err(ScanError::InvalidPath(path.to_path_buf()));
    }

    let mut result = DirScan::default();
    for entry_path in collect_entries(path)? {
        let Some(name) = entry_path.file_name().and_then(OsStr::to_str) else {
            tracing::debug!("Skipping non UTF-8 name in {}", path.display());
            continue;
        };

        let stem = entry_path
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or(name);
        if scan.is_overview(stem) {
            if result.overview.is_none() {
                result.overview = Some(entry_path);
            } else {
                tracing::debug!("Ignoring extra overview {}", entry_path.display());
            }
            continue;
        }

        if scan.is_excluded(name) {
            continue;
        }

        let is_dir = entry_path.is_dir();
        if let Some(entry) = NamedEntry::new(entry_path, 1, is_dir, artifacts) {
            result.entries.push(entry);
        }
    }
    Ok(result)
}

/// Sorted direct children of `path`.
fn collect_entries(path: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut entries = fs::read_dir(path)?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

/// Walk `root` recursively, yielding entries that carry a rank.
///
/// Unranked files are skipped. Unranked directories are pruned together with
/// everything beneath them, even children that are ranked. The root itself is
/// never yielded.
pub fn walk_ranked(
    root: &Path,
    scan: &ScanConfig,
    artifacts: &ArtifactConfig,
) -> Result<Vec<NamedEntry>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::InvalidPath(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| is_managed(e, scan));

    let mut entries = Vec::new();
    for entry in walker {
        let entry = entry?;
        let is_dir = entry.file_type().is_dir();
        let depth = entry.depth();
        match NamedEntry::new(entry.into_path(), depth, is_dir, artifacts) {
            Some(named) => entries.push(named),
            None => tracing::debug!("Skipping non UTF-8 name under {}", root.display()),
        }
    }
    Ok(entries)
}

fn is_managed(entry: &walkdir::DirEntry, scan: &ScanConfig) -> bool {
    let name = entry.file_name().to_string_lossy();
    if scan.is_excluded(&name) {
        return false;
    }
    let ranked = entry
        .path()
        .file_stem()
        .and_then(OsStr::to_str)
        .and_then(naming::parse_rank_prefix)
        .is_some();
    if !ranked && entry.file_type().is_dir() {
        tracing::debug!("Skipping unranked directory {}", entry.path().display());
    }
    ranked
}
