//! Renumbering plans.
//!
//! A plan rewrites the rank prefix of every managed entry so that each
//! directory level is numbered `1·step, 2·step, ...` with a uniform,
//! zero-padded width, in the order the entry names already sort in.
//!
//! ```text
//! before                      after (increment 1)
//! lessons/                    lessons/
//! ├── 1_basics/               ├── 01_basics/
//! │   ├── 1_intro.ipynb       │   ├── 01_intro.ipynb
//! │   ├── 1_intro.md          │   ├── 02_intro.md
//! │   └── 5_vars.md           │   └── 03_vars.md
//! ├── 3_loops/                ├── 02_loops/
//! │   └── 07_for.md           │   └── 01_for.md
//! └── drafts/                 └── drafts/          (unranked: untouched)
//!     └── 9_idea.md               └── 9_idea.md
//! ```
//!
//! Each level is planned on its own: a child's new rank never depends on its
//! parent's. Every name takes its own rank; lessons pair by base name, not by
//! rank, so `01_intro.ipynb` and `02_intro.md` still form one lesson.
//!
//! Planning only reads the tree. [`crate::apply`] executes the result.

use crate::config::{ArtifactConfig, ScanConfig, SyllabusConfig};
use crate::naming::{self, RankToken};
use crate::scan::{self, NamedEntry, ScanError};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

/// Comparator over file names deciding the numbering order within a level.
pub type NameOrder = fn(&str, &str) -> Ordering;

/// Plain byte-wise order of the file names, rank prefixes and extensions
/// included.
///
/// This is deliberately not numeric: `10_x` sorts before `9_y`. Trees that
/// were numbered by this tool are zero-padded, so the two orders agree.
pub fn lexicographic(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// One planned rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOperation {
    /// Components between the scan root and the entry; only orders execution.
    pub depth: usize,
    pub old_path: PathBuf,
    pub new_path: PathBuf,
}

/// The renames needed to normalize a tree, in discovery order.
#[derive(Debug, Clone)]
pub struct RenumberPlan {
    pub root: PathBuf,
    pub operations: Vec<RenameOperation>,
}

impl RenumberPlan {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }
}

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub increment: NonZeroU32,
    pub order: NameOrder,
    pub scan: ScanConfig,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            increment: NonZeroU32::MIN,
            order: lexicographic,
            scan: ScanConfig::default(),
        }
    }
}

impl PlanOptions {
    pub fn from_config(config: &SyllabusConfig) -> Self {
        Self {
            increment: config.renumber.increment,
            order: lexicographic,
            scan: config.scan.clone(),
        }
    }

    pub fn with_increment(mut self, increment: NonZeroU32) -> Self {
        self.increment = increment;
        self
    }
}

/// Zero-padded width for `count` ranks stepping by `increment`.
///
/// Wide enough for the largest rank, `count * increment`, and never less
/// than two digits.
pub fn digit_width(count: usize, increment: NonZeroU32) -> usize {
    let largest = (count as u64)
        .saturating_mul(u64::from(increment.get()))
        .max(1);
    let digits = largest.ilog10() as usize + 1;
    digits.max(2)
}

/// Plan the renames for every ranked level beneath `root`.
pub fn plan_renumber(root: &Path, options: &PlanOptions) -> Result<RenumberPlan, ScanError> {
    // Artifact kinds play no part in renaming.
    let entries = scan::walk_ranked(root, &options.scan, &ArtifactConfig::default())?;

    let mut levels: BTreeMap<PathBuf, Vec<NamedEntry>> = BTreeMap::new();
    for entry in entries {
        let parent = entry.path.parent().unwrap_or(root).to_path_buf();
        levels.entry(parent).or_default().push(entry);
    }

    let mut operations = Vec::new();
    for (dir, level) in &levels {
        let before = operations.len();
        plan_level(level, options, &mut operations);
        tracing::debug!(
            "{}: {} ranked entries, {} renames",
            dir.display(),
            level.len(),
            operations.len() - before
        );
    }

    tracing::info!("Planned {} renames under {}", operations.len(), root.display());
    Ok(RenumberPlan {
        root: root.to_path_buf(),
        operations,
    })
}

/// Plan one directory level. `level` holds the ranked siblings.
fn plan_level(level: &[NamedEntry], options: &PlanOptions, out: &mut Vec<RenameOperation>) {
    let mut names: Vec<(&str, &NamedEntry)> = level.iter().map(|e| (file_name(e), e)).collect();
    names.sort_by(|a, b| (options.order)(a.0, b.0));

    let step = u64::from(options.increment.get());
    let width = digit_width(names.len(), options.increment);

    for (i, (_, entry)) in names.iter().enumerate() {
        let rank = RankToken::padded((i as u64 + 1) * step, width);
        let new_path = naming::replace_rank(&entry.path, &rank);
        if new_path != entry.path {
            out.push(RenameOperation {
                depth: entry.depth,
                old_path: entry.path.clone(),
                new_path,
            });
        }
    }
}

fn file_name(entry: &NamedEntry) -> &str {
    entry
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&entry.stem)
}
