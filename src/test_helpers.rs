//! Shared test utilities for the syllabus test suite.
//!
//! Trees are built straight into a `TempDir` from a list of relative paths,
//! and results are compared as relative path strings so assertions read like
//! the tree they describe.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! build_tree(tmp.path(), &["01_mod/01_a.md", "02_mod/"]);
//!
//! let plan = plan_renumber(tmp.path(), &PlanOptions::default()).unwrap();
//! assert!(plan_pairs(&plan).is_empty());
//! ```

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::renumber::RenumberPlan;
use crate::types::{Lesson, Module};

// =========================================================================
// Tree setup
// =========================================================================

/// Create files and directories under `root`. A trailing `/` makes a
/// directory; anything else is an empty file (parents created as needed).
pub fn build_tree(root: &Path, paths: &[&str]) {
    for rel in paths {
        let path = root.join(rel);
        if rel.ends_with('/') {
            fs::create_dir_all(&path).unwrap();
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, "").unwrap();
        }
    }
}

/// `path` relative to `root`, with `/` separators.
pub fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or_else(|_| panic!("{} is not under {}", path.display(), root.display()))
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Every path under `root`, relative and sorted.
pub fn list_tree(root: &Path) -> Vec<String> {
    let mut paths: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| relative(root, e.unwrap().path()))
        .collect();
    paths.sort();
    paths
}

// =========================================================================
// Plan and module lookups
// =========================================================================

/// `(old, new)` pairs of a plan, relative to its root, in plan order.
pub fn plan_pairs(plan: &RenumberPlan) -> Vec<(String, String)> {
    plan.operations
        .iter()
        .map(|op| (relative(&plan.root, &op.old_path), relative(&plan.root, &op.new_path)))
        .collect()
}

/// Names of the module's top-level items, in order.
pub fn item_names(module: &Module) -> Vec<&str> {
    module.lessons.iter().map(|i| i.name()).collect()
}

/// Find a lesson by name, looking inside groups too. Panics if not found.
pub fn find_lesson<'a>(module: &'a Module, name: &str) -> &'a Lesson {
    module
        .all_lessons()
        .find(|l| l.name == name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = module.all_lessons().map(|l| l.name.as_str()).collect();
            panic!("lesson '{name}' not found. Available: {names:?}")
        })
}
