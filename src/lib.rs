//! # Syllabus
//!
//! Turns directories of lesson files into course modules, and keeps the
//! rank prefixes (`01_`, `02_`, ...) on those files consistent as content is
//! added, removed or reordered.
//!
//! # Two Paths
//!
//! ```text
//! read:    scan → group/pair → assemble  →  Module
//! rename:  walk ranked → plan renumber   →  RenumberPlan → apply → TransactionReport
//! ```
//!
//! Both start from a fresh directory snapshot; nothing is cached between
//! invocations.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | `NN_name` rank convention: parse, replace, normalize |
//! | [`scan`] | Directory listing and classification, recursive ranked walk |
//! | [`group`] | Buckets entries by base name and pairs content with exercises |
//! | [`assemble`] | Builds a [`types::Module`] from one directory |
//! | [`types`] | `Lesson`, `LessonGroup`, `Module`, `Course` |
//! | [`renumber`] | Computes the renames that normalize a tree |
//! | [`apply`] | Executes or previews a plan, deepest first |
//! | [`display`] | Flags exercises that import GUI modules |
//! | [`config`] | `syllabus.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Ranks Are Names
//!
//! Order lives in the filesystem: a lesson's position is the rank prefix of
//! its file name. There is no separate ordering file to drift out of sync.
//! Directories without a rank are outside the managed ordering and are left
//! alone by renumbering, together with everything inside them.
//!
//! ## Plans Before Renames
//!
//! Renumbering is split into a read-only plan and an apply step. The plan can
//! be printed (`--dryrun`) or checked (`check`) without touching anything,
//! and the applier reports an outcome per rename so a partial transaction is
//! visible as such.

pub mod apply;
pub mod assemble;
pub mod config;
pub mod display;
pub mod group;
pub mod naming;
pub mod output;
pub mod renumber;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
