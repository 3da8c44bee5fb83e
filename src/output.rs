//! CLI output formatting.
//!
//! Output is information-first: each lesson leads with its positional index
//! and name, with the files behind it shown as indented context lines.
//!
//! ## Import
//!
//! ```text
//! 01_basics
//!     Overview: README.md
//! 001 intro
//!     Lesson: 01_intro.md
//!     Exercise: 01_intro.ipynb (display)
//! 002 loops (2 lessons)
//!     001 loops
//!         Lesson: 02_loops.md
//!     002 loops
//!         Lesson: 03_loops.md
//! ```
//!
//! ## Renumber
//!
//! ```text
//! 01_mod/5_a.md → 01_mod/01_a.md
//! 3_mod → 01_mod  [failed: destination already exists: ...]
//!
//! Renamed 1 of 2 (1 failed)
//! ```
//!
//! Each `format_*` function is pure and returns lines; the `print_*`
//! wrappers write them to stdout.

use crate::apply::{Mode, Outcome, TransactionReport};
use crate::renumber::RenumberPlan;
use crate::types::{Lesson, Module, ModuleItem};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `path` relative to `root` when possible, for display.
fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

fn lesson_lines(lesson: &Lesson, index: usize, depth: usize, root: &Path, lines: &mut Vec<String>) {
    lines.push(format!("{}{} {}", indent(depth), format_index(index), lesson.name));
    let context = indent(depth + 1);
    if let Some(p) = &lesson.lesson {
        lines.push(format!("{context}Lesson: {}", display_relative(p, root)));
    }
    if let Some(p) = &lesson.exercise {
        let flag = if lesson.display { " (display)" } else { "" };
        lines.push(format!("{context}Exercise: {}{flag}", display_relative(p, root)));
    }
    if let Some(p) = &lesson.assessment {
        lines.push(format!("{context}Assessment: {}", display_relative(p, root)));
    }
}

/// Format an assembled module. Paths are shown relative to `root`.
pub fn format_module(module: &Module, root: &Path) -> Vec<String> {
    let mut lines = vec![module.name.clone()];
    if let Some(overview) = &module.overview {
        lines.push(format!("{}Overview: {}", indent(1), display_relative(overview, root)));
    }

    for (i, item) in module.lessons.iter().enumerate() {
        match item {
            ModuleItem::Lesson(lesson) => lesson_lines(lesson, i + 1, 0, root, &mut lines),
            ModuleItem::Group(group) => {
                lines.push(format!(
                    "{} {} ({} lessons)",
                    format_index(i + 1),
                    group.name,
                    group.lessons.len()
                ));
                for (j, lesson) in group.lessons.iter().enumerate() {
                    lesson_lines(lesson, j + 1, 1, root, &mut lines);
                }
            }
        }
    }
    if module.lessons.is_empty() {
        lines.push(format!("{}(no lessons)", indent(1)));
    }
    lines
}

pub fn print_module(module: &Module, root: &Path) {
    for line in format_module(module, root) {
        println!("{}", line);
    }
}

/// Format the planned renames without executing them.
pub fn format_plan(plan: &RenumberPlan) -> Vec<String> {
    if plan.is_empty() {
        return vec!["Nothing to renumber".to_string()];
    }
    let mut lines: Vec<String> = plan
        .operations
        .iter()
        .map(|op| {
            format!(
                "{} → {}",
                display_relative(&op.old_path, &plan.root),
                display_relative(&op.new_path, &plan.root)
            )
        })
        .collect();
    lines.push(String::new());
    lines.push(format!("{} pending renames", plan.len()));
    lines
}

pub fn print_plan(plan: &RenumberPlan) {
    for line in format_plan(plan) {
        println!("{}", line);
    }
}

/// Format a transaction report, one line per operation in execution order.
pub fn format_report(report: &TransactionReport) -> Vec<String> {
    if report.outcomes.is_empty() {
        return vec!["Nothing to renumber".to_string()];
    }

    let mut lines: Vec<String> = report
        .outcomes
        .iter()
        .map(|o| {
            let pair = format!(
                "{} → {}",
                display_relative(&o.operation.old_path, &report.root),
                display_relative(&o.operation.new_path, &report.root)
            );
            match &o.outcome {
                Outcome::Failed(e) => format!("{pair}  [failed: {e}]"),
                Outcome::Renamed | Outcome::Previewed => pair,
            }
        })
        .collect();

    lines.push(String::new());
    let total = report.outcomes.len();
    let summary = match report.mode {
        Mode::DryRun => format!("Dry run: {total} renames, nothing changed"),
        Mode::Apply => {
            let failed = report.failures().count();
            if failed == 0 {
                format!("Renamed {} of {total}", report.renamed())
            } else {
                format!("Renamed {} of {total} ({failed} failed)", report.renamed())
            }
        }
    };
    lines.push(summary);
    lines
}

pub fn print_report(report: &TransactionReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::{OperationOutcome, RenameFailure};
    use crate::renumber::RenameOperation;
    use crate::types::LessonGroup;
    use std::path::PathBuf;

    fn op(old: &str, new: &str) -> RenameOperation {
        RenameOperation {
            depth: 1,
            old_path: PathBuf::from("/t").join(old),
            new_path: PathBuf::from("/t").join(new),
        }
    }

    #[test]
    fn index_and_indent() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn module_lines() {
        let module = Module {
            name: "01_basics".to_string(),
            description: None,
            overview: Some(PathBuf::from("/c/01_basics/README.md")),
            lessons: vec![
                ModuleItem::Lesson(Lesson {
                    name: "intro".to_string(),
                    lesson: Some(PathBuf::from("/c/01_basics/01_intro.md")),
                    exercise: Some(PathBuf::from("/c/01_basics/01_intro.py")),
                    display: true,
                    ..Lesson::default()
                }),
                ModuleItem::Group(LessonGroup {
                    name: "loops".to_string(),
                    description: None,
                    lessons: vec![Lesson {
                        name: "loops".to_string(),
                        lesson: Some(PathBuf::from("/c/01_basics/02_loops.md")),
                        ..Lesson::default()
                    }],
                }),
            ],
        };

        let lines = format_module(&module, Path::new("/c/01_basics"));
        assert_eq!(
            lines,
            vec![
                "01_basics",
                "    Overview: README.md",
                "001 intro",
                "    Lesson: 01_intro.md",
                "    Exercise: 01_intro.py (display)",
                "002 loops (1 lessons)",
                "    001 loops",
                "        Lesson: 02_loops.md",
            ]
        );
    }

    #[test]
    fn empty_module_says_so() {
        let module = Module {
            name: "m".to_string(),
            description: None,
            overview: None,
            lessons: vec![],
        };
        assert_eq!(format_module(&module, Path::new("/")), vec!["m", "    (no lessons)"]);
    }

    #[test]
    fn plan_lines_are_relative() {
        let plan = RenumberPlan {
            root: PathBuf::from("/t"),
            operations: vec![op("3_m", "01_m")],
        };
        assert_eq!(format_plan(&plan), vec!["3_m → 01_m", "", "1 pending renames"]);
    }

    #[test]
    fn report_marks_failures() {
        let report = TransactionReport {
            root: PathBuf::from("/t"),
            mode: Mode::Apply,
            outcomes: vec![
                OperationOutcome {
                    operation: op("5_a.md", "01_a.md"),
                    outcome: Outcome::Renamed,
                },
                OperationOutcome {
                    operation: op("3_m", "01_m"),
                    outcome: Outcome::Failed(RenameFailure::DestinationExists(PathBuf::from(
                        "/t/01_m",
                    ))),
                },
            ],
        };
        let lines = format_report(&report);
        assert_eq!(lines[0], "5_a.md → 01_a.md");
        assert_eq!(lines[1], "3_m → 01_m  [failed: destination already exists: /t/01_m]");
        assert_eq!(lines[3], "Renamed 1 of 2 (1 failed)");
    }

    #[test]
    fn dry_run_summary() {
        let report = TransactionReport {
            root: PathBuf::from("/t"),
            mode: Mode::DryRun,
            outcomes: vec![OperationOutcome {
                operation: op("5_a.md", "01_a.md"),
                outcome: Outcome::Previewed,
            }],
        };
        assert_eq!(
            format_report(&report).last().map(String::as_str),
            Some("Dry run: 1 renames, nothing changed")
        );
    }
}
