//! Grouping scanned entries into lessons.
//!
//! In [`GroupMode::Grouped`] entries are bucketed by their grouping key and
//! each bucket is folded into lessons: a content file and an exercise with
//! the same base name collapse into one [`Lesson`]. Whatever cannot be paired
//! stays a separate lesson, and a bucket left with several lessons becomes a
//! [`LessonGroup`].
//!
//! ```text
//! 01_intro.md      ┐
//! 01_intro.ipynb   ┘→ Lesson "intro" { lesson, exercise }
//! 02_loops.md      ┐
//! 03_loops.md      │→ LessonGroup "loops" [ {lesson, exercise}, {lesson} ]
//! 03_loops.py      ┘
//! ```
//!
//! [`GroupMode::Ungrouped`] turns every entry into its own lesson.

use crate::display::DisplayProbe;
use crate::scan::{ArtifactKind, NamedEntry};
use crate::types::{Lesson, LessonGroup, ModuleItem};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMode {
    #[default]
    Grouped,
    Ungrouped,
}

/// Entries sharing a key, in scan order.
#[derive(Debug)]
struct Bucket<'a> {
    key: String,
    entries: Vec<&'a NamedEntry>,
}

/// Group `entries` (already sorted) into module items.
pub fn group_entries(
    entries: &[NamedEntry],
    mode: GroupMode,
    probe: &dyn DisplayProbe,
) -> Vec<ModuleItem> {
    bucket(entries, mode)
        .into_iter()
        .filter_map(|b| {
            let lessons = b
                .entries
                .iter()
                .filter_map(|e| candidate(e, probe))
                .fold(Vec::new(), pair_into);
            into_item(lessons)
        })
        .collect()
}

fn bucket(entries: &[NamedEntry], mode: GroupMode) -> Vec<Bucket<'_>> {
    let mut buckets: Vec<Bucket<'_>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let key = match mode {
            GroupMode::Grouped => entry.group_key(),
            GroupMode::Ungrouped => entry.path.to_string_lossy().into_owned(),
        };
        match index.get(&key) {
            Some(&i) => buckets[i].entries.push(entry),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push(Bucket {
                    key,
                    entries: vec![entry],
                });
            }
        }
    }

    tracing::trace!(
        "Bucketed {} entries into {} keys: {:?}",
        entries.len(),
        buckets.len(),
        buckets.iter().map(|b| b.key.as_str()).collect::<Vec<_>>()
    );
    buckets
}

/// The single-artifact lesson an entry would produce on its own.
fn candidate(entry: &NamedEntry, probe: &dyn DisplayProbe) -> Option<Lesson> {
    let mut lesson = Lesson {
        name: entry.base_name.clone(),
        ..Lesson::default()
    };
    match entry.kind {
        ArtifactKind::Content => lesson.lesson = Some(entry.path.clone()),
        ArtifactKind::Exercise => {
            lesson.display = probe.needs_display(&entry.path);
            lesson.exercise = Some(entry.path.clone());
        }
        ArtifactKind::Assessment => lesson.assessment = Some(entry.path.clone()),
        ArtifactKind::Unknown => {
            tracing::debug!("Ignoring {} (no artifact kind)", entry.path.display());
            return None;
        }
    }
    Some(lesson)
}

/// One fold step: merge `next` into the first lesson with a free slot for
/// its artifact, or append it.
fn pair_into(lessons: Vec<Lesson>, next: Lesson) -> Vec<Lesson> {
    let partner = lessons.iter().position(|l| accepts(l, &next));
    match partner {
        Some(i) => lessons
            .into_iter()
            .enumerate()
            .map(|(j, l)| if j == i { merge(l, &next) } else { l })
            .collect(),
        None => lessons.into_iter().chain(std::iter::once(next)).collect(),
    }
}

/// `existing` can take every artifact `next` carries without overwriting.
fn accepts(existing: &Lesson, next: &Lesson) -> bool {
    let free = |mine: &Option<_>, theirs: &Option<_>| theirs.is_none() || mine.is_none();
    free(&existing.lesson, &next.lesson)
        && free(&existing.exercise, &next.exercise)
        && free(&existing.assessment, &next.assessment)
}

fn merge(existing: Lesson, next: &Lesson) -> Lesson {
    Lesson {
        lesson: existing.lesson.or_else(|| next.lesson.clone()),
        exercise: existing.exercise.or_else(|| next.exercise.clone()),
        assessment: existing.assessment.or_else(|| next.assessment.clone()),
        display: existing.display || next.display,
        ..existing
    }
}

/// A group takes the name of its first lesson, so entries that produced no
/// lesson never name it.
fn into_item(mut lessons: Vec<Lesson>) -> Option<ModuleItem> {
    match lessons.len() {
        0 => None,
        1 => lessons.pop().map(ModuleItem::Lesson),
        _ => Some(ModuleItem::Group(LessonGroup {
            name: lessons[0].name.clone(),
            description: None,
            lessons,
        })),
    }
}
