//! Course model produced by assembly.
//!
//! These are plain values: built once per invocation from a directory
//! snapshot and serialized by the CLI. Optional fields are skipped when
//! empty so the JSON output stays readable.

use serde::Serialize;
use std::path::PathBuf;

/// The smallest content unit: a content file, an exercise, an assessment, or
/// any combination sharing one base name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Lesson {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Content (markdown) artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<PathBuf>,
    /// Whether running the exercise needs a graphical display.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub display: bool,
}

/// Lessons sharing a base name that could not be merged into one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonGroup {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModuleItem {
    Lesson(Lesson),
    Group(LessonGroup),
}

impl ModuleItem {
    pub fn name(&self) -> &str {
        match self {
            ModuleItem::Lesson(l) => &l.name,
            ModuleItem::Group(g) => &g.name,
        }
    }
}

/// One directory's worth of lessons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<PathBuf>,
    pub lessons: Vec<ModuleItem>,
}

impl Module {
    /// Every lesson in the module, groups flattened, in module order.
    pub fn all_lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.lessons.iter().flat_map(|item| match item {
            ModuleItem::Lesson(l) => std::slice::from_ref(l).iter(),
            ModuleItem::Group(g) => g.lessons.iter(),
        })
    }
}

/// Top-level document that modules are appended to.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Course {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub modules: Vec<Module>,
}

impl Course {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn append(&mut self, module: Module) {
        self.modules.push(module);
    }
}
