//! Display-flag detection for exercise files.
//!
//! An exercise "needs a display" when it imports a GUI or graphics module
//! (turtle, pygame, ...). Assembly treats the answer as an opaque boolean per
//! exercise, so the check sits behind [`DisplayProbe`].
//!
//! [`ImportScanner`] reads `import x` / `from x import y` statements from
//! Python sources and from the code cells of Jupyter notebooks. The scan is
//! line based; it does not evaluate the code.

use crate::config::DisplayConfig;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub trait DisplayProbe {
    fn needs_display(&self, path: &Path) -> bool;
}

impl<F> DisplayProbe for F
where
    F: Fn(&Path) -> bool,
{
    fn needs_display(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Never flags anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisplay;

impl DisplayProbe for NoDisplay {
    fn needs_display(&self, _path: &Path) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
pub struct ImportScanner {
    modules: BTreeSet<String>,
}

impl ImportScanner {
    pub fn new<I, S>(modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            modules: modules.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.modules.iter().cloned())
    }

    fn source_of(path: &Path) -> Option<String> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("Cannot read {} for imports: {e}", path.display());
                return None;
            }
        };
        let is_notebook = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("ipynb"));
        if !is_notebook {
            return Some(text);
        }
        match serde_json::from_str::<Notebook>(&text) {
            Ok(nb) => Some(nb.code()),
            Err(e) => {
                tracing::debug!("Cannot parse notebook {}: {e}", path.display());
                None
            }
        }
    }
}

impl DisplayProbe for ImportScanner {
    fn needs_display(&self, path: &Path) -> bool {
        Self::source_of(path)
            .map(|src| imported_modules(&src).any(|m| self.modules.contains(m)))
            .unwrap_or(false)
    }
}

#[derive(Deserialize)]
struct Notebook {
    #[serde(default)]
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct Cell {
    cell_type: String,
    #[serde(default)]
    source: CellSource,
}

/// Notebook sources are either one string or a list of lines.
#[derive(Deserialize)]
#[serde(untagged)]
enum CellSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for CellSource {
    fn default() -> Self {
        CellSource::Text(String::new())
    }
}

impl Notebook {
    fn code(&self) -> String {
        let mut out = String::new();
        for cell in self.cells.iter().filter(|c| c.cell_type == "code") {
            match &cell.source {
                CellSource::Text(t) => out.push_str(t),
                CellSource::Lines(lines) => lines.iter().for_each(|l| out.push_str(l)),
            }
            out.push('\n');
        }
        out
    }
}

/// Top-level package names imported by `src`.
fn imported_modules(src: &str) -> impl Iterator<Item = &str> {
    src.lines().flat_map(|line| {
        let line = line.trim();
        let names: Vec<&str> = if let Some(rest) = line.strip_prefix("import ") {
            rest.split(',')
                .filter_map(|part| part.split_whitespace().next())
                .collect()
        } else if let Some(rest) = line.strip_prefix("from ") {
            rest.split_whitespace().next().into_iter().collect()
        } else {
            Vec::new()
        };
        names
            .into_iter()
            .filter_map(|name| name.split('.').next())
            .filter(|name| !name.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scanner() -> ImportScanner {
        ImportScanner::from_config(&DisplayConfig::default())
    }

    #[test]
    fn parses_import_forms() {
        let src = "import os, turtle as t\nfrom pygame.locals import *\n  import tkinter.ttk\nx = 'import guizero'\n";
        let found: Vec<&str> = imported_modules(src).collect();
        assert_eq!(found, vec!["os", "turtle", "pygame", "tkinter"]);
    }

    #[test]
    fn python_file_with_gui_import() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("01_draw.py");
        fs::write(&path, "\"\"\"Draw.\"\"\"\nimport turtle\nturtle.forward(10)\n").unwrap();
        assert!(scanner().needs_display(&path));
    }

    #[test]
    fn python_file_without_gui_import() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("01_math.py");
        fs::write(&path, "import math\nprint(math.pi)\n").unwrap();
        assert!(!scanner().needs_display(&path));
    }

    #[test]
    fn notebook_code_cells_are_scanned() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("01_game.ipynb");
        let nb = serde_json::json!({
            "cells": [
                { "cell_type": "markdown", "source": ["import turtle\n"] },
                { "cell_type": "code", "source": ["x = 1\n", "from guizero import App\n"] }
            ],
            "metadata": {}
        });
        fs::write(&path, nb.to_string()).unwrap();
        assert!(scanner().needs_display(&path));
    }

    #[test]
    fn markdown_cells_do_not_count() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("01_notes.ipynb");
        let nb = serde_json::json!({
            "cells": [ { "cell_type": "markdown", "source": "import pygame" } ]
        });
        fs::write(&path, nb.to_string()).unwrap();
        assert!(!scanner().needs_display(&path));
    }

    #[test]
    fn unreadable_file_is_false() {
        let tmp = TempDir::new().unwrap();
        assert!(!scanner().needs_display(&tmp.path().join("missing.py")));
    }

    #[test]
    fn closures_are_probes() {
        let probe = |p: &Path| p.ends_with("yes.py");
        assert!(probe.needs_display(Path::new("a/yes.py")));
        assert!(!NoDisplay.needs_display(Path::new("a/yes.py")));
    }
}
