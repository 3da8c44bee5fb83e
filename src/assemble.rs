//! Module assembly: one directory in, one [`Module`] out.
//!
//! The [`Assembler`] ties the scanner and the grouper together. It owns no
//! state beyond the config and the display probe, so a single instance can
//! read any number of modules.

use crate::config::SyllabusConfig;
use crate::display::DisplayProbe;
use crate::group::{self, GroupMode};
use crate::scan::{self, ScanError};
use crate::types::Module;
use std::fs;
use std::path::Path;

pub struct Assembler<'a> {
    config: &'a SyllabusConfig,
    probe: &'a dyn DisplayProbe,
}

impl<'a> Assembler<'a> {
    pub fn new(config: &'a SyllabusConfig, probe: &'a dyn DisplayProbe) -> Self {
        Self { config, probe }
    }

    /// Read the direct children of `path` into a module named after the
    /// directory.
    pub fn read_module(&self, path: &Path, mode: GroupMode) -> Result<Module, ScanError> {
        let scanned = scan::scan_module_dir(path, &self.config.scan, &self.config.artifacts)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        tracing::info!("Importing module {name} from {}", path.display());
        let lessons = group::group_entries(&scanned.entries, mode, self.probe);
        tracing::debug!("Module {name}: {} items", lessons.len());

        Ok(Module {
            name,
            description: None,
            overview: scanned.overview,
            lessons,
        })
    }

    /// Read every subdirectory of `path` as a module, in name order.
    ///
    /// The overview entry and excluded names are skipped, as are plain files.
    pub fn read_modules(&self, path: &Path, mode: GroupMode) -> Result<Vec<Module>, ScanError> {
        if !path.is_dir() {
            return Err(ScanError::InvalidPath(path.to_path_buf()));
        }

        let mut dirs = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let stem = Path::new(&name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            if self.config.scan.is_overview(&stem) || self.config.scan.is_excluded(&name) {
                continue;
            }
            dirs.push(entry.path());
        }
        dirs.sort();

        dirs.iter().map(|d| self.read_module(d, mode)).collect()
    }
}
