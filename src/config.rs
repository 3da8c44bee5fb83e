//! Project configuration module.
//!
//! Handles loading and validating `syllabus.toml`. The file lives in the
//! working directory (`--dir`) and is sparse: stock defaults are overridden
//! key by key by whatever the user writes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [scan]
//! overview = "readme"            # Stem (any case) captured as module overview
//! exclude = ["images", "assets", ".git", ".DS_Store"]
//!
//! [artifacts]
//! content = ["md"]               # Extensions that are lesson content
//! exercise = ["ipynb", "py"]     # Extensions that are exercises
//! assessment = []                # Extensions that are assessments
//!
//! [renumber]
//! increment = 1                  # Gap between consecutive ranks
//!
//! [display]
//! modules = ["turtle", "guizero", "pygame", "tkinter"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::scan::ArtifactKind;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::num::NonZeroU32;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "syllabus.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `syllabus.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyllabusConfig {
    /// Which directory entries the scanner captures or skips.
    pub scan: ScanConfig,
    /// Extension to artifact kind mapping.
    pub artifacts: ArtifactConfig,
    /// Renumbering defaults.
    pub renumber: RenumberConfig,
    /// Display-flag detection.
    pub display: DisplayConfig,
}

impl SyllabusConfig {
    /// Validate config values are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.overview.trim().is_empty() {
            return Err(ConfigError::Validation(
                "scan.overview must not be empty".into(),
            ));
        }

        let mut seen: HashMap<String, &str> = HashMap::new();
        for (kind, exts) in [
            ("content", &self.artifacts.content),
            ("exercise", &self.artifacts.exercise),
            ("assessment", &self.artifacts.assessment),
        ] {
            for ext in exts {
                let ext = normalize_extension(ext);
                if ext.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "artifacts.{kind} contains an empty extension"
                    )));
                }
                if let Some(other) = seen.insert(ext.clone(), kind)
                    && other != kind
                {
                    return Err(ConfigError::Validation(format!(
                        "extension '{ext}' is listed as both {other} and {kind}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Stem, compared case-insensitively, of the module overview file.
    pub overview: String,
    /// Exact entry names skipped by every scan.
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            overview: "readme".to_string(),
            exclude: ["images", "assets", ".git", ".DS_Store"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl ScanConfig {
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|e| e == name)
    }

    pub fn is_overview(&self, stem: &str) -> bool {
        stem.eq_ignore_ascii_case(&self.overview)
    }
}

/// Extensions (without the dot, case-insensitive) for each artifact kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactConfig {
    pub content: Vec<String>,
    pub exercise: Vec<String>,
    pub assessment: Vec<String>,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            content: vec!["md".to_string()],
            exercise: vec!["ipynb".to_string(), "py".to_string()],
            assessment: Vec::new(),
        }
    }
}

impl ArtifactConfig {
    /// Classify an extension. Anything unlisted is [`ArtifactKind::Unknown`].
    pub fn kind_of(&self, extension: &str) -> ArtifactKind {
        let ext = normalize_extension(extension);
        let listed = |exts: &[String]| exts.iter().any(|e| normalize_extension(e) == ext);
        if ext.is_empty() {
            ArtifactKind::Unknown
        } else if listed(&self.content) {
            ArtifactKind::Content
        } else if listed(&self.exercise) {
            ArtifactKind::Exercise
        } else if listed(&self.assessment) {
            ArtifactKind::Assessment
        } else {
            ArtifactKind::Unknown
        }
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenumberConfig {
    /// Step between consecutive ranks; `10` leaves room to insert by hand.
    pub increment: NonZeroU32,
}

impl Default for RenumberConfig {
    fn default() -> Self {
        Self {
            increment: NonZeroU32::MIN,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Top-level module names whose import means the exercise needs a display.
    pub modules: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            modules: ["turtle", "guizero", "pygame", "tkinter"]
                .map(String::from)
                .to_vec(),
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Load config from `syllabus.toml` in the given directory.
///
/// A missing file yields the defaults. Keys absent from the file keep their
/// default values, unknown keys are rejected, and the result is validated.
pub fn load_config(dir: &Path) -> Result<SyllabusConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    let config: SyllabusConfig = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        tracing::debug!("No {CONFIG_FILE} in {}, using defaults", dir.display());
        SyllabusConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `syllabus.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Syllabus Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Scanning
# ---------------------------------------------------------------------------
[scan]
# Stem of the module overview file, compared case-insensitively.
# README.md, readme.ipynb and Readme all match "readme".
overview = "readme"

# Entry names skipped entirely (exact match).
exclude = ["images", "assets", ".git", ".DS_Store"]

# ---------------------------------------------------------------------------
# Artifact kinds
# ---------------------------------------------------------------------------
[artifacts]
# Files with these extensions become the lesson text.
content = ["md"]

# Files with these extensions become the lesson exercise.
exercise = ["ipynb", "py"]

# Files with these extensions become the lesson assessment.
assessment = []

# ---------------------------------------------------------------------------
# Renumbering
# ---------------------------------------------------------------------------
[renumber]
# Step between consecutive ranks. Must be at least 1.
# An increment of 10 numbers lessons 10, 20, 30 ... leaving gaps for inserts.
increment = 1

# ---------------------------------------------------------------------------
# Display detection
# ---------------------------------------------------------------------------
[display]
# An exercise importing any of these modules is flagged as needing a display.
modules = ["turtle", "guizero", "pygame", "tkinter"]
"##
}
