//! Centralized filename parsing for the `NN_name` rank convention.
//!
//! Every managed file and directory carries an optional rank prefix: ASCII
//! digits, optionally followed by ASCII letters, then an underscore.
//!
//! - `01_intro.md` → rank `01`, base `intro`
//! - `10a_loops.ipynb` → rank `10a` (the letter breaks ties), base `loops`
//! - `notes.md` → no rank
//!
//! There are two matching strengths. [`parse_rank_and_base`] wants the whole
//! stem in `rank_base` shape with no dot in the base; [`parse_rank_prefix`]
//! only cares about the leading `rank_` and is what renumbering uses.
//!
//! ## Display Names
//!
//! [`normalize_base`] turns a stem into a readable lesson name and is also
//! the source of the grouping key used to pair `01_intro.md` with
//! `01_intro.ipynb`:
//! - `01_intro` → "intro"
//! - `03_for_loops` → "for loops"
//! - `02_while-loops` → "while loops"

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// A parsed rank such as `01` or `10a`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RankToken {
    text: String,
    digits: usize,
}

impl RankToken {
    /// Parse a token that must be entirely `digits[letters]`.
    pub fn parse(text: &str) -> Option<Self> {
        let (digits, end) = leading_rank_len(text)?;
        (end == text.len()).then(|| Self {
            text: text.to_string(),
            digits,
        })
    }

    /// Build a rank from an ordinal, zero-padded to `width` digits.
    pub fn padded(ordinal: u64, width: usize) -> Self {
        let text = format!("{ordinal:0width$}");
        let digits = text.len();
        Self { text, digits }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The digit part, leading zeros included.
    pub fn digits(&self) -> &str {
        &self.text[..self.digits]
    }

    /// The letter tiebreak, empty when absent.
    pub fn suffix(&self) -> &str {
        &self.text[self.digits..]
    }

    /// Numeric value of the digit part. `None` if it overflows `u64`.
    pub fn ordinal(&self) -> Option<u64> {
        self.digits().parse().ok()
    }
}

impl fmt::Display for RankToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a rank token: {0:?}")]
pub struct InvalidRank(pub String);

impl FromStr for RankToken {
    type Err = InvalidRank;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidRank(s.to_string()))
    }
}

/// Length of the leading `\d+[A-Za-z]*` run as `(digit_len, total_len)`.
fn leading_rank_len(s: &str) -> Option<(usize, usize)> {
    let bytes = s.as_bytes();
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let letters = bytes[digits..]
        .iter()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();
    Some((digits, digits + letters))
}

/// Split `rank_rest` into the rank and everything after the underscore.
fn split_rank(stem: &str) -> Option<(RankToken, &str)> {
    let (digits, end) = leading_rank_len(stem)?;
    let rest = stem[end..].strip_prefix('_')?;
    let rank = RankToken {
        text: stem[..end].to_string(),
        digits,
    };
    Some((rank, rest))
}

/// Parse a stem of the exact shape `rank_base`, where base is non-empty and
/// contains no `.`.
///
/// - `"01_intro"` → `Some(("01", "intro"))`
/// - `"10a_for_loops"` → `Some(("10a", "for_loops"))`
/// - `"01_"` → `None` (empty base)
/// - `"01_intro.v2"` → `None` (dot in base)
/// - `"intro"` → `None`
pub fn parse_rank_and_base(stem: &str) -> Option<(RankToken, String)> {
    let (rank, base) = split_rank(stem)?;
    if base.is_empty() || base.contains('.') {
        return None;
    }
    Some((rank, base.to_string()))
}

/// Parse just the leading `rank_` of a stem; whatever follows is ignored.
pub fn parse_rank_prefix(stem: &str) -> Option<RankToken> {
    split_rank(stem).map(|(rank, _)| rank)
}

/// Swap the rank prefix of `path`'s file name for `new_rank`.
///
/// Only the leading rank is replaced; the rest of the stem and the extension
/// are kept byte for byte. Paths without a rank come back unchanged.
pub fn replace_rank(path: &Path, new_rank: &RankToken) -> PathBuf {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return path.to_path_buf();
    };
    let Some(old) = parse_rank_prefix(stem) else {
        return path.to_path_buf();
    };

    let mut name = format!("{new_rank}{}", &stem[old.as_str().len()..]);
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}

/// Strip one leading `word_` (or `word `) token and turn the remaining
/// `_` and `-` into spaces.
///
/// The leading token is any run of alphanumerics ending at the first `_` or
/// space, so `my_intro` loses `my` just like `01_intro` loses `01`.
pub fn normalize_base(stem: &str) -> String {
    let stripped = stem
        .char_indices()
        .find(|&(_, c)| !c.is_alphanumeric())
        .filter(|&(_, c)| c == '_' || c == ' ')
        .map(|(i, _)| &stem[i + 1..])
        .unwrap_or(stem);
    stripped.replace(['_', '-'], " ")
}

/// Case-folded [`normalize_base`], used to bucket entries that belong together.
pub fn grouping_key(stem: &str) -> String {
    normalize_base(stem).to_lowercase()
}
