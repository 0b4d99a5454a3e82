//! Retention configuration.
//!
//! Built once at startup: defaults, then an optional JSON file, then command
//! line overrides. Passes only ever see it by shared reference.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{at, Error, Result};

pub const DEFAULT_ROOT: &str = "/tmp/testdata";
pub const DEFAULT_COMPRESSION_AGE_DAYS: u32 = 15;
pub const DEFAULT_ARCHIVE_AGE_DAYS: u32 = 31;
pub const DEFAULT_ARCHIVE_EXTENSION: &str = "gz";

/// Configuration for a retention run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetentionConfig {
    /// Directory tree to sweep.
    /// Default: /tmp/testdata
    pub root: PathBuf,

    /// Whole days since modification before a file is gzipped.
    /// Default: 15
    pub compression_age_days: u32,

    /// Whole days since modification before an archive is deleted.
    /// Default: 31
    pub archive_age_days: u32,

    /// Extension (without the leading dot) of compressed archives. May span
    /// several suffixes, e.g. `tar.gz`.
    /// Default: gz
    pub archive_extension: String,

    /// Extensions never compressed. The archive extension is always exempt.
    /// Default: ["gz"]
    pub skip_extensions: Vec<String>,

    /// Report intended actions without touching the filesystem.
    pub dry_run: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            compression_age_days: DEFAULT_COMPRESSION_AGE_DAYS,
            archive_age_days: DEFAULT_ARCHIVE_AGE_DAYS,
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            skip_extensions: vec![DEFAULT_ARCHIVE_EXTENSION.to_string()],
            dry_run: false,
        }
    }
}

impl RetentionConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(at(path))?;
        let config: RetentionConfig =
            serde_json::from_str(&raw).map_err(|source| Error::Config {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config.normalized())
    }

    /// Strip leading dots from extensions and drop empty entries.
    pub fn normalized(mut self) -> Self {
        self.archive_extension = normalize_extension(&self.archive_extension)
            .unwrap_or_else(|| DEFAULT_ARCHIVE_EXTENSION.to_string());
        self.skip_extensions = self
            .skip_extensions
            .iter()
            .filter_map(|ext| normalize_extension(ext))
            .collect();
        self
    }

    /// Whether `path` names an archive. Multi-part extensions such as
    /// `tar.gz` match on the whole file-name suffix.
    pub fn is_archive(&self, path: &Path) -> bool {
        has_suffix(path, &self.archive_extension)
    }

    /// Whether `path` is left out of compression.
    pub fn is_exempt(&self, path: &Path) -> bool {
        self.is_archive(path) || self.skip_extensions.iter().any(|ext| has_suffix(path, ext))
    }

    /// Archive path for `path`: the full original name plus the archive extension.
    pub fn archive_path(&self, path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(&self.archive_extension);
        PathBuf::from(name)
    }
}

// `name.<ext>` with a non-empty stem; `.gz` alone is a hidden file, not an archive.
fn has_suffix(path: &Path, ext: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(ext))
        .and_then(|stem| stem.strip_suffix('.'))
        .map(|stem| !stem.is_empty())
        .unwrap_or(false)
}

fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim().trim_start_matches('.');
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_string())
    }
}
