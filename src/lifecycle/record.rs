//! Per-file state seen during a traversal.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

pub const SECS_PER_DAY: u64 = 86_400;

/// A regular file as observed by one visit of a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Full path to the file.
    pub path: PathBuf,

    /// Size in bytes.
    pub size_bytes: u64,

    /// Final extension without the dot (`gz` for `app.log.gz`).
    pub extension: Option<String>,

    /// Last modification time.
    pub modified_at: SystemTime,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64, modified_at: SystemTime) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_string);
        Self {
            path,
            size_bytes,
            extension,
            modified_at,
        }
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.size_bytes == 0
    }

    /// Time elapsed since last modification, `None` if the mtime is in the future.
    pub fn time_since_modified(&self, now: SystemTime) -> Option<Duration> {
        now.duration_since(self.modified_at).ok()
    }

    /// Whole days since last modification, truncated toward zero.
    pub fn age_days(&self, now: SystemTime) -> Option<u64> {
        self.time_since_modified(now)
            .map(|elapsed| elapsed.as_secs() / SECS_PER_DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(n: u64) -> Duration {
        Duration::from_secs(n * SECS_PER_DAY)
    }

    #[test]
    fn test_extension_is_last_suffix() {
        let now = SystemTime::now();
        assert_eq!(FileRecord::new("/logs/app.log.gz", 1, now).extension(), Some("gz"));
        assert_eq!(FileRecord::new("/logs/app.log", 1, now).extension(), Some("log"));
        assert_eq!(FileRecord::new("/logs/messages", 1, now).extension(), None);
        assert_eq!(FileRecord::new("/logs/.hidden", 1, now).extension(), None);
    }

    #[test]
    fn test_age_truncates_partial_days() {
        let now = SystemTime::now();
        let record = FileRecord::new("/logs/app.log", 10, now - days(14) - Duration::from_secs(23 * 3600));
        assert_eq!(record.age_days(now), Some(14));

        let record = FileRecord::new("/logs/app.log", 10, now - days(15));
        assert_eq!(record.age_days(now), Some(15));

        let record = FileRecord::new("/logs/app.log", 10, now);
        assert_eq!(record.age_days(now), Some(0));
    }

    #[test]
    fn test_future_mtime_has_no_age() {
        let now = SystemTime::now();
        let record = FileRecord::new("/logs/app.log", 10, now + days(1));
        assert_eq!(record.age_days(now), None);
        assert!(record.time_since_modified(now).is_none());
    }

    #[test]
    fn test_is_empty() {
        let now = SystemTime::now();
        assert!(FileRecord::new("/logs/a.log", 0, now).is_empty());
        assert!(!FileRecord::new("/logs/b.log", 1, now).is_empty());
    }
}
