//! Retention policy evaluation.

use std::time::SystemTime;

use crate::config::RetentionConfig;
use crate::lifecycle::FileRecord;

/// Zero-byte files are pruned regardless of extension or age.
pub fn should_prune(info: &FileRecord) -> bool {
    info.is_empty()
}

/// Evaluate if a file should be gzipped.
///
/// Exempt extensions (always including the archive extension) are skipped.
/// Everything else qualifies once its whole-day age reaches the threshold.
pub fn should_compress(config: &RetentionConfig, info: &FileRecord, now: SystemTime) -> bool {
    if config.is_exempt(&info.path) {
        return false;
    }
    reached(info, now, config.compression_age_days)
}

/// Evaluate if an archive should be deleted.
pub fn should_expire(config: &RetentionConfig, info: &FileRecord, now: SystemTime) -> bool {
    if !config.is_archive(&info.path) {
        return false;
    }
    reached(info, now, config.archive_age_days)
}

fn reached(info: &FileRecord, now: SystemTime, threshold_days: u32) -> bool {
    info.age_days(now)
        .map(|age| age >= u64::from(threshold_days))
        .unwrap_or(false)
}
