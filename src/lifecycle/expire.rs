//! Archive expiry.

use std::time::{Instant, SystemTime};

use log::{debug, info};

use crate::config::RetentionConfig;
use crate::error::Result;
use crate::lifecycle::{should_expire, PassStats};
use crate::store::FileStore;

/// Delete every archive whose age reached the archive threshold.
pub fn expire_archives<S: FileStore + ?Sized>(
    store: &S,
    config: &RetentionConfig,
    now: SystemTime,
) -> Result<PassStats> {
    let start = Instant::now();
    let mut stats = PassStats::new();

    for record in store.files() {
        let record = record?;
        stats.record_scan();
        if !should_expire(config, &record, now) {
            continue;
        }
        stats.record_match();

        if config.dry_run {
            info!("expiring archive: {} (dry run)", record.path.display());
            continue;
        }
        store.remove(&record.path)?;
        debug!("expired archive {}", record.path.display());
        stats.record_removal(record.size_bytes);
    }

    stats.duration = start.elapsed();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::record::SECS_PER_DAY;
    use crate::store::MemoryStore;
    use std::path::PathBuf;
    use std::time::Duration;

    fn days_ago(now: SystemTime, days: u64) -> SystemTime {
        now - Duration::from_secs(days * SECS_PER_DAY)
    }

    #[test]
    fn test_expire_old_archives() -> Result<()> {
        let now = SystemTime::now();
        let store = MemoryStore::new("/logs");
        store.insert("c.log.gz", "c", days_ago(now, 40));
        store.insert("d.log.gz", "d", days_ago(now, 10));
        store.insert("e.log", "e", days_ago(now, 400));

        let stats = expire_archives(&store, &RetentionConfig::new("/logs"), now)?;

        assert_eq!(stats.matched_count, 1);
        assert_eq!(stats.applied_count, 1);
        assert_eq!(stats.bytes_freed(), 1);
        assert_eq!(
            store.paths(),
            vec![PathBuf::from("d.log.gz"), PathBuf::from("e.log")]
        );
        Ok(())
    }

    #[test]
    fn test_expire_dry_run_leaves_tree() -> Result<()> {
        let now = SystemTime::now();
        let store = MemoryStore::new("/logs");
        store.insert("c.log.gz", "c", days_ago(now, 40));
        let config = RetentionConfig {
            dry_run: true,
            ..RetentionConfig::new("/logs")
        };

        let stats = expire_archives(&store, &config, now)?;

        assert_eq!(stats.matched_count, 1);
        assert_eq!(stats.applied_count, 0);
        assert!(store.contains("c.log.gz"));
        Ok(())
    }

    #[test]
    fn test_expire_aborts_on_failure() {
        let now = SystemTime::now();
        let store = MemoryStore::new("/logs");
        store.insert("a.gz", "a", days_ago(now, 40));
        store.insert("b.gz", "b", days_ago(now, 40));
        store.fail_removal("a.gz");

        assert!(expire_archives(&store, &RetentionConfig::new("/logs"), now).is_err());
        assert!(store.contains("a.gz"));
        assert!(store.contains("b.gz"));
    }
}
