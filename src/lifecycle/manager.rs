//! Retention run driver.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use log::{debug, warn};

use crate::config::RetentionConfig;
use crate::error::{at, Error, Result};
use crate::lifecycle::{compress_aged, expire_archives, prune_empty, PassStats};
use crate::store::{FileStore, LocalStore};

/// What a run would find at its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootState {
    /// Directory with no entries at all.
    Empty,
    Populated,
}

/// Classify `root` before a run.
///
/// Anything that is not a directory (including a missing path) is an error.
pub fn inspect_root(root: &Path) -> Result<RootState> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }
    let mut entries = fs::read_dir(root).map_err(at(root))?;
    match entries.next() {
        None => Ok(RootState::Empty),
        Some(entry) => {
            entry.map_err(at(root))?;
            Ok(RootState::Populated)
        }
    }
}

/// Results of one full run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub pruned: PassStats,
    pub compressed: PassStats,
    pub expired: PassStats,
}

impl RunReport {
    pub fn bytes_freed(&self) -> u64 {
        self.pruned.bytes_freed() + self.compressed.bytes_freed() + self.expired.bytes_freed()
    }
}

/// Runs the retention passes over one store with one configuration.
pub struct RetentionManager<S = LocalStore> {
    store: S,
    config: RetentionConfig,
}

impl RetentionManager<LocalStore> {
    /// Manager over the real filesystem at `config.root`.
    pub fn local(config: RetentionConfig) -> Self {
        let store = LocalStore::new(config.root.clone());
        Self::new(store, config)
    }
}

impl<S: FileStore> RetentionManager<S> {
    pub fn new(store: S, config: RetentionConfig) -> Self {
        if config.archive_age_days <= config.compression_age_days {
            warn!(
                "archive age ({} days) does not exceed compression age ({} days)",
                config.archive_age_days, config.compression_age_days
            );
        }
        Self { store, config }
    }

    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn prune_empty(&self) -> Result<PassStats> {
        let stats = prune_empty(&self.store, &self.config)?;
        debug!("prune: {}", stats.summary());
        Ok(stats)
    }

    pub fn compress_aged(&self) -> Result<PassStats> {
        let stats = compress_aged(&self.store, &self.config, SystemTime::now())?;
        debug!("compress: {}", stats.summary());
        Ok(stats)
    }

    pub fn expire_archives(&self) -> Result<PassStats> {
        let stats = expire_archives(&self.store, &self.config, SystemTime::now())?;
        debug!("expire: {}", stats.summary());
        Ok(stats)
    }

    /// Run all three passes in order, stopping at the first error.
    pub fn run_once(&self) -> Result<RunReport> {
        let pruned = self.prune_empty()?;
        let compressed = self.compress_aged()?;
        let expired = self.expire_archives()?;
        Ok(RunReport {
            pruned,
            compressed,
            expired,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::record::SECS_PER_DAY;
    use crate::store::MemoryStore;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    fn days_ago(days: u64) -> SystemTime {
        SystemTime::now() - Duration::from_secs(days * SECS_PER_DAY)
    }

    fn scenario() -> MemoryStore {
        let store = MemoryStore::new("/logs");
        store.insert("a.log", "", days_ago(0));
        store.insert("b.log", "twenty days old\n", days_ago(20));
        store.insert("c.log.gz", "forty days old", days_ago(40));
        store.insert("fresh.log", "today\n", days_ago(0));
        store
    }

    #[test]
    fn test_run_once_applies_all_passes() -> Result<()> {
        let manager = RetentionManager::new(scenario(), RetentionConfig::new("/logs"));

        let report = manager.run_once()?;

        assert_eq!(report.pruned.applied_count, 1);
        assert_eq!(report.compressed.applied_count, 1);
        assert_eq!(report.expired.applied_count, 1);
        assert_eq!(
            manager.store().paths(),
            vec![PathBuf::from("b.log.gz"), PathBuf::from("fresh.log")]
        );
        Ok(())
    }

    #[test]
    fn test_second_run_is_noop() -> Result<()> {
        let manager = RetentionManager::new(scenario(), RetentionConfig::new("/logs"));

        manager.run_once()?;
        let after_first = manager.store().paths();
        let report = manager.run_once()?;

        assert_eq!(manager.store().paths(), after_first);
        assert_eq!(report.pruned.applied_count, 0);
        assert_eq!(report.compressed.applied_count, 0);
        assert_eq!(report.expired.applied_count, 0);
        Ok(())
    }

    #[test]
    fn test_dry_run_touches_nothing() -> Result<()> {
        let config = RetentionConfig {
            dry_run: true,
            ..RetentionConfig::new("/logs")
        };
        let manager = RetentionManager::new(scenario(), config);
        let before = manager.store().paths();

        let report = manager.run_once()?;

        assert_eq!(manager.store().paths(), before);
        assert_eq!(report.pruned.matched_count, 1);
        assert_eq!(report.compressed.matched_count, 1);
        assert_eq!(report.expired.matched_count, 1);
        assert_eq!(report.bytes_freed(), 0);
        Ok(())
    }

    #[test]
    fn test_multi_part_archive_extension_expires() -> Result<()> {
        let store = MemoryStore::new("/logs");
        store.insert("c.log.tar.gz", "old archive", days_ago(100));
        store.insert("d.log", "old log", days_ago(20));
        let config = RetentionConfig {
            archive_extension: "tar.gz".into(),
            ..RetentionConfig::new("/logs")
        };
        let manager = RetentionManager::new(store, config);

        let report = manager.run_once()?;

        assert_eq!(report.compressed.applied_count, 1);
        assert_eq!(report.expired.applied_count, 1);
        assert_eq!(manager.store().paths(), vec![PathBuf::from("d.log.tar.gz")]);
        Ok(())
    }

    #[test]
    fn test_failure_in_first_pass_skips_later_passes() {
        let store = scenario();
        store.fail_removal("a.log");
        let manager = RetentionManager::new(store, RetentionConfig::new("/logs"));

        assert!(manager.run_once().is_err());
        assert!(manager.store().contains("b.log"));
        assert!(manager.store().contains("c.log.gz"));
    }

    #[test]
    fn test_inspect_root() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        assert_eq!(inspect_root(dir).unwrap(), RootState::Empty);

        fs::create_dir(dir.join("sub")).unwrap();
        assert_eq!(inspect_root(dir).unwrap(), RootState::Populated);

        let file = dir.join("plain.log");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(inspect_root(&file), Err(Error::NotADirectory(_))));
        assert!(matches!(
            inspect_root(&dir.join("missing")),
            Err(Error::NotADirectory(_))
        ));
    }
}
