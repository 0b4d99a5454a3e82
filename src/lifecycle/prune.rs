//! Empty-file pruning.

use std::time::Instant;

use log::{debug, info};

use crate::config::RetentionConfig;
use crate::error::Result;
use crate::lifecycle::{should_prune, PassStats};
use crate::store::FileStore;

/// Remove every zero-byte regular file under the store root.
///
/// Stops at the first failed removal; files after it are left alone.
pub fn prune_empty<S: FileStore + ?Sized>(store: &S, config: &RetentionConfig) -> Result<PassStats> {
    let start = Instant::now();
    let mut stats = PassStats::new();

    for record in store.files() {
        let record = record?;
        stats.record_scan();
        if !should_prune(&record) {
            continue;
        }
        stats.record_match();

        if config.dry_run {
            info!("removing: {} (dry run)", record.path.display());
            continue;
        }
        store.remove(&record.path)?;
        debug!("removed empty file {}", record.path.display());
        stats.record_removal(record.size_bytes);
    }

    stats.duration = start.elapsed();
    Ok(stats)
}
