//! Age-based gzip compression.

use std::time::{Instant, SystemTime};

use log::{debug, info, trace, warn};

use crate::codec::GzipHeader;
use crate::config::RetentionConfig;
use crate::error::Result;
use crate::lifecycle::{should_compress, FileRecord, PassStats};
use crate::store::FileStore;

/// Gzip every non-exempt file whose age reached the compression threshold.
///
/// Each file becomes `<path>.<archive extension>`. The original is removed only
/// after the archive has been fully written and synced, so a failure can leave
/// a partial archive but never loses the source.
pub fn compress_aged<S: FileStore + ?Sized>(
    store: &S,
    config: &RetentionConfig,
    now: SystemTime,
) -> Result<PassStats> {
    let start = Instant::now();
    let mut stats = PassStats::new();

    for record in store.files() {
        let record = record?;
        stats.record_scan();
        if !should_compress(config, &record, now) {
            trace!("keeping {}", record.path.display());
            continue;
        }
        stats.record_match();

        if config.dry_run {
            info!("compressing: {} (dry run)", record.path.display());
            continue;
        }
        compress_file(store, config, &record, &mut stats)?;
    }

    stats.duration = start.elapsed();
    Ok(stats)
}

fn compress_file<S: FileStore + ?Sized>(
    store: &S,
    config: &RetentionConfig,
    record: &FileRecord,
    stats: &mut PassStats,
) -> Result<()> {
    let archive = config.archive_path(&record.path);
    if store.exists(&archive) {
        warn!("overwriting existing archive {}", archive.display());
        stats.record_overwrite();
    }

    let header = GzipHeader {
        file_name: record.path.file_name().and_then(|name| name.to_str()),
        modified_at: Some(record.modified_at),
    };
    let compressed_size = store.compress(&record.path, &archive, &header)?;
    store.remove(&record.path)?;

    debug!(
        "compressed {} ({} -> {} bytes)",
        record.path.display(),
        record.size_bytes,
        compressed_size
    );
    stats.record_compression(record.size_bytes, compressed_size);
    Ok(())
}
