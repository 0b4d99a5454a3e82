//! Statistics for retention passes.

use std::time::Duration;

/// Statistics from a single pass over the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Number of regular files visited.
    pub scanned_count: usize,

    /// Number of files the pass predicate selected.
    pub matched_count: usize,

    /// Number of files actually acted upon (always 0 in dry-run mode).
    pub applied_count: usize,

    /// Bytes of the files acted upon, before the action.
    pub bytes_in: u64,

    /// Bytes written by the action (compressed size; 0 for deletions).
    pub bytes_out: u64,

    /// Pre-existing archives replaced by the compressor.
    pub overwritten_count: usize,

    /// Time taken for the pass.
    pub duration: Duration,
}

impl PassStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_scan(&mut self) {
        self.scanned_count += 1;
    }

    pub fn record_match(&mut self) {
        self.matched_count += 1;
    }

    /// Record a completed deletion.
    pub fn record_removal(&mut self, size_bytes: u64) {
        self.applied_count += 1;
        self.bytes_in += size_bytes;
    }

    /// Record a completed compression.
    pub fn record_compression(&mut self, original_size: u64, compressed_size: u64) {
        self.applied_count += 1;
        self.bytes_in += original_size;
        self.bytes_out += compressed_size;
    }

    pub fn record_overwrite(&mut self) {
        self.overwritten_count += 1;
    }

    /// Bytes no longer occupied after the pass.
    pub fn bytes_freed(&self) -> u64 {
        self.bytes_in.saturating_sub(self.bytes_out)
    }

    /// Get summary string.
    pub fn summary(&self) -> String {
        format!(
            "Scanned: {}, Matched: {}, Applied: {}, Freed: {} bytes, Duration: {:?}",
            self.scanned_count,
            self.matched_count,
            self.applied_count,
            self.bytes_freed(),
            self.duration
        )
    }
}
