//! Retention lifecycle for a log tree.
//!
//! A run is three passes, always in this order:
//! - prune zero-byte files
//! - gzip files older than the compression age
//! - delete archives older than the archive age
//!
//! Each pass walks the whole tree again and stops at the first I/O error.
//!
//! # Example
//!
//! ```rust,no_run
//! use rotolog::{RetentionConfig, RetentionManager};
//!
//! let config = RetentionConfig {
//!     compression_age_days: 7,
//!     archive_age_days: 30,
//!     ..RetentionConfig::new("/var/log/myapp")
//! };
//!
//! let manager = RetentionManager::local(config);
//! let report = manager.run_once()?;
//! println!("{} logs compressed", report.compressed.applied_count);
//! # Ok::<(), rotolog::Error>(())
//! ```

mod compressor;
mod expire;
mod manager;
mod policy;
mod prune;
pub(crate) mod record;
mod stats;

pub use compressor::compress_aged;
pub use expire::expire_archives;
pub use manager::{inspect_root, RetentionManager, RootState, RunReport};
pub use policy::{should_compress, should_expire, should_prune};
pub use prune::prune_empty;
pub use record::FileRecord;
pub use stats::PassStats;
