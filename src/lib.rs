//! Log retention sweeper.
//!
//! Walks a directory tree and runs three maintenance passes in order: prune
//! zero-byte files, gzip files past the compression age, and expire archives
//! past the archive age. Every pass re-walks the tree through a [`FileStore`].

pub mod codec;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod store;

pub use config::RetentionConfig;
pub use error::{Error, Result};
pub use lifecycle::{inspect_root, FileRecord, PassStats, RetentionManager, RootState, RunReport};
pub use store::{FileStore, LocalStore, MemoryStore};
