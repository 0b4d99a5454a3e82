//! Filesystem access for the retention passes.
//!
//! Every pass walks the tree through [`FileStore::files`], which yields a
//! fresh, lazy sequence of [`FileRecord`]s on each call. Mutations go through
//! the same trait so passes can run against [`MemoryStore`] in tests.

mod local;
mod memory;

use std::path::Path;

use crate::codec::GzipHeader;
use crate::error::Result;
use crate::lifecycle::FileRecord;

pub use local::LocalStore;
pub use memory::MemoryStore;

/// Lazy traversal of the regular files under a store root.
pub type Files<'a> = Box<dyn Iterator<Item = Result<FileRecord>> + 'a>;

pub trait FileStore {
    /// Every regular file under the root.
    ///
    /// Symlinks are neither followed nor reported, so a link to a file is never
    /// pruned, compressed or expired. A plain `os.walk`-style sweep would stat
    /// through the link and act on the link itself.
    fn files(&self) -> Files<'_>;

    fn exists(&self, path: &Path) -> bool;

    fn remove(&self, path: &Path) -> Result<()>;

    /// Gzip `src` into `dst`, replacing any existing `dst`.
    ///
    /// Returns the size of the finished archive. The archive is complete and
    /// flushed when this returns; `src` is left in place.
    fn compress(&self, src: &Path, dst: &Path, header: &GzipHeader<'_>) -> Result<u64>;
}
