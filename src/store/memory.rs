use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::codec::{gzip_copy, GzipHeader};
use crate::error::{Error, Result};
use crate::lifecycle::FileRecord;
use crate::store::{FileStore, Files};

#[derive(Debug, Clone)]
struct MemFile {
    data: Vec<u8>,
    modified_at: SystemTime,
}

/// In-memory [`FileStore`].
///
/// Directories are implicit: any path under the root is a file. Removal of a
/// path registered with [`MemoryStore::fail_removal`] fails with
/// `PermissionDenied`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    root: PathBuf,
    files: RefCell<BTreeMap<PathBuf, MemFile>>,
    failing: RefCell<BTreeSet<PathBuf>>,
}

impl MemoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Create or replace a file relative to the root.
    pub fn insert(&self, relative: impl AsRef<Path>, data: impl Into<Vec<u8>>, modified_at: SystemTime) {
        let path = self.root.join(relative);
        self.files.borrow_mut().insert(
            path,
            MemFile {
                data: data.into(),
                modified_at,
            },
        );
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> Option<Vec<u8>> {
        let path = self.root.join(relative);
        self.files.borrow().get(&path).map(|file| file.data.clone())
    }

    pub fn contains(&self, relative: impl AsRef<Path>) -> bool {
        self.exists(&self.root.join(relative))
    }

    /// Paths relative to the root, in traversal order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .borrow()
            .keys()
            .filter_map(|path| path.strip_prefix(&self.root).ok())
            .map(Path::to_path_buf)
            .collect()
    }

    pub fn fail_removal(&self, relative: impl AsRef<Path>) {
        self.failing.borrow_mut().insert(self.root.join(relative));
    }

    fn record(&self, path: &Path) -> Option<FileRecord> {
        self.files
            .borrow()
            .get(path)
            .map(|file| FileRecord::new(path, file.data.len() as u64, file.modified_at))
    }
}

impl FileStore for MemoryStore {
    fn files(&self) -> Files<'_> {
        // Snapshot the listing so passes may mutate while iterating, like a
        // directory read that has already been buffered.
        let listing: Vec<PathBuf> = self
            .files
            .borrow()
            .keys()
            .filter(|path| path.starts_with(&self.root))
            .cloned()
            .collect();
        Box::new(
            listing
                .into_iter()
                .filter_map(move |path| self.record(&path).map(Ok::<_, Error>)),
        )
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        if self.failing.borrow().contains(path) {
            return Err(Error::io(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
            ));
        }
        match self.files.borrow_mut().remove(path) {
            Some(_) => Ok(()),
            None => Err(Error::io(
                path,
                io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            )),
        }
    }

    fn compress(&self, src: &Path, dst: &Path, header: &GzipHeader<'_>) -> Result<u64> {
        let data = self
            .files
            .borrow()
            .get(src)
            .map(|file| file.data.clone())
            .ok_or_else(|| {
                Error::io(
                    src,
                    io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
                )
            })?;
        let (_, archive) =
            gzip_copy(&mut data.as_slice(), Vec::new(), header).map_err(|err| Error::io(dst, err))?;
        let size = archive.len() as u64;
        self.files.borrow_mut().insert(
            dst.to_path_buf(),
            MemFile {
                data: archive,
                modified_at: SystemTime::now(),
            },
        );
        Ok(size)
    }
}
