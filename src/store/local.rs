use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::codec::{gzip_copy, GzipHeader};
use crate::error::{at, Error, Result};
use crate::lifecycle::FileRecord;
use crate::store::{FileStore, Files};

/// [`FileStore`] over the real filesystem.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileStore for LocalStore {
    fn files(&self) -> Files<'_> {
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Box::new(walker.filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(to_record(&entry)),
            Ok(_) => None,
            Err(err) => Some(Err(Error::from(err))),
        }))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(at(path))
    }

    fn compress(&self, src: &Path, dst: &Path, header: &GzipHeader<'_>) -> Result<u64> {
        let input = File::open(src).map_err(at(src))?;
        let output = File::create(dst).map_err(at(dst))?;

        let mut reader = BufReader::new(input);
        let (_, writer) = gzip_copy(&mut reader, BufWriter::new(output), header).map_err(at(dst))?;
        let output = writer.into_inner().map_err(|err| Error::io(dst, err.into_error()))?;
        output.sync_all().map_err(at(dst))?;

        let size = output.metadata().map_err(at(dst))?.len();
        Ok(size)
    }
}

fn to_record(entry: &DirEntry) -> Result<FileRecord> {
    let metadata = entry.metadata()?;
    let modified_at = metadata.modified().map_err(at(entry.path()))?;
    Ok(FileRecord::new(entry.path(), metadata.len(), modified_at))
}
