//! Gzip stream helpers shared by every store.

use std::io::{self, Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use flate2::read::GzDecoder;
use flate2::{Compression, GzBuilder};

/// Header fields written into a gzip member.
#[derive(Debug, Clone, Default)]
pub struct GzipHeader<'a> {
    /// Original file name, without directories.
    pub file_name: Option<&'a str>,
    /// Original modification time.
    pub modified_at: Option<SystemTime>,
}

/// Compress everything from `reader` into `writer` as a single gzip member.
///
/// Returns the number of uncompressed bytes consumed and the writer, with the
/// gzip trailer already written. Flushing the writer to stable storage is left
/// to the caller.
pub fn gzip_copy<R: Read, W: Write>(
    reader: &mut R,
    writer: W,
    header: &GzipHeader<'_>,
) -> io::Result<(u64, W)> {
    let mut builder = GzBuilder::new();
    if let Some(name) = header.file_name {
        builder = builder.filename(name);
    }
    if let Some(mtime) = header.modified_at.and_then(unix_seconds) {
        builder = builder.mtime(mtime);
    }
    let mut encoder = builder.write(writer, Compression::default());
    let consumed = io::copy(reader, &mut encoder)?;
    let writer = encoder.finish()?;
    Ok((consumed, writer))
}

/// Decompress a single gzip member into memory.
pub fn gunzip<R: Read>(reader: R) -> io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(reader);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

// gzip stores mtime as u32 seconds; 0 means "not available".
fn unix_seconds(time: SystemTime) -> Option<u32> {
    let secs = time.duration_since(UNIX_EPOCH).ok()?.as_secs();
    u32::try_from(secs).ok().filter(|secs| *secs > 0)
}
