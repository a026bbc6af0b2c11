//! Zip inspection: integrity check and entry listing

use super::{ArchiveListing, ArchiveRecord};
use crate::Result;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path)?;
    Ok(ZipArchive::new(file)?)
}

/// Check whether `path` opens as a zip archive.
///
/// Entry contents are not read. Every failure, including a missing file,
/// is reported as `false`.
pub fn validate<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    match open_archive(path) {
        Ok(archive) => {
            debug!("{:?} is a zip archive with {} entries", path, archive.len());
            true
        }
        Err(e) => {
            debug!("{:?} is not a valid archive: {}", path, e);
            false
        }
    }
}

/// Same as [`validate`] for an in-memory or already opened source
pub fn validate_reader<R: Read + Seek>(reader: R) -> bool {
    match ZipArchive::new(reader) {
        Ok(_) => true,
        Err(e) => {
            debug!("Source is not a valid archive: {}", e);
            false
        }
    }
}

/// List the entries of the archive at `path`.
///
/// A source that cannot be opened yields an empty listing. When an entry
/// cannot be read the records collected before it are kept.
pub fn extract<P: AsRef<Path>>(path: P) -> ArchiveListing {
    let path = path.as_ref();
    match open_archive(path) {
        Ok(mut archive) => list_entries(&mut archive),
        Err(e) => {
            warn!("Something went wrong opening {:?}: {}", path, e);
            ArchiveListing::default()
        }
    }
}

/// Same as [`extract`] for an in-memory or already opened source
pub fn extract_from_reader<R: Read + Seek>(reader: R) -> ArchiveListing {
    match ZipArchive::new(reader) {
        Ok(mut archive) => list_entries(&mut archive),
        Err(e) => {
            warn!("Something went wrong opening archive: {}", e);
            ArchiveListing::default()
        }
    }
}

fn list_entries<R: Read + Seek>(archive: &mut ZipArchive<R>) -> ArchiveListing {
    let total = archive.len();
    let mut records = Vec::with_capacity(total);

    for i in 0..total {
        // Raw access skips decompression setup, so encrypted or exotic
        // entries still report their sizes.
        match archive.by_index_raw(i) {
            Ok(file) => records.push(ArchiveRecord {
                name: file.name().to_string(),
                compressed_size: file.compressed_size(),
                size: file.size(),
            }),
            Err(e) => {
                warn!("Stopped listing at entry {} of {}: {}", i, total, e);
                break;
            }
        }
    }

    debug!("Listed {} entries", records.len());
    ArchiveListing::new(records)
}
