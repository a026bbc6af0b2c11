//! Archive inspection module
//!
//! Only zip containers are understood. Inspection never fails past this
//! module: a bad archive is reported as `false` or as an empty listing.

pub mod inspector;

pub use inspector::{extract, extract_from_reader, validate, validate_reader};

use crate::Result;
use serde::{Deserialize, Serialize};

/// One entry of a submitted archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    /// Entry name as stored in the archive
    pub name: String,
    /// Compressed size in bytes
    pub compressed_size: u64,
    /// Uncompressed size in bytes
    pub size: u64,
}

/// Entries of an archive in enumeration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchiveListing {
    records: Vec<ArchiveRecord>,
}

impl ArchiveListing {
    /// Create a listing from records already in archive order
    pub fn new(records: Vec<ArchiveRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ArchiveRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of uncompressed sizes
    pub fn total_size(&self) -> u64 {
        self.records.iter().map(|r| r.size).sum()
    }

    /// Serialize the listing as the JSON payload a host echoes back on consent
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.records)?)
    }
}

impl From<Vec<ArchiveRecord>> for ArchiveListing {
    fn from(records: Vec<ArchiveRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a ArchiveListing {
    type Item = &'a ArchiveRecord;
    type IntoIter = std::slice::Iter<'a, ArchiveRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
