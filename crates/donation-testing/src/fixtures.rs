//! Common submission fixtures

use crate::TestDir;
use anyhow::{Context, Result};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Builds a zip archive in memory with deflated entries
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, content) in entries {
        writer.start_file(*name, options)?;
        writer.write_all(content)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Writes a zip archive with the given entries into the test directory
pub fn create_zip(test_dir: &TestDir, name: &str, entries: &[(&str, &[u8])]) -> Result<PathBuf> {
    test_dir.create_file(name, &zip_bytes(entries)?)
}

/// Creates a small platform export with two entries
pub fn create_export_zip(test_dir: &TestDir) -> Result<PathBuf> {
    let tweets = "window.YTD.tweets.part0 = [".repeat(64);
    create_zip(
        test_dir,
        "twitter-export.zip",
        &[
            ("data/tweets.js", tweets.as_bytes()),
            ("data/account.js", &b"window.YTD.account.part0 = []"[..]),
        ],
    )
}

/// Creates a plain text file, a file type the prompt accepts but the flow cannot use
pub fn create_text_file(test_dir: &TestDir) -> Result<PathBuf> {
    test_dir.create_file("notes.txt", b"This is not an archive.")
}

/// Creates a zip archive cut off before its central directory
pub fn create_truncated_zip(test_dir: &TestDir) -> Result<PathBuf> {
    let bytes = zip_bytes(&[("a.txt", &b"some content"[..]), ("b.txt", &b"more content"[..])])?;
    test_dir.create_file("truncated.zip", &bytes[..bytes.len() / 2])
}

/// Creates an archive whose second local header is damaged.
///
/// The central directory is intact but the header check made while opening
/// fails, so the whole archive is rejected.
pub fn create_damaged_header_zip(test_dir: &TestDir) -> Result<PathBuf> {
    let mut bytes = zip_bytes(&[
        ("first.txt", &b"first entry"[..]),
        ("second.txt", &b"second entry"[..]),
    ])?;

    let second = local_header_offsets(&bytes)
        .nth(1)
        .context("archive has no second local header")?;
    bytes[second + 2] = 0;
    bytes[second + 3] = 0;

    test_dir.create_file("damaged-header.zip", &bytes)
}

/// An archive that opens cleanly but whose second entry cannot be reached.
///
/// Holds `first.txt` ("first entry") and `second.txt` ("second entry"). Every
/// seek strictly between the second local header and the central directory
/// fails, which is the first access made when that entry is fetched.
pub fn broken_entry_reader() -> Result<FaultySeek> {
    let bytes = zip_bytes(&[
        ("first.txt", &b"first entry"[..]),
        ("second.txt", &b"second entry"[..]),
    ])?;

    let second = local_header_offsets(&bytes)
        .nth(1)
        .context("archive has no second local header")?;
    let central_directory = find_signature(&bytes, CENTRAL_HEADER_SIGNATURE)
        .next()
        .context("archive has no central directory")?;

    Ok(FaultySeek {
        inner: Cursor::new(bytes),
        fail_after: second as u64,
        fail_before: central_directory as u64,
    })
}

/// In-memory reader that refuses seeks into a byte range
pub struct FaultySeek {
    inner: Cursor<Vec<u8>>,
    fail_after: u64,
    fail_before: u64,
}

impl Read for FaultySeek {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for FaultySeek {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(delta) => self.inner.position().checked_add_signed(delta),
            SeekFrom::End(delta) => (self.inner.get_ref().len() as u64).checked_add_signed(delta),
        };

        if let Some(target) = target {
            if target > self.fail_after && target < self.fail_before {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("simulated failure seeking to {}", target),
                ));
            }
        }

        self.inner.seek(pos)
    }
}

const LOCAL_HEADER_SIGNATURE: &[u8] = b"PK\x03\x04";
const CENTRAL_HEADER_SIGNATURE: &[u8] = b"PK\x01\x02";

fn local_header_offsets(bytes: &[u8]) -> impl Iterator<Item = usize> + '_ {
    find_signature(bytes, LOCAL_HEADER_SIGNATURE)
}

fn find_signature<'a>(bytes: &'a [u8], signature: &'a [u8]) -> impl Iterator<Item = usize> + 'a {
    bytes
        .windows(signature.len())
        .enumerate()
        .filter(move |(_, window)| *window == signature)
        .map(|(offset, _)| offset)
}
