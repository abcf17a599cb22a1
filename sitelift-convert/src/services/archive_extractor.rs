//! ZIP archive extractor
//!
//! Unpacks an uploaded archive into the job's extract directory, preserving
//! relative paths. Blocking: call from `spawn_blocking`.
//!
//! Entry names that would escape the destination (absolute paths, `..`) abort
//! extraction. Every entry is written as a regular file, so symlinks stored in
//! the archive are never created on disk.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

/// Extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Archive could not be opened or its central directory is unreadable
    #[error("cannot open archive {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    /// An entry could not be read
    #[error("cannot read entry #{index}: {source}")]
    Entry {
        index: usize,
        #[source]
        source: ZipError,
    },

    /// Entry name points outside the destination directory
    #[error("unsafe entry path: {0}")]
    UnsafeEntry(String),

    /// Writing to the destination failed
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExtractError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> ExtractError + '_ {
        move |source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Extraction statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files: usize,
    pub directories: usize,
    /// Total decompressed bytes written
    pub bytes: u64,
}

/// Extract every entry of `zip_path` below `dest_dir`
///
/// Partial output is left in place on failure; the job's cleanup removes it.
pub fn extract_archive(zip_path: &Path, dest_dir: &Path) -> Result<ExtractSummary, ExtractError> {
    let file = File::open(zip_path).map_err(|e| ExtractError::Open {
        path: zip_path.to_path_buf(),
        source: ZipError::Io(e),
    })?;
    let mut archive = ZipArchive::new(file).map_err(|source| ExtractError::Open {
        path: zip_path.to_path_buf(),
        source,
    })?;

    fs::create_dir_all(dest_dir).map_err(ExtractError::io(dest_dir))?;

    let mut summary = ExtractSummary::default();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|source| ExtractError::Entry { index, source })?;

        let relative = entry
            .enclosed_name()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| ExtractError::UnsafeEntry(entry.name().to_string()))?;
        let target = dest_dir.join(&relative);

        if entry.name().ends_with('/') {
            fs::create_dir_all(&target).map_err(ExtractError::io(&target))?;
            summary.directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(ExtractError::io(parent))?;
        }

        let mut out = File::create(&target).map_err(ExtractError::io(&target))?;
        let written = io::copy(&mut entry, &mut out).map_err(|e| match e.kind() {
            // Decompression and CRC failures surface as I/O errors from the reader
            io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => ExtractError::Entry {
                index,
                source: ZipError::Io(e),
            },
            _ => ExtractError::Io {
                path: target.clone(),
                source: e,
            },
        })?;

        debug!("Extracted {} ({} bytes)", relative.display(), written);
        summary.files += 1;
        summary.bytes += written;
    }

    Ok(summary)
}
