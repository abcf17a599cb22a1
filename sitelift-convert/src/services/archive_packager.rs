//! Output packaging
//!
//! Compresses the generated project into `converted-project-<stamp>.zip` in the
//! downloads directory. Entries are relative to the project root, use `/`
//! separators and are added in sorted order. Blocking: call from
//! `spawn_blocking`.
//!
//! The archive is written to a `.part` file in a staging directory outside the
//! served downloads tree, synced, then renamed into place, so a half-written
//! archive is never reachable by URL. Staging and downloads must share a
//! filesystem for the rename to succeed.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Deflate level used for every entry
pub const COMPRESSION_LEVEL: i64 = 9;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] ZipError),
}

impl PackageError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> PackageError + '_ {
        move |source| PackageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// File name of the packaged project for a job stamp
pub fn archive_file_name(stamp: &str) -> String {
    format!("converted-project-{}.zip", stamp)
}

fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// In-progress archive path inside the staging directory
pub fn part_file_path(staging_dir: &Path, stamp: &str) -> PathBuf {
    staging_dir.join(format!("{}.part", archive_file_name(stamp)))
}

/// Zip `source_dir` into the downloads directory and return the archive path
pub fn package_directory(
    source_dir: &Path,
    staging_dir: &Path,
    downloads_dir: &Path,
    stamp: &str,
) -> Result<PathBuf, PackageError> {
    fs::create_dir_all(staging_dir).map_err(PackageError::io(staging_dir))?;
    fs::create_dir_all(downloads_dir).map_err(PackageError::io(downloads_dir))?;

    let final_path = downloads_dir.join(archive_file_name(stamp));
    let part_path = part_file_path(staging_dir, stamp);

    let result = write_archive(source_dir, &part_path)
        .and_then(|()| fs::rename(&part_path, &final_path).map_err(PackageError::io(&final_path)));

    if result.is_err() {
        let _ = fs::remove_file(&part_path);
    }
    result?;

    debug!("Packaged {} -> {}", source_dir.display(), final_path.display());
    Ok(final_path)
}

fn write_archive(source_dir: &Path, part_path: &Path) -> Result<(), PackageError> {
    let file = File::create(part_path).map_err(PackageError::io(part_path))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    for entry in WalkDir::new(source_dir)
        .follow_links(false)
        .sort_by_file_name()
        .min_depth(1)
    {
        let entry = entry?;
        let path = entry.path();
        let relative = path.strip_prefix(source_dir).unwrap_or(path);
        let name = entry_name(relative);

        if entry.file_type().is_dir() {
            writer.add_directory(format!("{}/", name), options)?;
        } else if entry.file_type().is_file() {
            writer.start_file(name, options)?;
            let mut input = File::open(path).map_err(PackageError::io(path))?;
            io::copy(&mut input, &mut writer).map_err(PackageError::io(path))?;
        }
    }

    let file = writer.finish()?;
    file.sync_all().map_err(PackageError::io(part_path))?;
    Ok(())
}
