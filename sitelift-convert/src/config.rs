//! Runtime settings for the conversion service
//!
//! Resolved once at startup from CLI → ENV → TOML → compiled defaults and then
//! shared read-only by every request.

use sitelift_common::config::{CompiledDefaults, RootFolderInitializer, TomlConfig};
use std::path::{Path, PathBuf};

/// URL prefix under which finished archives are served
pub const DOWNLOAD_ROUTE: &str = "/downloads";

/// Multipart field carrying the uploaded archive
pub const UPLOAD_FIELD: &str = "zipFile";

/// Module name used for the TOML file (`sitelift/convert.toml`)
pub const MODULE_NAME: &str = "convert";

#[derive(Debug, Clone)]
pub struct ConvertSettings {
    pub root_folder: PathBuf,
    /// Raw uploads awaiting processing
    pub uploads_dir: PathBuf,
    /// Per-job extract/output directories
    pub scratch_dir: PathBuf,
    /// Finished archives (append-only)
    pub downloads_dir: PathBuf,
    pub max_upload_bytes: u64,
}

impl ConvertSettings {
    /// Settings rooted at `root` with the default upload ceiling
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let initializer = RootFolderInitializer::new(root.into());
        Self {
            root_folder: initializer.root_folder().to_path_buf(),
            uploads_dir: initializer.uploads_dir(),
            scratch_dir: initializer.scratch_dir(),
            downloads_dir: initializer.downloads_dir(),
            max_upload_bytes: CompiledDefaults::for_current_platform().max_upload_bytes,
        }
    }

    /// Apply the TOML upload ceiling, if any
    pub fn with_toml(mut self, toml: &TomlConfig) -> Self {
        if let Some(limit) = toml.max_upload_bytes() {
            self.max_upload_bytes = limit;
        }
        self
    }

    pub fn with_max_upload_bytes(mut self, limit: u64) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    /// Create the root folder layout
    pub fn ensure_directories(&self) -> sitelift_common::Result<()> {
        RootFolderInitializer::new(self.root_folder.clone()).ensure_directory_exists()
    }

    /// Public URL of an archive in the downloads directory
    pub fn download_url(&self, archive: &Path) -> String {
        let name = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}/{}", DOWNLOAD_ROUTE, name)
    }
}
