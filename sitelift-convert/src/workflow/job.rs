//! Conversion job identity and scratch paths

use sitelift_common::time::job_stamp;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ConvertSettings;

/// One upload's conversion
///
/// All paths derive from a single stamp, so concurrent jobs never share a
/// directory. The upload and both scratch directories are deleted by
/// [`ConversionJob::cleanup`]; the packaged archive is not.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub id: Uuid,
    /// `<unix-millis>_<8 hex chars>`
    pub stamp: String,
    pub upload_path: PathBuf,
    pub extract_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl ConversionJob {
    pub fn new(settings: &ConvertSettings) -> Self {
        let id = Uuid::new_v4();
        let stamp = job_stamp(id);
        Self {
            id,
            upload_path: settings.uploads_dir.join(format!("{}.zip", stamp)),
            extract_dir: settings.scratch_dir.join(format!("extract_{}", stamp)),
            output_dir: settings.scratch_dir.join(format!("output_{}", stamp)),
            stamp,
        }
    }

    /// Remove the upload and scratch directories
    ///
    /// Best effort: missing paths are fine, other failures are logged.
    pub async fn cleanup(&self) {
        remove_file(&self.upload_path).await;
        remove_dir(&self.extract_dir).await;
        remove_dir(&self.output_dir).await;
        debug!(job_id = %self.id, "Job scratch removed");
    }
}

async fn remove_file(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

async fn remove_dir(path: &Path) {
    if let Err(e) = fs::remove_dir_all(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_the_stamp() {
        let settings = ConvertSettings::for_root("/srv/sitelift");
        let job = ConversionJob::new(&settings);

        assert_eq!(
            job.upload_path,
            PathBuf::from(format!("/srv/sitelift/uploads/{}.zip", job.stamp))
        );
        assert_eq!(
            job.extract_dir,
            PathBuf::from(format!("/srv/sitelift/temp/extract_{}", job.stamp))
        );
        assert_eq!(
            job.output_dir,
            PathBuf::from(format!("/srv/sitelift/temp/output_{}", job.stamp))
        );
    }

    #[test]
    fn test_jobs_get_distinct_stamps() {
        let settings = ConvertSettings::for_root("/srv");
        let a = ConversionJob::new(&settings);
        let b = ConversionJob::new(&settings);
        assert_ne!(a.stamp, b.stamp);
    }

    #[tokio::test]
    async fn test_cleanup_removes_scratch_and_tolerates_missing() {
        let temp = tempfile::tempdir().unwrap();
        let settings = ConvertSettings::for_root(temp.path());
        settings.ensure_directories().unwrap();
        let job = ConversionJob::new(&settings);

        std::fs::write(&job.upload_path, b"PK").unwrap();
        std::fs::create_dir_all(job.extract_dir.join("nested")).unwrap();
        // output_dir never created

        job.cleanup().await;

        assert!(!job.upload_path.exists());
        assert!(!job.extract_dir.exists());
        assert!(!job.output_dir.exists());
        assert!(settings.scratch_dir.exists());
    }
}
