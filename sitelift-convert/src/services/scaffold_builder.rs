//! Output project skeleton

use std::path::Path;
use tokio::fs;

use crate::error::{ConversionError, ConversionResult};

/// Directories of the generated React project, relative to the output root
pub const PROJECT_DIRECTORIES: [&str; 10] = [
    "src",
    "src/components",
    "src/pages",
    "src/styles",
    "src/assets",
    "src/assets/images",
    "src/assets/fonts",
    "src/supabase",
    "src/context",
    "public",
];

/// Create the fixed directory layout. Existing directories are left alone.
pub async fn create_structure(output_dir: &Path) -> ConversionResult<()> {
    for dir in PROJECT_DIRECTORIES {
        let path = output_dir.join(dir);
        fs::create_dir_all(&path)
            .await
            .map_err(ConversionError::fs(&path))?;
    }
    Ok(())
}
