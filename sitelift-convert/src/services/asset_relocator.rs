//! Asset relocation into the output project
//!
//! - images/fonts → `src/assets/<relative path>`
//! - stylesheets → `src/styles/<file name>` (flattened)
//! - scripts → `public/scripts/<relative path>`
//!
//! Contents are copied byte-for-byte. Two stylesheets with the same file name
//! from different folders collide; the later one wins and a warning is logged.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{ConversionError, ConversionResult};
use crate::models::{AssetRecord, ProjectInventory};

/// Copy statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelocationSummary {
    pub assets_copied: usize,
    pub scripts_copied: usize,
    /// Distinct style file names now present in `src/styles`, in first-seen order
    pub stylesheets: Vec<String>,
    /// Stylesheets overwritten by a same-named later one
    pub stylesheet_collisions: usize,
}

async fn copy_into(source: &Path, dest: &Path) -> ConversionResult<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(ConversionError::fs(parent))?;
    }
    fs::copy(source, dest)
        .await
        .map_err(ConversionError::fs(source))?;
    Ok(())
}

async fn mirror(records: &[AssetRecord], root: &Path) -> ConversionResult<usize> {
    for record in records {
        let dest = root.join(&record.relative_path);
        copy_into(&record.path, &dest).await?;
        debug!("Copied {} -> {}", record.relative_path.display(), dest.display());
    }
    Ok(records.len())
}

/// Copy every asset, stylesheet and script of the inventory into `output_dir`
pub async fn relocate_assets(
    inventory: &ProjectInventory,
    output_dir: &Path,
) -> ConversionResult<RelocationSummary> {
    let mut summary = RelocationSummary {
        assets_copied: mirror(&inventory.assets, &output_dir.join("src").join("assets")).await?,
        scripts_copied: mirror(&inventory.scripts, &output_dir.join("public").join("scripts"))
            .await?,
        ..Default::default()
    };

    let styles_dir = output_dir.join("src").join("styles");
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for stylesheet in &inventory.stylesheets {
        let Some(file_name) = stylesheet.path.file_name() else {
            continue;
        };
        let file_name = file_name.to_string_lossy().into_owned();

        if let Some(previous) = seen.get(&file_name) {
            warn!(
                file = %file_name,
                previous = %previous.display(),
                replacement = %stylesheet.relative_path.display(),
                "Stylesheet name collision; later file overwrites earlier one"
            );
            summary.stylesheet_collisions += 1;
        } else {
            summary.stylesheets.push(file_name.clone());
        }

        copy_into(&stylesheet.path, &styles_dir.join(&file_name)).await?;
        seen.insert(file_name, stylesheet.relative_path.clone());
    }

    Ok(summary)
}
