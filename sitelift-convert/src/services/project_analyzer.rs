//! Project analyzer
//!
//! Walks the extracted site and classifies every regular file by extension
//! (case-insensitive) into pages, stylesheets, scripts, binary assets, or ignored.
//!
//! Symlinks are not followed, so a crafted tree cannot loop the walk. Entries
//! are visited in file-name order for reproducible output.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::models::{AssetRecord, PageRecord, ProjectInventory};

/// Archive-tool and VCS artifacts never treated as site content
const IGNORE_PATTERNS: [&str; 5] = ["__MACOSX", ".DS_Store", "Thumbs.db", ".git", "node_modules"];

/// Image and font extensions
const ASSET_EXTENSIONS: [&str; 11] = [
    "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "woff", "woff2", "ttf", "eot",
];

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// File category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Page,
    Stylesheet,
    Script,
    Asset,
    Ignored,
}

/// Classify a path by its extension
pub fn classify(path: &Path) -> FileKind {
    let Some(ext) = path.extension() else {
        return FileKind::Ignored;
    };
    let ext = ext.to_string_lossy().to_lowercase();

    match ext.as_str() {
        "html" => FileKind::Page,
        "css" | "scss" => FileKind::Stylesheet,
        "js" => FileKind::Script,
        e if ASSET_EXTENSIONS.contains(&e) => FileKind::Asset,
        _ => FileKind::Ignored,
    }
}

/// Build the inventory of an extracted project. Blocking.
pub fn analyze_project(root: &Path) -> Result<ProjectInventory, AnalyzeError> {
    if !root.exists() {
        return Err(AnalyzeError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(AnalyzeError::NotADirectory(root.to_path_buf()));
    }

    let mut inventory = ProjectInventory::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path().to_path_buf();
        let relative_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();

        match classify(&path) {
            FileKind::Page => {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                inventory.pages.push(PageRecord::new(path, name));
            }
            FileKind::Stylesheet => inventory.stylesheets.push(AssetRecord {
                path,
                relative_path,
            }),
            FileKind::Script => inventory.scripts.push(AssetRecord {
                path,
                relative_path,
            }),
            FileKind::Asset => inventory.assets.push(AssetRecord {
                path,
                relative_path,
            }),
            FileKind::Ignored => inventory.ignored += 1,
        }
    }

    tracing::debug!("Analysis complete: {}", inventory.summary());
    Ok(inventory)
}

fn is_ignored(entry: &DirEntry) -> bool {
    // The walk root itself is never filtered
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    IGNORE_PATTERNS.iter().any(|p| name == *p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify(Path::new("a/INDEX.HTML")), FileKind::Page);
        assert_eq!(classify(Path::new("theme.SCSS")), FileKind::Stylesheet);
        assert_eq!(classify(Path::new("app.Js")), FileKind::Script);
        assert_eq!(classify(Path::new("font.WOFF2")), FileKind::Asset);
        assert_eq!(classify(Path::new("notes.txt")), FileKind::Ignored);
        assert_eq!(classify(Path::new("Makefile")), FileKind::Ignored);
    }

    #[test]
    fn test_analyze_walks_nested_directories() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("pages/deep")).unwrap();
        fs::create_dir_all(root.join("img")).unwrap();
        fs::write(root.join("index.html"), "<html></html>").unwrap();
        fs::write(root.join("pages/deep/about.html"), "<html></html>").unwrap();
        fs::write(root.join("style.css"), "").unwrap();
        fs::write(root.join("app.js"), "").unwrap();
        fs::write(root.join("img/logo.png"), [0u8; 4]).unwrap();
        fs::write(root.join("README.md"), "").unwrap();

        let inventory = analyze_project(root).unwrap();

        let names: Vec<&str> = inventory.pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["index", "about"]);
        assert_eq!(inventory.stylesheets.len(), 1);
        assert_eq!(inventory.scripts.len(), 1);
        assert_eq!(inventory.assets.len(), 1);
        assert_eq!(inventory.assets[0].relative_path, PathBuf::from("img/logo.png"));
        assert_eq!(inventory.ignored, 1);
    }

    #[test]
    fn test_analyze_skips_archive_artifacts() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("__MACOSX")).unwrap();
        fs::write(root.join("__MACOSX/._index.html"), "junk").unwrap();
        fs::write(root.join(".DS_Store"), "junk").unwrap();
        fs::write(root.join("index.html"), "<html></html>").unwrap();

        let inventory = analyze_project(root).unwrap();
        assert_eq!(inventory.pages.len(), 1);
        assert_eq!(inventory.ignored, 0);
    }

    #[test]
    fn test_analyze_missing_root() {
        let temp = tempfile::tempdir().unwrap();
        let err = analyze_project(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, AnalyzeError::PathNotFound(_)));
    }
}
