//! Conversion stage implementations
//!
//! Each stage is a free function over paths and job-scoped models; the workflow
//! pipeline sequences them and reports progress.

pub mod archive_extractor;
pub mod archive_packager;
pub mod asset_relocator;
pub mod boilerplate_emitter;
pub mod jsx_writer;
pub mod markup_transformer;
pub mod project_analyzer;
pub mod scaffold_builder;

pub use archive_extractor::{extract_archive, ExtractError, ExtractSummary};
pub use archive_packager::{package_directory, PackageError};
pub use asset_relocator::{relocate_assets, RelocationSummary};
pub use boilerplate_emitter::{emit_auth_scaffold, emit_project_files};
pub use markup_transformer::{transform_pages, MarkupSummary};
pub use project_analyzer::{analyze_project, AnalyzeError};
pub use scaffold_builder::create_structure;
