//! Conversion pipeline
//!
//! Runs the stages of one job in order, reporting each on the job's progress
//! channel:
//!
//! Extracting → Analyzing → Creating Structure → Converting HTML →
//! Processing Assets → Setting up Auth Scaffold → Finalizing → Packaging →
//! Complete
//!
//! The first failing stage ends the job. Scratch cleanup always runs, and it
//! runs before the terminal event is sent, so a client that sees `complete` or
//! `error` can rely on the job's temporary files being gone.

use sitelift_common::ConversionStage;
use std::path::PathBuf;
use tracing::{error, info};

use super::job::ConversionJob;
use super::progress::ProgressReporter;
use crate::config::ConvertSettings;
use crate::error::ConversionResult;
use crate::services::{
    analyze_project, create_structure, emit_auth_scaffold, emit_project_files, extract_archive,
    package_directory, relocate_assets, transform_pages,
};

/// Run a job to its terminal event and return the download URL
pub async fn run_conversion(
    job: ConversionJob,
    settings: &ConvertSettings,
    mut reporter: ProgressReporter,
) -> ConversionResult<String> {
    info!(job_id = %job.id, stamp = %job.stamp, "Conversion started");

    let result = execute(&job, settings, &mut reporter).await;
    job.cleanup().await;

    match result {
        Ok(archive) => {
            let url = settings.download_url(&archive);
            reporter.report(ConversionStage::Complete, "Conversion completed successfully!");
            reporter.complete(url.clone());
            info!(job_id = %job.id, download_url = %url, "Conversion complete");
            Ok(url)
        }
        Err(e) => {
            error!(job_id = %job.id, error = %e, "Conversion failed");
            reporter.fail(e.to_string());
            Err(e)
        }
    }
}

async fn execute(
    job: &ConversionJob,
    settings: &ConvertSettings,
    reporter: &mut ProgressReporter,
) -> ConversionResult<PathBuf> {
    let output_dir = job.output_dir.as_path();

    reporter.report(ConversionStage::Extracting, "Extracting ZIP file...");
    let (upload, extract_dir) = (job.upload_path.clone(), job.extract_dir.clone());
    let extracted =
        tokio::task::spawn_blocking(move || extract_archive(&upload, &extract_dir)).await??;
    info!(
        job_id = %job.id,
        files = extracted.files,
        bytes = extracted.bytes,
        "Archive extracted"
    );

    reporter.report(ConversionStage::Analyzing, "Scanning files and structure...");
    let extract_dir = job.extract_dir.clone();
    let inventory = tokio::task::spawn_blocking(move || analyze_project(&extract_dir)).await??;
    info!(job_id = %job.id, "Found {}", inventory.summary());

    reporter.report(
        ConversionStage::CreatingStructure,
        "Setting up React project structure...",
    );
    create_structure(output_dir).await?;

    reporter.report(
        ConversionStage::ConvertingHtml,
        format!(
            "Converting {} HTML page(s) to React components...",
            inventory.pages.len()
        ),
    );
    let markup = transform_pages(&inventory.pages, output_dir, |done, total, page| {
        reporter.report_within(
            ConversionStage::ConvertingHtml,
            done,
            total,
            format!("Converted {} ({}/{})", page.name, done, total),
        );
    })
    .await?;

    reporter.report(
        ConversionStage::ProcessingAssets,
        "Copying stylesheets, scripts and assets...",
    );
    let relocated = relocate_assets(&inventory, output_dir).await?;

    reporter.report(
        ConversionStage::SettingUpAuthScaffold,
        "Integrating Supabase authentication...",
    );
    emit_auth_scaffold(output_dir).await?;

    reporter.report(ConversionStage::Finalizing, "Creating configuration files...");
    emit_project_files(output_dir, &markup.pages, &relocated.stylesheets).await?;

    reporter.report(ConversionStage::Packaging, "Creating download package...");
    package(job, settings).await
}

async fn package(job: &ConversionJob, settings: &ConvertSettings) -> ConversionResult<PathBuf> {
    let output_dir = job.output_dir.clone();
    let staging_dir = settings.scratch_dir.clone();
    let downloads_dir = settings.downloads_dir.clone();
    let stamp = job.stamp.clone();
    let archive = tokio::task::spawn_blocking(move || {
        package_directory(&output_dir, &staging_dir, &downloads_dir, &stamp)
    })
    .await??;
    Ok(archive)
}
