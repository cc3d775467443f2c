//! Post update orchestration.
//!
//! Drives the two operating modes against the remote store — strip a post's
//! text while keeping its images, or splice content extracted from a source
//! URL into a target post — plus a read-only info query and a sequential
//! batch runner. Per-item failures are counted, never fatal to the batch.

use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::extract::{ExtractorConfig, extract_and_format};
use crate::images::{
    DEFAULT_DESCRIPTION_PARAGRAPHS, ImageReference, collect_images, separate_description_and_images,
    strip_text_keep_images, validate_images,
};
use crate::merge::{MergeConfig, merge_with_description};
use crate::parse::Document;
use crate::store::StoreClient;
use crate::{Result, RetexoError};

/// Pause between batch items, so the store and the source origins are not
/// hammered.
pub const BATCH_DELAY: Duration = Duration::from_secs(2);

/// One unit of batch work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSpec {
    /// Strip the target post's text, keeping its images.
    Strip { target_url: String },
    /// Splice content from `source_url` into the target post.
    Copy {
        target_url: String,
        source_url: String,
        start_keyword: Option<String>,
    },
}

impl JobSpec {
    /// The job's target post URL.
    pub fn target_url(&self) -> &str {
        match self {
            JobSpec::Strip { target_url } | JobSpec::Copy { target_url, .. } => target_url,
        }
    }

    /// Short mode label for reports.
    pub fn mode(&self) -> &'static str {
        match self {
            JobSpec::Strip { .. } => "strip",
            JobSpec::Copy { .. } => "copy",
        }
    }
}

/// Outcome of a single batch item.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub target_url: String,
    pub mode: String,
    pub success: bool,
    pub error: Option<String>,
}

/// Tally of a batch run.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub details: Vec<JobOutcome>,
}

impl BatchReport {
    fn record(&mut self, job: &JobSpec, result: &Result<()>) {
        self.total += 1;
        match result {
            Ok(()) => self.success += 1,
            Err(_) => self.failed += 1,
        }
        self.details.push(JobOutcome {
            target_url: job.target_url().to_string(),
            mode: job.mode().to_string(),
            success: result.is_ok(),
            error: result.as_ref().err().map(|e| e.to_string()),
        });
    }
}

/// Read-only summary of a stored post.
#[derive(Debug, Clone, Serialize)]
pub struct PostInfo {
    pub id: u64,
    pub title: String,
    pub content_length: usize,
    pub images: Vec<ImageReference>,
}

/// Orchestrates extraction, processing, and store updates.
pub struct Updater {
    store: StoreClient,
    extractor: ExtractorConfig,
    merge: MergeConfig,
}

impl Updater {
    /// Builds an updater with default pipeline configuration.
    pub fn new(store: StoreClient) -> Self {
        Self::with_configs(store, ExtractorConfig::default(), MergeConfig::default())
    }

    /// Builds an updater with explicit pipeline configuration.
    pub fn with_configs(store: StoreClient, extractor: ExtractorConfig, merge: MergeConfig) -> Self {
        Self { store, extractor, merge }
    }

    /// Strips a post's text content, keeping every image.
    ///
    /// In dry-run mode the processed content is previewed in the log and
    /// the store is left untouched.
    pub async fn strip_post(&self, target_url: &str, dry_run: bool) -> Result<()> {
        info!(target_url, "stripping post text");

        let post = self.store.get_post_by_url(target_url).await?;
        if post.content.trim().is_empty() {
            warn!(target_url, "post content is empty, nothing to strip");
            return Err(RetexoError::NoContent);
        }

        let processed = strip_text_keep_images(&post.content);
        let validation = validate_images(&processed);
        info!(valid = validation.valid, total = validation.total, "image validation after strip");

        if dry_run {
            log_preview(&post.content, &processed);
            return Ok(());
        }

        self.store.update_post(post.id, &processed).await
    }

    /// Splices content from a source URL into the target post: the target
    /// keeps its leading description and its images, the body comes from
    /// the source.
    pub async fn copy_into_post(
        &self, target_url: &str, source_url: &str, start_keyword: Option<&str>, dry_run: bool,
    ) -> Result<()> {
        info!(target_url, source_url, "copying content into post");

        let target = self.store.get_post_by_url(target_url).await?;
        if target.content.trim().is_empty() {
            // Not fatal: the target may simply be a stub awaiting content.
            warn!(target_url, "target post content is empty");
        }

        let separated = separate_description_and_images(&target.content, DEFAULT_DESCRIPTION_PARAGRAPHS);
        let source_content = extract_and_format(source_url, start_keyword, &self.extractor).await?;

        let merged = merge_with_description(
            &separated.description_content,
            &source_content,
            &separated.images_content,
            &self.merge,
        );
        if merged.is_fallback() {
            warn!(target_url, "merge degraded to naive concatenation");
        }
        let final_content = merged.into_html();

        let validation = validate_images(&final_content);
        info!(valid = validation.valid, total = validation.total, "image validation after merge");

        if dry_run {
            log_preview(&target.content, &final_content);
            return Ok(());
        }

        self.store.update_post(target.id, &final_content).await
    }

    /// Fetches a post and reports its size and image inventory.
    pub async fn post_info(&self, target_url: &str) -> Result<PostInfo> {
        let post = self.store.get_post_by_url(target_url).await?;
        let images = collect_images(&post.content);

        Ok(PostInfo {
            id: post.id,
            title: post.title,
            content_length: post.content.chars().count(),
            images,
        })
    }

    /// Runs a batch of jobs sequentially with a fixed delay between items.
    ///
    /// Individual failures are logged and tallied; the batch always runs to
    /// completion.
    pub async fn run_jobs(&self, jobs: &[JobSpec], dry_run: bool) -> BatchReport {
        let mut report = BatchReport::default();
        info!(jobs = jobs.len(), dry_run, "starting batch run");

        for (i, job) in jobs.iter().enumerate() {
            info!(item = i + 1, total = jobs.len(), mode = job.mode(), target = job.target_url(), "processing job");

            let result = match job {
                JobSpec::Strip { target_url } => self.strip_post(target_url, dry_run).await,
                JobSpec::Copy { target_url, source_url, start_keyword } => {
                    self.copy_into_post(target_url, source_url, start_keyword.as_deref(), dry_run)
                        .await
                }
            };

            if let Err(e) = &result {
                error!(target = job.target_url(), error = %e, "job failed");
            }
            report.record(job, &result);

            if i + 1 < jobs.len() {
                sleep(BATCH_DELAY).await;
            }
        }

        info!(total = report.total, success = report.success, failed = report.failed, "batch run finished");
        report
    }
}

/// Logs the before/after shape of a content change without applying it.
fn log_preview(original: &str, processed: &str) {
    let original_images = collect_images(original).len();
    let processed_images = collect_images(processed).len();

    let original_text = Document::parse_fragment(original).text_content().trim().chars().count();
    let processed_text = Document::parse_fragment(processed).text_content().trim().chars().count();

    info!(
        original_images,
        processed_images,
        original_text,
        processed_text,
        text_delta = processed_text as i64 - original_text as i64,
        "dry run preview"
    );
}
