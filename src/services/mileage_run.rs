use crate::models::reading::RecognitionResult;
use crate::models::run_report::RunReport;
use crate::services::frequency::reduce_readings;
use crate::services::image_source::SourceImage;
use crate::services::pair_reconciler::reconcile;
use crate::services::recognition::{parse_mileage, RecognitionError, Recognizer};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info, warn};

/// Delay strategy applied after each recognition call
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Sleeps on the tokio timer
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Per-run state, constructed fresh for every invocation
#[derive(Debug, Default)]
pub struct RunContext {
    images: Vec<SourceImage>,
    results: Vec<RecognitionResult>,
    aborted: bool,
}

impl RunContext {
    pub fn new(images: Vec<SourceImage>) -> Self {
        Self {
            images,
            results: Vec::new(),
            aborted: false,
        }
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn results(&self) -> &[RecognitionResult] {
        &self.results
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

/// Settings for one batch
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub prompt: String,
    pub delay: Duration,
}

/// Sequential recognition batch: one call at a time, fixed delay after each call
pub struct MileageRun<'a> {
    recognizer: &'a dyn Recognizer,
    pacer: &'a dyn Pacer,
    settings: RunSettings,
}

impl<'a> MileageRun<'a> {
    pub fn new(recognizer: &'a dyn Recognizer, pacer: &'a dyn Pacer, settings: RunSettings) -> Self {
        Self {
            recognizer,
            pacer,
            settings,
        }
    }

    /// Recognize every image, stopping early only on quota exhaustion
    pub async fn recognize_all(&self, ctx: &mut RunContext) {
        let total = ctx.images.len();
        let images = std::mem::take(&mut ctx.images);

        for (idx, source) in images.iter().enumerate() {
            let image = match source.decode() {
                Ok(image) => image,
                Err(e) => {
                    warn!("[Run] {}/{} {}: {}", idx + 1, total, source.file_name, e);
                    ctx.results
                        .push(RecognitionResult::failed(&source.file_name, e));
                    continue;
                }
            };

            match self
                .recognizer
                .recognize(&self.settings.prompt, &image)
                .await
            {
                Ok(text) => {
                    if parse_mileage(&text).is_some() {
                        info!("[Run] {}/{} {}: {}", idx + 1, total, source.file_name, text);
                    } else {
                        warn!(
                            "[Run] {}/{} {}: Error (no mileage in '{}')",
                            idx + 1,
                            total,
                            source.file_name,
                            text
                        );
                    }
                    ctx.results
                        .push(RecognitionResult::text(&source.file_name, text));
                }
                Err(RecognitionError::QuotaExhausted(msg)) => {
                    error!(
                        "[Run] Quota exhausted at {} ({}/{}): {}",
                        source.file_name,
                        idx + 1,
                        total,
                        msg
                    );
                    ctx.aborted = true;
                    // Unprocessed images stay in the context
                    ctx.images = images[idx..].to_vec();
                    return;
                }
                Err(RecognitionError::Failed(msg)) => {
                    warn!("[Run] {}/{} {}: Error ({})", idx + 1, total, source.file_name, msg);
                    ctx.results
                        .push(RecognitionResult::failed(&source.file_name, msg));
                }
            }

            self.pacer.pause(self.settings.delay).await;
        }
    }

    /// Run the batch and derive candidates and pairs from what was collected
    pub async fn execute(&self, mut ctx: RunContext) -> RunReport {
        self.recognize_all(&mut ctx).await;
        build_report(ctx)
    }
}

/// Normalize, reduce and reconcile the collected results
pub fn build_report(ctx: RunContext) -> RunReport {
    let candidates = reduce_readings(
        ctx.results
            .iter()
            .filter_map(|r| r.raw_text())
            .filter_map(parse_mileage),
    );
    let outcome = reconcile(&candidates);

    RunReport {
        results: ctx.results,
        candidates,
        outcome,
        quota_exhausted: ctx.aborted,
        skipped: ctx.images.len(),
    }
}
