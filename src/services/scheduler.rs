use crate::error::RecolorError;
use crate::models::AppConfig;
use oklab_recolor::{
    recolor_chunk, ChunkResult, ChunkTask, Palette, PixelBuffer, ProgressAggregator,
    ProgressEvent, CHANNELS,
};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Receives job-level progress percentages, 0..=100, never decreasing
pub type ProgressSender = mpsc::UnboundedSender<u8>;

/// What a chunk worker sends back to the job
enum ChunkMessage {
    Progress(ProgressEvent),
    Done(ChunkResult),
}

/// Runs one recolor job as parallel chunks on the blocking thread pool
///
/// Each chunk owns a copy of its rows and shares only the prepared palette.
/// Progress and results travel over one channel to the job, which merges
/// the progress and copies each result back at its offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkScheduler {
    workers: NonZeroUsize,
    progress_interval: NonZeroUsize,
}

impl ChunkScheduler {
    pub fn new(workers: NonZeroUsize, progress_interval: NonZeroUsize) -> Self {
        Self {
            workers,
            progress_interval,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.worker_count(), config.progress_interval())
    }

    pub fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    pub fn progress_interval(&self) -> NonZeroUsize {
        self.progress_interval
    }

    /// Recolor `source` into `palette`.
    ///
    /// Returns only after every chunk finished. If any chunk worker fails
    /// the whole job fails; no partial image is returned.
    pub async fn run(
        &self,
        source: &PixelBuffer,
        palette: Arc<Palette>,
        progress: Option<ProgressSender>,
    ) -> Result<PixelBuffer, RecolorError> {
        let interval = self.progress_interval;
        self.run_with(source, progress, move |task, report| {
            recolor_chunk(task, &palette, interval, report)
        })
        .await
    }

    /// Split, dispatch and reassemble, with `work` applied to every chunk.
    pub(crate) async fn run_with<F>(
        &self,
        source: &PixelBuffer,
        progress: Option<ProgressSender>,
        work: F,
    ) -> Result<PixelBuffer, RecolorError>
    where
        F: Fn(ChunkTask, &mut dyn FnMut(ProgressEvent)) -> ChunkResult + Send + Sync + 'static,
    {
        let started = Instant::now();
        let tasks = ChunkTask::split(source, self.workers);
        let chunks = tasks.len();

        tracing::info!(
            width = source.width(),
            height = source.height(),
            chunks,
            "Starting recolor job"
        );

        let work = Arc::new(work);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| {
                let work = Arc::clone(&work);
                let tx = tx.clone();
                tokio::task::spawn_blocking(move || {
                    let result = work(task, &mut |event| {
                        let _ = tx.send(ChunkMessage::Progress(event));
                    });
                    let _ = tx.send(ChunkMessage::Done(result));
                })
            })
            .collect();
        // the channel closes once every worker has dropped its sender
        drop(tx);

        let mut output = source.clone();
        let mut aggregator = ProgressAggregator::new(chunks);
        let mut finished = vec![false; chunks];

        while let Some(message) = rx.recv().await {
            let percent = match message {
                ChunkMessage::Progress(event) => aggregator.record(event),
                ChunkMessage::Done(result) => {
                    tracing::debug!(
                        chunk = result.index,
                        pixels = result.pixels.len() / CHANNELS,
                        "Chunk finished"
                    );
                    let end = result.start + result.pixels.len();
                    output.as_bytes_mut()[result.start..end].copy_from_slice(&result.pixels);
                    finished[result.index] = true;
                    aggregator.complete(result.index)
                }
            };
            if let (Some(percent), Some(progress)) = (percent, progress.as_ref()) {
                // a dropped receiver just means nobody is watching
                let _ = progress.send(percent);
            }
        }

        for (chunk, handle) in handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                tracing::error!(chunk, %e, "Chunk worker failed");
                return Err(RecolorError::WorkerFailure {
                    chunk,
                    reason: e.to_string(),
                });
            }
        }
        if let Some(chunk) = finished.iter().position(|done| !done) {
            return Err(RecolorError::WorkerFailure {
                chunk,
                reason: "worker exited without a result".to_string(),
            });
        }

        tracing::info!(
            chunks,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Recolor job finished"
        );
        Ok(output)
    }
}
