use crate::error::RecolorError;
use crate::models::{PaletteSelection, ORIGINAL};
use crate::services::result_cache::ResultCache;
use crate::services::scheduler::{ChunkScheduler, ProgressSender};
use oklab_recolor::{Palette, PixelBuffer};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Where a conversion's image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The source itself (`original` selected)
    Original,
    /// A previous conversion of the same source
    Cached,
    /// Freshly computed by a job
    Computed,
}

/// Result of a conversion request
#[derive(Debug, Clone)]
pub struct Conversion {
    pub palette: String,
    pub image: Arc<PixelBuffer>,
    pub origin: Origin,
}

/// Lifecycle of the most recent recolor job
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Running { palette: String, request: u64 },
    Completed { palette: String },
    Failed { palette: String, reason: String },
}

/// Identifies a job between its start and its finish
#[derive(Debug, Clone, PartialEq, Eq)]
struct JobTicket {
    palette: String,
    request: u64,
    generation: u64,
}

/// Mutable state of one session: the source image, what is shown, and
/// the results computed for this source.
#[derive(Debug, Default)]
struct SessionState {
    source: Option<Arc<PixelBuffer>>,
    /// Bumped on every source change
    generation: u64,
    /// Bumped on every conversion request and source change
    request_seq: u64,
    cache: ResultCache,
    job: JobState,
    current: Option<Conversion>,
}

impl SessionState {
    fn set_source(&mut self, source: Option<Arc<PixelBuffer>>) {
        self.cache.invalidate_all();
        self.generation += 1;
        self.request_seq += 1;
        self.job = JobState::Idle;
        self.current = source.as_ref().map(|image| Conversion {
            palette: ORIGINAL.to_string(),
            image: Arc::clone(image),
            origin: Origin::Original,
        });
        self.source = source;
    }

    /// Show `conversion` and make it the latest request, which runs no job.
    fn show(&mut self, conversion: Conversion) -> Conversion {
        self.request_seq += 1;
        self.job = JobState::Idle;
        self.current = Some(conversion.clone());
        conversion
    }

    fn begin(&mut self, palette: &str) -> JobTicket {
        self.request_seq += 1;
        let ticket = JobTicket {
            palette: palette.to_string(),
            request: self.request_seq,
            generation: self.generation,
        };
        self.job = JobState::Running {
            palette: ticket.palette.clone(),
            request: ticket.request,
        };
        ticket
    }

    /// Apply a finished job.
    ///
    /// The output is cached only if the source is unchanged, and shown
    /// only if no newer request was made in the meantime. Failures never
    /// touch the shown image.
    fn finish(
        &mut self,
        ticket: JobTicket,
        result: Result<PixelBuffer, RecolorError>,
    ) -> Result<Conversion, RecolorError> {
        let latest_job = self.request_seq == ticket.request;

        let image = match result {
            Ok(image) => Arc::new(image),
            Err(e) => {
                if latest_job {
                    self.job = JobState::Failed {
                        palette: ticket.palette.clone(),
                        reason: e.to_string(),
                    };
                }
                tracing::warn!(palette = %ticket.palette, %e, "Conversion failed");
                return Err(e);
            }
        };

        let same_source = self.generation == ticket.generation;
        if same_source {
            self.cache.store(&ticket.palette, Arc::clone(&image));
        }
        if latest_job {
            self.job = JobState::Completed {
                palette: ticket.palette.clone(),
            };
        }

        if same_source && latest_job {
            let conversion = Conversion {
                palette: ticket.palette,
                image,
                origin: Origin::Computed,
            };
            self.current = Some(conversion.clone());
            Ok(conversion)
        } else {
            tracing::warn!(
                palette = %ticket.palette,
                cached = same_source,
                "Discarding superseded conversion"
            );
            Err(RecolorError::Superseded {
                palette: ticket.palette,
            })
        }
    }
}

/// Explicit context for recoloring one source image into many palettes
///
/// Holds the source, the image currently shown, the result cache and the
/// state of the latest job. Requests may overlap: a newer request or a
/// source change supersedes a running job, whose chunks still run to the
/// end but whose result is never shown.
pub struct RecolorSession {
    scheduler: ChunkScheduler,
    state: RwLock<SessionState>,
}

impl RecolorSession {
    pub fn new(scheduler: ChunkScheduler) -> Self {
        Self {
            scheduler,
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn scheduler(&self) -> &ChunkScheduler {
        &self.scheduler
    }

    /// Replace the source image; drops every cached result.
    pub async fn set_source(&self, source: PixelBuffer) {
        tracing::info!(
            width = source.width(),
            height = source.height(),
            "Source image set"
        );
        self.state.write().await.set_source(Some(Arc::new(source)));
    }

    /// Remove the source image; drops every cached result.
    pub async fn clear(&self) {
        tracing::info!("Source image cleared");
        self.state.write().await.set_source(None);
    }

    /// Show the source recolored into `selection`.
    ///
    /// `original` returns the source unchanged and a cached palette returns
    /// the stored result; both send no progress. Otherwise a job runs and
    /// `progress` receives its percentages.
    ///
    /// # Errors
    ///
    /// - [`RecolorError::NoSource`] when no source image is set
    /// - [`RecolorError::Palette`] when a color is malformed or the palette empty
    /// - [`RecolorError::WorkerFailure`] when a chunk worker died
    /// - [`RecolorError::Superseded`] when a newer request or source change
    ///   arrived while the job ran
    pub async fn convert(
        &self,
        selection: PaletteSelection,
        progress: Option<ProgressSender>,
    ) -> Result<Conversion, RecolorError> {
        let (source, ticket, colors) = {
            let mut state = self.state.write().await;
            let source = state.source.clone().ok_or(RecolorError::NoSource)?;

            let (name, colors) = match selection {
                PaletteSelection::Original => {
                    return Ok(state.show(Conversion {
                        palette: ORIGINAL.to_string(),
                        image: source,
                        origin: Origin::Original,
                    }));
                }
                PaletteSelection::Named { name, colors } => (name, colors),
            };

            if let Some(image) = state.cache.get(&name) {
                tracing::debug!(palette = %name, "Serving cached conversion");
                return Ok(state.show(Conversion {
                    palette: name,
                    image,
                    origin: Origin::Cached,
                }));
            }

            let ticket = state.begin(&name);
            (source, ticket, colors)
        };

        tracing::info!(
            palette = %ticket.palette,
            colors = colors.len(),
            request = ticket.request,
            workers = self.scheduler.workers().get(),
            "Starting conversion"
        );

        let result = match Palette::from_hex(&colors) {
            Ok(palette) => {
                self.scheduler
                    .run(&source, Arc::new(palette), progress)
                    .await
            }
            Err(e) => Err(e.into()),
        };

        self.state.write().await.finish(ticket, result)
    }

    pub async fn has_source(&self) -> bool {
        self.state.read().await.source.is_some()
    }

    /// Whether `palette` has a finished result for the current source
    pub async fn is_cached(&self, palette: &str) -> bool {
        self.state.read().await.cache.contains(palette)
    }

    pub async fn cached_count(&self) -> usize {
        self.state.read().await.cache.len()
    }

    pub async fn job_state(&self) -> JobState {
        self.state.read().await.job.clone()
    }

    /// The image currently shown, if any
    pub async fn current(&self) -> Option<Conversion> {
        self.state.read().await.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oklab_recolor::PaletteError;

    fn image(shade: u8) -> PixelBuffer {
        PixelBuffer::filled(2, 2, [shade, shade, shade, 255])
    }

    fn state_with_source() -> SessionState {
        let mut state = SessionState::default();
        state.set_source(Some(Arc::new(image(10))));
        state
    }

    #[test]
    fn test_finish_applies_latest_job() {
        let mut state = state_with_source();
        let ticket = state.begin("mono");

        let conversion = state.finish(ticket, Ok(image(0))).unwrap();

        assert_eq!(conversion.origin, Origin::Computed);
        assert_eq!(state.current.as_ref().unwrap().palette, "mono");
        assert!(state.cache.contains("mono"));
        assert_eq!(
            state.job,
            JobState::Completed {
                palette: "mono".into()
            }
        );
    }

    #[test]
    fn test_newer_request_supersedes_running_job() {
        let mut state = state_with_source();
        let first = state.begin("slow");
        let second = state.begin("fast");

        let shown = state.finish(second, Ok(image(1))).unwrap();
        assert_eq!(shown.palette, "fast");

        // the older job finishes last; it is cached but not shown
        let late = state.finish(first, Ok(image(2)));
        assert!(matches!(late, Err(RecolorError::Superseded { ref palette }) if palette == "slow"));
        assert_eq!(state.current.as_ref().unwrap().palette, "fast");
        assert!(state.cache.contains("slow"));
        assert_eq!(
            state.job,
            JobState::Completed {
                palette: "fast".into()
            }
        );
    }

    #[test]
    fn test_cache_hit_supersedes_running_job() {
        let mut state = state_with_source();
        state.cache.store("cached", Arc::new(image(5)));
        let running = state.begin("slow");

        state.show(Conversion {
            palette: "cached".into(),
            image: Arc::new(image(5)),
            origin: Origin::Cached,
        });

        assert!(matches!(
            state.finish(running, Ok(image(2))),
            Err(RecolorError::Superseded { .. })
        ));
        assert_eq!(state.current.as_ref().unwrap().palette, "cached");
        assert_eq!(state.job, JobState::Idle);
        assert!(state.cache.contains("slow"));
    }

    #[test]
    fn test_failure_after_original_shown_keeps_idle() {
        let mut state = state_with_source();
        let running = state.begin("broken");

        state.show(Conversion {
            palette: ORIGINAL.into(),
            image: Arc::new(image(10)),
            origin: Origin::Original,
        });
        assert_eq!(state.job, JobState::Idle);

        let result = state.finish(running, Err(PaletteError::Empty.into()));
        assert!(result.is_err());
        assert_eq!(state.job, JobState::Idle);
        assert_eq!(state.current.as_ref().unwrap().origin, Origin::Original);
    }

    #[test]
    fn test_source_change_discards_result() {
        let mut state = state_with_source();
        let ticket = state.begin("mono");

        state.set_source(Some(Arc::new(image(200))));
        let result = state.finish(ticket, Ok(image(0)));

        assert!(matches!(result, Err(RecolorError::Superseded { .. })));
        assert!(state.cache.is_empty(), "result of the old source was cached");
        assert_eq!(state.current.as_ref().unwrap().origin, Origin::Original);
        assert_eq!(state.job, JobState::Idle);
    }

    #[test]
    fn test_failure_keeps_current_image() {
        let mut state = state_with_source();
        let ticket = state.begin("broken");

        let result = state.finish(ticket, Err(PaletteError::Empty.into()));

        assert!(matches!(result, Err(RecolorError::Palette(PaletteError::Empty))));
        assert_eq!(state.current.as_ref().unwrap().origin, Origin::Original);
        assert!(state.cache.is_empty());
        assert!(matches!(state.job, JobState::Failed { ref palette, .. } if palette == "broken"));
    }

    #[test]
    fn test_clear_source() {
        let mut state = state_with_source();
        state.cache.store("mono", Arc::new(image(0)));

        state.set_source(None);

        assert!(state.source.is_none());
        assert!(state.current.is_none());
        assert!(state.cache.is_empty());
    }
}
