use crate::assets::AssetLoader;
use oklab_recolor::DEFAULT_PROGRESS_INTERVAL;
use serde::Deserialize;
use std::num::NonZeroUsize;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Chunk workers per conversion; host parallelism if unset
    #[serde(default)]
    pub workers: Option<usize>,

    /// Pixels a worker processes between progress reports
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

fn default_progress_interval() -> usize {
    DEFAULT_PROGRESS_INTERVAL
}

/// Host parallelism minus one, never less than one.
pub fn default_worker_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get().saturating_sub(1)).unwrap_or(NonZeroUsize::MIN)
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str::<Option<Self>>(&content) {
                Ok(config) => {
                    let config = config.unwrap_or_default();
                    tracing::info!(
                        workers = ?config.workers,
                        progress_interval = config.progress_interval,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Configured worker count; zero is treated as unset.
    pub fn worker_count(&self) -> NonZeroUsize {
        self.workers
            .and_then(NonZeroUsize::new)
            .unwrap_or_else(default_worker_count)
    }

    /// Progress interval; zero falls back to the default.
    pub fn progress_interval(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.progress_interval)
            .or(NonZeroUsize::new(DEFAULT_PROGRESS_INTERVAL))
            .unwrap_or(NonZeroUsize::MIN)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workers: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}
