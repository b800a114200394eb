//! Test session factory for integration tests.

use std::num::NonZeroUsize;
use tokio::sync::mpsc;

use oklab_recolor::PixelBuffer;
use tinct::assets::AssetLoader;
use tinct::error::RecolorError;
use tinct::models::{PaletteCatalog, PaletteSelection};
use tinct::services::{ChunkScheduler, Conversion, RecolorSession};

/// Session plus the embedded palette catalog
pub struct TestSession {
    pub session: RecolorSession,
    pub catalog: PaletteCatalog,
}

impl TestSession {
    /// Session with `workers` chunk workers and a small progress interval
    pub fn new(workers: usize) -> Self {
        Self::with_interval(workers, 16)
    }

    pub fn with_interval(workers: usize, progress_interval: usize) -> Self {
        let scheduler = ChunkScheduler::new(
            NonZeroUsize::new(workers).unwrap(),
            NonZeroUsize::new(progress_interval).unwrap(),
        );
        Self {
            session: RecolorSession::new(scheduler),
            catalog: PaletteCatalog::load_from_assets(&AssetLoader::embedded()),
        }
    }

    pub async fn with_source(workers: usize, source: PixelBuffer) -> Self {
        let app = Self::new(workers);
        app.session.set_source(source).await;
        app
    }

    /// Look up a catalog palette by name
    pub fn select(&self, name: &str) -> PaletteSelection {
        self.catalog
            .select(name)
            .unwrap_or_else(|| panic!("palette {name:?} not in catalog"))
    }

    /// Convert and collect every progress percentage sent
    pub async fn convert(
        &self,
        selection: PaletteSelection,
    ) -> (Result<Conversion, RecolorError>, Vec<u8>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let result = self.session.convert(selection, Some(tx)).await;

        let mut progress = Vec::new();
        while let Some(p) = rx.recv().await {
            progress.push(p);
        }
        (result, progress)
    }

    pub async fn convert_named(&self, name: &str) -> (Result<Conversion, RecolorError>, Vec<u8>) {
        self.convert(self.select(name)).await
    }
}
