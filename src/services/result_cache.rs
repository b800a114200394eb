use oklab_recolor::PixelBuffer;
use std::collections::HashMap;
use std::sync::Arc;

/// Finished conversions of the current source image, keyed by palette name
///
/// Entries are only ever written after a job succeeded, and never evicted
/// one by one: a source change drops them all.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<String, Arc<PixelBuffer>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, palette: &str) -> Option<Arc<PixelBuffer>> {
        self.entries.get(palette).cloned()
    }

    /// Store a finished conversion, replacing any previous entry
    pub fn store(&mut self, palette: &str, image: Arc<PixelBuffer>) {
        self.entries.insert(palette.to_string(), image);
    }

    pub fn contains(&self, palette: &str) -> bool {
        self.entries.contains_key(palette)
    }

    /// Forget every entry; called whenever the source image changes
    pub fn invalidate_all(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(entries = self.entries.len(), "Invalidating result cache");
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
