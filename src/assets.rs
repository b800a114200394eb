//! Asset loading with embedded fallbacks
//!
//! The palette catalog and the default config ship inside the binary.
//! Either one can be replaced by a file on disk:
//!
//! - If no path is configured: use the embedded asset only
//! - If a path is configured and exists: read it from the filesystem
//! - If a path is configured but missing: fall back to the embedded asset

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const PALETTES_FILE: &str = "palettes.yaml";
pub const CONFIG_FILE: &str = "config.yaml";

/// Embedded palette catalog and default config
#[derive(RustEmbed)]
#[folder = "assets/"]
#[include = "*.yaml"]
struct EmbeddedAssets;

/// Asset category for selective operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Palettes,
    Config,
}

impl AssetCategory {
    fn file_name(self) -> &'static str {
        match self {
            AssetCategory::Palettes => PALETTES_FILE,
            AssetCategory::Config => CONFIG_FILE,
        }
    }
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem override
#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    /// External palette catalog (from PALETTES_FILE env var or --palettes)
    palettes_file: Option<PathBuf>,
    /// External config file (from CONFIG_FILE env var or --config)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Paths should be `Some` only if an override was requested.
    pub fn new(palettes_file: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            palettes_file,
            config_file,
        }
    }

    /// Loader using only the embedded assets
    pub fn embedded() -> Self {
        Self::default()
    }

    fn path_for(&self, category: AssetCategory) -> Option<&Path> {
        match category {
            AssetCategory::Palettes => self.palettes_file.as_deref(),
            AssetCategory::Config => self.config_file.as_deref(),
        }
    }

    /// Read an asset, preferring the configured file if it exists.
    pub fn read(&self, category: AssetCategory) -> io::Result<Cow<'static, [u8]>> {
        if let Some(path) = self.path_for(category) {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading asset from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
            tracing::debug!(
                path = %path.display(),
                "Configured asset missing, using embedded copy"
            );
        }

        let name = category.file_name();
        EmbeddedAssets::get(name)
            .map(|f| {
                tracing::trace!(asset = name, "Loading asset from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Embedded {name} not found"),
                )
            })
    }

    /// Read an asset as a UTF-8 string
    pub fn read_string(&self, category: AssetCategory) -> io::Result<String> {
        let bytes = self.read(category)?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn read_palettes_string(&self) -> io::Result<String> {
        self.read_string(AssetCategory::Palettes)
    }

    pub fn read_config_string(&self) -> io::Result<String> {
        self.read_string(AssetCategory::Config)
    }

    /// Extract embedded assets to the filesystem (init command)
    ///
    /// Uses the configured paths, or `./palettes.yaml` / `./config.yaml`.
    pub fn init(&self, categories: &[AssetCategory], force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        for &category in categories {
            let name = category.file_name();
            let path = self
                .path_for(category)
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".").join(name));

            if !force && path.exists() {
                report.skipped.push(path.display().to_string());
                continue;
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            if let Some(data) = EmbeddedAssets::get(name) {
                fs::write(&path, &*data.data)?;
                report.written.push(path.display().to_string());
            }
        }

        Ok(report)
    }

    /// List embedded assets (for display)
    pub fn list_embedded() -> Vec<String> {
        let mut files: Vec<String> = EmbeddedAssets::iter().map(|s| s.to_string()).collect();
        files.sort();
        files
    }
}
