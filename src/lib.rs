//! Tinct - recolor images into named palettes
//!
//! Async job orchestration, palette catalog, configuration and PNG glue
//! around the `oklab-recolor` engine.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
