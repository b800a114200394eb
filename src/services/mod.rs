pub mod result_cache;
pub mod scheduler;
pub mod session;

pub use result_cache::ResultCache;
pub use scheduler::{ChunkScheduler, ProgressSender};
pub use session::{Conversion, JobState, Origin, RecolorSession};
