pub mod analysis;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod staging;
pub mod traits;
pub mod validate;

#[cfg(test)]
pub(crate) mod testutil;

pub use analysis::{ComplexityEstimator, DEFAULT_WORDS_PER_MINUTE, Estimate};
pub use config::{InvalidResourcePolicy, PipelineConfig};
pub use error::AppError;
pub use models::{
    Complexity, ErrorKind, PipelineResult, ReadingResource, ResourceBatch, ResourceError,
    ResourceKind, ResourceRequest,
};
pub use pipeline::{Pipeline, PipelineReporter, TracingReporter};
pub use staging::{Retention, StagingConfig};
pub use traits::{DocumentReader, Fetcher, Tagger};
