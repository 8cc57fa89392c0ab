use std::time::Duration;

use crate::analysis::DEFAULT_WORDS_PER_MINUTE;
use crate::error::AppError;
use crate::staging::StagingConfig;

/// What the pipeline does with a resource that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidResourcePolicy {
    /// Report the validation error and keep the resource in the result,
    /// but never fetch it.
    #[default]
    Skip,
    /// Dispatch it anyway. Extraction then fails a second time for the
    /// same resource.
    PassThrough,
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub words_per_minute: u32,
    /// Deadline for the fetch/parse stage of each resource.
    pub task_timeout: Duration,
    pub invalid_policy: InvalidResourcePolicy,
    pub staging: StagingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            task_timeout: Duration::from_secs(60),
            invalid_policy: InvalidResourcePolicy::default(),
            staging: StagingConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_words_per_minute(mut self, wpm: u32) -> Self {
        self.words_per_minute = wpm;
        self
    }

    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = timeout;
        self
    }

    pub fn with_invalid_policy(mut self, policy: InvalidResourcePolicy) -> Self {
        self.invalid_policy = policy;
        self
    }

    pub fn with_staging(mut self, staging: StagingConfig) -> Self {
        self.staging = staging;
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.words_per_minute == 0 {
            return Err(AppError::ConfigError(
                "words per minute must be at least 1".into(),
            ));
        }
        if self.task_timeout.is_zero() {
            return Err(AppError::ConfigError(
                "task timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
