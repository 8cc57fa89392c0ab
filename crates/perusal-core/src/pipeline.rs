use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::analysis::{ComplexityEstimator, Estimate};
use crate::config::{InvalidResourcePolicy, PipelineConfig};
use crate::error::AppError;
use crate::extract::ContentExtractor;
use crate::models::{
    ErrorKind, PipelineResult, ReadingResource, ResourceError, ResourceKind, ResourceRequest,
};
use crate::traits::{DocumentReader, Fetcher, Tagger};

/// Events emitted by the pipeline for monitoring/logging.
#[derive(Debug, Clone)]
pub enum PipelineEvent<'a> {
    Validated {
        url: &'a str,
        kind: ResourceKind,
    },
    ValidationFailed {
        url: &'a str,
        kind: ResourceKind,
        error: &'a str,
    },
    Skipped {
        url: &'a str,
    },
    TaskStarted {
        url: &'a str,
        kind: ResourceKind,
    },
    Extracted {
        url: &'a str,
        fragments: usize,
        title: &'a str,
    },
    Analysed {
        url: &'a str,
        estimate: &'a Estimate,
    },
    TaskFailed {
        url: &'a str,
        stage: ErrorKind,
        error: &'a str,
    },
    Finished {
        resources: usize,
        errors: usize,
    },
}

/// Trait for receiving pipeline events (decoupled logging).
pub trait PipelineReporter: Send + Sync {
    fn report(&self, event: PipelineEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl PipelineReporter for TracingReporter {
    fn report(&self, event: PipelineEvent<'_>) {
        match event {
            PipelineEvent::Validated { url, kind } => {
                tracing::debug!(%url, %kind, "Resource validated");
            }
            PipelineEvent::ValidationFailed { url, kind, error } => {
                tracing::warn!(%url, %kind, %error, "Resource failed validation");
            }
            PipelineEvent::Skipped { url } => {
                tracing::info!(%url, "Skipping invalid resource");
            }
            PipelineEvent::TaskStarted { url, kind } => {
                tracing::info!(%url, %kind, "Processing resource");
            }
            PipelineEvent::Extracted {
                url,
                fragments,
                title,
            } => {
                tracing::debug!(%url, %fragments, %title, "Content extracted");
            }
            PipelineEvent::Analysed { url, estimate } => {
                tracing::info!(
                    %url,
                    complexity = estimate.complexity.factor(),
                    base_minutes = %format!("{:.2}", estimate.base_minutes),
                    scaled_minutes = %format!("{:.2}", estimate.scaled_minutes()),
                    "Analysed resource"
                );
            }
            PipelineEvent::TaskFailed { url, stage, error } => {
                tracing::warn!(%url, %stage, %error, "Resource failed");
            }
            PipelineEvent::Finished { resources, errors } => {
                tracing::info!(%resources, %errors, "Pipeline finished");
            }
        }
    }
}

/// Append-only result lists shared by all tasks of one run.
#[derive(Clone, Default)]
pub struct ResultCollector {
    resources: Arc<Mutex<Vec<(usize, ReadingResource)>>>,
    errors: Arc<Mutex<Vec<ResourceError>>>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_resource(&self, index: usize, resource: ReadingResource) {
        self.resources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((index, resource));
    }

    pub fn push_error(&self, error: ResourceError) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }

    /// Drain both lists; resources are returned in request order.
    pub fn finish(&self) -> PipelineResult {
        let mut resources = std::mem::take(
            &mut *self
                .resources
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        resources.sort_by_key(|(index, _)| *index);

        let errors = std::mem::take(&mut *self.errors.lock().unwrap_or_else(PoisonError::into_inner));

        PipelineResult {
            resources: resources.into_iter().map(|(_, r)| r).collect(),
            errors,
        }
    }
}

/// Validates every request, then extracts and analyses all resources
/// concurrently (one task per resource) and joins on all of them.
///
/// Generic over the fetcher, document reader and tagger so the whole run
/// can be exercised without network or NLP backends.
pub struct Pipeline<F, D, T>
where
    F: Fetcher,
    D: DocumentReader,
    T: Tagger,
{
    extractor: Arc<ContentExtractor<F, D>>,
    estimator: Arc<ComplexityEstimator<T>>,
    task_timeout: Duration,
    invalid_policy: InvalidResourcePolicy,
}

impl<F, D, T> Pipeline<F, D, T>
where
    F: Fetcher + 'static,
    D: DocumentReader + 'static,
    T: Tagger + 'static,
{
    pub fn new(fetcher: F, reader: D, tagger: T, config: PipelineConfig) -> Result<Self, AppError> {
        config.validate()?;

        Ok(Self {
            extractor: Arc::new(ContentExtractor::new(fetcher, reader, config.staging)),
            estimator: Arc::new(ComplexityEstimator::new(tagger, config.words_per_minute)),
            task_timeout: config.task_timeout,
            invalid_policy: config.invalid_policy,
        })
    }

    /// Run the full pipeline.
    ///
    /// 1. Validate every request (sequential, no I/O)
    /// 2. Spawn one task per dispatched resource: extract, then analyse
    /// 3. Join on all tasks
    ///
    /// Never fails: every problem is returned in [`PipelineResult::errors`].
    /// The result holds exactly one resource per request.
    pub async fn run<R>(
        &self,
        requests: Vec<ResourceRequest>,
        cancel: CancellationToken,
        reporter: &R,
    ) -> PipelineResult
    where
        R: PipelineReporter + Clone + 'static,
    {
        let collector = ResultCollector::new();
        let mut handles = Vec::with_capacity(requests.len());

        for (index, request) in requests.into_iter().enumerate() {
            let mut resource = ReadingResource::new(request.kind, request.url);

            let validation = resource.validate().map(|_| ());
            let valid = match validation {
                Ok(_) => {
                    reporter.report(PipelineEvent::Validated {
                        url: &resource.raw_url,
                        kind: resource.kind,
                    });
                    true
                }
                Err(e) => {
                    let error = ResourceError::new(ErrorKind::Validation, &resource.raw_url, &e);
                    reporter.report(PipelineEvent::ValidationFailed {
                        url: &resource.raw_url,
                        kind: resource.kind,
                        error: &error.message,
                    });
                    collector.push_error(error);
                    false
                }
            };

            if !valid && self.invalid_policy == InvalidResourcePolicy::Skip {
                reporter.report(PipelineEvent::Skipped {
                    url: &resource.raw_url,
                });
                collector.push_resource(index, resource);
                continue;
            }

            let task = ResourceTask {
                extractor: Arc::clone(&self.extractor),
                estimator: Arc::clone(&self.estimator),
                timeout: self.task_timeout,
                cancel: cancel.clone(),
                reporter: reporter.clone(),
                collector: collector.clone(),
            };
            let span = tracing::info_span!("resource", url = %resource.raw_url, kind = %resource.kind);
            let snapshot = resource.clone();
            let handle = tokio::spawn(task.run(index, resource).instrument(span));
            handles.push((index, snapshot, handle));
        }

        for (index, snapshot, handle) in handles {
            if let Err(e) = handle.await {
                tracing::error!(url = %snapshot.raw_url, error = %e, "Resource task aborted");
                let error = ResourceError {
                    kind: ErrorKind::Extraction,
                    url: snapshot.raw_url.clone(),
                    message: format!("Resource task aborted: {e}"),
                };
                collector.push_error(error);
                collector.push_resource(index, snapshot);
            }
        }

        let result = collector.finish();
        reporter.report(PipelineEvent::Finished {
            resources: result.resources.len(),
            errors: result.errors.len(),
        });
        result
    }
}

/// Everything one spawned task owns.
struct ResourceTask<F, D, T, R>
where
    F: Fetcher,
    D: DocumentReader,
    T: Tagger,
{
    extractor: Arc<ContentExtractor<F, D>>,
    estimator: Arc<ComplexityEstimator<T>>,
    timeout: Duration,
    cancel: CancellationToken,
    reporter: R,
    collector: ResultCollector,
}

impl<F, D, T, R> ResourceTask<F, D, T, R>
where
    F: Fetcher + 'static,
    D: DocumentReader + 'static,
    T: Tagger + 'static,
    R: PipelineReporter,
{
    async fn run(self, index: usize, mut resource: ReadingResource) {
        self.reporter.report(PipelineEvent::TaskStarted {
            url: &resource.raw_url,
            kind: resource.kind,
        });

        let extracted = tokio::select! {
            () = self.cancel.cancelled() => Err(AppError::Cancelled),
            res = tokio::time::timeout(self.timeout, self.extractor.extract(&mut resource)) => {
                res.unwrap_or_else(|_| Err(AppError::Timeout(self.timeout)))
            }
        };

        match extracted {
            Ok(()) => {
                self.reporter.report(PipelineEvent::Extracted {
                    url: &resource.raw_url,
                    fragments: resource.raw_content.len(),
                    title: &resource.title,
                });
                self.analyse(&mut resource);
            }
            Err(e) => {
                if e.is_network() {
                    tracing::debug!(url = %resource.raw_url, "Fetch failed on the remote side");
                }
                self.fail(&resource, ErrorKind::Extraction, &e);
            }
        }

        self.collector.push_resource(index, resource);
    }

    fn analyse(&self, resource: &mut ReadingResource) {
        match self.estimator.analyse(resource) {
            Ok(Some(estimate)) => {
                self.reporter.report(PipelineEvent::Analysed {
                    url: &resource.raw_url,
                    estimate: &estimate,
                });
            }
            Ok(None) => {}
            Err(e) => self.fail(resource, ErrorKind::Analysis, &e),
        }
    }

    fn fail(&self, resource: &ReadingResource, stage: ErrorKind, error: &AppError) {
        let error = ResourceError::new(stage, &resource.raw_url, error);
        self.reporter.report(PipelineEvent::TaskFailed {
            url: &resource.raw_url,
            stage,
            error: &error.message,
        });
        self.collector.push_error(error);
    }
}
