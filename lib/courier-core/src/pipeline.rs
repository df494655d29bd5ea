//! The response pipeline: interceptors applied in order.
//!
//! The runner never skips a stage, whatever the state of the response: a
//! stage that should not act on a failed response checks
//! [`NetworkResponse::error`] itself. This lets logging or metrics stages see
//! every response, failed or not.
//!
//! Stages run one after the other on the calling thread. Nothing here is
//! async: by the time the pipeline runs, the transport has completed.

use std::sync::Arc;

use tracing::{debug, debug_span, trace};

use crate::{NetworkResponse, ParsingInterceptor, ResponseInterceptor};

/// Apply `interceptors` to `response` in order.
///
/// Each stage receives the response returned by the previous one.
#[must_use]
pub fn run(
    response: NetworkResponse,
    interceptors: &[Arc<dyn ResponseInterceptor>],
) -> NetworkResponse {
    let span = debug_span!("response_pipeline", stages = interceptors.len());
    let _entered = span.enter();

    let response = interceptors.iter().fold(response, |response, stage| {
        trace!(
            stage = stage.name(),
            failed = response.is_failure(),
            "running interceptor"
        );
        stage.intercept(response)
    });

    match response.error() {
        Some(error) => debug!(%error, "response pipeline completed with error"),
        None => debug!(
            decoded = response.result().is_some(),
            "response pipeline completed"
        ),
    }
    response
}

/// An ordered list of [`ResponseInterceptor`]s.
///
/// Cheap to clone; stages are shared.
///
/// # Example
///
/// ```
/// use courier_core::{Pipeline, StatusValidationInterceptor};
///
/// // Reject non-2xx statuses before parsing.
/// let pipeline = Pipeline::standard().with_first(StatusValidationInterceptor::new());
/// assert_eq!(pipeline.stage_names(), ["status-validation", "parsing"]);
/// ```
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn ResponseInterceptor>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl Pipeline {
    /// An empty pipeline: responses come out as they went in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The default pipeline, made of the [`ParsingInterceptor`] alone.
    #[must_use]
    pub fn standard() -> Self {
        Self::new().with(ParsingInterceptor)
    }

    /// Append a stage.
    #[must_use]
    pub fn with(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.push(Arc::new(interceptor));
        self
    }

    /// Insert a stage before all others.
    #[must_use]
    pub fn with_first(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.stages.insert(0, Arc::new(interceptor));
        self
    }

    /// Append a shared stage.
    pub fn push(&mut self, interceptor: Arc<dyn ResponseInterceptor>) {
        self.stages.push(interceptor);
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the pipeline has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Names of the stages, in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run `response` through every stage, in order.
    #[must_use]
    pub fn run(&self, response: NetworkResponse) -> NetworkResponse {
        run(response, &self.stages)
    }
}
