//! Orchestrator use case
//!
//! Sequences validation, rate limiting, context assembly, retried
//! generation and scoring for one request at a time, and publishes every
//! state transition to listeners and a watch channel.
//!
//! # Run lifecycle
//!
//! ```text
//! idle -> validating -> context-building -> invoking (-> retrying)* -> success
//!                    \-> error                                     \-> error
//! any non-terminal state -> cancelled
//! ```
//!
//! Each run owns a child [`CancellationToken`] and a run id. A state update
//! is applied only while its run id is current and its token is live, so a
//! superseded or cancelled run can never overwrite newer state.

use crate::config::OrchestratorConfig;
use crate::ports::clock::{Clock, SystemClock};
use crate::ports::counter_store::{CounterStore, InMemoryCounterStore};
use crate::ports::generation_backend::GenerationBackend;
use crate::ports::run_event_logger::{NoRunEventLogger, RunEvent, RunEventLogger};
use crate::ports::state_listener::RunStateListener;
use crate::ports::subject_data::SubjectDataProvider;
use crate::use_cases::context_assembler::ContextAssembler;
use crate::use_cases::error_classifier::ErrorClassifier;
use crate::use_cases::failure::GenerationFailure;
use crate::use_cases::generation_invoker::GenerationInvoker;
use crate::use_cases::rate_limiter::RateLimiter;
use crate::use_cases::retry::{RetryController, RetryObserver};
use crate::use_cases::shared::{check_cancelled, lock};
use forge_domain::core::string::truncate;
use forge_domain::run::progress;
use forge_domain::{
    GenerationRequest, GenerationResult, OrchestratorRunState, QualityScorer, RequestText,
    RequestValidator, RunStatus, SubjectContext, UserPreferences,
};
use futures::FutureExt;
use serde_json::json;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{OnceCell, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Longest error message copied into a run event, in bytes
const MAX_LOGGED_MESSAGE: usize = 500;

/// Handle returned by [`Orchestrator::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct RunSlot {
    state: OrchestratorRunState,
    token: Option<CancellationToken>,
    last_run_id: u64,
}

struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Arc<dyn RunStateListener>)>,
}

/// Builder for [`Orchestrator`]
pub struct OrchestratorBuilder {
    backend: Arc<dyn GenerationBackend>,
    provider: Arc<dyn SubjectDataProvider>,
    config: OrchestratorConfig,
    counter_store: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
    event_logger: Arc<dyn RunEventLogger>,
    parent_token: CancellationToken,
}

impl OrchestratorBuilder {
    pub fn config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn counter_store(mut self, store: Arc<dyn CounterStore>) -> Self {
        self.counter_store = store;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn event_logger(mut self, logger: Arc<dyn RunEventLogger>) -> Self {
        self.event_logger = logger;
        self
    }

    /// Run tokens are children of `token`; cancelling it cancels any run.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.parent_token = token;
        self
    }

    pub fn build(self) -> Orchestrator {
        let (state_tx, _) = watch::channel(OrchestratorRunState::idle());

        Orchestrator {
            validator: RequestValidator::new(),
            rate_limiter: RateLimiter::new(
                self.counter_store,
                self.clock.clone(),
                self.config.sliding_window(),
            ),
            assembler: ContextAssembler::new(self.provider),
            invoker: GenerationInvoker::new(
                self.backend,
                self.clock.clone(),
                self.config.request_timeout,
            ),
            retry: RetryController::new(&self.config),
            classifier: ErrorClassifier::new(self.clock.clone()),
            scorer: QualityScorer::new(self.config.scoring.clone()),
            clock: self.clock,
            event_logger: self.event_logger,
            parent_token: self.parent_token,
            config: self.config,
            slot: Mutex::new(RunSlot {
                state: OrchestratorRunState::idle(),
                token: None,
                last_run_id: 0,
            }),
            notify: Mutex::new(()),
            listeners: Mutex::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            }),
            state_tx,
        }
    }
}

/// Single entry point for generation runs
///
/// At most one run is in flight: starting a new run cancels the previous
/// one. Errors never escape [`Orchestrator::run`]; they are classified and
/// placed in the run state.
pub struct Orchestrator {
    validator: RequestValidator,
    rate_limiter: RateLimiter,
    assembler: ContextAssembler,
    invoker: GenerationInvoker,
    retry: RetryController,
    classifier: ErrorClassifier,
    scorer: QualityScorer,
    clock: Arc<dyn Clock>,
    event_logger: Arc<dyn RunEventLogger>,
    parent_token: CancellationToken,
    config: OrchestratorConfig,
    slot: Mutex<RunSlot>,
    /// Held while listeners run so notifications keep the order of updates
    notify: Mutex<()>,
    listeners: Mutex<Listeners>,
    state_tx: watch::Sender<OrchestratorRunState>,
}

impl Orchestrator {
    pub fn builder(
        backend: Arc<dyn GenerationBackend>,
        provider: Arc<dyn SubjectDataProvider>,
    ) -> OrchestratorBuilder {
        OrchestratorBuilder {
            backend,
            provider,
            config: OrchestratorConfig::default(),
            counter_store: Arc::new(InMemoryCounterStore::new()),
            clock: Arc::new(SystemClock),
            event_logger: Arc::new(NoRunEventLogger),
            parent_token: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    // ==================== Caller API ====================

    /// Run one generation for `subject_id`, which replaces the request's own
    /// subject id.
    ///
    /// Returns the scored result on success. Returns `None` on failure (the
    /// classified error is in [`Orchestrator::state`]) or when the run was
    /// cancelled or superseded.
    pub async fn run(
        &self,
        subject_id: impl Into<RequestText>,
        request: GenerationRequest,
        preferences: Option<Arc<UserPreferences>>,
    ) -> Option<GenerationResult> {
        let mut request = request;
        request.subject_id = subject_id.into();

        let (run_id, token) = self.begin_run(&request);
        let pipeline = self.execute(run_id, &request, preferences.as_deref(), &token);
        let outcome = AssertUnwindSafe(pipeline)
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                error!(run_id, panic = %message, "Generation pipeline panicked");
                Err(GenerationFailure::Unexpected(message))
            });
        self.finish(run_id, &token, &request, outcome)
    }

    /// Cancel the in-flight run, if any. Returns whether a run was cancelled.
    pub fn cancel(&self) -> bool {
        let mut slot = lock(&self.slot);
        let Some(token) = slot.token.take() else {
            return false;
        };
        token.cancel();

        if !slot.state.status.is_in_flight() {
            return false;
        }
        let run_id = slot.state.run_id;
        slot.state.cancel();
        self.publish(slot);

        info!(run_id, "Run cancelled");
        self.event_logger
            .log(RunEvent::new("run_cancelled", json!({ "run_id": run_id })));
        true
    }

    /// Cancel any in-flight run and return to the idle state.
    pub fn reset(&self) {
        let mut slot = lock(&self.slot);
        if let Some(token) = slot.token.take() {
            token.cancel();
            if slot.state.status.is_in_flight() {
                let run_id = slot.state.run_id;
                self.event_logger
                    .log(RunEvent::new("run_cancelled", json!({ "run_id": run_id })));
            }
        }
        slot.state = OrchestratorRunState::idle();
        self.publish(slot);
        debug!("Orchestrator reset");
    }

    /// Snapshot of the current run state.
    pub fn state(&self) -> OrchestratorRunState {
        lock(&self.slot).state.clone()
    }

    /// Receiver that always holds the latest run state.
    pub fn watch(&self) -> watch::Receiver<OrchestratorRunState> {
        self.state_tx.subscribe()
    }

    /// Register a listener for every published state.
    ///
    /// Listeners are called synchronously, in publication order, and must
    /// not call back into the orchestrator.
    pub fn subscribe(&self, listener: Arc<dyn RunStateListener>) -> SubscriptionId {
        let mut listeners = lock(&self.listeners);
        let id = SubscriptionId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, listener));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.entries.len();
        listeners.entries.retain(|(entry_id, _)| *entry_id != id);
        listeners.entries.len() != before
    }

    // ==================== Pipeline ====================

    async fn execute(
        &self,
        run_id: u64,
        request: &GenerationRequest,
        preferences: Option<&UserPreferences>,
        token: &CancellationToken,
    ) -> Result<GenerationResult, GenerationFailure> {
        let report = self.validator.validate(request);
        if !report.valid {
            return Err(GenerationFailure::Validation(report));
        }
        check_cancelled(token)?;
        self.update(run_id, token, |state| {
            state.advance(RunStatus::Validating, progress::VALIDATED, "Request validated")
        });

        let subject_id = request.subject_id.to_string_lossy();
        self.rate_limiter
            .try_acquire(&subject_id, request.service_type)?;
        self.update(run_id, token, |state| {
            state.advance(
                RunStatus::Validating,
                progress::RATE_LIMIT_CHECKED,
                "Rate limit checked",
            )
        });

        // One attempt is a context build plus a backend call. The context is
        // kept once fetched, so later attempts only repeat the backend call.
        let context_cell = OnceCell::new();
        let cell = &context_cell;
        let observer = RunObserver {
            orchestrator: self,
            run_id,
            token,
        };
        let (mut result, context) = self
            .retry
            .execute(
                move |attempt| self.attempt(run_id, request, preferences, cell, attempt, token),
                &observer,
                token,
            )
            .await?;

        self.update(run_id, token, |state| {
            state.advance(
                state.status,
                progress::INVOKE_FINISHED,
                "Scoring generated content",
            )
        });
        self.scorer.apply(&mut result, context);
        result.validated_at = Some(self.clock.now_millis());

        Ok(result)
    }

    async fn attempt<'a>(
        &'a self,
        run_id: u64,
        request: &'a GenerationRequest,
        preferences: Option<&'a UserPreferences>,
        context_cell: &'a OnceCell<SubjectContext>,
        attempt: u32,
        token: &'a CancellationToken,
    ) -> Result<(GenerationResult, &'a SubjectContext), GenerationFailure> {
        let context = context_cell
            .get_or_try_init(|| self.build_context(run_id, request, token))
            .await?;

        self.update(run_id, token, |state| {
            let step = if attempt == 0 {
                "Generating content".to_string()
            } else {
                format!(
                    "Generating content (attempt {}/{})",
                    attempt + 1,
                    state.max_retries
                )
            };
            state.advance(RunStatus::Invoking, progress::INVOKE_STARTED, step)
        });
        let result = self
            .invoker
            .invoke(request, context, preferences, attempt, token)
            .await?;

        Ok((result, context))
    }

    async fn build_context(
        &self,
        run_id: u64,
        request: &GenerationRequest,
        token: &CancellationToken,
    ) -> Result<SubjectContext, GenerationFailure> {
        self.update(run_id, token, |state| {
            state.advance(
                RunStatus::ContextBuilding,
                progress::CONTEXT_STARTED,
                "Building subject context",
            )
        });
        let subject_id = request.subject_id.to_string_lossy();
        let context = self.assembler.build(&subject_id, token).await?;

        let completeness = context.completeness();
        self.update(run_id, token, |state| {
            state.advance(
                RunStatus::ContextBuilding,
                progress::CONTEXT_BUILT,
                format!("Subject context ready ({}% complete)", completeness),
            )
        });
        Ok(context)
    }

    fn begin_run(&self, request: &GenerationRequest) -> (u64, CancellationToken) {
        let mut slot = lock(&self.slot);
        let mut snapshots = Vec::with_capacity(2);
        let mut superseded = None;

        if let Some(previous) = slot.token.take() {
            previous.cancel();
            if slot.state.status.is_in_flight() {
                superseded = Some(slot.state.run_id);
                slot.state.cancel();
                snapshots.push(slot.state.clone());
            }
        }

        slot.last_run_id += 1;
        let run_id = slot.last_run_id;
        let token = self.parent_token.child_token();
        slot.token = Some(token.clone());
        slot.state = OrchestratorRunState::started(run_id, self.retry.max_attempts());
        snapshots.push(slot.state.clone());
        self.publish_all(slot, snapshots);

        if let Some(previous_id) = superseded {
            info!(run_id = previous_id, "Run superseded by a new request");
            self.event_logger.log(RunEvent::new(
                "run_cancelled",
                json!({ "run_id": previous_id, "reason": "superseded" }),
            ));
        }

        info!(
            run_id,
            request_id = %request.request_id,
            service_type = %request.service_type,
            priority = request.priority.as_str(),
            "Generation run started"
        );
        self.event_logger.log(RunEvent::new(
            "run_started",
            json!({
                "run_id": run_id,
                "request_id": request.request_id.to_string_lossy(),
                "subject_id": request.subject_id.to_string_lossy(),
                "service_type": request.service_type.as_str(),
                "priority": request.priority.as_str(),
            }),
        ));

        (run_id, token)
    }

    fn finish(
        &self,
        run_id: u64,
        token: &CancellationToken,
        request: &GenerationRequest,
        outcome: Result<GenerationResult, GenerationFailure>,
    ) -> Option<GenerationResult> {
        match outcome {
            Ok(result) => {
                let published = self.complete(run_id, token, |state| state.succeed(result.clone()));
                if !published {
                    debug!(run_id, "Discarding result of a cancelled run");
                    return None;
                }

                info!(
                    run_id,
                    quality = result.quality_score,
                    confidence = result.confidence_level,
                    retry_count = result.metadata.retry_count,
                    "Generation run succeeded"
                );
                self.event_logger.log(RunEvent::new(
                    "run_succeeded",
                    json!({
                        "run_id": run_id,
                        "result_id": result.id,
                        "quality_score": result.quality_score,
                        "confidence_level": result.confidence_level,
                        "retry_count": result.metadata.retry_count,
                        "processing_time_ms": result.metadata.processing_time_ms,
                        "total_tokens": result.metadata.total_tokens(),
                    }),
                ));
                Some(result)
            }
            Err(failure) if failure.is_cancelled() || token.is_cancelled() => {
                debug!(run_id, "Run ended by cancellation");
                self.mark_cancelled(run_id);
                None
            }
            Err(failure) => {
                let correlation_id = request.request_id.to_string_lossy();
                let error = self
                    .classifier
                    .classify(&failure, request.service_type, &correlation_id);

                warn!(
                    run_id,
                    code = %error.code,
                    retryable = error.retryable,
                    error = %failure,
                    "Generation run failed"
                );
                let payload = json!({
                    "run_id": run_id,
                    "code": error.code,
                    "message": truncate(&error.message, MAX_LOGGED_MESSAGE),
                    "retryable": error.retryable,
                    "severity": error.severity.as_str(),
                    "diagnostics": error.diagnostics,
                });

                if self.complete(run_id, token, |state| state.fail(error)) {
                    self.event_logger.log(RunEvent::new("run_failed", payload));
                }
                None
            }
        }
    }

    // ==================== State Publication ====================

    /// Apply `apply` to the state of `run_id` and publish it, unless the run
    /// is no longer current or has been cancelled.
    fn update(
        &self,
        run_id: u64,
        token: &CancellationToken,
        apply: impl FnOnce(&mut OrchestratorRunState),
    ) -> bool {
        let mut slot = lock(&self.slot);
        if slot.state.run_id != run_id || token.is_cancelled() || slot.state.is_terminal() {
            return false;
        }
        apply(&mut slot.state);
        self.publish(slot);
        true
    }

    /// Like [`Self::update`] for the final transition; also releases the
    /// run's token.
    fn complete(
        &self,
        run_id: u64,
        token: &CancellationToken,
        apply: impl FnOnce(&mut OrchestratorRunState),
    ) -> bool {
        let mut slot = lock(&self.slot);
        if slot.state.run_id != run_id || token.is_cancelled() || slot.state.is_terminal() {
            return false;
        }
        apply(&mut slot.state);
        slot.token = None;
        self.publish(slot);
        true
    }

    /// Publish `Cancelled` for a run whose token fired without anyone
    /// recording it (a cancelled parent token).
    fn mark_cancelled(&self, run_id: u64) {
        let mut slot = lock(&self.slot);
        if slot.state.run_id != run_id || !slot.state.status.is_in_flight() {
            return;
        }
        slot.state.cancel();
        slot.token = None;
        self.publish(slot);

        info!(run_id, "Run cancelled");
        self.event_logger
            .log(RunEvent::new("run_cancelled", json!({ "run_id": run_id })));
    }

    fn publish(&self, slot: MutexGuard<'_, RunSlot>) {
        let snapshot = slot.state.clone();
        self.publish_all(slot, vec![snapshot]);
    }

    fn publish_all(&self, slot: MutexGuard<'_, RunSlot>, snapshots: Vec<OrchestratorRunState>) {
        for snapshot in &snapshots {
            self.state_tx.send_replace(snapshot.clone());
        }

        // Take the notify lock before releasing the slot so listeners see
        // states in the order they were written.
        let _notify = lock(&self.notify);
        drop(slot);

        let listeners: Vec<Arc<dyn RunStateListener>> = lock(&self.listeners)
            .entries
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for snapshot in &snapshots {
            for listener in &listeners {
                listener.on_state_change(snapshot);
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panic: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panic: {}", message)
    } else {
        "panic with a non-string payload".to_string()
    }
}

/// Feeds retry progress into the run state
struct RunObserver<'a> {
    orchestrator: &'a Orchestrator,
    run_id: u64,
    token: &'a CancellationToken,
}

impl RetryObserver for RunObserver<'_> {
    fn on_attempt(&self, attempt: u32, max_attempts: u32) {
        self.orchestrator.update(self.run_id, self.token, |state| {
            state.max_retries = max_attempts;
            state.retry_count = attempt;
            if attempt > 0 {
                // Spread retries across the invoking band.
                let span = u32::from(progress::INVOKE_FINISHED - progress::INVOKE_STARTED);
                let step = (span * attempt / max_attempts.max(1)) as u8;
                state.advance(
                    RunStatus::Retrying,
                    progress::INVOKE_STARTED + step,
                    format!("Retrying ({}/{})", attempt, max_attempts),
                );
            }
        });
    }

    fn on_attempt_failed(&self, attempt: u32, error: &GenerationFailure, delay: Duration) {
        self.orchestrator.event_logger.log(RunEvent::new(
            "attempt_failed",
            json!({
                "run_id": self.run_id,
                "attempt": attempt,
                "error": error.to_string(),
                "retryable": error.is_retryable(),
                "delay_ms": delay.as_millis() as u64,
            }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::ManualClock;
    use crate::ports::generation_backend::BackendError;
    use crate::ports::subject_data::ProviderError;
    use crate::use_cases::testing::{
        RecordingListener, ScriptedBackend, StaticProvider, Step, output, sample_context,
    };
    use forge_domain::{ErrorKind, ServiceType, SubjectContext};
    use tokio::time::Instant;

    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl RecordingLogger {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
            }
        }

        fn events(&self) -> Vec<&'static str> {
            lock(&self.events).clone()
        }
    }

    impl RunEventLogger for RecordingLogger {
        fn log(&self, event: RunEvent) {
            lock(&self.events).push(event.event_type);
        }
    }

    struct Harness {
        orchestrator: Arc<Orchestrator>,
        backend: Arc<ScriptedBackend>,
        provider: Arc<StaticProvider>,
        store: Arc<InMemoryCounterStore>,
        listener: Arc<RecordingListener>,
        logger: Arc<RecordingLogger>,
    }

    fn harness_with(
        steps: Vec<Step>,
        provider: StaticProvider,
        config: OrchestratorConfig,
    ) -> Harness {
        let backend = Arc::new(ScriptedBackend::new(steps));
        let provider = Arc::new(provider);
        let store = Arc::new(InMemoryCounterStore::new());
        let listener = Arc::new(RecordingListener::default());
        let logger = Arc::new(RecordingLogger::new());

        let orchestrator = Orchestrator::builder(backend.clone(), provider.clone())
            .config(config)
            .counter_store(store.clone())
            .clock(Arc::new(ManualClock::new(1_000)))
            .event_logger(logger.clone())
            .build();
        orchestrator.subscribe(listener.clone());

        Harness {
            orchestrator: Arc::new(orchestrator),
            backend,
            provider,
            store,
            listener,
            logger,
        }
    }

    fn harness(steps: Vec<Step>) -> Harness {
        harness_with(
            steps,
            StaticProvider::new(sample_context()),
            OrchestratorConfig::default(),
        )
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("ignored", ServiceType::LessonPlan).with_request_id("req-1")
    }

    fn long_content() -> String {
        "Structured lesson plan. ".repeat(20)
    }

    async fn wait_for_status(
        rx: &mut watch::Receiver<OrchestratorRunState>,
        run_id: u64,
        status: RunStatus,
    ) {
        loop {
            {
                let state = rx.borrow_and_update();
                if state.run_id == run_id && state.status == status {
                    return;
                }
            }
            rx.changed().await.expect("orchestrator dropped");
        }
    }

    #[tokio::test]
    async fn test_successful_run() {
        let h = harness(vec![Step::Reply(output(&long_content()))]);

        let result = h
            .orchestrator
            .run("s-1", request(), None)
            .await
            .expect("run succeeds");

        assert_eq!(result.subject_id, "s-1");
        assert_eq!(result.metadata.retry_count, 0);
        assert_eq!(result.quality_score, 100);
        assert_eq!(result.confidence_level, 100);
        assert_eq!(result.validated_at, Some(1_000));

        let state = h.orchestrator.state();
        assert_eq!(state.status, RunStatus::Success);
        assert_eq!(state.progress, 100);
        assert_eq!(state.result.as_ref(), Some(&result));
        assert!(state.error.is_none());
        assert_eq!(h.logger.events(), vec!["run_started", "run_succeeded"]);
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_ends_at_100() {
        let h = harness(vec![Step::Reply(output("content"))]);
        h.orchestrator.run("s-1", request(), None).await;

        let states = h.listener.states();
        let progress: Vec<u8> = states.iter().map(|s| s.progress).collect();
        assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{:?}", progress);
        assert_eq!(progress.last(), Some(&100));

        let statuses: Vec<RunStatus> = states.iter().map(|s| s.status).collect();
        assert_eq!(statuses.first(), Some(&RunStatus::Validating));
        assert!(statuses.contains(&RunStatus::ContextBuilding));
        assert!(statuses.contains(&RunStatus::Invoking));
        assert_eq!(statuses.last(), Some(&RunStatus::Success));
    }

    #[tokio::test]
    async fn test_validation_failure_consumes_no_rate_limit_token() {
        let h = harness(vec![]);
        let result = h.orchestrator.run("   ", request(), None).await;

        assert!(result.is_none());
        let state = h.orchestrator.state();
        assert_eq!(state.status, RunStatus::Error);
        let error = state.error.expect("classified error");
        assert_eq!(error.kind, ErrorKind::ValidationFailed);
        assert!(!error.retryable);

        assert_eq!(h.backend.calls(), 0);
        assert_eq!(h.provider.calls(), 0);
        assert!(
            h.store
                .read(&forge_domain::rate_limit_key("   ", ServiceType::LessonPlan))
                .is_empty()
        );
        assert_eq!(h.logger.events(), vec!["run_started", "run_failed"]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_rejected() {
        let h = harness(vec![]);
        let subject = RequestText::from_utf16(&[0x0073, 0xDC00]);
        h.orchestrator.run(subject, request(), None).await;

        let error = h.orchestrator.state().error.expect("classified error");
        assert_eq!(error.kind, ErrorKind::Utf8EncodingError);
        assert_eq!(h.backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_rate_limit_denial() {
        let h = harness_with(
            vec![],
            StaticProvider::new(sample_context()),
            OrchestratorConfig::default().with_rate_limit(60_000, 1),
        );

        assert!(h.orchestrator.run("s-1", request(), None).await.is_some());
        assert!(h.orchestrator.run("s-1", request(), None).await.is_none());

        let error = h.orchestrator.state().error.expect("classified error");
        assert_eq!(error.kind, ErrorKind::RateLimitExceeded);
        assert!(error.retryable);
        let snapshot = error.diagnostics.rate_limit.expect("snapshot");
        assert_eq!(snapshot.request_count, 1);
        assert_eq!(snapshot.limit, 1);
        assert_eq!(h.backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_backend_panic_is_classified_as_unknown() {
        let h = harness(vec![Step::Panic("backend exploded")]);

        assert!(h.orchestrator.run("s-1", request(), None).await.is_none());

        let state = h.orchestrator.state();
        assert_eq!(state.status, RunStatus::Error);
        let error = state.error.expect("classified error");
        assert_eq!(error.kind, ErrorKind::UnknownError);
        assert_eq!(error.code, "UNKNOWN_ERROR");
        assert!(error.retryable);
        assert_eq!(
            error.diagnostics.cause.as_deref(),
            Some("Unexpected error: panic: backend exploded")
        );
        assert_eq!(h.logger.events(), vec!["run_started", "run_failed"]);

        // The orchestrator stays usable after a panicking run.
        assert!(h.orchestrator.run("s-1", request(), None).await.is_some());
        assert_eq!(h.orchestrator.state().status, RunStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_context_failure_is_retried() {
        let h = harness_with(
            vec![],
            StaticProvider::failing(ProviderError::NotFound("s-1".to_string())),
            OrchestratorConfig::default(),
        );

        assert!(h.orchestrator.run("s-1", request(), None).await.is_none());
        let error = h.orchestrator.state().error.expect("classified error");
        assert_eq!(error.kind, ErrorKind::MaxRetriesExceeded);
        assert!(!error.retryable);
        assert_eq!(h.provider.calls(), 3);
        assert_eq!(h.backend.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_then_succeeds() {
        let h = harness(vec![
            Step::Fail(BackendError::network("reset")),
            Step::Fail(BackendError::network("reset")),
            Step::Reply(output("third time lucky")),
        ]);
        let started = Instant::now();

        let result = h
            .orchestrator
            .run("s-1", request(), None)
            .await
            .expect("third attempt succeeds");

        assert_eq!(result.metadata.retry_count, 2);
        assert_eq!(h.backend.calls(), 3);
        assert_eq!(h.provider.calls(), 1);
        assert_eq!(started.elapsed(), Duration::from_millis(3_000));

        let states = h.listener.states();
        assert!(
            states
                .iter()
                .any(|s| s.status == RunStatus::Retrying && s.retry_count == 2
                    && s.current_step == "Retrying (2/3)")
        );
        assert_eq!(
            h.logger.events(),
            vec!["run_started", "attempt_failed", "attempt_failed", "run_succeeded"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries() {
        let h = harness(vec![
            Step::Fail(BackendError::network("reset")),
            Step::Fail(BackendError::internal("overloaded")),
            Step::Fail(BackendError::network("reset")),
        ]);

        assert!(h.orchestrator.run("s-1", request(), None).await.is_none());

        let state = h.orchestrator.state();
        assert_eq!(state.status, RunStatus::Error);
        assert_eq!(state.retry_count, 2);
        let error = state.error.expect("classified error");
        assert_eq!(error.kind, ErrorKind::MaxRetriesExceeded);
        assert!(!error.retryable);
        assert_eq!(error.diagnostics.retry_count, Some(3));
        assert_eq!(h.backend.calls(), 3);
    }

    #[tokio::test]
    async fn test_permanent_backend_error_is_not_retried() {
        let h = harness(vec![Step::Fail(BackendError::rejected("content policy"))]);

        assert!(h.orchestrator.run("s-1", request(), None).await.is_none());
        let error = h.orchestrator.state().error.expect("classified error");
        assert_eq!(error.kind, ErrorKind::BackendError);
        assert!(!error.retryable);
        assert_eq!(h.backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_cancel_in_flight_run() {
        let h = harness(vec![Step::Hang]);
        let mut rx = h.orchestrator.watch();

        let orchestrator = h.orchestrator.clone();
        let handle = tokio::spawn(async move { orchestrator.run("s-1", request(), None).await });

        wait_for_status(&mut rx, 1, RunStatus::Invoking).await;
        assert!(h.orchestrator.cancel());

        let result = handle.await.expect("run task");
        assert!(result.is_none());

        let state = h.orchestrator.state();
        assert_eq!(state.status, RunStatus::Cancelled);
        assert!(state.error.is_none());
        assert_eq!(
            h.listener.states().last().map(|s| s.status),
            Some(RunStatus::Cancelled)
        );
        assert_eq!(h.logger.events(), vec!["run_started", "run_cancelled"]);
        assert!(!h.orchestrator.cancel());
    }

    #[tokio::test]
    async fn test_new_run_cancels_previous() {
        let h = harness(vec![Step::Hang, Step::Reply(output("second run"))]);
        let mut rx = h.orchestrator.watch();

        let orchestrator = h.orchestrator.clone();
        let first = tokio::spawn(async move { orchestrator.run("s-1", request(), None).await });
        wait_for_status(&mut rx, 1, RunStatus::Invoking).await;

        let second = h.orchestrator.run("s-1", request(), None).await;
        assert_eq!(
            second.and_then(|r| r.content).as_deref(),
            Some("second run")
        );
        assert!(first.await.expect("first run task").is_none());

        let states = h.listener.states();
        let cancelled_at = states
            .iter()
            .position(|s| s.run_id == 1 && s.status == RunStatus::Cancelled)
            .expect("first run observed as cancelled");
        assert!(states[cancelled_at + 1..].iter().all(|s| s.run_id == 2));

        let state = h.orchestrator.state();
        assert_eq!(state.run_id, 2);
        assert_eq!(state.status, RunStatus::Success);
    }

    #[tokio::test]
    async fn test_parent_token_cancels_run() {
        let backend = Arc::new(ScriptedBackend::new(vec![Step::Hang]));
        let parent = CancellationToken::new();
        let orchestrator = Arc::new(
            Orchestrator::builder(
                backend,
                Arc::new(StaticProvider::new(SubjectContext::default())),
            )
            .cancellation_token(parent.clone())
            .build(),
        );
        let mut rx = orchestrator.watch();

        let runner = orchestrator.clone();
        let handle = tokio::spawn(async move { runner.run("s-1", request(), None).await });
        wait_for_status(&mut rx, 1, RunStatus::Invoking).await;

        parent.cancel();
        assert!(handle.await.expect("run task").is_none());
        assert_eq!(orchestrator.state().status, RunStatus::Cancelled);
        assert!(!orchestrator.cancel());
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let h = harness(vec![Step::Fail(BackendError::rejected("no"))]);
        h.orchestrator.run("s-1", request(), None).await;
        assert_eq!(h.orchestrator.state().status, RunStatus::Error);

        h.orchestrator.reset();
        let state = h.orchestrator.state();
        assert_eq!(state.status, RunStatus::Idle);
        assert_eq!(state.progress, 0);
        assert!(state.error.is_none());
        assert_eq!(h.orchestrator.watch().borrow().status, RunStatus::Idle);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_notifications() {
        let h = harness(vec![]);
        let extra = Arc::new(RecordingListener::default());
        let id = h.orchestrator.subscribe(extra.clone());
        assert!(h.orchestrator.unsubscribe(id));
        assert!(!h.orchestrator.unsubscribe(id));

        h.orchestrator.run("s-1", request(), None).await;
        assert!(extra.states().is_empty());
        assert!(!h.listener.states().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_subject_overrides_request() {
        let h = harness(vec![]);
        let request = GenerationRequest::new("from-request", ServiceType::Assessment);

        let result = h
            .orchestrator
            .run("from-caller", request, None)
            .await
            .expect("run succeeds");
        assert_eq!(result.subject_id, "from-caller");
        assert_eq!(
            h.store
                .read(&forge_domain::rate_limit_key("from-caller", ServiceType::Assessment))
                .len(),
            1
        );
    }
}
