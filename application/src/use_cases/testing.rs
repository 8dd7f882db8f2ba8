//! Scripted port doubles shared by the use case tests.

use crate::ports::generation_backend::{BackendError, BackendOutput, GenerationBackend};
use crate::ports::state_listener::RunStateListener;
use crate::ports::subject_data::{ProviderError, SubjectDataProvider};
use crate::use_cases::shared::lock;
use async_trait::async_trait;
use forge_domain::{
    ContextUsageInfo, GenerationRequest, OrchestratorRunState, SubjectContext, TokenUsage,
    UserPreferences,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

pub(crate) fn sample_context() -> SubjectContext {
    let mut context = SubjectContext::default();
    context.profile.id = "s-1".to_string();
    context.profile.name = "Test Student".to_string();
    context
        .current_levels
        .insert("reading".to_string(), "grade 2".to_string());
    context.support_needs.push("visual schedule".to_string());
    context
}

pub(crate) fn output(content: &str) -> BackendOutput {
    BackendOutput {
        content: content.to_string(),
        model: "scripted-model".to_string(),
        temperature: 0.7,
        max_tokens: 2000,
        tokens: TokenUsage::new(120, 480),
        context_usage: ContextUsageInfo {
            data_sources_used: vec!["profile".to_string()],
            individualized_elements: vec!["pace".to_string()],
            ..Default::default()
        },
        warnings: Vec::new(),
    }
}

/// One scripted backend reaction
pub(crate) enum Step {
    Reply(BackendOutput),
    Fail(BackendError),
    /// Reply after a delay
    Slow(Duration, BackendOutput),
    /// Never complete
    Hang,
    /// Panic inside the backend call
    Panic(&'static str),
}

/// Backend that replays a script, one step per call.
///
/// When the script runs out the last reply is a generic success.
pub(crate) struct ScriptedBackend {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicU32,
}

impl ScriptedBackend {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: AtomicU32::new(0),
        }
    }

    pub(crate) fn replying(content: &str) -> Self {
        Self::new(vec![Step::Reply(output(content))])
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        _request: &GenerationRequest,
        _context: &SubjectContext,
        _preferences: Option<&UserPreferences>,
    ) -> Result<BackendOutput, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = lock(&self.steps).pop_front();
        match step {
            Some(Step::Reply(out)) => Ok(out),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Slow(delay, out)) => {
                tokio::time::sleep(delay).await;
                Ok(out)
            }
            Some(Step::Hang) => std::future::pending::<Result<BackendOutput, BackendError>>().await,
            Some(Step::Panic(message)) => panic!("{}", message),
            None => Ok(output("default scripted content")),
        }
    }
}

/// Provider returning a fixed context or a fixed error
pub(crate) struct StaticProvider {
    result: Result<SubjectContext, ProviderError>,
    calls: AtomicU32,
}

impl StaticProvider {
    pub(crate) fn new(context: SubjectContext) -> Self {
        Self {
            result: Ok(context),
            calls: AtomicU32::new(0),
        }
    }

    pub(crate) fn failing(error: ProviderError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicU32::new(0),
        }
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubjectDataProvider for StaticProvider {
    async fn fetch(&self, _subject_id: &str) -> Result<SubjectContext, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Listener that keeps every snapshot it sees
#[derive(Default)]
pub(crate) struct RecordingListener {
    states: Mutex<Vec<OrchestratorRunState>>,
}

impl RecordingListener {
    pub(crate) fn states(&self) -> Vec<OrchestratorRunState> {
        lock(&self.states).clone()
    }
}

impl RunStateListener for RecordingListener {
    fn on_state_change(&self, state: &OrchestratorRunState) {
        lock(&self.states).push(state.clone());
    }
}
