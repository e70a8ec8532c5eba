//! In-memory adapter for the provisioning and identity ports
//!
//! Used by the test suite (scripted status sequences, injected transient
//! failures) and by the CLI's local mode, where stacks "provision"
//! instantly. Status transitions are modelled as a queue drained one entry
//! per describe call, which is how the tests simulate an eventually
//! consistent remote side.

use super::{
    CreateOutcome, CreateStackRequest, DeleteOutcome, IdentityApi, StackApi, StackDetail,
    UpdateOutcome, UpdateStackRequest,
};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use strata_core::{Error, Result, StackEvent, StackName, StackStatus};

struct StackRecord {
    status: StackStatus,
    pending: VecDeque<StackStatus>,
    signature: Option<String>,
    outputs: IndexMap<String, String>,
}

#[derive(Default)]
struct State {
    stacks: HashMap<StackName, StackRecord>,
    scripts: HashMap<StackName, VecDeque<StackStatus>>,
    events: HashMap<StackName, Vec<StackEvent>>,
    transient_describe_failures: usize,
    describe_calls: usize,
}

/// In-memory [`StackApi`] implementation.
#[derive(Default)]
pub struct InMemoryStackApi {
    state: Mutex<State>,
}

impl InMemoryStackApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the statuses successive describe calls will observe for a
    /// stack after its next create/update/delete call. Unscripted stacks
    /// jump straight to the matching *Complete status.
    pub fn script_statuses(&self, name: impl Into<StackName>, statuses: Vec<StackStatus>) {
        let mut state = self.lock();
        state.scripts.insert(name.into(), statuses.into());
    }

    /// Append entries to a stack's event stream.
    pub fn push_events(&self, name: impl Into<StackName>, events: Vec<StackEvent>) {
        let mut state = self.lock();
        state.events.entry(name.into()).or_default().extend(events);
    }

    /// Make the next `count` describe calls fail with a throttling error.
    pub fn inject_transient_describe_failures(&self, count: usize) {
        self.lock().transient_describe_failures = count;
    }

    /// Pre-populate a stack, bypassing the create flow.
    pub fn seed_stack(&self, detail: StackDetail) {
        let mut state = self.lock();
        state.stacks.insert(
            detail.name,
            StackRecord {
                status: detail.status,
                pending: VecDeque::new(),
                signature: detail.signature,
                outputs: detail.outputs,
            },
        );
    }

    /// Number of describe calls served so far.
    #[must_use]
    pub fn describe_calls(&self) -> usize {
        self.lock().describe_calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Pull the string-valued entries out of a document's top-level
/// `outputs` object, so local-mode stacks expose outputs.
fn outputs_from_body(body: &str) -> IndexMap<String, String> {
    let Ok(document) = serde_json::from_str::<serde_json::Value>(body) else {
        return IndexMap::new();
    };
    let Some(outputs) = document.get("outputs").and_then(|v| v.as_object()) else {
        return IndexMap::new();
    };
    outputs
        .iter()
        .filter_map(|(key, value)| Some((key.clone(), value.as_str()?.to_owned())))
        .collect()
}

#[async_trait]
impl StackApi for InMemoryStackApi {
    async fn create_stack(&self, request: CreateStackRequest) -> Result<CreateOutcome> {
        let mut state = self.lock();
        if state.stacks.contains_key(&request.name) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        let pending = state
            .scripts
            .remove(&request.name)
            .unwrap_or_else(|| VecDeque::from([StackStatus::CreateComplete]));
        state.stacks.insert(
            request.name,
            StackRecord {
                status: StackStatus::CreateInProgress,
                pending,
                signature: Some(request.signature),
                outputs: outputs_from_body(&request.body),
            },
        );
        Ok(CreateOutcome::Created)
    }

    async fn update_stack(&self, request: UpdateStackRequest) -> Result<UpdateOutcome> {
        let mut state = self.lock();
        let pending = state
            .scripts
            .remove(&request.name)
            .unwrap_or_else(|| VecDeque::from([StackStatus::UpdateComplete]));
        let Some(record) = state.stacks.get_mut(&request.name) else {
            return Err(Error::conflict(request.name, "no such stack"));
        };
        if record.signature.as_deref() == Some(request.signature.as_str()) {
            return Ok(UpdateOutcome::NoChanges);
        }
        record.status = StackStatus::UpdateInProgress;
        record.pending = pending;
        record.signature = Some(request.signature);
        record.outputs = outputs_from_body(&request.body);
        Ok(UpdateOutcome::Updating)
    }

    async fn delete_stack(&self, name: &StackName, _client_token: &str) -> Result<DeleteOutcome> {
        let mut state = self.lock();
        let pending = state
            .scripts
            .remove(name)
            .unwrap_or_else(|| VecDeque::from([StackStatus::DeleteComplete]));
        let Some(record) = state.stacks.get_mut(name) else {
            return Ok(DeleteOutcome::NotFound);
        };
        record.status = StackStatus::DeleteInProgress;
        record.pending = pending;
        Ok(DeleteOutcome::Deleting)
    }

    async fn describe_stack(&self, name: &StackName) -> Result<Option<StackDetail>> {
        let mut state = self.lock();
        state.describe_calls += 1;
        if state.transient_describe_failures > 0 {
            state.transient_describe_failures -= 1;
            return Err(Error::unavailable("describe_stack", "rate exceeded", 1));
        }
        let Some(record) = state.stacks.get_mut(name) else {
            return Ok(None);
        };
        if let Some(next) = record.pending.pop_front() {
            record.status = next;
        }
        let detail = StackDetail {
            name: name.clone(),
            status: record.status,
            signature: record.signature.clone(),
            outputs: record.outputs.clone(),
        };
        // A fully deleted stack disappears from subsequent describes
        if record.status == StackStatus::DeleteComplete && record.pending.is_empty() {
            state.stacks.remove(name);
        }
        Ok(Some(detail))
    }

    async fn describe_events(&self, name: &StackName) -> Result<Vec<StackEvent>> {
        Ok(self.lock().events.get(name).cloned().unwrap_or_default())
    }
}

/// In-memory [`IdentityApi`] implementation.
#[derive(Default)]
pub struct InMemoryIdentityApi {
    bindings: Mutex<HashSet<String>>,
}

impl InMemoryIdentityApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_role_binding(&self, name: impl Into<String>) {
        self.lock().insert(name.into());
    }

    #[must_use]
    pub fn has_role_binding(&self, name: &str) -> bool {
        self.lock().contains(name)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.bindings
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl IdentityApi for InMemoryIdentityApi {
    async fn delete_role_binding(&self, name: &str) -> Result<()> {
        self.lock().remove(name);
        Ok(())
    }
}
