//! Stack lifecycle manager
//!
//! Each operation returns an engine [`Task`] so the orchestration driver
//! can place stack work and direct API work in the same tree. Every
//! operation is idempotent at the "already in the desired terminal state"
//! boundary.

use crate::api::{CreateOutcome, CreateStackRequest, DeleteOutcome, StackApi, UpdateOutcome, UpdateStackRequest};
use crate::events::failure_reasons;
use crate::poller::{poll, retry_transient, PollConfig};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use strata_core::{
    Capability, Error, Result, StackDescriptor, StackName, StackStatus,
    DEFAULT_API_RETRY_ATTEMPTS, DEFAULT_API_RETRY_DELAY_MS,
};
use strata_engine::Task;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Creates, updates, and deletes stacks against the provisioning port,
/// polling each operation to a terminal status.
#[derive(Clone)]
pub struct StackManager {
    api: Arc<dyn StackApi>,
    granted: BTreeSet<Capability>,
    poll: PollConfig,
}

impl StackManager {
    pub fn new(
        api: Arc<dyn StackApi>,
        granted: impl IntoIterator<Item = Capability>,
        poll: PollConfig,
    ) -> Self {
        Self {
            api,
            granted: granted.into_iter().collect(),
            poll,
        }
    }

    /// Task that provisions `descriptor` and waits for CREATE_COMPLETE.
    ///
    /// Fails fast, before any network call, if the descriptor requires a
    /// capability the caller's credentials do not grant. An existing stack
    /// with a matching content signature in a *Complete state is success;
    /// any other existing state is a conflict requiring caller action.
    #[must_use]
    pub fn create_stack(&self, descriptor: StackDescriptor) -> Task {
        let manager = self.clone();
        let description = format!("create stack \"{}\"", descriptor.name);
        Task::new(description, move |cancel| async move {
            manager.do_create(descriptor, cancel).await
        })
    }

    /// Task that updates an existing stack in place. "No changes" from
    /// the remote side is success.
    #[must_use]
    pub fn update_stack(&self, descriptor: StackDescriptor) -> Task {
        let manager = self.clone();
        let description = format!("update stack \"{}\"", descriptor.name);
        Task::new(description, move |cancel| async move {
            manager.do_update(descriptor, cancel).await
        })
    }

    /// Task that deletes a stack and waits for it to be gone. Deleting an
    /// absent stack is success.
    #[must_use]
    pub fn delete_stack(&self, name: StackName) -> Task {
        let manager = self.clone();
        let description = format!("delete stack \"{name}\"");
        Task::new(description, move |cancel| async move {
            manager.do_delete(name, cancel).await
        })
    }

    /// Read a *Complete stack's named outputs.
    pub async fn fetch_outputs(&self, name: &StackName) -> Result<IndexMap<String, String>> {
        let detail = self
            .api
            .describe_stack(name)
            .await?
            .ok_or_else(|| Error::conflict(name.clone(), "stack not found"))?;
        if !detail.status.is_complete() {
            return Err(Error::conflict(
                name.clone(),
                format!("outputs unavailable while stack is {}", detail.status),
            ));
        }
        Ok(detail.outputs)
    }

    fn ensure_capabilities(&self, descriptor: &StackDescriptor) -> Result<()> {
        let missing: Vec<String> = descriptor
            .capabilities
            .iter()
            .filter(|capability| !self.granted.contains(*capability))
            .map(ToString::to_string)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(format!(
                "stack '{}' requires capabilities not granted to the caller: {}",
                descriptor.name,
                missing.join(", ")
            )))
        }
    }

    async fn do_create(self, descriptor: StackDescriptor, cancel: CancellationToken) -> Result<()> {
        self.ensure_capabilities(&descriptor)?;
        let name = descriptor.name.clone();
        let signature = descriptor.signature()?;
        let request = CreateStackRequest {
            name: name.clone(),
            body: descriptor.body()?,
            signature: signature.clone(),
            capabilities: descriptor.capabilities.clone(),
            client_token: Uuid::new_v4().to_string(),
        };

        let api = Arc::clone(&self.api);
        let outcome = retry_transient(
            "create_stack",
            DEFAULT_API_RETRY_ATTEMPTS,
            api_retry_delay(),
            &cancel,
            move || {
                let api = Arc::clone(&api);
                let request = request.clone();
                async move { api.create_stack(request).await }
            },
        )
        .await?;

        if outcome == CreateOutcome::AlreadyExists {
            let detail = self.api.describe_stack(&name).await?.ok_or_else(|| {
                Error::conflict(name.clone(), "reported as existing but cannot be described")
            })?;
            return if detail.status.is_complete()
                && detail.signature.as_deref() == Some(signature.as_str())
            {
                tracing::info!(stack = %name, "stack already exists with matching content");
                Ok(())
            } else {
                Err(Error::conflict(
                    name,
                    format!(
                        "already exists in status {} with a different resource document",
                        detail.status
                    ),
                ))
            };
        }

        tracing::info!(stack = %name, "waiting for stack creation");
        match self.wait_for_terminal("create_stack", &name, &cancel).await? {
            StackStatus::CreateComplete => {
                tracing::info!(stack = %name, "stack created");
                Ok(())
            }
            StackStatus::NotFound => Err(Error::conflict(
                name,
                "stack disappeared while waiting for creation",
            )),
            status => Err(self.remote_failure(&name, status).await),
        }
    }

    async fn do_update(self, descriptor: StackDescriptor, cancel: CancellationToken) -> Result<()> {
        self.ensure_capabilities(&descriptor)?;
        let name = descriptor.name.clone();
        let request = UpdateStackRequest {
            name: name.clone(),
            body: descriptor.body()?,
            signature: descriptor.signature()?,
            capabilities: descriptor.capabilities.clone(),
            client_token: Uuid::new_v4().to_string(),
        };

        let api = Arc::clone(&self.api);
        let outcome = retry_transient(
            "update_stack",
            DEFAULT_API_RETRY_ATTEMPTS,
            api_retry_delay(),
            &cancel,
            move || {
                let api = Arc::clone(&api);
                let request = request.clone();
                async move { api.update_stack(request).await }
            },
        )
        .await?;

        if outcome == UpdateOutcome::NoChanges {
            tracing::info!(stack = %name, "no changes to perform");
            return Ok(());
        }

        tracing::info!(stack = %name, "waiting for stack update");
        match self.wait_for_terminal("update_stack", &name, &cancel).await? {
            StackStatus::UpdateComplete => {
                tracing::info!(stack = %name, "stack updated");
                Ok(())
            }
            StackStatus::NotFound => Err(Error::conflict(
                name,
                "stack disappeared while waiting for update",
            )),
            status => Err(self.remote_failure(&name, status).await),
        }
    }

    async fn do_delete(self, name: StackName, cancel: CancellationToken) -> Result<()> {
        let token = Uuid::new_v4().to_string();
        let api = Arc::clone(&self.api);
        let delete_name = name.clone();
        let outcome = retry_transient(
            "delete_stack",
            DEFAULT_API_RETRY_ATTEMPTS,
            api_retry_delay(),
            &cancel,
            move || {
                let api = Arc::clone(&api);
                let name = delete_name.clone();
                let token = token.clone();
                async move { api.delete_stack(&name, &token).await }
            },
        )
        .await?;

        if outcome == DeleteOutcome::NotFound {
            tracing::info!(stack = %name, "stack already deleted");
            return Ok(());
        }

        tracing::info!(stack = %name, "waiting for stack deletion");
        match self.wait_for_terminal("delete_stack", &name, &cancel).await? {
            StackStatus::DeleteComplete | StackStatus::NotFound => {
                tracing::info!(stack = %name, "stack deleted");
                Ok(())
            }
            status => Err(self.remote_failure(&name, status).await),
        }
    }

    /// Poll describe until the stack reaches a terminal status or
    /// disappears.
    async fn wait_for_terminal(
        &self,
        operation: &str,
        name: &StackName,
        cancel: &CancellationToken,
    ) -> Result<StackStatus> {
        let api = Arc::clone(&self.api);
        let stack = name.clone();
        poll(
            operation,
            &self.poll,
            cancel,
            move || {
                let api = Arc::clone(&api);
                let stack = stack.clone();
                async move {
                    Ok(match api.describe_stack(&stack).await? {
                        Some(detail) => detail.status,
                        None => StackStatus::NotFound,
                    })
                }
            },
            |status: &StackStatus| status.is_terminal() || *status == StackStatus::NotFound,
        )
        .await
    }

    /// Build the remote failure for a terminal failed status, enriched
    /// with the per-resource reasons from the event stream.
    async fn remote_failure(&self, name: &StackName, status: StackStatus) -> Error {
        let reasons = match self.api.describe_events(name).await {
            Ok(events) => failure_reasons(&events),
            Err(error) => {
                tracing::warn!(stack = %name, %error, "could not fetch events for diagnostics");
                Vec::new()
            }
        };
        Error::remote(name.clone(), status, reasons)
    }
}

fn api_retry_delay() -> Duration {
    Duration::from_millis(DEFAULT_API_RETRY_DELAY_MS)
}
