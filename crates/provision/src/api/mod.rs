//! Port traits for the remote provisioning and identity APIs
//!
//! Concrete cloud clients implement these traits outside this crate. The
//! trait contracts encode the idempotency boundaries the manager relies
//! on: "already exists", "no changes", and "not found" are signalled as
//! typed outcomes, not errors, so callers never sniff error strings.

mod memory;

pub use memory::{InMemoryIdentityApi, InMemoryStackApi};

use async_trait::async_trait;
use indexmap::IndexMap;
use strata_core::{Capability, Result, StackEvent, StackName, StackStatus};

/// Request to create a stack from a serialized resource document.
///
/// `client_token` makes the call safe to repeat after a transient network
/// failure; the remote API deduplicates on it. `signature` is the content
/// signature of the document, recorded remotely so a later create of the
/// same name can be recognised as a no-op.
#[derive(Debug, Clone)]
pub struct CreateStackRequest {
    pub name: StackName,
    pub body: String,
    pub signature: String,
    pub capabilities: Vec<Capability>,
    pub client_token: String,
}

/// Request to update an existing stack in place.
#[derive(Debug, Clone)]
pub struct UpdateStackRequest {
    pub name: StackName,
    pub body: String,
    pub signature: String,
    pub capabilities: Vec<Capability>,
    pub client_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Provisioning started; poll the stack to a terminal status
    Created,
    /// A stack with this name already exists; the caller decides whether
    /// that is a no-op or a conflict
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The update started; poll the stack to a terminal status
    Updating,
    /// The submitted document matches the deployed one; nothing to do
    NoChanges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Deletion started; poll the stack until it is gone
    Deleting,
    /// No stack with this name exists; delete is idempotent
    NotFound,
}

/// Snapshot of a stack as reported by a describe call.
#[derive(Debug, Clone)]
pub struct StackDetail {
    pub name: StackName,
    pub status: StackStatus,
    pub signature: Option<String>,
    pub outputs: IndexMap<String, String>,
}

/// The stack-based provisioning API.
///
/// Safe for concurrent operations on distinct stack names; concurrent
/// operations on the same name are the caller's responsibility to avoid.
#[async_trait]
pub trait StackApi: Send + Sync {
    async fn create_stack(&self, request: CreateStackRequest) -> Result<CreateOutcome>;

    async fn update_stack(&self, request: UpdateStackRequest) -> Result<UpdateOutcome>;

    async fn delete_stack(&self, name: &StackName, client_token: &str) -> Result<DeleteOutcome>;

    /// `None` means no stack with this name exists.
    async fn describe_stack(&self, name: &StackName) -> Result<Option<StackDetail>>;

    /// Events in chronological order, oldest first.
    async fn describe_events(&self, name: &StackName) -> Result<Vec<StackEvent>>;
}

/// Direct single-resource identity API, wrapped as leaf tasks identically
/// to stack operations.
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Delete a role binding. Idempotent: deleting an absent binding
    /// succeeds.
    async fn delete_role_binding(&self, name: &str) -> Result<()>;
}
