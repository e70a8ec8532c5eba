//! Stack lifecycle management against a remote provisioning API.
//!
//! The [`StackManager`] turns stack create/update/delete requests into
//! engine [`Task`](strata_engine::Task)s: each issues the remote call,
//! polls the eventually-consistent status to a terminal outcome, and
//! classifies failures with the per-resource reasons extracted from the
//! API's event stream.
//!
//! The remote API itself is a port ([`StackApi`]); concrete cloud clients
//! live outside this crate. An in-memory adapter ships for tests and the
//! CLI's local mode.

pub mod api;
mod events;
mod manager;
mod poller;

pub use api::{
    CreateOutcome, CreateStackRequest, DeleteOutcome, IdentityApi, InMemoryIdentityApi,
    InMemoryStackApi, StackApi, StackDetail, UpdateOutcome, UpdateStackRequest,
};
pub use events::failure_reasons;
pub use manager::StackManager;
pub use poller::{poll, retry_transient, Backoff, PollConfig};
