//! Provider wiring for the command layer
//!
//! Commands run against the in-process provider: stacks provision
//! instantly and nothing leaves the machine, which makes `create` and
//! `delete` safe to exercise anywhere. Cloud providers implement the same
//! ports and slot in here.

use std::sync::Arc;
use strata_provision::{IdentityApi, InMemoryIdentityApi, InMemoryStackApi, StackApi};

pub struct LocalProvider {
    stacks: Arc<InMemoryStackApi>,
    identity: Arc<InMemoryIdentityApi>,
}

impl LocalProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stacks: Arc::new(InMemoryStackApi::new()),
            identity: Arc::new(InMemoryIdentityApi::new()),
        }
    }

    #[must_use]
    pub fn stacks(&self) -> Arc<dyn StackApi> {
        Arc::clone(&self.stacks) as Arc<dyn StackApi>
    }

    #[must_use]
    pub fn identity(&self) -> Arc<dyn IdentityApi> {
        Arc::clone(&self.identity) as Arc<dyn IdentityApi>
    }
}

impl Default for LocalProvider {
    fn default() -> Self {
        Self::new()
    }
}
