//! Stack descriptors: the unit handed to the provisioning API

use super::stack::StackName;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A capability the provisioning API requires the caller to acknowledge
/// before it will create certain resource classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    Iam,
    NamedIam,
    AutoExpand,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Capability::Iam => "CAPABILITY_IAM",
            Capability::NamedIam => "CAPABILITY_NAMED_IAM",
            Capability::AutoExpand => "CAPABILITY_AUTO_EXPAND",
        };
        f.write_str(label)
    }
}

/// A named, versioned bundle of resource definitions to be provisioned as
/// a unit.
///
/// Owned by the caller until handed to the stack manager; immutable during
/// a single provisioning operation. `depends_on` is carried for
/// human-facing diagnostics only; actual ordering is encoded in the task
/// tree the orchestration driver builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackDescriptor {
    pub name: StackName,
    pub document: serde_json::Value,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    #[serde(default)]
    pub depends_on: Vec<StackName>,
}

impl StackDescriptor {
    #[must_use]
    pub fn new(name: impl Into<StackName>, document: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            document,
            capabilities: Vec::new(),
            depends_on: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Vec<Capability>) -> Self {
        self.capabilities = capabilities;
        self
    }

    #[must_use]
    pub fn with_depends_on(mut self, depends_on: Vec<StackName>) -> Self {
        self.depends_on = depends_on;
        self
    }

    /// Serialize the resource document for the wire.
    pub fn body(&self) -> Result<String> {
        serde_json::to_string(&self.document)
            .map_err(|e| Error::json(format!("serializing document for stack '{}'", self.name), e))
    }

    /// Content signature of the resource document: sha256 over the
    /// canonical JSON serialization, hex-encoded.
    ///
    /// Object keys serialize in sorted order (serde_json's default map is
    /// ordered), so the signature is structural: two documents that differ
    /// only in key ordering or formatting hash identically.
    pub fn signature(&self) -> Result<String> {
        let canonical = serde_json::to_vec(&self.document)
            .map_err(|e| Error::json(format!("hashing document for stack '{}'", self.name), e))?;
        let digest = Sha256::digest(&canonical);
        Ok(hex::encode(digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn signature_ignores_key_order() {
        let a = StackDescriptor::new(
            "demo",
            json!({"resources": {"role": {"kind": "Role"}, "pool": {"kind": "Pool"}}}),
        );
        let b = StackDescriptor::new(
            "demo",
            json!({"resources": {"pool": {"kind": "Pool"}, "role": {"kind": "Role"}}}),
        );
        assert_eq!(a.signature().unwrap(), b.signature().unwrap());
    }

    #[test]
    fn signature_differs_on_content() {
        let a = StackDescriptor::new("demo", json!({"resources": {"role": {"kind": "Role"}}}));
        let b = StackDescriptor::new("demo", json!({"resources": {"role": {"kind": "Pool"}}}));
        assert_ne!(a.signature().unwrap(), b.signature().unwrap());
    }
}
