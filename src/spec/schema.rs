//! Schema collaborator boundary.
//!
//! Definitions are stored as opaque [`SchemaSource`] values and only expanded
//! when a specification document is built, so a bad schema surfaces at that
//! point and not when it is declared.

use serde_json::Value;

/// Something that can expand into a JSON-Schema-like object.
pub trait SchemaSource: Send + Sync {
    fn expand(&self) -> anyhow::Result<Value>;
}

impl SchemaSource for Value {
    fn expand(&self) -> anyhow::Result<Value> {
        Ok(self.clone())
    }
}
