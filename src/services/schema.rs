//! JSON Schema describing the document the LLM must return.
//!
//! The schema ships inside the binary and is parsed once at startup. A
//! schema that fails to parse aborts startup instead of failing requests.

use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;

const PACKAGED_SCHEMA: &str = include_str!("../../resources/construction_document_schema.json");

/// Parsed document schema, cheap to clone and share between generators.
#[derive(Debug, Clone)]
pub struct DocumentSchema {
    value: Arc<Value>,
}

impl DocumentSchema {
    /// Load the schema packaged with the crate.
    pub fn load() -> Result<Self> {
        Self::from_json(PACKAGED_SCHEMA).context("Packaged document schema is invalid")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).context("Failed to parse document schema")?;
        if !value.is_object() {
            anyhow::bail!("Document schema must be a JSON object");
        }

        tracing::debug!("Document schema loaded");

        Ok(Self {
            value: Arc::new(value),
        })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Owned copy for embedding in a wire request.
    pub fn to_value(&self) -> Value {
        self.value.as_ref().clone()
    }
}
