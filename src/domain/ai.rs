//! Wire models for the LLM provider's structured-output endpoint.
//!
//! Requests are serialized with the provider's field names. Responses and
//! the generated payload are decoded with case-insensitive field matching
//! through [`from_str_ignore_case`].

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Name the JSON schema is registered under in the output format.
pub const SCHEMA_NAME: &str = "construction_document";

/// Request body for `POST /v1/responses`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsesRequest {
    pub model: String,
    pub instructions: String,
    pub input: Vec<InputMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextFormat>,
    pub temperature: f64,
    #[serde(rename = "max_output_tokens")]
    pub max_output_tokens: u32,
    pub store: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextFormat {
    pub format: FormatSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormatSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub strict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl ResponsesRequest {
    /// Build a schema-constrained request with a single user message.
    ///
    /// Provider-side storage is always disabled.
    pub fn structured(
        model: &str,
        instructions: &str,
        user_prompt: String,
        schema: Value,
        temperature: f64,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            model: model.to_string(),
            instructions: instructions.to_string(),
            input: vec![InputMessage {
                role: "user".to_string(),
                content: user_prompt,
            }],
            text: Some(TextFormat {
                format: FormatSpec {
                    kind: "json_schema".to_string(),
                    name: SCHEMA_NAME.to_string(),
                    strict: true,
                    schema: Some(schema),
                },
            }),
            temperature,
            max_output_tokens,
            store: false,
        }
    }
}

/// Response body from `POST /v1/responses`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResponsesResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub output: Vec<OutputItem>,
    pub error: Option<ProviderError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputItem {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    pub content: Option<Vec<ContentItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentItem {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderError {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResponsesResponse {
    /// Text of the first `output_text` item inside the first `message` item.
    pub fn output_text(&self) -> Option<&str> {
        self.output
            .iter()
            .find(|item| item.kind == "message")?
            .content
            .as_ref()?
            .iter()
            .find(|c| c.kind == "output_text")?
            .text
            .as_deref()
    }
}

/// Generated payload as decoded, before validation.
///
/// Text fields are optional so that missing values reach the validator
/// instead of failing decoding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAiDocument {
    pub title: Option<String>,
    #[serde(rename = "documenttype")]
    pub document_type: Option<String>,
    #[serde(rename = "generateddate")]
    pub generated_date: Option<String>,
    pub sections: Option<Vec<RawSection>>,
    pub metadata: Option<RawMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSection {
    pub heading: Option<String>,
    pub content: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMetadata {
    #[serde(rename = "projectname")]
    pub project_name: Option<String>,
    pub phase: Option<String>,
    pub audience: Option<String>,
    #[serde(rename = "detaillevel")]
    pub detail_level: Option<String>,
    pub warnings: Option<Vec<String>>,
}

/// Decode JSON matching object keys regardless of case.
///
/// Every object key is lowercased before decoding, so target types name
/// their fields in lowercase.
pub fn from_str_ignore_case<T: DeserializeOwned>(json: &str) -> serde_json::Result<T> {
    let value: Value = serde_json::from_str(json)?;
    serde_json::from_value(lowercase_keys(value))
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), lowercase_keys(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}
