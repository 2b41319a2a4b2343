//! Service layer: prompt construction, LLM provider access, validation and
//! the generators built on top of them.

pub mod ai_client;
pub mod ai_generator;
pub mod demo;
pub mod export;
pub mod generator;
pub mod mapper;
pub mod prompt;
pub mod schema;
pub mod validator;

pub use ai_client::{CompletionTransport, ResponsesClient};
pub use ai_generator::{AiDocumentGenerator, RetryPolicy};
pub use demo::DemoDocumentGenerator;
pub use export::{ExportError, ExportFormat};
pub use generator::{DocumentGenerator, GenerationPipeline};
pub use schema::DocumentSchema;
