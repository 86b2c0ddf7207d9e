//! Language-model collaborator interface for equibrief
//!
//! The core never invokes a model directly; it talks to an [`LlmProvider`]
//! and treats the output as untrusted text. Structured output is always
//! validated (JSON parse, code-fence stripping) by the caller before use.

pub mod completion;
pub mod error;
pub mod fences;
pub mod provider;
pub mod providers;

pub use completion::{CompletionRequest, CompletionRequestBuilder, CompletionResponse, TokenUsage};
pub use error::{LlmError, Result};
pub use fences::strip_code_fences;
pub use provider::LlmProvider;
pub use providers::{OpenAiConfig, OpenAiProvider};
