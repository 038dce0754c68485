mod config;
mod error;
mod ollama;

pub use config::*;
pub use error::*;
pub use ollama::*;
pub use reqwest::{StatusCode, Url};

use async_trait::async_trait;

/// A text-in text-out language model endpoint.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn get_completion(&self, prompt: &str) -> Result<String, LLMError>;
}
