pub mod gemini;
pub mod parser;

use async_trait::async_trait;
use image::DynamicImage;
use thiserror::Error;

// Re-export main types
pub use gemini::GeminiClient;
pub use parser::parse_mileage;

/// Failure of a single recognition call
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecognitionError {
    /// Rate or usage limit reached; the batch must stop
    #[error("Recognition quota exhausted: {0}")]
    QuotaExhausted(String),
    #[error("Recognition failed: {0}")]
    Failed(String),
}

/// Recognition service - abstraction over the multimodal backend
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Ask the service about `image` and return its free-text answer
    async fn recognize(&self, prompt: &str, image: &DynamicImage)
        -> Result<String, RecognitionError>;
}
