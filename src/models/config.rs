use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PROMPT: &str =
    "What is the vehicle's odometer reading? Reply with the odometer reading only.";

/// Recognition service settings (Gemini generateContent)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecognitionConfig {
    pub base_url: String,
    pub model: String,
    pub prompt: String,
    pub timeout_secs: u64,
    /// Images are shrunk to fit inside a square of this size before upload
    pub max_image_size: u32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.0-flash".to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            timeout_secs: 30,
            max_image_size: 384,
        }
    }
}

/// Delay inserted after every recognition call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PacingConfig {
    pub delay_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self { delay_secs: 3 }
    }
}

/// Image source settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// Accepted file extensions, compared case-insensitively
    pub extensions: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()],
        }
    }
}

/// Spreadsheet export settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Output directory; current directory when unset
    pub output_dir: Option<PathBuf>,
    pub file_suffix: String,
    pub include_raw_sheet: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            file_suffix: "Mileage".to_string(),
            include_raw_sheet: false,
        }
    }
}

/// Complete application configuration.
/// The API key is deliberately absent; it comes from the command line or environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub recognition: RecognitionConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub export: ExportConfig,
}
