use llm::OllamaConfig;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_DEVICE: &str = "cpu";

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub ollama: OllamaConfig,
    pub output_dir: PathBuf,
}

impl AssistantConfig {
    /// `OLLAMA_*` variables plus `CODE_ASSISTANT_OUTPUT_DIR`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let ollama = OllamaConfig::from_lookup(&lookup)?;
        let output_dir = lookup("CODE_ASSISTANT_OUTPUT_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Ok(Self { ollama, output_dir })
    }
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub resources_dir: PathBuf,
    /// `cpu` or `metal`.
    pub device: String,
}

impl ModelConfig {
    /// `LOCAL_DATA_DIR` for the model cache, `CANDLE_DEVICE` for the inference device.
    pub fn from_env() -> Self {
        Self {
            resources_dir: file_downloader::FileDownloadConfig::from_env().resources_dir,
            device: std::env::var("CANDLE_DEVICE").unwrap_or_else(|_| DEFAULT_DEVICE.to_string()),
        }
    }
}
