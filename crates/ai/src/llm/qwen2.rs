use super::{
    candle::CandleLLMModel, native::LocalLLMModel, LLMInferenceParams, LLMMessage, LLMModel,
};
use anyhow::bail;
use candle_core::{quantized::gguf_file, Device, Tensor};
use candle_transformers::models::quantized_qwen2;
use std::path::Path;
use tokenizers::Tokenizer;

#[derive(Debug, Clone, Copy, strum_macros::Display)]
pub enum Qwen2Model {
    #[strum(serialize = "qwen2-0.5b-instruct")]
    Instruct0_5B,
}

impl Qwen2Model {
    pub fn model_uri(self) -> &'static str {
        match self {
            Self::Instruct0_5B => {
                "Qwen/Qwen2-0.5B-Instruct-GGUF/resolve/main/qwen2-0_5b-instruct-q4_0.gguf"
            }
        }
    }

    pub fn tokenizer_uri(self) -> &'static str {
        match self {
            Self::Instruct0_5B => "Qwen/Qwen2-0.5B-Instruct/resolve/main/tokenizer.json",
        }
    }
}

pub struct Qwen2 {
    model: quantized_qwen2::ModelWeights,
    tokenizer: Tokenizer,
    device: Device,
}

impl LLMModel for Qwen2 {
    fn get_completion(
        &mut self,
        history: &[LLMMessage],
        params: LLMInferenceParams,
        on_token: impl FnMut(&str) -> anyhow::Result<()>,
    ) -> anyhow::Result<String> {
        let prompt = self.with_chat_template(history);
        tracing::debug!("final prompt: {}", prompt);

        self.forward(&prompt, &params, on_token)
    }
}

impl LocalLLMModel for Qwen2 {
    fn start_of_turn(&self) -> String {
        "<|im_start|>".to_string()
    }

    fn end_of_turn(&self) -> String {
        "<|im_end|>".to_string()
    }

    fn system_name(&self) -> String {
        "system".to_string()
    }

    fn user_name(&self) -> String {
        "user".to_string()
    }

    fn assistant_name(&self) -> String {
        "assistant".to_string()
    }

    fn stop_tokens(&self) -> Vec<String> {
        vec![self.end_of_turn(), "<|endoftext|>".to_string()]
    }
}

impl CandleLLMModel for Qwen2 {
    fn next_token_logits(&mut self, input: &Tensor, index_pos: usize) -> anyhow::Result<Tensor> {
        Ok(self.model.forward(input, index_pos)?)
    }

    fn tokenizers(&self) -> Tokenizer {
        self.tokenizer.clone()
    }

    fn device(&self) -> Device {
        self.device.clone()
    }
}

impl Qwen2 {
    pub fn load(
        model_path: impl AsRef<Path>,
        tokenizer_path: impl AsRef<Path>,
        device: &str,
    ) -> anyhow::Result<Self> {
        let device = match device {
            "metal" => match Device::new_metal(0) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!("metal device unavailable, fallback to cpu: {}", e);
                    Device::Cpu
                }
            },
            "cuda" => {
                bail!("cuda device is not supported for now");
            }
            _ => Device::Cpu,
        };

        let tokenizer =
            Tokenizer::from_file(tokenizer_path).map_err(|e| anyhow::anyhow!(e))?;
        let model_path = model_path.as_ref();
        let mut file = std::fs::File::open(model_path)?;
        let content = gguf_file::Content::read(&mut file).map_err(|e| e.with_path(model_path))?;
        let model = quantized_qwen2::ModelWeights::from_gguf(content, &mut file, &device)?;

        Ok(Self {
            model,
            tokenizer,
            device,
        })
    }

    /// Resolves model and tokenizer through the hub cache under `resources_dir`.
    pub async fn from_resources(
        resources_dir: impl AsRef<Path>,
        model_type: Qwen2Model,
        device: &str,
    ) -> anyhow::Result<Self> {
        let download = file_downloader::FileDownload::new(file_downloader::FileDownloadConfig {
            resources_dir: resources_dir.as_ref().to_path_buf(),
            ..Default::default()
        });

        let model_path = download
            .download_if_not_exists(model_type.model_uri())
            .await?;
        let tokenizer_path = download
            .download_if_not_exists(model_type.tokenizer_uri())
            .await?;

        tracing::debug!("loading {} from {:?}", model_type, model_path);
        Self::load(model_path, tokenizer_path, device)
    }
}
