use crate::{
    ort::load_onnx_model,
    traits::{TextEmbeddingInput, TextEmbeddingOutput},
    utils::normalize,
    Model,
};
use anyhow::{anyhow, bail};
use ndarray::{Array1, Array2};
use ort::Session;
use std::path::Path;
use tokenizers::Tokenizer;

#[derive(Debug, Clone, Copy, strum_macros::Display)]
pub enum TextEmbeddingModel {
    #[strum(serialize = "embeddinggemma-300m")]
    EmbeddingGemma300M,
}

impl TextEmbeddingModel {
    pub fn model_uri(self) -> &'static str {
        match self {
            Self::EmbeddingGemma300M => {
                "onnx-community/embeddinggemma-300m-ONNX/resolve/main/onnx/model.onnx"
            }
        }
    }

    /// Weights stored outside the graph file, resolved next to it.
    pub fn external_data_uri(self) -> Option<&'static str> {
        match self {
            Self::EmbeddingGemma300M => {
                Some("onnx-community/embeddinggemma-300m-ONNX/resolve/main/onnx/model.onnx_data")
            }
        }
    }

    pub fn tokenizer_uri(self) -> &'static str {
        match self {
            Self::EmbeddingGemma300M => {
                "onnx-community/embeddinggemma-300m-ONNX/resolve/main/tokenizer.json"
            }
        }
    }

    pub fn dim(self) -> usize {
        match self {
            Self::EmbeddingGemma300M => 768,
        }
    }

    pub fn max_len(self) -> usize {
        match self {
            Self::EmbeddingGemma300M => 2048,
        }
    }
}

pub struct OrtTextEmbedding {
    model: Session,
    tokenizer: Tokenizer,
    dim: usize,
}

impl OrtTextEmbedding {
    pub async fn new(
        resources_dir: impl AsRef<Path>,
        model_type: TextEmbeddingModel,
    ) -> anyhow::Result<Self> {
        let download = file_downloader::FileDownload::new(file_downloader::FileDownloadConfig {
            resources_dir: resources_dir.as_ref().to_path_buf(),
            ..Default::default()
        });

        let model_path = download
            .download_if_not_exists(model_type.model_uri())
            .await?;
        if let Some(uri) = model_type.external_data_uri() {
            download.download_if_not_exists(uri).await?;
        }
        let tokenizer_config_path = download
            .download_if_not_exists(model_type.tokenizer_uri())
            .await?;

        tracing::debug!("loading {} from {:?}", model_type, model_path);
        let model = load_onnx_model(model_path, None)?;

        let mut tokenizer =
            Tokenizer::from_file(tokenizer_config_path).map_err(|e| anyhow!(e))?;
        let truncation = tokenizers::utils::truncation::TruncationParams {
            max_length: model_type.max_len(),
            ..Default::default()
        };
        tokenizer
            .with_truncation(Some(truncation))
            .map_err(|e| anyhow!(e))?;
        // one text per run, padding is never needed
        tokenizer.with_padding(None);

        Ok(Self {
            model,
            tokenizer,
            dim: model_type.dim(),
        })
    }

    pub fn get_text_embedding(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|err| anyhow!(err))?;

        let len = encoding.get_ids().len();
        let ids: Vec<i64> = encoding.get_ids().iter().map(|x| *x as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|x| *x as i64)
            .collect();

        let ids = Array2::from_shape_vec((1, len), ids)?;
        let attention_mask = Array2::from_shape_vec((1, len), attention_mask)?;

        let outputs = self.model.run(
            ort::inputs!["input_ids" => ids.view(), "attention_mask" => attention_mask.view()]?,
        )?;

        let output = outputs
            .get("sentence_embedding")
            .ok_or(anyhow!("output not found"))?
            .try_extract_tensor::<f32>()?;

        let output: Array1<f32> = output.iter().copied().collect();
        if output.len() != self.dim {
            bail!(
                "unexpected embedding size {}, expected {}",
                output.len(),
                self.dim
            );
        }

        Ok(normalize(output).into_iter().collect())
    }
}

impl Model for OrtTextEmbedding {
    type Item = TextEmbeddingInput;
    type Output = TextEmbeddingOutput;

    fn batch_size_limit(&self) -> usize {
        1
    }

    async fn process(
        &mut self,
        items: Vec<String>,
    ) -> anyhow::Result<Vec<anyhow::Result<Vec<f32>>>> {
        let mut results = vec![];

        for item in items {
            let res = self.get_text_embedding(&item);
            results.push(res);
        }

        Ok(results)
    }
}
