use std::path::Path;

use ort::{GraphOptimizationLevel, Session};

pub(crate) struct ONNXModelConfig {
    pub num_intra_thread: usize,
    pub optimization_level: GraphOptimizationLevel,
}

impl Default for ONNXModelConfig {
    fn default() -> Self {
        Self {
            num_intra_thread: std::thread::available_parallelism()
                .map(|v| v.get())
                .unwrap_or(4),
            optimization_level: GraphOptimizationLevel::Level3,
        }
    }
}

/// Load ONNX model from file with some predefined config.
///
/// External weights (`model.onnx_data`) must sit next to the model file.
pub(crate) fn load_onnx_model(
    model_path: impl AsRef<Path>,
    config: Option<ONNXModelConfig>,
) -> anyhow::Result<Session> {
    let builder = Session::builder()?;

    let config = config.unwrap_or_default();

    let session = builder
        .with_intra_threads(config.num_intra_thread)?
        .with_optimization_level(config.optimization_level)?
        .commit_from_file(model_path)?;

    Ok(session)
}
