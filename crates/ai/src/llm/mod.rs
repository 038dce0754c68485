pub mod candle;
pub mod native;
pub mod qwen2;

#[derive(Debug, Clone, PartialEq)]
pub enum LLMMessage {
    System(String),
    User(String),
    Assistant(String),
}

#[derive(Debug, Clone)]
pub struct LLMInferenceParams {
    pub temperature: f64,
    pub seed: Option<u64>,
    pub top_p: Option<f64>,
    pub top_k: Option<usize>,
    pub max_tokens: Option<usize>,
    pub repeat_penalty: f32,
    pub repeat_last_n: usize,
}

impl Default for LLMInferenceParams {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            seed: None,
            top_p: Some(0.9),
            top_k: Some(40),
            max_tokens: Some(512),
            repeat_penalty: 1.1,
            repeat_last_n: 64,
        }
    }
}

impl LLMInferenceParams {
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

pub trait LLMModel {
    /// `on_token` receives decoded text as soon as it is stable, the full completion is returned.
    fn get_completion(
        &mut self,
        history: &[LLMMessage],
        params: LLMInferenceParams,
        on_token: impl FnMut(&str) -> anyhow::Result<()>,
    ) -> anyhow::Result<String>;
}
