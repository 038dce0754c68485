use ai::llm::{LLMInferenceParams, LLMMessage};

pub const SYSTEM_MESSAGE: &str = "You are a helpful assistant.";
pub const USER_MESSAGE: &str = "Give me a short introduction to large language models.";
pub const MAX_NEW_TOKENS: usize = 128;

pub fn default_history() -> Vec<LLMMessage> {
    vec![
        LLMMessage::System(SYSTEM_MESSAGE.to_string()),
        LLMMessage::User(USER_MESSAGE.to_string()),
    ]
}

/// Short completion, seeded from `CHAT_SEED` when set so runs can be repeated.
pub fn default_params(seed: Option<u64>) -> LLMInferenceParams {
    let params = LLMInferenceParams::default().with_max_tokens(MAX_NEW_TOKENS);
    match seed {
        Some(seed) => params.with_seed(seed),
        None => params,
    }
}

pub fn seed_from_env() -> anyhow::Result<Option<u64>> {
    match std::env::var("CHAT_SEED") {
        Ok(v) => Ok(Some(v.parse().map_err(|_| {
            anyhow::anyhow!("invalid value for CHAT_SEED: {}", v)
        })?)),
        Err(_) => Ok(None),
    }
}
