use super::{native::LocalLLMModel, LLMInferenceParams};
use anyhow::anyhow;
use candle_core::{Device, Tensor};
use candle_transformers::generation::{LogitsProcessor, Sampling};
use tokenizers::Tokenizer;

/// This is a wrapper around a tokenizer to ensure that tokens can be returned to the user in a
/// streaming way rather than having to wait for the full decoding.
pub struct TokenOutputStream {
    tokenizer: Tokenizer,
    tokens: Vec<u32>,
    prev_index: usize,
    current_index: usize,
}

impl TokenOutputStream {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            tokens: Vec::new(),
            prev_index: 0,
            current_index: 0,
        }
    }

    fn decode(&self, tokens: &[u32]) -> candle_core::Result<String> {
        match self.tokenizer.decode(tokens, true) {
            Ok(str) => Ok(str),
            Err(err) => candle_core::bail!("cannot decode: {err}"),
        }
    }

    // https://github.com/huggingface/text-generation-inference/blob/5ba53d44a18983a4de32d122f4cb46f4a17d9ef6/server/text_generation_server/models/model.py#L68
    pub fn next_token(&mut self, token: u32) -> candle_core::Result<Option<String>> {
        let prev_text = if self.tokens.is_empty() {
            String::new()
        } else {
            let tokens = &self.tokens[self.prev_index..self.current_index];
            self.decode(tokens)?
        };
        self.tokens.push(token);
        let text = self.decode(&self.tokens[self.prev_index..])?;
        let ends_on_char = text.chars().last().map_or(false, |c| c.is_alphanumeric());
        if text.len() > prev_text.len() && ends_on_char {
            let text = text.split_at(prev_text.len());
            self.prev_index = self.current_index;
            self.current_index = self.tokens.len();
            Ok(Some(text.1.to_string()))
        } else {
            Ok(None)
        }
    }

    pub fn decode_rest(&self) -> candle_core::Result<Option<String>> {
        let prev_text = if self.tokens.is_empty() {
            String::new()
        } else {
            let tokens = &self.tokens[self.prev_index..self.current_index];
            self.decode(tokens)?
        };
        let text = self.decode(&self.tokens[self.prev_index..])?;
        if text.len() > prev_text.len() {
            let text = text.split_at(prev_text.len());
            Ok(Some(text.1.to_string()))
        } else {
            Ok(None)
        }
    }

    pub fn decode_all(&self) -> candle_core::Result<String> {
        self.decode(&self.tokens)
    }

    pub fn get_token(&self, token_s: &str) -> Option<u32> {
        self.tokenizer.get_vocab(true).get(token_s).copied()
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.prev_index = 0;
        self.current_index = 0;
    }
}

pub(crate) fn logits_processor(params: &LLMInferenceParams) -> LogitsProcessor {
    let temperature = params.temperature;
    let sampling = if temperature <= 0. {
        Sampling::ArgMax
    } else {
        match (params.top_k, params.top_p) {
            (None, None) => Sampling::All { temperature },
            (Some(k), None) => Sampling::TopK { k, temperature },
            (None, Some(p)) => Sampling::TopP { p, temperature },
            (Some(k), Some(p)) => Sampling::TopKThenTopP { k, p, temperature },
        }
    };
    LogitsProcessor::from_sampling(params.seed.unwrap_or_else(rand::random), sampling)
}

pub(crate) trait CandleLLMModel: LocalLLMModel {
    fn forward(
        &mut self,
        input: &str,
        params: &LLMInferenceParams,
        mut on_token: impl FnMut(&str) -> anyhow::Result<()>,
    ) -> anyhow::Result<String> {
        let mut tos = TokenOutputStream::new(self.tokenizers());

        let tokens = tos
            .tokenizer()
            .encode(input, true)
            .map_err(|err| anyhow!(err))?;
        let prompt_tokens = tokens.get_ids().to_vec();
        if prompt_tokens.is_empty() {
            anyhow::bail!("empty prompt");
        }

        let stop_tokens = {
            let stop_names = self.stop_tokens();
            let stop_tokens = stop_names
                .iter()
                .filter_map(|name| tos.get_token(name))
                .collect::<Vec<_>>();
            if stop_tokens.is_empty() {
                anyhow::bail!("none of the stop tokens {:?} are in the vocabulary", stop_names);
            }
            stop_tokens
        };

        if params.max_tokens == Some(0) {
            return Ok(String::new());
        }

        let device = self.device();
        let mut logits_processor = logits_processor(params);
        let mut all_tokens = vec![];

        let mut next_token = {
            let input = Tensor::new(prompt_tokens.as_slice(), &device)?.unsqueeze(0)?;
            let logits = self.next_token_logits(&input, 0)?;
            let logits = logits.squeeze(0)?;
            logits_processor.sample(&logits)?
        };

        let mut index = 0;
        loop {
            if stop_tokens.contains(&next_token) {
                break;
            }

            all_tokens.push(next_token);
            if let Some(token) = tos.next_token(next_token)? {
                on_token(&token)?;
            }

            index += 1;
            if let Some(max_tokens) = params.max_tokens {
                if index >= max_tokens {
                    break;
                }
            }

            let input = Tensor::new(&[next_token], &device)?.unsqueeze(0)?;
            let logits = self.next_token_logits(&input, prompt_tokens.len() + index - 1)?;
            let logits = logits.squeeze(0)?;
            let logits = if params.repeat_penalty == 1. {
                logits
            } else {
                let start_at = all_tokens.len().saturating_sub(params.repeat_last_n);
                candle_transformers::utils::apply_repeat_penalty(
                    &logits,
                    params.repeat_penalty,
                    &all_tokens[start_at..],
                )?
            };

            next_token = logits_processor.sample(&logits)?;
        }

        if let Some(rest) = tos.decode_rest()? {
            on_token(&rest)?;
        }

        tracing::debug!("generated {} tokens", all_tokens.len());

        tos.decode_all().map_err(|err| anyhow!(err))
    }

    fn next_token_logits(&mut self, input: &Tensor, index_pos: usize) -> anyhow::Result<Tensor>;
    fn tokenizers(&self) -> Tokenizer;
    fn device(&self) -> Device;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokenizers::models::wordlevel::WordLevel;

    fn word_tokenizer() -> Tokenizer {
        let vocab = [("[UNK]", 0u32), ("hello", 1), ("world", 2), ("<|im_end|>", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<HashMap<_, _>>();
        let model = WordLevel::builder()
            .vocab(vocab)
            .unk_token("[UNK]".to_string())
            .build()
            .unwrap();
        Tokenizer::new(model)
    }

    #[test]
    fn streams_words_incrementally() {
        let mut tos = TokenOutputStream::new(word_tokenizer());

        assert_eq!(tos.next_token(1).unwrap().as_deref(), Some("hello"));
        assert_eq!(tos.next_token(2).unwrap().as_deref(), Some(" world"));
        assert_eq!(tos.decode_rest().unwrap(), None);
        assert_eq!(tos.decode_all().unwrap(), "hello world");
        assert_eq!(tos.get_token("<|im_end|>"), Some(3));
        assert_eq!(tos.get_token("missing"), None);

        tos.clear();
        assert_eq!(tos.decode_all().unwrap(), "");
    }

    /// Always prefers `next` so the generated sequence is known up front.
    struct FixedLogits {
        tokenizer: Tokenizer,
        next: u32,
        forward_calls: usize,
    }

    impl LocalLLMModel for FixedLogits {
        fn start_of_turn(&self) -> String {
            String::new()
        }
        fn end_of_turn(&self) -> String {
            "<|im_end|>".into()
        }
        fn system_name(&self) -> String {
            "system".into()
        }
        fn user_name(&self) -> String {
            "user".into()
        }
        fn assistant_name(&self) -> String {
            "assistant".into()
        }
    }

    impl CandleLLMModel for FixedLogits {
        fn next_token_logits(&mut self, _input: &Tensor, _index_pos: usize) -> anyhow::Result<Tensor> {
            self.forward_calls += 1;
            let mut logits = [0f32; 4];
            logits[self.next as usize] = 10.0;
            Ok(Tensor::new(&[logits], &Device::Cpu)?)
        }

        fn tokenizers(&self) -> Tokenizer {
            self.tokenizer.clone()
        }

        fn device(&self) -> Device {
            Device::Cpu
        }
    }

    fn fixed(next: u32) -> FixedLogits {
        FixedLogits {
            tokenizer: word_tokenizer(),
            next,
            forward_calls: 0,
        }
    }

    fn greedy(max_tokens: usize) -> LLMInferenceParams {
        LLMInferenceParams::default()
            .with_temperature(0.0)
            .with_max_tokens(max_tokens)
    }

    #[test]
    fn zero_max_tokens_generates_nothing() {
        let mut model = fixed(1);
        let mut streamed = vec![];

        let text = model
            .forward("hello", &greedy(0), |t| {
                streamed.push(t.to_string());
                Ok(())
            })
            .unwrap();

        assert_eq!(text, "");
        assert!(streamed.is_empty());
        assert_eq!(model.forward_calls, 0);
    }

    #[test]
    fn stops_at_max_tokens() {
        let mut model = fixed(1);
        let mut streamed = String::new();

        let text = model
            .forward("hello", &greedy(2), |t| {
                streamed.push_str(t);
                Ok(())
            })
            .unwrap();

        assert_eq!(text, "hello hello");
        assert_eq!(streamed, "hello hello");
        assert_eq!(model.forward_calls, 2);
    }

    #[test]
    fn stops_at_end_of_turn() {
        let mut model = fixed(3);
        let text = model.forward("hello", &greedy(8), |_| Ok(())).unwrap();
        assert_eq!(text, "");
        assert_eq!(model.forward_calls, 1);
    }

    #[test]
    fn greedy_when_temperature_is_zero() {
        let params = LLMInferenceParams::default().with_temperature(0.0);
        let mut processor = logits_processor(&params);
        let logits = Tensor::new(&[0.1f32, 3.0, 0.2, -1.0], &Device::Cpu).unwrap();
        assert_eq!(processor.sample(&logits).unwrap(), 1);
    }
}
