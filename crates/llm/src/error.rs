use thiserror::Error;

pub type LLMResult<T> = std::result::Result<T, LLMError>;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("{status} from LLM server: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid url {0}: {1}")]
    InvalidUrl(String, String),

    #[error("invalid value for {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },
}
