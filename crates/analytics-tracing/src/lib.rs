use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Loads `.env` first so `RUST_LOG` defined there is honoured, then builds the filter.
fn init_env_layer(default_filter: &str) -> (tracing_subscriber::EnvFilter, Result<String, String>) {
    let dotenv_result = match dotenv() {
        Ok(path) => Ok(path.display().to_string()),
        Err(e) => Err(e.to_string()),
    };

    let env_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    (env_layer, dotenv_result)
}

/// Logs go to stderr, stdout is reserved for program output.
pub fn init_tracing_to_stderr(default_filter: &str) {
    let (env_layer, dotenv_result) = init_env_layer(default_filter);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true);

    if let Err(e) = tracing_subscriber::registry()
        .with(env_layer)
        .with(stderr_layer)
        .try_init()
    {
        eprintln!("failed to init tracing: {}", e);
        return;
    }

    match dotenv_result {
        Ok(path) => tracing::debug!(".env read successfully from {}", path),
        Err(e) => tracing::debug!("Could not load .env file: {e}"),
    }
}
