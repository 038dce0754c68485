use ai::llm::{
    qwen2::{Qwen2, Qwen2Model},
    LLMModel,
};
use std::io::Write;
use toolbox::{chat, config::ModelConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    std::env::set_var("TOKENIZERS_PARALLELISM", "false");
    analytics_tracing::init_tracing_to_stderr("warn");

    let config = ModelConfig::from_env();
    let params = chat::default_params(chat::seed_from_env()?);
    let mut model =
        Qwen2::from_resources(&config.resources_dir, Qwen2Model::Instruct0_5B, &config.device)
            .await?;

    let history = chat::default_history();
    println!("User: {}\n", chat::USER_MESSAGE);
    print!("Assistant: ");
    std::io::stdout().flush()?;

    let completion = model.get_completion(&history, params, |token| {
        let mut stdout = std::io::stdout();
        stdout.write_all(token.as_bytes())?;
        stdout.flush()?;
        Ok(())
    })?;

    println!("\n\n--- COMPLETION ({} chars) ---", completion.chars().count());
    println!("{}", completion);

    Ok(())
}
