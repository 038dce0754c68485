use ai::{
    similarity::rank_with_model,
    text_embedding::{OrtTextEmbedding, TextEmbeddingModel},
};
use toolbox::{config::ModelConfig, rank};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // silences the tokenizer parallelism warning
    std::env::set_var("TOKENIZERS_PARALLELISM", "false");
    analytics_tracing::init_tracing_to_stderr("warn");

    let config = ModelConfig::from_env();
    let mut model =
        OrtTextEmbedding::new(&config.resources_dir, TextEmbeddingModel::EmbeddingGemma300M)
            .await?;

    let mut stdout = std::io::stdout();
    rank::write_query(&mut stdout, rank::QUERY)?;

    let output = rank_with_model(&mut model, rank::QUERY, &rank::DOCUMENTS).await?;
    rank::write_report(&mut stdout, &rank::DOCUMENTS, &output)?;

    Ok(())
}
