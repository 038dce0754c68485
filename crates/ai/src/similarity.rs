use crate::{Model, TextEmbeddingInput, TextEmbeddingOutput};
use anyhow::bail;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    pub index: usize,
    pub score: f32,
}

/// Cosine similarity; `0.0` when the lengths differ or either vector is all zeros.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// Scores in document order.
pub fn similarities(query: &[f32], documents: &[Vec<f32>]) -> Vec<f32> {
    documents
        .iter()
        .map(|doc| cosine_similarity(query, doc))
        .collect()
}

/// Best first. Equal scores keep document order.
pub fn rank(query: &[f32], documents: &[Vec<f32>]) -> Vec<Ranked> {
    let mut ranked = similarities(query, documents)
        .into_iter()
        .enumerate()
        .map(|(index, score)| Ranked { index, score })
        .collect::<Vec<_>>();

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    ranked
}

pub struct RankOutput {
    pub query_embedding: TextEmbeddingOutput,
    pub document_embeddings: Vec<TextEmbeddingOutput>,
    pub ranked: Vec<Ranked>,
}

impl RankOutput {
    pub fn best(&self) -> Option<Ranked> {
        self.ranked.first().copied()
    }

    /// Scores in document order, for printing next to the inputs.
    pub fn scores(&self) -> Vec<f32> {
        similarities(&self.query_embedding, &self.document_embeddings)
    }
}

#[tracing::instrument(err(Debug), skip_all, fields(documents = documents.len()))]
pub async fn rank_with_model<M>(
    model: &mut M,
    query: &str,
    documents: &[&str],
) -> anyhow::Result<RankOutput>
where
    M: Model<Item = TextEmbeddingInput, Output = TextEmbeddingOutput>,
{
    let mut items = vec![query.to_string()];
    items.extend(documents.iter().map(|v| v.to_string()));

    let mut embeddings = vec![];
    let limit = model.batch_size_limit().max(1);
    let mut pending = items.into_iter().peekable();
    while pending.peek().is_some() {
        let batch = pending.by_ref().take(limit).collect::<Vec<_>>();
        let expected = batch.len();
        let results = model.process(batch).await?;
        if results.len() != expected {
            bail!("expected {} embeddings, got {}", expected, results.len());
        }
        for result in results {
            embeddings.push(result?);
        }
    }

    let mut embeddings = embeddings.into_iter();
    let query_embedding = embeddings
        .next()
        .ok_or_else(|| anyhow::anyhow!("no query embedding"))?;
    let document_embeddings = embeddings.collect::<Vec<_>>();

    let ranked = rank(&query_embedding, &document_embeddings);

    Ok(RankOutput {
        query_embedding,
        document_embeddings,
        ranked,
    })
}
