use ai::similarity::RankOutput;
use std::io::Write;

pub const QUERY: &str = "Which planet is known as the Red Planet?";

pub const DOCUMENTS: [&str; 4] = [
    "Venus is often called Earth's twin because of its similar size and proximity.",
    "Mars, known for its reddish appearance, is often referred to as the Red Planet.",
    "Jupiter, the largest planet in our solar system, has a prominent red spot.",
    "Saturn, famous for its rings, is sometimes mistaken for the Red Planet.",
];

fn format_scores(scores: &[f32]) -> String {
    let scores = scores
        .iter()
        .map(|v| format!("{:.4}", v))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", scores)
}

pub fn write_query(out: &mut impl Write, query: &str) -> std::io::Result<()> {
    writeln!(out, "Query: \"{}\"\n", query)
}

pub fn write_report(
    out: &mut impl Write,
    documents: &[&str],
    output: &RankOutput,
) -> std::io::Result<()> {
    let dim = output.query_embedding.len();
    writeln!(out, "Shape of query embedding: [{}]", dim)?;
    writeln!(
        out,
        "Shape of document embeddings: [{}, {}]",
        output.document_embeddings.len(),
        output.document_embeddings.first().map_or(0, |v| v.len())
    )?;

    writeln!(
        out,
        "\nSimilarity scores (Query vs. each Document): {}",
        format_scores(&output.scores())
    )?;

    match output.best() {
        Some(best) => {
            let document = documents.get(best.index).copied().unwrap_or_default();
            writeln!(out, "\n---> Best match found: '{}'", document)?;
            writeln!(out, "---> Similarity score: {:.4}", best.score)?;
        }
        None => writeln!(out, "\n---> No documents to rank")?,
    }

    Ok(())
}
