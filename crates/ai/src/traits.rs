pub type TextEmbeddingInput = String;
pub type TextEmbeddingOutput = Vec<f32>;

pub trait Model {
    type Item;
    type Output;

    /// One result per item, in input order.
    fn process(
        &mut self,
        items: Vec<Self::Item>,
    ) -> impl std::future::Future<Output = anyhow::Result<Vec<anyhow::Result<Self::Output>>>> + Send;

    fn batch_size_limit(&self) -> usize;
}
