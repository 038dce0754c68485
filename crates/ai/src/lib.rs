mod ort;
mod traits;

pub mod llm;
pub mod similarity;
pub mod text_embedding;
pub mod utils;

pub use traits::*;
