pub mod chunk;
pub mod loaders;
pub mod quiz;

pub use chunk::DocumentChunk;
pub use loaders::{load_all_documents, load_document, LoadedDocument};
pub use quiz::{Quiz, OPTION_COUNT, OPTION_LABELS};
