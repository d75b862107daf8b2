pub mod chunker;
pub mod llm_service;
pub mod prompt_builder;
pub mod quiz_parser;
pub mod report_writer;

pub use chunker::TextChunker;
pub use llm_service::{build_provider, AnyProvider, GeminiProvider, LlmProvider, OpenAiProvider};
pub use prompt_builder::{PromptBuilder, PromptMessages};
pub use quiz_parser::QuizParser;
pub use report_writer::{format_report, ReportWriter};
