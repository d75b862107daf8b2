//! # Quiz Generator
//!
//! 一个从文档批量生成多选题的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - Quiz / DocumentChunk 数据模型与文档加载器
//! - Quiz 只能由解析器从通过校验的 JSON 构造
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个输入
//! - `TextChunker` - 带重叠的文本分块能力
//! - `PromptBuilder` - 提示词渲染能力（格式契约转义注入）
//! - `QuizParser` - 模型回复解析与校验能力
//! - `LlmProvider` - LLM 调用能力（OpenAI 兼容 / Gemini）
//! - `ReportWriter` - 报告渲染与落盘能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个批次"的完整处理流程
//! - `BatchCtx` - 上下文封装（batch_index + total_batches）
//! - `QuizFlow` - 流程编排（提交 → 解析 → 汇总，失败降级）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/generator` - 测验生成器，切分批次、管理并发
//! - `orchestrator/batch_processor` - 批量文档处理器，应用生命周期
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{DocumentChunk, LoadedDocument, Quiz};
pub use orchestrator::{App, GenerationStats, QuizGenerator};
pub use services::{
    build_provider, format_report, AnyProvider, LlmProvider, PromptBuilder, QuizParser,
    ReportWriter, TextChunker,
};
pub use workflow::{BatchCtx, BatchRequest, QuizFlow};
