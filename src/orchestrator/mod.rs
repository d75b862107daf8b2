//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `generator` - 测验生成器
//! - 把分块序列变成题目列表（对外核心入口）
//! - 构建请求、切分批次、控制并发（Semaphore）
//! - 先收集再拼接，保持提交顺序
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行、报告）
//! - 批量加载文档（Vec<LoadedDocument>）
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<LoadedDocument>)
//!     ↓
//! generator (处理 Vec<DocumentChunk>)
//!     ↓
//! workflow::QuizFlow (处理单个批次)
//!     ↓
//! services (能力层：chunker / prompt / llm / parser / report)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管文档，generator 管分块
//! 2. **向下依赖**：编排层 → workflow → services
//! 3. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_processor;
pub mod generator;

// 重新导出主要类型
pub use batch_processor::{App, GenerationStats};
pub use generator::QuizGenerator;
