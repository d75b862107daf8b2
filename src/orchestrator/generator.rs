//! 测验生成器 - 编排层
//!
//! ## 职责
//!
//! 本模块是生成管线对外的核心入口，负责把分块序列变成题目列表。
//!
//! ## 核心功能
//!
//! 1. **请求构建**：每个分块渲染一条提示词
//! 2. **批次切分**：按 batch_size 切分，全部批次都会被处理
//! 3. **并发控制**：使用 Semaphore 限制同时在途的批次数量
//! 4. **结果汇总**：先收集各批结果，再按提交顺序拼接（无锁）
//!
//! ## 失败策略
//!
//! `generate` 永远返回列表，绝不返回错误：提供商或解析失败只会让
//! 对应批次/响应贡献零道题。只有构造期的配置错误会立即失败。

use crate::config::Config;
use crate::models::{DocumentChunk, Quiz};
use crate::services::{LlmProvider, PromptBuilder, TextChunker};
use crate::workflow::{BatchCtx, BatchRequest, QuizFlow};
use crate::error::AppResult;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info};

/// 测验生成器
pub struct QuizGenerator<P: LlmProvider> {
    provider: P,
    chunker: TextChunker,
    prompt_builder: PromptBuilder,
    flow: QuizFlow,
    batch_size: usize,
    max_concurrent_batches: usize,
}

impl<P: LlmProvider> QuizGenerator<P> {
    /// 创建新的测验生成器
    ///
    /// 配置非法（分块参数、批次大小）时立即失败，这是调用方错误。
    pub fn new(config: &Config, provider: P) -> AppResult<Self> {
        config.validate()?;

        Ok(Self {
            provider,
            chunker: TextChunker::from_config(config)?,
            prompt_builder: PromptBuilder::new(),
            flow: QuizFlow::new(config),
            batch_size: config.batch_size,
            max_concurrent_batches: config.max_concurrent_batches,
        })
    }

    /// 从分块序列生成题目
    ///
    /// # 参数
    /// - `chunks`: 按原文顺序排列的分块
    /// - `questions_per_chunk`: 每个分块要求生成的题目数量
    ///
    /// # 返回
    /// 题目列表，按批次提交顺序排列；部分批次失败时结果变少，
    /// 全部失败时为空，永不报错。
    pub async fn generate(
        &self,
        chunks: &[DocumentChunk],
        questions_per_chunk: usize,
    ) -> Vec<Quiz> {
        if chunks.is_empty() {
            info!("没有分块，跳过生成");
            return Vec::new();
        }

        // 每个分块一条请求
        let requests: Vec<BatchRequest> = chunks
            .iter()
            .map(|chunk| {
                BatchRequest::new(self.prompt_builder.build(chunk, questions_per_chunk).render())
            })
            .collect();

        // 按批次大小切分；所有批次都会被处理
        let batches: Vec<&[BatchRequest]> = requests.chunks(self.batch_size).collect();
        let total_batches = batches.len();

        log_generation_start(
            chunks.len(),
            total_batches,
            self.batch_size,
            self.max_concurrent_batches,
        );

        let semaphore = Semaphore::new(self.max_concurrent_batches);

        let tasks = batches.into_iter().enumerate().map(|(i, batch)| {
            let ctx = BatchCtx::new(i + 1, total_batches, batch.len());
            let semaphore = &semaphore;
            async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        error!("{} 获取并发许可失败: {}", ctx, e);
                        return Vec::new();
                    }
                };
                info!("{} 📤 开始提交...", ctx);
                self.flow.run_batch(&self.provider, batch, &ctx).await
            }
        });

        // 先收集各批结果，再按提交顺序拼接，避免加锁
        let per_batch = join_all(tasks).await;
        let quizzes: Vec<Quiz> = per_batch.into_iter().flatten().collect();

        info!("✅ 生成完成，共 {} 道题", quizzes.len());

        quizzes
    }

    /// 从整篇文档文本生成题目（先分块再生成）
    pub async fn generate_from_text(
        &self,
        text: &str,
        source: &str,
        questions_per_chunk: usize,
    ) -> Vec<Quiz> {
        let chunks = self.chunker.chunk_document(text, source);
        info!("📄 文档 {} 切分为 {} 个分块", source, chunks.len());
        self.generate(&chunks, questions_per_chunk).await
    }
}

// ========== 日志辅助函数 ==========

fn log_generation_start(
    chunk_count: usize,
    total_batches: usize,
    batch_size: usize,
    max_concurrent: usize,
) {
    info!("{}", "=".repeat(60));
    info!(
        "📦 共 {} 个分块，分 {} 批提交（每批至多 {} 条，至多 {} 批并发）",
        chunk_count, total_batches, batch_size, max_concurrent
    );
    info!("{}", "=".repeat(60));
}
