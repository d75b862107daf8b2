//! 批次处理流程 - 流程层
//!
//! 核心职责：定义"一个批次"的完整处理流程
//!
//! 流程顺序：
//! 1. 整批提交给 LLM 提供商（带超时）
//! 2. 逐条响应交给 QuizParser 解析
//! 3. 拼接本批所有题目
//!
//! 失败策略：提供商级错误（超时、认证、限流）让整批降级为空结果，
//! 单条响应的失败只影响该条；错误一律记日志，绝不向上传播。

use crate::config::Config;
use crate::error::{AppError, ProviderError};
use crate::models::Quiz;
use crate::services::{LlmProvider, QuizParser};
use crate::utils::logging::truncate_text;
use crate::workflow::batch_ctx::BatchCtx;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// 一条待提交的批量请求
///
/// 每个分块生成一条，交给流程后即被消费。
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// 压平后的完整提示词
    pub prompt: String,
}

impl BatchRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// 批次处理流程
///
/// - 编排单个批次的提交与解析
/// - 不持有提供商，调用方传入
/// - 只依赖业务能力（services）
pub struct QuizFlow {
    parser: QuizParser,
    request_timeout: Duration,
    verbose_logging: bool,
}

impl QuizFlow {
    /// 创建新的批次处理流程
    pub fn new(config: &Config) -> Self {
        Self {
            parser: QuizParser::new(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 处理一个批次
    ///
    /// 永远返回列表（可能为空），不返回错误。
    pub async fn run_batch<P: LlmProvider>(
        &self,
        provider: &P,
        requests: &[BatchRequest],
        ctx: &BatchCtx,
    ) -> Vec<Quiz> {
        let prompts: Vec<String> = requests.iter().map(|r| r.prompt.clone()).collect();

        // ========== 流程 1: 整批提交（唯一的挂起点） ==========
        let replies = match timeout(self.request_timeout, provider.batch_invoke(&prompts)).await {
            Err(_) => {
                let e = AppError::Provider(ProviderError::Timeout {
                    seconds: self.request_timeout.as_secs(),
                });
                error!("{} ⚠️ 批次调用失败: {}", ctx, e);
                return Vec::new();
            }
            Ok(Err(e)) => {
                error!("{} ⚠️ 批次调用失败: {}", ctx, e);
                return Vec::new();
            }
            Ok(Ok(replies)) => replies,
        };

        // ========== 流程 2: 逐条解析 ==========
        let mut quizzes = Vec::new();

        for (i, reply) in replies.into_iter().enumerate() {
            match reply {
                Ok(text) => {
                    if self.verbose_logging {
                        debug!("{} 第 {} 条响应: {}", ctx, i + 1, truncate_text(&text, 200));
                    }
                    let parsed = self.parser.parse(&text);
                    if parsed.is_empty() {
                        warn!("{} ⚠️ 第 {} 条响应未解析出题目", ctx, i + 1);
                    }
                    quizzes.extend(parsed);
                }
                Err(e) => {
                    warn!("{} ⚠️ 第 {} 条响应失败: {}", ctx, i + 1, e);
                }
            }
        }

        info!("{} ✓ 批次完成，得到 {} 道题", ctx, quizzes.len());

        quizzes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppResult;

    const VALID_RESPONSE: &str =
        r#"[{"question":"Q","options":["A","B","C","D"],"answer":"A","reasoning":"R"}]"#;

    /// 桩提供商：按提示词内容决定行为
    struct ScriptedProvider;

    impl LlmProvider for ScriptedProvider {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn invoke(&self, prompt: &str) -> AppResult<String> {
            if prompt.contains("item-error") {
                return Err(AppError::Provider(ProviderError::EmptyContent {
                    model: "scripted".to_string(),
                }));
            }
            if prompt.contains("garbage") {
                return Ok("no json here".to_string());
            }
            Ok(VALID_RESPONSE.to_string())
        }
    }

    /// 桩提供商：整批直接失败
    struct BrokenProvider;

    impl LlmProvider for BrokenProvider {
        fn model_name(&self) -> &str {
            "broken"
        }

        async fn invoke(&self, _prompt: &str) -> AppResult<String> {
            unreachable!("batch_invoke 被覆盖后不应走到这里")
        }

        async fn batch_invoke(&self, _prompts: &[String]) -> AppResult<Vec<AppResult<String>>> {
            Err(AppError::Provider(ProviderError::BadResponse {
                endpoint: "test".to_string(),
                code: Some(401),
                message: None,
            }))
        }
    }

    /// 桩提供商：永远卡住
    struct HangingProvider;

    impl LlmProvider for HangingProvider {
        fn model_name(&self) -> &str {
            "hanging"
        }

        async fn invoke(&self, _prompt: &str) -> AppResult<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    fn flow() -> QuizFlow {
        QuizFlow::new(&Config::default())
    }

    fn requests(prompts: &[&str]) -> Vec<BatchRequest> {
        prompts.iter().map(|p| BatchRequest::new(*p)).collect()
    }

    #[tokio::test]
    async fn test_run_batch_collects_all_items() {
        let quizzes = flow()
            .run_batch(
                &ScriptedProvider,
                &requests(&["p1", "p2"]),
                &BatchCtx::new(1, 1, 2),
            )
            .await;
        assert_eq!(quizzes.len(), 2);
    }

    #[tokio::test]
    async fn test_run_batch_isolates_item_failures() {
        let quizzes = flow()
            .run_batch(
                &ScriptedProvider,
                &requests(&["p1", "item-error", "garbage", "p4"]),
                &BatchCtx::new(1, 1, 4),
            )
            .await;
        // 一条失败、一条解析不出，剩两条有效
        assert_eq!(quizzes.len(), 2);
    }

    #[tokio::test]
    async fn test_run_batch_degrades_on_provider_error() {
        let quizzes = flow()
            .run_batch(&BrokenProvider, &requests(&["p1"]), &BatchCtx::new(1, 1, 1))
            .await;
        assert!(quizzes.is_empty());
    }

    #[tokio::test]
    async fn test_run_batch_degrades_on_timeout() {
        let config = Config {
            request_timeout_secs: 1,
            ..Config::default()
        };
        let quizzes = QuizFlow::new(&config)
            .run_batch(&HangingProvider, &requests(&["p1"]), &BatchCtx::new(1, 1, 1))
            .await;
        assert!(quizzes.is_empty());
    }
}
