//! 端到端集成测试
//!
//! 用桩提供商走完整管线：分块 → 提示词 → 批量提交 → 解析 → 报告。
//! 真实 API 的连通性测试默认忽略，需要手动运行：
//! `cargo test -- --ignored`

use quiz_generator::utils::logging;
use quiz_generator::{
    build_provider, format_report, AppError, AppResult, Config, DocumentChunk, LlmProvider,
    QuizGenerator,
};

/// 模拟真实模型的回复：JSON 数组外包着客套话和 markdown 围栏
const WRAPPED_RESPONSE: &str = r#"Sure! Here are the quizzes you asked for:

```json
[
    {
        "question": "What is the capital of France?",
        "options": ["Berlin", "Madrid", "Paris", "Rome"],
        "answer": "C",
        "reasoning": "Paris is the capital city of France."
    },
    {
        "question": "Which planet is known as the Red Planet?",
        "options": ["Venus", "Mars", "Jupiter", "Saturn"],
        "answer": "Mars",
        "reasoning": "Mars appears red due to iron oxide on its surface."
    }
]
```

Hope this helps!"#;

/// 桩提供商：每条提示词固定回两道题
struct CannedProvider;

impl LlmProvider for CannedProvider {
    fn model_name(&self) -> &str {
        "canned"
    }

    async fn invoke(&self, _prompt: &str) -> AppResult<String> {
        Ok(WRAPPED_RESPONSE.to_string())
    }
}

/// 桩提供商：批次里出现标记词就整批失败
struct PartialFailureProvider;

impl LlmProvider for PartialFailureProvider {
    fn model_name(&self) -> &str {
        "partial-failure"
    }

    async fn invoke(&self, prompt: &str) -> AppResult<String> {
        if prompt.contains("explode") {
            return Err(AppError::Other("模拟提供商故障".to_string()));
        }
        Ok(WRAPPED_RESPONSE.to_string())
    }

    async fn batch_invoke(&self, prompts: &[String]) -> AppResult<Vec<AppResult<String>>> {
        if prompts.iter().any(|p| p.contains("whole-batch-down")) {
            return Err(AppError::Other("模拟整批故障".to_string()));
        }
        let mut replies = Vec::new();
        for p in prompts {
            replies.push(self.invoke(p).await);
        }
        Ok(replies)
    }
}

/// 桩提供商：永远失败
struct DeadProvider;

impl LlmProvider for DeadProvider {
    fn model_name(&self) -> &str {
        "dead"
    }

    async fn invoke(&self, _prompt: &str) -> AppResult<String> {
        Err(AppError::Other("服务不可用".to_string()))
    }
}

fn test_config() -> Config {
    Config {
        chunk_size: 80,
        chunk_overlap: 10,
        batch_size: 2,
        max_concurrent_batches: 2,
        ..Config::default()
    }
}

fn chunks(texts: &[&str]) -> Vec<DocumentChunk> {
    texts.iter().map(|t| DocumentChunk::new(*t)).collect()
}

#[tokio::test]
async fn test_full_pipeline_from_text() {
    logging::init();

    let generator = QuizGenerator::new(&test_config(), CannedProvider).expect("配置应当合法");

    let text = "The quick brown fox jumps over the lazy dog. \
                Pack my box with five dozen liquor jugs. "
        .repeat(6);

    let quizzes = generator.generate_from_text(&text, "fox.txt", 2).await;

    // 每个分块回两道题
    assert!(!quizzes.is_empty());
    assert_eq!(quizzes.len() % 2, 0);
    for quiz in &quizzes {
        assert_eq!(quiz.options.len(), 4);
        assert!(!quiz.question.is_empty());
        assert!(!quiz.answer.is_empty());
    }

    // 报告渲染：字段逐项出现，两次渲染结果一致
    let report = format_report(&quizzes);
    assert!(report.contains("Question 1: What is the capital of France?"));
    assert!(report.contains("A: Berlin"));
    assert!(report.contains("Answer: C"));
    assert!(report.contains("Answer: Mars"));
    assert!(report.contains("Reasoning: Paris is the capital city of France."));
    assert_eq!(report, format_report(&quizzes));
}

#[tokio::test]
async fn test_one_failed_batch_does_not_abort_generation() {
    logging::init();

    let generator =
        QuizGenerator::new(&test_config(), PartialFailureProvider).expect("配置应当合法");

    // batch_size=2：第二批（c3 / whole-batch-down）整批失败
    let quizzes = generator
        .generate(&chunks(&["c1", "c2", "c3", "whole-batch-down", "c5"]), 2)
        .await;

    // 其余两批照常产出：3 个分块 × 2 道题
    assert_eq!(quizzes.len(), 6);
}

#[tokio::test]
async fn test_single_item_failure_only_loses_that_item() {
    logging::init();

    let generator =
        QuizGenerator::new(&test_config(), PartialFailureProvider).expect("配置应当合法");

    let quizzes = generator.generate(&chunks(&["c1", "explode"]), 2).await;

    // 同批里只丢失败的那条
    assert_eq!(quizzes.len(), 2);
}

#[tokio::test]
async fn test_all_batches_failing_yields_empty_not_panic() {
    logging::init();

    let generator = QuizGenerator::new(&test_config(), DeadProvider).expect("配置应当合法");

    let quizzes = generator.generate(&chunks(&["c1", "c2", "c3"]), 2).await;

    assert!(quizzes.is_empty());
}

#[test]
fn test_build_provider_rejects_unknown_backend() {
    let config = Config {
        llm_provider: "carrier-pigeon".to_string(),
        ..Config::default()
    };
    assert!(build_provider(&config).is_err());
}

/// 真实 API 端到端测试
///
/// 需要配置 LLM_PROVIDER / LLM_API_KEY / LLM_API_BASE_URL / LLM_MODEL_NAME，
/// 运行方式：cargo test test_generate_live -- --ignored --nocapture
#[tokio::test]
#[ignore]
async fn test_generate_live() {
    logging::init();

    let config = Config::from_env();
    let provider = build_provider(&config).expect("构建提供商失败");
    let generator = QuizGenerator::new(&config, provider).expect("创建生成器失败");

    let text = "The Great Wall of China is a series of fortifications built \
                across the historical northern borders of ancient Chinese states. \
                Construction began as early as the 7th century BC.";

    let quizzes = generator.generate_from_text(text, "great-wall.txt", 2).await;

    println!("\n========== 生成结果 ==========");
    println!("{}", format_report(&quizzes));
    println!("==============================\n");

    assert!(!quizzes.is_empty(), "真实模型应当至少生成一道题");
}
