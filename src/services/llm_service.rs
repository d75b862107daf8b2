//! LLM 服务 - 业务能力层
//!
//! 只负责"调用 LLM"能力，不关心流程
//!
//! ## 技术栈
//! - `LlmProvider` 是统一的能力接口（单次调用 + 批量调用）
//! - `OpenAiProvider` 基于 `async-openai`，兼容 OpenAI API 的服务
//!   （OpenAI、Groq、Azure、Doubao 等）都走这一个实现
//! - `GeminiProvider` 基于 `reqwest` 直连 Generative Language REST API
//! - 提供商通过配置显式选择，不做任何运行时反射

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError, ProviderError};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use futures::future::join_all;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// LLM 能力接口
///
/// 实现方只需提供 `invoke`；`batch_invoke` 默认并发复用单次调用。
pub trait LlmProvider {
    /// 当前使用的模型名（用于日志和错误信息）
    fn model_name(&self) -> &str;

    /// 发送单条提示词，返回模型回复文本
    async fn invoke(&self, prompt: &str) -> AppResult<String>;

    /// 批量发送提示词
    ///
    /// 返回值与输入顺序一一对应；单项失败体现在对应位置的 Err 上，
    /// 不会中断整批。只有整体性故障才返回外层 Err。
    async fn batch_invoke(&self, prompts: &[String]) -> AppResult<Vec<AppResult<String>>> {
        debug!("批量调用 LLM，共 {} 条提示词", prompts.len());
        let replies = join_all(prompts.iter().map(|p| self.invoke(p))).await;
        Ok(replies)
    }
}

// ========== OpenAI 兼容提供商 ==========

/// OpenAI 兼容提供商
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl OpenAiProvider {
    /// 创建新的 OpenAI 兼容提供商
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }
}

impl LlmProvider for OpenAiProvider {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn invoke(&self, prompt: &str) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.len());

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| AppError::provider_call_failed(&self.model_name, e))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(0.0)
            .max_tokens(2048u32)
            .build()
            .map_err(|e| AppError::provider_call_failed(&self.model_name, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::provider_call_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                AppError::Provider(ProviderError::EmptyContent {
                    model: self.model_name.clone(),
                })
            })?;

        Ok(content.trim().to_string())
    }
}

// ========== Gemini 提供商 ==========

/// Gemini 提供商（Generative Language REST API）
pub struct GeminiProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model_name: String,
}

impl GeminiProvider {
    /// 创建新的 Gemini 提供商
    ///
    /// base_url 取配置值，例如 `https://generativelanguage.googleapis.com`
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.llm_api_key.clone(),
            base_url: config.llm_api_base_url.trim_end_matches('/').to_string(),
            model_name: config.llm_model_name.clone(),
        }
    }
}

impl LlmProvider for GeminiProvider {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn invoke(&self, prompt: &str) -> AppResult<String> {
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model_name
        );

        debug!("调用 Gemini API: {}", endpoint);

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": { "temperature": 0.0 }
        });

        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Gemini 请求失败: {}", e);
                AppError::request_failed(&endpoint, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.ok();
            return Err(AppError::Provider(ProviderError::BadResponse {
                endpoint,
                code: Some(status.as_u16()),
                message,
            }));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| AppError::request_failed(&endpoint, e))?;

        let text = value["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                AppError::Provider(ProviderError::EmptyContent {
                    model: self.model_name.clone(),
                })
            })?;

        Ok(text.trim().to_string())
    }
}

// ========== 提供商选择 ==========

/// 按配置选出的提供商
pub enum AnyProvider {
    OpenAi(OpenAiProvider),
    Gemini(GeminiProvider),
}

impl LlmProvider for AnyProvider {
    fn model_name(&self) -> &str {
        match self {
            AnyProvider::OpenAi(p) => p.model_name(),
            AnyProvider::Gemini(p) => p.model_name(),
        }
    }

    async fn invoke(&self, prompt: &str) -> AppResult<String> {
        match self {
            AnyProvider::OpenAi(p) => p.invoke(prompt).await,
            AnyProvider::Gemini(p) => p.invoke(prompt).await,
        }
    }
}

/// 根据配置构建提供商
///
/// groq 走 OpenAI 兼容实现（API 形状相同，只是 base_url 不同）。
pub fn build_provider(config: &Config) -> AppResult<AnyProvider> {
    match config.llm_provider.to_lowercase().as_str() {
        "openai" | "groq" => Ok(AnyProvider::OpenAi(OpenAiProvider::new(config))),
        "gemini" => Ok(AnyProvider::Gemini(GeminiProvider::new(config))),
        other => Err(AppError::Config(ConfigError::UnsupportedProvider {
            name: other.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(provider: &str) -> Config {
        Config {
            llm_provider: provider.to_string(),
            llm_model_name: "test-model".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_build_provider_openai() {
        let provider = build_provider(&test_config("openai")).unwrap();
        assert!(matches!(provider, AnyProvider::OpenAi(_)));
        assert_eq!(provider.model_name(), "test-model");
    }

    #[test]
    fn test_build_provider_groq_uses_openai_impl() {
        let provider = build_provider(&test_config("groq")).unwrap();
        assert!(matches!(provider, AnyProvider::OpenAi(_)));
    }

    #[test]
    fn test_build_provider_gemini() {
        let provider = build_provider(&test_config("gemini")).unwrap();
        assert!(matches!(provider, AnyProvider::Gemini(_)));
    }

    #[test]
    fn test_build_provider_rejects_unknown() {
        let result = build_provider(&test_config("llama-on-a-toaster"));
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::UnsupportedProvider { .. }))
        ));
    }

    /// 桩提供商：提示词里带 fail 字样就失败
    struct FlakyProvider;

    impl LlmProvider for FlakyProvider {
        fn model_name(&self) -> &str {
            "flaky"
        }

        async fn invoke(&self, prompt: &str) -> AppResult<String> {
            if prompt.contains("fail") {
                Err(AppError::Provider(ProviderError::EmptyContent {
                    model: "flaky".to_string(),
                }))
            } else {
                Ok(format!("echo: {}", prompt))
            }
        }
    }

    #[tokio::test]
    async fn test_default_batch_invoke_isolates_failures() {
        let provider = FlakyProvider;
        let prompts = vec![
            "one".to_string(),
            "fail two".to_string(),
            "three".to_string(),
        ];

        let replies = provider.batch_invoke(&prompts).await.unwrap();

        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0].as_ref().unwrap(), "echo: one");
        assert!(replies[1].is_err());
        assert_eq!(replies[2].as_ref().unwrap(), "echo: three");
    }

    /// 测试真实 API 连接性
    ///
    /// 运行方式：
    /// ```bash
    /// cargo test test_invoke_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_invoke_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env();
        let provider = build_provider(&config).expect("构建提供商失败");

        let result = provider.invoke("Reply with the single word: pong").await;

        match result {
            Ok(response) => {
                println!("\n========== LLM 响应 ==========");
                println!("{}", response);
                println!("==============================\n");
                assert!(!response.is_empty());
            }
            Err(e) => {
                panic!("LLM API 测试失败: {}", e);
            }
        }
    }
}
