use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 分块大小（字符数）
    pub chunk_size: usize,
    /// 相邻分块之间的重叠字符数
    pub chunk_overlap: usize,
    /// 每个分块生成的题目数量
    pub questions_per_chunk: usize,
    /// 每批提交给 LLM 的提示词数量
    pub batch_size: usize,
    /// 同时在途的批次数量上限
    pub max_concurrent_batches: usize,
    /// 单个批次调用的超时时间（秒）
    pub request_timeout_secs: u64,
    /// 待处理文档存放目录
    pub docs_folder: String,
    /// 输出报告文件
    pub output_report_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    /// 提供商选择: openai / groq / gemini
    pub llm_provider: String,
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
            questions_per_chunk: 2,
            batch_size: 5,
            max_concurrent_batches: 2,
            request_timeout_secs: 120,
            docs_folder: "documents".to_string(),
            output_report_file: "quiz_report.txt".to_string(),
            verbose_logging: false,
            llm_provider: "openai".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            chunk_size: std::env::var("CHUNK_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.chunk_size),
            chunk_overlap: std::env::var("CHUNK_OVERLAP").ok().and_then(|v| v.parse().ok()).unwrap_or(default.chunk_overlap),
            questions_per_chunk: std::env::var("QUESTIONS_PER_CHUNK").ok().and_then(|v| v.parse().ok()).unwrap_or(default.questions_per_chunk),
            batch_size: std::env::var("BATCH_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.batch_size),
            max_concurrent_batches: std::env::var("MAX_CONCURRENT_BATCHES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_batches),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            docs_folder: std::env::var("DOCS_FOLDER").unwrap_or(default.docs_folder),
            output_report_file: std::env::var("OUTPUT_REPORT_FILE").unwrap_or(default.output_report_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            llm_provider: std::env::var("LLM_PROVIDER").unwrap_or(default.llm_provider),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
        }
    }

    /// 从 TOML 配置文件加载，环境变量不参与
    pub async fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            AppError::Config(ConfigError::FileParseFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;

        Ok(config)
    }

    /// 校验配置合法性
    ///
    /// 分块参数非法属于调用方错误，必须立即失败，
    /// 不能像提供商错误那样降级处理。
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(AppError::invalid_chunk_params(
                self.chunk_size,
                self.chunk_overlap,
            ));
        }
        if self.batch_size == 0 {
            return Err(AppError::Config(ConfigError::InvalidBatchSize {
                batch_size: self.batch_size,
            }));
        }
        if self.max_concurrent_batches == 0 {
            return Err(AppError::Config(ConfigError::InvalidBatchSize {
                batch_size: self.max_concurrent_batches,
            }));
        }
        Ok(())
    }
}
