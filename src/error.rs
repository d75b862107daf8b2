use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 配置错误（调用方的问题，立即失败）
    Config(ConfigError),
    /// LLM 提供商错误（在批次边界捕获，降级为空结果）
    Provider(ProviderError),
    /// 模型输出校验错误（在响应边界捕获，降级为空列表）
    Validation(ValidationError),
    /// 文件操作错误
    File(FileError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Provider(e) => write!(f, "LLM提供商错误: {}", e),
            AppError::Validation(e) => write!(f, "校验错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::Provider(e) => Some(e),
            AppError::Validation(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 分块参数非法（chunk_overlap 必须小于 chunk_size，chunk_size 必须大于 0）
    InvalidChunkParams {
        chunk_size: usize,
        chunk_overlap: usize,
    },
    /// 批次大小非法
    InvalidBatchSize {
        batch_size: usize,
    },
    /// 不支持的 LLM 提供商
    UnsupportedProvider {
        name: String,
    },
    /// 配置文件解析失败
    FileParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidChunkParams {
                chunk_size,
                chunk_overlap,
            } => {
                write!(
                    f,
                    "分块参数非法: chunk_size={}, chunk_overlap={} (要求 0 < chunk_size 且 chunk_overlap < chunk_size)",
                    chunk_size, chunk_overlap
                )
            }
            ConfigError::InvalidBatchSize { batch_size } => {
                write!(f, "批次大小非法: {} (要求至少为 1)", batch_size)
            }
            ConfigError::UnsupportedProvider { name } => {
                write!(f, "不支持的 LLM 提供商: {} (可选: openai / groq / gemini)", name)
            }
            ConfigError::FileParseFailed { path, source } => {
                write!(f, "配置文件解析失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::FileParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// LLM 提供商错误
#[derive(Debug)]
pub enum ProviderError {
    /// API 调用失败
    ApiCallFailed {
        model: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    EmptyContent {
        model: String,
    },
    /// 网络请求失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误响应
    BadResponse {
        endpoint: String,
        code: Option<u16>,
        message: Option<String>,
    },
    /// 调用超时
    Timeout {
        seconds: u64,
    },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::ApiCallFailed { model, source } => {
                write!(f, "LLM API调用失败 (模型: {}): {}", model, source)
            }
            ProviderError::EmptyContent { model } => {
                write!(f, "LLM返回内容为空 (模型: {})", model)
            }
            ProviderError::RequestFailed { endpoint, source } => {
                write!(f, "请求失败 ({}): {}", endpoint, source)
            }
            ProviderError::BadResponse {
                endpoint,
                code,
                message,
            } => {
                write!(
                    f,
                    "API返回错误响应 ({}): code={:?}, message={:?}",
                    endpoint, code, message
                )
            }
            ProviderError::Timeout { seconds } => {
                write!(f, "LLM调用超时 ({}秒)", seconds)
            }
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::ApiCallFailed { source, .. }
            | ProviderError::RequestFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 模型输出校验错误
#[derive(Debug)]
pub enum ValidationError {
    /// 响应中找不到 JSON 数组（缺少 '[' 或 ']'）
    MissingBrackets,
    /// JSON 语法错误
    JsonSyntax {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 选项数量不等于 4
    OptionCount {
        index: usize,
        found: usize,
    },
    /// 必填字段为空
    EmptyField {
        index: usize,
        field: &'static str,
    },
    /// 答案与任何选项都不匹配
    AnswerMismatch {
        index: usize,
        answer: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingBrackets => {
                write!(f, "响应中找不到 JSON 数组（缺少 '[' 或 ']'）")
            }
            ValidationError::JsonSyntax { source } => {
                write!(f, "JSON解析失败: {}", source)
            }
            ValidationError::OptionCount { index, found } => {
                write!(f, "第 {} 题选项数量为 {}，要求恰好 4 个", index + 1, found)
            }
            ValidationError::EmptyField { index, field } => {
                write!(f, "第 {} 题字段 {} 为空", index + 1, field)
            }
            ValidationError::AnswerMismatch { index, answer } => {
                write!(
                    f,
                    "第 {} 题答案 '{}' 既不是选项内容也不是 A-D 标号",
                    index + 1,
                    answer
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ValidationError::JsonSyntax { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 目录不存在
    DirectoryNotFound {
        path: String,
    },
    /// 不支持的文档格式
    UnsupportedFormat {
        path: String,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
            FileError::DirectoryNotFound { path } => write!(f, "目录不存在: {}", path),
            FileError::UnsupportedFormat { path } => {
                write!(f, "不支持的文档格式: {}", path)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. } | FileError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(ValidationError::JsonSyntax {
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(ConfigError::FileParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Provider(ProviderError::RequestFailed {
            endpoint: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建分块参数错误
    pub fn invalid_chunk_params(chunk_size: usize, chunk_overlap: usize) -> Self {
        AppError::Config(ConfigError::InvalidChunkParams {
            chunk_size,
            chunk_overlap,
        })
    }

    /// 创建LLM API调用错误
    pub fn provider_call_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Provider(ProviderError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建网络请求错误
    pub fn request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Provider(ProviderError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
