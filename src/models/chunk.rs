//! 文档分块数据模型

use std::collections::HashMap;

/// 一段带元数据的文档文本
///
/// 由 TextChunker 产出后不再修改，分块顺序与原文顺序一致。
/// 元数据对下游管线不透明，仅用于日志和报告溯源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunk {
    /// 分块文本内容
    pub text: String,
    /// 元数据（来源文件、分块序号、字符偏移等）
    pub metadata: HashMap<String, String>,
}

impl DocumentChunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    /// 附加一条元数据
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// 读取来源信息（缺省为 "unknown"）
    pub fn source(&self) -> &str {
        self.metadata
            .get("source")
            .map(String::as_str)
            .unwrap_or("unknown")
    }
}
