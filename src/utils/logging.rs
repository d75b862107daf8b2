//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use crate::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志订阅器
///
/// 日志级别通过 RUST_LOG 控制，缺省 info；重复调用安全（测试里
/// 每个用例都可能先调一次）。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量测验生成模式");
    info!("📊 提供商: {} | 模型: {}", config.llm_provider, config.llm_model_name);
    info!(
        "📊 分块: {} 字符 (重叠 {}) | 每批 {} 条 | 并发 {} 批",
        config.chunk_size, config.chunk_overlap, config.batch_size, config.max_concurrent_batches
    );
    info!("{}", "=".repeat(60));
}

/// 记录文档加载信息
pub fn log_documents_loaded(total: usize) {
    info!("✓ 找到 {} 篇待处理的文档", total);
    info!("💡 每篇文档分块后按批提交\n");
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_short_passthrough() {
        assert_eq!(truncate_text("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_text_appends_ellipsis() {
        assert_eq!(truncate_text("hello world", 5), "hello...");
    }

    #[test]
    fn test_truncate_text_counts_chars_not_bytes() {
        assert_eq!(truncate_text("天地玄黄宇宙洪荒", 4), "天地玄黄...");
    }
}
