//! 批次处理上下文
//!
//! 封装"我正在处理第几批、这批有多少条提示词"这一信息

use std::fmt::Display;

/// 批次处理上下文
#[derive(Debug, Clone)]
pub struct BatchCtx {
    /// 批次编号（从1开始，仅用于日志显示）
    pub batch_index: usize,

    /// 批次总数
    pub total_batches: usize,

    /// 本批提示词数量
    pub prompt_count: usize,
}

impl BatchCtx {
    /// 创建新的批次上下文
    pub fn new(batch_index: usize, total_batches: usize, prompt_count: usize) -> Self {
        Self {
            batch_index,
            total_batches,
            prompt_count,
        }
    }
}

impl Display for BatchCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[批次 {}/{} 共{}条]",
            self.batch_index, self.total_batches, self.prompt_count
        )
    }
}
