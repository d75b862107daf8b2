//! 文本分块服务 - 业务能力层
//!
//! 只负责"把长文本切成带重叠的有界分块"能力，不关心流程
//!
//! ## 分块规则
//!
//! 1. 每块最多 `chunk_size` 个字符
//! 2. 除第一块外，每块从上一块结束位置往前 `chunk_overlap` 个字符开始
//! 3. 切点优先落在段落边界（空行），其次句子边界，最后硬切
//! 4. 边界搜索只在分块尾部的容忍窗口内进行，保证每块长度始终大于重叠量
//!
//! 纯转换，无副作用；对同一输入可反复惰性迭代。

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::DocumentChunk;
use regex::Regex;

/// 文本分块器
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    sentence_end: Regex,
}

impl TextChunker {
    /// 创建新的分块器
    ///
    /// # 参数
    /// - `chunk_size`: 分块大小（字符数），必须大于 0
    /// - `chunk_overlap`: 重叠字符数，必须小于 `chunk_size`
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> AppResult<Self> {
        if chunk_size == 0 || chunk_overlap >= chunk_size {
            return Err(AppError::invalid_chunk_params(chunk_size, chunk_overlap));
        }

        // 句子边界：中英文句末标点后跟空白
        let sentence_end = Regex::new(r"[.!?。！？]\s")
            .map_err(|e| AppError::Other(format!("句子边界正则编译失败: {}", e)))?;

        Ok(Self {
            chunk_size,
            chunk_overlap,
            sentence_end,
        })
    }

    /// 从配置创建分块器
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// 惰性分块迭代器
    ///
    /// 每次调用都从头开始，产出有限个按原文顺序排列的切片。
    /// 不做任何修剪，去掉重叠后的拼接结果与原文逐字符一致。
    pub fn chunk_iter<'a>(&'a self, text: &'a str) -> Chunks<'a> {
        Chunks {
            chunker: self,
            text,
            pos: 0,
        }
    }

    /// 把一篇文档切成带元数据的分块列表
    pub fn chunk_document(&self, text: &str, source: &str) -> Vec<DocumentChunk> {
        let mut chunks = Vec::new();
        let mut char_offset = 0usize;

        for (index, piece) in self.chunk_iter(text).enumerate() {
            chunks.push(
                DocumentChunk::new(piece)
                    .with_metadata("source", source)
                    .with_metadata("chunk_index", index.to_string())
                    .with_metadata("char_offset", char_offset.to_string()),
            );
            char_offset += piece.chars().count() - self.chunk_overlap.min(piece.chars().count());
        }

        chunks
    }

    /// 在分块尾部的容忍窗口内寻找切点（字节偏移）
    ///
    /// `ends[k]` 是 `rest` 中第 k 个字符的字节偏移，
    /// `window_end` 是硬切位置（恰好 `chunk_size` 个字符处）。
    fn find_cut(&self, rest: &str, ends: &[usize], window_end: usize) -> usize {
        // 容忍窗口不能大到让分块缩短至重叠量以内
        let tolerance = (self.chunk_size / 5).min(self.chunk_size - self.chunk_overlap - 1);
        if tolerance == 0 {
            return window_end;
        }

        let search_start = ends[self.chunk_size - tolerance];
        let window = &rest[search_start..window_end];

        // 优先段落边界
        if let Some(i) = window.rfind("\n\n") {
            return search_start + i + 2;
        }

        // 其次句子边界（取窗口内最后一个）
        if let Some(m) = self.sentence_end.find_iter(window).last() {
            return search_start + m.end();
        }

        // 兜底：硬切
        window_end
    }
}

/// 分块迭代器
pub struct Chunks<'a> {
    chunker: &'a TextChunker,
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let text: &'a str = self.text;
        if self.pos >= text.len() {
            return None;
        }

        let rest = &text[self.pos..];

        // 前 chunk_size + 1 个字符的字节偏移
        let ends: Vec<usize> = rest
            .char_indices()
            .map(|(i, _)| i)
            .take(self.chunker.chunk_size + 1)
            .collect();

        if ends.len() <= self.chunker.chunk_size {
            // 剩余不足一个完整分块，整体作为最后一块
            self.pos = text.len();
            return Some(rest);
        }

        let window_end = ends[self.chunker.chunk_size];
        let cut = self.chunker.find_cut(rest, &ends, window_end);
        let chunk = &rest[..cut];

        // 下一块从切点往前 chunk_overlap 个字符开始
        let cut_chars = ends.partition_point(|&b| b < cut);
        self.pos += ends[cut_chars - self.chunker.chunk_overlap];

        Some(chunk)
    }
}
