//! 测验题数据模型
//!
//! Quiz 只能由 QuizParser 从通过校验的 JSON 构造，
//! 构造之后不再修改，格式化输出后随作用域销毁。

use crate::error::{AppError, AppResult, ValidationError};
use serde::{Deserialize, Serialize};

/// 每道题固定的选项数量
pub const OPTION_COUNT: usize = 4;

/// 选项标号（A-D）
pub const OPTION_LABELS: [&str; OPTION_COUNT] = ["A", "B", "C", "D"];

/// 一道多选题记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    /// 题干
    pub question: String,
    /// 四个选项，顺序有意义
    pub options: Vec<String>,
    /// 正确答案：选项原文或 A-D 标号
    pub answer: String,
    /// 解析说明
    pub reasoning: String,
}

impl Quiz {
    /// 校验单条记录是否满足不变量
    ///
    /// `index` 是记录在响应数组中的位置，仅用于错误信息。
    pub fn validate(&self, index: usize) -> AppResult<()> {
        if self.question.trim().is_empty() {
            return Err(AppError::Validation(ValidationError::EmptyField {
                index,
                field: "question",
            }));
        }
        if self.options.len() != OPTION_COUNT {
            return Err(AppError::Validation(ValidationError::OptionCount {
                index,
                found: self.options.len(),
            }));
        }
        let answer = self.answer.trim();
        if answer.is_empty() {
            return Err(AppError::Validation(ValidationError::EmptyField {
                index,
                field: "answer",
            }));
        }
        if !self.options.iter().any(|o| o == answer) && !OPTION_LABELS.contains(&answer) {
            return Err(AppError::Validation(ValidationError::AnswerMismatch {
                index,
                answer: self.answer.clone(),
            }));
        }
        Ok(())
    }
}
