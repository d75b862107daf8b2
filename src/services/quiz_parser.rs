//! 测验题解析服务 - 业务能力层
//!
//! 只负责"把一段自由格式的模型回复解析成 Vec<Quiz>"能力，不关心流程
//!
//! ## 解析策略
//!
//! 1. 取第一个 '[' 到最后一个 ']' 的闭区间切片，容忍模型在 JSON
//!    数组外包裹的提示语、markdown 代码围栏和客套话
//! 2. 对切片做严格 JSON 解析并逐条校验（字段齐全、恰好 4 个选项）
//! 3. 任何解析或校验失败都记录日志并返回空列表，错误不越过此边界
//!
//! 注意：步骤 1 对嵌套数组是已知的脆弱点（最外层括号区间原样截取），
//! 为保持兼容刻意不做特殊处理。

use crate::error::{AppError, AppResult, ValidationError};
use crate::models::Quiz;
use crate::utils::logging::truncate_text;
use tracing::{debug, error};

/// 输出格式契约
///
/// 解析器拥有这段契约文本；PromptBuilder 把它转义后注入系统提示词，
/// 模型按此格式作答，解析器按此格式收货。
pub const OUTPUT_FORMAT: &str = r#"
The output should be in the following JSON format:

```json
[
    {
        "question": "[Write the question here]",
        "options": ["[Option A]", "[Option B]", "[Option C]", "[Option D]"],
        "answer": "[Specify the correct option]",
        "reasoning": "[Provide reasoning here]"
    },
    {
        "question": "[Write the question here]",
        "options": ["[Option A]", "[Option B]", "[Option C]", "[Option D]"],
        "answer": "[Specify the correct option]",
        "reasoning": "[Provide reasoning here]"
    },
    [More if needed]
]

Example:
[
    {
        "question": "What is the capital of France?",
        "options": ["Berlin", "Madrid", "Paris", "Rome"],
        "answer": "C",
        "reasoning": "Paris is the capital city of France, known for its cultural, political, and economic significance."
    },
    ...
]
"#;

/// 测验题解析器
pub struct QuizParser;

impl QuizParser {
    pub fn new() -> Self {
        Self
    }

    /// 解析一段模型回复
    ///
    /// 失败时记录诊断信息并返回空列表，绝不抛出错误；
    /// 成功时保持数组原有顺序。
    pub fn parse(&self, content: &str) -> Vec<Quiz> {
        match self.try_parse(content) {
            Ok(quizzes) => {
                debug!("解析成功，得到 {} 道题", quizzes.len());
                quizzes
            }
            Err(e) => {
                error!(
                    "响应校验失败: {} | 原始内容: {}",
                    e,
                    truncate_text(content, 800)
                );
                Vec::new()
            }
        }
    }

    fn try_parse(&self, content: &str) -> AppResult<Vec<Quiz>> {
        // 定位 JSON 数组：第一个 '[' 到最后一个 ']'
        let left = content
            .find('[')
            .ok_or(AppError::Validation(ValidationError::MissingBrackets))?;
        let right = content
            .rfind(']')
            .ok_or(AppError::Validation(ValidationError::MissingBrackets))?;
        if right < left {
            return Err(AppError::Validation(ValidationError::MissingBrackets));
        }

        let slice = &content[left..=right];

        let quizzes: Vec<Quiz> = serde_json::from_str(slice)?;

        for (index, quiz) in quizzes.iter().enumerate() {
            quiz.validate(index)?;
        }

        Ok(quizzes)
    }
}

impl Default for QuizParser {
    fn default() -> Self {
        Self::new()
    }
}
