//! 提示词构建服务 - 业务能力层
//!
//! 只负责"把一个分块渲染成系统 + 用户两段消息"能力，不关心流程
//!
//! ## 模板规则
//!
//! - 模板里 `{name}` 是槽位，`{{` / `}}` 是转义后的字面大括号
//! - 输出格式契约（含 JSON 骨架）先整体转义再拼进系统模板，
//!   骨架里的大括号因此永远不会被当成槽位
//! - 槽位的替换值直接插入，不再二次扫描，文档内容里出现的
//!   `{number}` 之类字样原样保留
//!
//! 无状态，相同输入必然产生相同输出。

use crate::models::DocumentChunk;
use crate::services::quiz_parser::OUTPUT_FORMAT;

/// 系统提示词模板（含 {number} 槽位）
const TEMPLATE_SYSTEM_PROMPT: &str = "\
System: You are a helpful assistant skilled at creating quizzes from given documents. \
You will generate multiple-choice questions (MCQs) with four options (A, B, C, and D) for each question. \
You will also provide the correct answer and a brief reasoning for each answer. \
If more documents are provided, continue generating quizzes from the additional documents. \
The output should be in JSON format.

Document: Below is the content from which you need to generate quizzes. \
Read the content carefully and generate quiz questions based on the important points, facts, and concepts discussed in the document.

Instructions: Based on the content provided in the document, generate a set of multiple-choice questions (MCQs). \
Each question should have four options: A, B, C, and D. \
Ensure that each question is clear and unambiguous, and the correct answer is based on the information provided in the document.

Generate exactly {number} questions. \
For each question, provide the correct answer and a brief reasoning explaining why it is correct.

If more documents are provided, continue generating quizzes based on the new content.";

/// 用户消息模板（含 {document} 槽位）
const TEMPLATE_USER_DOCUMENT: &str = "Document: {document}";

/// 一对系统 + 用户消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessages {
    pub system: String,
    pub user: String,
}

impl PromptMessages {
    /// 压平成单条提示词（批量接口按单字符串提交）
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// 提示词构建器
pub struct PromptBuilder {
    /// 预拼接的系统模板：任务说明 + 转义后的格式契约
    system_template: String,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            system_template: format!(
                "{}\n\n{}",
                TEMPLATE_SYSTEM_PROMPT,
                escape_braces(OUTPUT_FORMAT)
            ),
        }
    }

    /// 为一个分块构建消息对
    ///
    /// # 参数
    /// - `chunk`: 文档分块
    /// - `question_count`: 要求生成的题目数量
    pub fn build(&self, chunk: &DocumentChunk, question_count: usize) -> PromptMessages {
        let system = render_slots(
            &self.system_template,
            &[("number", &question_count.to_string())],
        );
        let user = render_slots(TEMPLATE_USER_DOCUMENT, &[("document", &chunk.text)]);

        PromptMessages { system, user }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 把字面大括号转义成 `{{` / `}}`，防止被当成槽位
fn escape_braces(s: &str) -> String {
    s.replace('{', "{{").replace('}', "}}")
}

/// 渲染模板槽位
///
/// `{name}` 按 `slots` 替换（替换值不再扫描），`{{` / `}}` 还原为
/// 字面大括号，未知槽位原样保留。
fn render_slots(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                let mut closed = false;
                for n in chars.by_ref() {
                    if n == '}' {
                        closed = true;
                        break;
                    }
                    name.push(n);
                }
                match slots.iter().find(|(k, _)| *k == name) {
                    Some((_, value)) if closed => out.push_str(value),
                    _ => {
                        // 未知或未闭合的槽位原样保留
                        out.push('{');
                        out.push_str(&name);
                        if closed {
                            out.push('}');
                        }
                    }
                }
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str) -> DocumentChunk {
        DocumentChunk::new(text)
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = PromptBuilder::new();
        let c = chunk("some document text");
        assert_eq!(builder.build(&c, 2), builder.build(&c, 2));
    }

    #[test]
    fn test_question_count_is_substituted() {
        let builder = PromptBuilder::new();
        let messages = builder.build(&chunk("text"), 3);
        assert!(messages.system.contains("Generate exactly 3 questions"));
        assert!(!messages.system.contains("{number}"));
    }

    #[test]
    fn test_user_message_contains_only_document() {
        let builder = PromptBuilder::new();
        let messages = builder.build(&chunk("the chunk body"), 2);
        assert_eq!(messages.user, "Document: the chunk body");
    }

    #[test]
    fn test_format_contract_braces_are_literal() {
        let builder = PromptBuilder::new();
        let messages = builder.build(&chunk("text"), 2);
        // JSON 骨架必须以单层大括号出现
        assert!(messages.system.contains(r#""question": "[Write the question here]""#));
        assert!(messages.system.contains(r#""options": ["[Option A]", "[Option B]", "[Option C]", "[Option D]""#));
        assert!(!messages.system.contains("{{"));
        assert!(!messages.system.contains("}}"));
    }

    #[test]
    fn test_document_text_is_never_rescanned() {
        let builder = PromptBuilder::new();
        // 文档里出现槽位字样和大括号都必须原样保留
        let messages = builder.build(&chunk("code {number} and {braces}"), 2);
        assert_eq!(messages.user, "Document: code {number} and {braces}");
    }

    #[test]
    fn test_render_flattens_to_single_prompt() {
        let builder = PromptBuilder::new();
        let messages = builder.build(&chunk("body"), 2);
        let prompt = messages.render();
        assert!(prompt.starts_with("System: "));
        assert!(prompt.ends_with("Document: body"));
    }

    #[test]
    fn test_escape_braces_roundtrip_through_render() {
        let escaped = escape_braces(r#"{"a": 1}"#);
        assert_eq!(escaped, r#"{{"a": 1}}"#);
        assert_eq!(render_slots(&escaped, &[]), r#"{"a": 1}"#);
    }
}
