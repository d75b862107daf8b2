//! 报告服务 - 业务能力层
//!
//! 只负责"把题目列表渲染成可读文本并落盘"能力，不关心流程

use crate::error::{AppError, AppResult};
use crate::models::Quiz;
use tracing::debug;

/// 把题目列表渲染成一段可读报告
///
/// 每道题一节，从 1 开始编号，字段原样输出，不做二次校验。
/// 纯函数：同一输入反复调用结果完全一致。
pub fn format_report(quizzes: &[Quiz]) -> String {
    quizzes
        .iter()
        .enumerate()
        .map(|(i, quiz)| {
            format!(
                "Question {}: {}\nA: {}\nB: {}\nC: {}\nD: {}\nAnswer: {}\nReasoning: {}",
                i + 1,
                quiz.question,
                quiz.options[0],
                quiz.options[1],
                quiz.options[2],
                quiz.options[3],
                quiz.answer,
                quiz.reasoning
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// 报告写入服务
///
/// 职责：
/// - 把渲染好的报告写入输出文件
/// - 只处理落盘，不参与生成
pub struct ReportWriter {
    report_file_path: String,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            report_file_path: "quiz_report.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    /// 写入报告（带时间戳表头，整体覆盖）
    pub async fn write(&self, quizzes: &[Quiz]) -> AppResult<()> {
        debug!(
            "写入报告: {} | 题目数量: {}",
            self.report_file_path,
            quizzes.len()
        );

        let header = format!(
            "{}\n测验生成报告 - {}\n共 {} 道题\n{}\n\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            quizzes.len(),
            "=".repeat(60)
        );

        let content = format!("{}{}\n", header, format_report(quizzes));

        tokio::fs::write(&self.report_file_path, content)
            .await
            .map_err(|e| AppError::file_write_failed(&self.report_file_path, e))?;

        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}
