//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文档的处理和生命周期管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、构建提供商、创建生成器
//! 2. **批量加载**：扫描并加载目录下所有待处理的文档
//! 3. **逐篇生成**：每篇文档走完整的分块 → 生成管线
//! 4. **报告输出**：汇总所有题目写入报告文件
//! 5. **全局统计**：汇总文档数、题目数、空结果数
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个批次的细节
//! - **向下委托**：委托 QuizGenerator 处理单篇文档

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{load_all_documents, LoadedDocument, Quiz};
use crate::orchestrator::generator::QuizGenerator;
use crate::services::{build_provider, AnyProvider, ReportWriter};
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    generator: QuizGenerator<AnyProvider>,
    report_writer: ReportWriter,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;

        crate::utils::logging::log_startup(&config);

        let provider = build_provider(&config)?;
        let generator = QuizGenerator::new(&config, provider)?;
        let report_writer = ReportWriter::with_path(config.output_report_file.as_str());

        Ok(Self {
            config,
            generator,
            report_writer,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<()> {
        // 加载所有待处理的文档
        let documents = self.load_documents().await?;

        if documents.is_empty() {
            warn!("⚠️ 没有找到待处理的文档，程序结束");
            return Ok(());
        }

        crate::utils::logging::log_documents_loaded(documents.len());

        // 逐篇处理
        let (quizzes, stats) = self.process_all_documents(&documents).await;

        // 写入报告
        self.report_writer.write(&quizzes).await?;
        info!("报告已保存至: {}", self.config.output_report_file);

        // 输出最终统计
        print_final_stats(&stats);

        Ok(())
    }

    /// 加载文档
    async fn load_documents(&self) -> AppResult<Vec<LoadedDocument>> {
        info!("\n📁 正在扫描待处理的文档...");
        load_all_documents(&self.config.docs_folder).await
    }

    /// 处理所有文档
    async fn process_all_documents(
        &self,
        documents: &[LoadedDocument],
    ) -> (Vec<Quiz>, GenerationStats) {
        let mut all_quizzes = Vec::new();
        let mut stats = GenerationStats {
            documents: documents.len(),
            ..Default::default()
        };

        for (index, document) in documents.iter().enumerate() {
            log_document_start(index + 1, documents.len(), &document.source);

            let quizzes = self
                .generator
                .generate_from_text(
                    &document.text,
                    &document.source,
                    self.config.questions_per_chunk,
                )
                .await;

            if quizzes.is_empty() {
                warn!("⚠️ 文档 {} 没有生成任何题目", document.source);
                stats.empty_documents += 1;
            }

            stats.quizzes += quizzes.len();
            all_quizzes.extend(quizzes);
        }

        (all_quizzes, stats)
    }
}

/// 处理统计
#[derive(Debug, Default)]
pub struct GenerationStats {
    /// 处理的文档总数
    pub documents: usize,
    /// 没有产出任何题目的文档数
    pub empty_documents: usize,
    /// 生成的题目总数
    pub quizzes: usize,
}

// ========== 日志辅助函数 ==========

fn log_document_start(index: usize, total: usize, source: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📄 开始处理第 {}/{} 篇文档: {}", index, total, source);
    info!("{}", "=".repeat(60));
}

fn print_final_stats(stats: &GenerationStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 文档: {} 篇，题目: {} 道", stats.documents, stats.quizzes);
    if stats.empty_documents > 0 {
        info!("⚠️ 其中 {} 篇文档没有产出题目", stats.empty_documents);
    }
    info!("{}", "=".repeat(60));
}
