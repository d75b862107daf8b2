//! 纯文本文档加载器
//!
//! 文档加载对管线来说是外部协作者：给定路径，产出原始文本。
//! 当前支持 .txt / .md 纯文本；PDF 等格式应在入库前转换为文本。

use crate::error::{AppError, AppResult, FileError};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 支持的文档扩展名
const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// 一份已加载的原始文档
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// 来源文件名（仅文件名，不含目录）
    pub source: String,
    /// 文档全文
    pub text: String,
}

/// 从单个文件加载文档
pub async fn load_document(path: &Path) -> AppResult<LoadedDocument> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    if !SUPPORTED_EXTENSIONS.contains(&ext) {
        return Err(AppError::File(FileError::UnsupportedFormat {
            path: path.display().to_string(),
        }));
    }

    let text = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let source = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    Ok(LoadedDocument { source, text })
}

/// 从文件夹中加载所有支持的文档
///
/// 单个文件加载失败只记录警告并跳过，不中断整个扫描。
pub async fn load_all_documents(folder_path: &str) -> AppResult<Vec<LoadedDocument>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }));
    }

    let mut documents = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?
    {
        let path = entry.path();
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        if !SUPPORTED_EXTENSIONS.contains(&ext) {
            continue;
        }

        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_document(&path).await {
            Ok(document) => {
                tracing::info!("成功加载 {} 字符", document.text.chars().count());
                documents.push(document);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    // 保证扫描顺序稳定，便于报告复现
    documents.sort_by(|a, b| a.source.cmp(&b.source));

    Ok(documents)
}
