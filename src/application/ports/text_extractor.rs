//! Text Extractor Port - 文档文本提取抽象
//!
//! 定义从幻灯片文档提取文本的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 文本提取错误
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Cannot open document: {0}")]
    OpenFailed(String),

    #[error("Malformed document: {0}")]
    Malformed(String),
}

/// Text Extractor Port
///
/// 打开幻灯片文档，按文档顺序收集所有文本片段。
/// 只读操作，不修改文档。
#[async_trait]
pub trait TextExtractorPort: Send + Sync {
    /// 提取文档中的全部文本
    ///
    /// 文本片段按 幻灯片 → 形状 → 段落 → 文本run 的顺序收集，
    /// 无分隔符拼接后去除首尾空白。没有文本的文档返回空字符串。
    async fn extract_text(&self, path: &Path) -> Result<String, ExtractError>;
}
