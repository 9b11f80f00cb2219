//! 应用层错误定义
//!
//! 转换流水线按阶段分类的错误类型

use thiserror::Error;

use crate::application::ports::{AudioStoreError, TtsError};

/// 转换流水线错误
///
/// 每个阶段失败对应一个变体，编排器在失败转移处统一记录日志
#[derive(Debug, Error)]
pub enum ConvertError {
    /// 文档无法读取或不含任何文本，流水线在提取阶段终止
    #[error("No text extracted from document")]
    NoText,

    /// 合成服务拒绝输入或不可达
    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[from] TtsError),

    /// 音频落盘失败
    #[error("Failed to store audio: {0}")]
    Storage(#[from] AudioStoreError),

    /// 其他意外错误（如临时文件 IO）
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// 失败发生的阶段名（用于日志）
    pub fn stage(&self) -> &'static str {
        match self {
            ConvertError::NoText => "extract",
            ConvertError::Synthesis(_) => "synthesize",
            ConvertError::Storage(_) => "store",
            ConvertError::Internal(_) => "pipeline",
        }
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
