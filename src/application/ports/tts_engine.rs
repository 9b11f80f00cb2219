//! TTS Engine Port - 语音合成引擎抽象
//!
//! 定义语音合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Empty text")]
    EmptyText,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// TTS 合成请求
#[derive(Debug, Clone)]
pub struct SynthRequest {
    /// 要合成的文本内容
    pub text: String,
    /// 语言代码（如 "en"）
    pub lang: String,
}

/// TTS 合成响应
#[derive(Debug, Clone)]
pub struct SynthResponse {
    /// MP3 音频数据
    pub audio_data: Vec<u8>,
}

/// TTS Engine Port
///
/// 外部语音合成服务的抽象接口
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 执行语音合成
    ///
    /// 把文本和语言代码发给合成服务，返回 MP3 音频数据
    async fn synthesize(&self, request: SynthRequest) -> Result<SynthResponse, TtsError>;
}
