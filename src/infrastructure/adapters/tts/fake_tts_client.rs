//! Fake TTS Client - 用于测试的 TTS 客户端
//!
//! 始终返回固定的音频数据，不实际调用合成服务；
//! 可配置为强制失败，用于演练流水线的失败路径

use async_trait::async_trait;

use crate::application::ports::{SynthRequest, SynthResponse, TtsEnginePort, TtsError};

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 固定返回的音频数据
    pub audio_data: Vec<u8>,
    /// 强制每次合成失败
    pub always_fail: bool,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            audio_data: b"fake mp3 audio".to_vec(),
            always_fail: false,
        }
    }
}

/// Fake TTS Client
///
/// 用于测试，返回配置的固定音频数据
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
}

impl FakeTtsClient {
    /// 创建新的 FakeTtsClient
    pub fn new(config: FakeTtsClientConfig) -> Self {
        Self { config }
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SynthRequest) -> Result<SynthResponse, TtsError> {
        if request.text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }
        if self.config.always_fail {
            return Err(TtsError::ServiceError("forced failure".to_string()));
        }

        tracing::debug!(
            text_len = request.text.len(),
            lang = %request.lang,
            "FakeTtsClient: returning fixed audio"
        );

        Ok(SynthResponse {
            audio_data: self.config.audio_data.clone(),
        })
    }
}
