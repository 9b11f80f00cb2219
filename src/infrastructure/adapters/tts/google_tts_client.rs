//! Google TTS Client - 调用 Google Translate 的语音合成接口
//!
//! 实现 TtsEnginePort trait，通过 HTTP 调用外部合成服务
//!
//! 外部 TTS API:
//! GET https://translate.google.com/translate_tts
//!     ?ie=UTF-8&client=tw-ob&tl=<lang>&q=<text>&total=<n>&idx=<i>&textlen=<len>
//! Response: audio/mpeg binary
//!
//! 接口单次请求有长度上限，超长文本按空白边界切成 ≤100 字符的块，
//! 逐块合成后拼接 MP3 数据。

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::{SynthRequest, SynthResponse, TtsEnginePort, TtsError};

/// 单次请求的最大字符数（接口限制）
const MAX_CHARS_PER_REQUEST: usize = 100;

/// Google TTS 客户端配置
#[derive(Debug, Clone)]
pub struct GoogleTtsClientConfig {
    /// 合成服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for GoogleTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.google.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl GoogleTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Google TTS 客户端
pub struct GoogleTtsClient {
    client: Client,
    config: GoogleTtsClientConfig,
}

impl GoogleTtsClient {
    /// 创建新的 Google TTS 客户端
    pub fn new(config: GoogleTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 使用默认配置创建客户端
    pub fn with_default_config() -> Result<Self, TtsError> {
        Self::new(GoogleTtsClientConfig::default())
    }

    /// 获取合成 URL
    fn synth_url(&self) -> String {
        format!("{}/translate_tts", self.config.base_url)
    }

    /// 合成单个文本块
    async fn synthesize_chunk(
        &self,
        chunk: &str,
        lang: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, TtsError> {
        let total_param = total.to_string();
        let idx_param = idx.to_string();
        let textlen_param = chunk.chars().count().to_string();

        let response = self
            .client
            .get(self.synth_url())
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang),
                ("q", chunk),
                ("total", total_param.as_str()),
                ("idx", idx_param.as_str()),
                ("textlen", textlen_param.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        if audio.is_empty() {
            return Err(TtsError::InvalidResponse("Empty audio payload".to_string()));
        }

        Ok(audio)
    }
}

#[async_trait]
impl TtsEnginePort for GoogleTtsClient {
    async fn synthesize(&self, request: SynthRequest) -> Result<SynthResponse, TtsError> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(TtsError::EmptyText);
        }

        let chunks = split_into_chunks(text, MAX_CHARS_PER_REQUEST);
        let total = chunks.len();

        tracing::debug!(
            url = %self.synth_url(),
            lang = %request.lang,
            text_len = text.len(),
            chunks = total,
            "Sending TTS synthesis request"
        );

        let mut audio_data = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let part = self
                .synthesize_chunk(chunk, &request.lang, idx, total)
                .await?;
            audio_data.extend_from_slice(&part);
        }

        tracing::info!(
            lang = %request.lang,
            chunks = total,
            audio_size = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(SynthResponse { audio_data })
    }
}

/// 按空白边界把文本切成不超过 max_chars 个字符的块
///
/// 单个超长词自身超过上限时按字符硬切。
fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        // 当前块放不下这个词，先封块
        if current_chars > 0 && current_chars + 1 + word_chars > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        if word_chars > max_chars {
            // 超长词按字符硬切
            let mut piece = String::new();
            let mut piece_chars = 0;
            for ch in word.chars() {
                piece.push(ch);
                piece_chars += 1;
                if piece_chars == max_chars {
                    chunks.push(std::mem::take(&mut piece));
                    piece_chars = 0;
                }
            }
            if !piece.is_empty() {
                current = piece;
                current_chars = piece_chars;
            }
            continue;
        }

        if current_chars > 0 {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = GoogleTtsClientConfig::default();
        assert_eq!(config.base_url, "https://translate.google.com");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_builder() {
        let config = GoogleTtsClientConfig::new("http://localhost:9000").with_timeout(5);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = split_into_chunks("hi there", 100);
        assert_eq!(chunks, vec!["hi there"]);
    }

    #[test]
    fn test_chunks_respect_word_boundaries() {
        let chunks = split_into_chunks("aaa bbb ccc", 7);
        assert_eq!(chunks, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn test_no_chunk_exceeds_limit() {
        let text = "word ".repeat(100);
        for chunk in split_into_chunks(&text, 100) {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn test_oversized_word_is_hard_split() {
        let chunks = split_into_chunks("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let client = GoogleTtsClient::with_default_config().unwrap();
        let err = client
            .synthesize(SynthRequest {
                text: "   ".to_string(),
                lang: "en".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::EmptyText));
    }
}
