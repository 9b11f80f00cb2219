//! Audio Store Port - 出站端口
//!
//! 定义合成音频持久化的抽象接口

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 音频存储错误
#[derive(Debug, Error)]
pub enum AudioStoreError {
    #[error("IO error: {0}")]
    IoError(String),
}

/// Audio Store Port - 出站端口
///
/// 按上传文件名持久化合成音频
#[async_trait]
pub trait AudioStorePort: Send + Sync {
    /// 根据上传文件名推导输出路径（`<uploads_dir>/<filename>.mp3`）
    fn audio_path(&self, source_filename: &str) -> PathBuf;

    /// 保存音频数据
    ///
    /// 输出目录不存在时自动创建；已存在的同名文件会被覆盖。
    async fn save(&self, source_filename: &str, data: &[u8]) -> Result<PathBuf, AudioStoreError>;
}
