//! File Audio Store - 文件系统音频存储实现
//!
//! 实现 AudioStorePort trait

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{AudioStoreError, AudioStorePort};

/// 文件系统音频存储
///
/// 输出路径为 `<uploads_dir>/<原始文件名>.mp3`。
/// 同名文件直接覆盖：并发上传同名文件时后写者胜出。
pub struct FileAudioStore {
    /// 输出目录
    uploads_dir: PathBuf,
}

impl FileAudioStore {
    /// 创建新的文件存储
    pub fn new(uploads_dir: impl AsRef<Path>) -> Self {
        Self {
            uploads_dir: uploads_dir.as_ref().to_path_buf(),
        }
    }

    /// 获取输出目录
    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }
}

#[async_trait]
impl AudioStorePort for FileAudioStore {
    fn audio_path(&self, source_filename: &str) -> PathBuf {
        self.uploads_dir.join(format!("{}.mp3", source_filename))
    }

    async fn save(&self, source_filename: &str, data: &[u8]) -> Result<PathBuf, AudioStoreError> {
        fs::create_dir_all(&self.uploads_dir)
            .await
            .map_err(|e| AudioStoreError::IoError(e.to_string()))?;

        let audio_path = self.audio_path(source_filename);

        fs::write(&audio_path, data)
            .await
            .map_err(|e| AudioStoreError::IoError(e.to_string()))?;

        tracing::debug!(
            path = %audio_path.display(),
            size = data.len(),
            "Saved audio"
        );

        Ok(audio_path)
    }
}
