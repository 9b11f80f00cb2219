//! Convert Handler - 转换流水线编排
//!
//! 接收上传文档 → 提取文本 → 清洗 → 语音合成 → 持久化，
//! 并在流水线两端广播生命周期事件。
//!
//! 阶段转移：
//! - 开始: 广播 started，上传内容写入作用域临时目录
//! - 提取失败/无文本: `ConvertError::NoText`，不再尝试合成
//! - 合成失败: `ConvertError::Synthesis`
//! - 落盘失败: `ConvertError::Storage`
//! - 落盘成功: 广播 completed
//!
//! 临时目录在作用域退出时删除，与流水线结果无关。

use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ConvertError;
use crate::application::ports::{
    AudioStorePort, ConversionNotifierPort, SynthRequest, TextExtractorPort, TtsEnginePort,
};
use crate::domain::clean_text;

/// 转换命令
#[derive(Debug, Clone)]
pub struct ConvertDeck {
    /// 上传文件的原始文件名
    pub filename: String,
    /// 上传文件内容
    pub data: Vec<u8>,
}

/// 转换结果
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    /// 合成音频的落盘路径
    pub audio_path: PathBuf,
    /// 音频大小（字节）
    pub audio_size: usize,
}

/// ConvertDeck Handler - 转换流水线编排器
pub struct ConvertDeckHandler {
    extractor: Arc<dyn TextExtractorPort>,
    tts_engine: Arc<dyn TtsEnginePort>,
    audio_store: Arc<dyn AudioStorePort>,
    notifier: Arc<dyn ConversionNotifierPort>,
    /// 合成语言代码
    lang: String,
}

impl ConvertDeckHandler {
    pub fn new(
        extractor: Arc<dyn TextExtractorPort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        audio_store: Arc<dyn AudioStorePort>,
        notifier: Arc<dyn ConversionNotifierPort>,
        lang: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            tts_engine,
            audio_store,
            notifier,
            lang: lang.into(),
        }
    }

    /// 执行转换流水线
    ///
    /// 失败在此处统一记录一次日志（带阶段名），调用方只拿到错误值
    pub async fn handle(&self, command: ConvertDeck) -> Result<ConvertOutcome, ConvertError> {
        let conversion_id = Uuid::new_v4();

        let result = self.run_pipeline(conversion_id, &command).await;

        if let Err(e) = &result {
            tracing::error!(
                conversion_id = %conversion_id,
                filename = %command.filename,
                stage = e.stage(),
                error = %e,
                "Conversion failed"
            );
        }

        result
    }

    async fn run_pipeline(
        &self,
        conversion_id: Uuid,
        command: &ConvertDeck,
    ) -> Result<ConvertOutcome, ConvertError> {
        self.notifier.conversion_started();

        tracing::info!(
            conversion_id = %conversion_id,
            filename = %command.filename,
            size = command.data.len(),
            "Conversion started"
        );

        // 上传内容写入作用域临时目录，drop 时删除（无论成功失败）
        let temp_dir = tempfile::tempdir()
            .map_err(|e| ConvertError::internal(format!("Failed to create temp dir: {}", e)))?;
        let temp_path = temp_dir.path().join(&command.filename);

        tokio::fs::write(&temp_path, &command.data)
            .await
            .map_err(|e| ConvertError::internal(format!("Failed to save upload: {}", e)))?;

        // 提取失败视为"无文本"：对用户而言与空文档一致
        let text = match self.extractor.extract_text(&temp_path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    conversion_id = %conversion_id,
                    error = %e,
                    "Text extraction failed, treating as empty document"
                );
                String::new()
            }
        };

        if text.is_empty() {
            return Err(ConvertError::NoText);
        }

        let cleaned = clean_text(&text);

        let synth = self
            .tts_engine
            .synthesize(SynthRequest {
                text: cleaned,
                lang: self.lang.clone(),
            })
            .await?;

        let audio_path = self
            .audio_store
            .save(&command.filename, &synth.audio_data)
            .await?;

        self.notifier.conversion_completed();

        tracing::info!(
            conversion_id = %conversion_id,
            filename = %command.filename,
            audio_path = %audio_path.display(),
            audio_size = synth.audio_data.len(),
            "Conversion completed"
        );

        Ok(ConvertOutcome {
            audio_path,
            audio_size: synth.audio_data.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        AudioStoreError, ExtractError, SynthResponse, TtsError,
    };
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 流水线各端口共享的调用记录，用于断言事件顺序
    #[derive(Default)]
    struct CallLog(Mutex<Vec<&'static str>>);

    impl CallLog {
        fn push(&self, entry: &'static str) {
            self.0.lock().unwrap().push(entry);
        }

        fn entries(&self) -> Vec<&'static str> {
            self.0.lock().unwrap().clone()
        }
    }

    struct RecordingNotifier {
        log: Arc<CallLog>,
        /// completed 触发时必须已存在的文件
        expect_file_on_completed: Option<PathBuf>,
    }

    impl ConversionNotifierPort for RecordingNotifier {
        fn conversion_started(&self) {
            self.log.push("started");
        }

        fn conversion_completed(&self) {
            if let Some(path) = &self.expect_file_on_completed {
                assert!(path.exists(), "completed fired before audio hit disk");
            }
            self.log.push("completed");
        }
    }

    struct FakeExtractor {
        log: Arc<CallLog>,
        result: Result<String, ()>,
    }

    #[async_trait]
    impl TextExtractorPort for FakeExtractor {
        async fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
            // 编排器必须先把上传内容落到临时路径
            assert!(path.exists(), "upload not saved before extraction");
            self.log.push("extract");
            self.result
                .clone()
                .map_err(|_| ExtractError::OpenFailed("corrupt archive".into()))
        }
    }

    struct FakeTts {
        log: Arc<CallLog>,
        calls: AtomicUsize,
        audio: Vec<u8>,
        fail: bool,
        seen_text: Mutex<Option<String>>,
    }

    impl FakeTts {
        fn new(log: Arc<CallLog>, audio: &[u8]) -> Self {
            Self {
                log,
                calls: AtomicUsize::new(0),
                audio: audio.to_vec(),
                fail: false,
                seen_text: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl TtsEnginePort for FakeTts {
        async fn synthesize(&self, request: SynthRequest) -> Result<SynthResponse, TtsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.log.push("synthesize");
            *self.seen_text.lock().unwrap() = Some(request.text);

            if self.fail {
                return Err(TtsError::ServiceError("forced failure".into()));
            }
            Ok(SynthResponse {
                audio_data: self.audio.clone(),
            })
        }
    }

    struct FakeStore {
        log: Arc<CallLog>,
        dir: PathBuf,
    }

    #[async_trait]
    impl AudioStorePort for FakeStore {
        fn audio_path(&self, source_filename: &str) -> PathBuf {
            self.dir.join(format!("{}.mp3", source_filename))
        }

        async fn save(
            &self,
            source_filename: &str,
            data: &[u8],
        ) -> Result<PathBuf, AudioStoreError> {
            let path = self.audio_path(source_filename);
            std::fs::write(&path, data).map_err(|e| AudioStoreError::IoError(e.to_string()))?;
            self.log.push("store");
            Ok(path)
        }
    }

    fn handler(
        log: Arc<CallLog>,
        extracted: Result<String, ()>,
        tts: Arc<FakeTts>,
        store_dir: &Path,
        expect_file_on_completed: Option<PathBuf>,
    ) -> ConvertDeckHandler {
        ConvertDeckHandler::new(
            Arc::new(FakeExtractor {
                log: log.clone(),
                result: extracted,
            }),
            tts,
            Arc::new(FakeStore {
                log: log.clone(),
                dir: store_dir.to_path_buf(),
            }),
            Arc::new(RecordingNotifier {
                log,
                expect_file_on_completed,
            }),
            "en",
        )
    }

    #[tokio::test]
    async fn test_successful_conversion() {
        let log = Arc::new(CallLog::default());
        let store_dir = tempfile::tempdir().unwrap();
        let expected = store_dir.path().join("deck.pptx.mp3");

        let handler = handler(
            log.clone(),
            Ok("hi there".to_string()),
            Arc::new(FakeTts::new(log.clone(), b"mp3 bytes")),
            store_dir.path(),
            Some(expected.clone()),
        );

        let outcome = handler
            .handle(ConvertDeck {
                filename: "deck.pptx".to_string(),
                data: b"fake pptx".to_vec(),
            })
            .await
            .unwrap();

        assert_eq!(outcome.audio_path, expected);
        assert_eq!(std::fs::read(&expected).unwrap(), b"mp3 bytes");
        // started 先于所有流水线工作，completed 仅在落盘之后
        assert_eq!(
            log.entries(),
            vec!["started", "extract", "synthesize", "store", "completed"]
        );
    }

    #[tokio::test]
    async fn test_cleaned_text_reaches_synthesizer() {
        let log = Arc::new(CallLog::default());
        let store_dir = tempfile::tempdir().unwrap();
        let tts = Arc::new(FakeTts::new(log.clone(), b"audio"));

        let handler = ConvertDeckHandler::new(
            Arc::new(FakeExtractor {
                log: log.clone(),
                result: Ok("hello world. this is a test.".to_string()),
            }),
            tts.clone(),
            Arc::new(FakeStore {
                log: log.clone(),
                dir: store_dir.path().to_path_buf(),
            }),
            Arc::new(RecordingNotifier {
                log: log.clone(),
                expect_file_on_completed: None,
            }),
            "en",
        );

        handler
            .handle(ConvertDeck {
                filename: "deck.pptx".to_string(),
                data: b"fake".to_vec(),
            })
            .await
            .unwrap();

        let seen = tts.seen_text.lock().unwrap().clone().unwrap();
        assert_eq!(seen, "Hello world. This is a test. ");
    }

    #[tokio::test]
    async fn test_empty_document_halts_before_synthesis() {
        let log = Arc::new(CallLog::default());
        let store_dir = tempfile::tempdir().unwrap();
        let tts = Arc::new(FakeTts::new(log.clone(), b"audio"));

        let handler = handler(
            log.clone(),
            Ok(String::new()),
            tts.clone(),
            store_dir.path(),
            None,
        );

        let err = handler
            .handle(ConvertDeck {
                filename: "empty.pptx".to_string(),
                data: b"fake".to_vec(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ConvertError::NoText));
        // 合成从未被调用，completed 从未触发
        assert_eq!(tts.calls.load(Ordering::SeqCst), 0);
        assert_eq!(log.entries(), vec!["started", "extract"]);
    }

    #[tokio::test]
    async fn test_unreadable_document_is_treated_as_empty() {
        let log = Arc::new(CallLog::default());
        let store_dir = tempfile::tempdir().unwrap();
        let tts = Arc::new(FakeTts::new(log.clone(), b"audio"));

        let handler = handler(log.clone(), Err(()), tts, store_dir.path(), None);

        let err = handler
            .handle(ConvertDeck {
                filename: "corrupt.pptx".to_string(),
                data: b"not a zip".to_vec(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ConvertError::NoText));
        assert_eq!(log.entries(), vec!["started", "extract"]);
    }

    #[tokio::test]
    async fn test_synthesis_failure_writes_nothing() {
        let log = Arc::new(CallLog::default());
        let store_dir = tempfile::tempdir().unwrap();
        let mut tts = FakeTts::new(log.clone(), b"audio");
        tts.fail = true;

        let handler = handler(
            log.clone(),
            Ok("some text".to_string()),
            Arc::new(tts),
            store_dir.path(),
            None,
        );

        let err = handler
            .handle(ConvertDeck {
                filename: "deck.pptx".to_string(),
                data: b"fake".to_vec(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ConvertError::Synthesis(_)));
        assert!(!store_dir.path().join("deck.pptx.mp3").exists());
        assert_eq!(log.entries(), vec!["started", "extract", "synthesize"]);
    }

    #[tokio::test]
    async fn test_same_filename_last_write_wins() {
        // 共享输出目录的已知竞争行为：后写者覆盖前写者
        let store_dir = tempfile::tempdir().unwrap();

        for audio in [b"first audio" as &[u8], b"second audio"] {
            let log = Arc::new(CallLog::default());
            let handler = handler(
                log.clone(),
                Ok("text".to_string()),
                Arc::new(FakeTts::new(log.clone(), audio)),
                store_dir.path(),
                None,
            );
            handler
                .handle(ConvertDeck {
                    filename: "deck.pptx".to_string(),
                    data: b"fake".to_vec(),
                })
                .await
                .unwrap();
        }

        let stored = std::fs::read(store_dir.path().join("deck.pptx.mp3")).unwrap();
        assert_eq!(stored, b"second audio");
    }
}
