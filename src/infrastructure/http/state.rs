//! Application State

use std::sync::Arc;

use crate::application::{
    AudioStorePort, ConvertDeckHandler, TextExtractorPort, TtsEnginePort,
};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    /// 事件发布器（WebSocket 连接订阅用）
    pub event_publisher: Arc<EventPublisher>,

    /// 转换流水线编排器
    pub convert_handler: ConvertDeckHandler,

    /// 转换失败时是否返回真实 HTTP 错误码
    pub strict_errors: bool,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        extractor: Arc<dyn TextExtractorPort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        audio_store: Arc<dyn AudioStorePort>,
        event_publisher: Arc<EventPublisher>,
        lang: impl Into<String>,
        strict_errors: bool,
    ) -> Self {
        Self {
            event_publisher: event_publisher.clone(),

            convert_handler: ConvertDeckHandler::new(
                extractor,
                tts_engine,
                audio_store,
                event_publisher,
                lang,
            ),

            strict_errors,
        }
    }
}
