//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_store;
mod notifier;
mod text_extractor;
mod tts_engine;

pub use audio_store::{AudioStoreError, AudioStorePort};
pub use notifier::ConversionNotifierPort;
pub use text_extractor::{ExtractError, TextExtractorPort};
pub use tts_engine::{SynthRequest, SynthResponse, TtsEnginePort, TtsError};
