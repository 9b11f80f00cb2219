//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TextExtractor、TtsEngine、AudioStore、ConversionNotifier）
//! - convert: 转换流水线编排器
//! - error: 按阶段分类的流水线错误

pub mod convert;
pub mod error;
pub mod ports;

// Re-exports
pub use convert::{ConvertDeck, ConvertDeckHandler, ConvertOutcome};
pub use error::ConvertError;
pub use ports::{
    AudioStoreError, AudioStorePort, ConversionNotifierPort, ExtractError, SynthRequest,
    SynthResponse, TextExtractorPort, TtsEnginePort, TtsError,
};
