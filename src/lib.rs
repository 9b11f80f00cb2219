//! Slidevox - PPT 转语音服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - 文本清洗（纯函数）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TextExtractor, TtsEngine, AudioStore, ConversionNotifier）
//! - ConvertDeckHandler: 转换流水线编排（提取 → 清洗 → 合成 → 存储）
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 上传页面 + 转换接口 + WebSocket 事件推送
//! - Adapters: PPTX 提取器、Google TTS 客户端、文件音频存储
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
