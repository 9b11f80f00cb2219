//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `SLIDEVOX_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `SLIDEVOX_SERVER__HOST=127.0.0.1`
/// - `SLIDEVOX_SERVER__PORT=8080`
/// - `SLIDEVOX_TTS__LANG=en`
/// - `SLIDEVOX_STORAGE__UPLOADS_DIR=/data/uploads`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5075)?
        .set_default("server.strict_errors", false)?
        .set_default("tts.base_url", "https://translate.google.com")?
        .set_default("tts.lang", "en")?
        .set_default("tts.timeout_secs", 30)?
        .set_default("storage.uploads_dir", "uploads")?
        .set_default("storage.max_upload_size", 50 * 1024 * 1024)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: SLIDEVOX_
    // 层级分隔符: __ (双下划线)
    // 例如: SLIDEVOX_TTS__LANG=fr
    builder = builder.add_source(
        Environment::with_prefix("SLIDEVOX")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证端口范围
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    // 验证 TTS URL
    if config.tts.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS base URL cannot be empty".to_string(),
        ));
    }

    // 验证合成语言
    if config.tts.lang.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS language cannot be empty".to_string(),
        ));
    }

    // 验证输出目录
    if config.storage.uploads_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Uploads directory cannot be empty".to_string(),
        ));
    }

    // 验证上传大小限制
    if config.storage.max_upload_size == 0 {
        return Err(ConfigError::ValidationError(
            "Max upload size cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Strict Errors: {}", config.server.strict_errors);
    tracing::info!("TTS URL: {}", config.tts.base_url);
    tracing::info!("TTS Language: {}", config.tts.lang);
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!("Uploads Directory: {:?}", config.storage.uploads_dir);
    tracing::info!("Max Upload Size: {} bytes", config.storage.max_upload_size);
    tracing::info!("Log Level: {}", config.log.level);
    if let Some(file) = &config.log.file {
        tracing::info!("Log File: {:?}", file);
    }
    tracing::info!("=================================");
}
