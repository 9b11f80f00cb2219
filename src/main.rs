//! Slidevox - PPT 转语音服务
//!
//! 上传 .pptx → 提取文本 → 清洗 → 语音合成 → 返回 MP3，
//! 转换生命周期事件通过 WebSocket 广播

use std::sync::Arc;

use slidevox::config::{load_config, print_config};
use slidevox::infrastructure::adapters::{
    FileAudioStore, GoogleTtsClient, GoogleTtsClientConfig, PptxTextExtractor,
};
use slidevox::infrastructure::events::EventPublisher;
use slidevox::infrastructure::http::{AppState, HttpServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    init_tracing(&config)?;

    tracing::info!("Slidevox - PPT 转语音服务");
    print_config(&config);

    // 确保输出目录存在
    tokio::fs::create_dir_all(&config.storage.uploads_dir).await?;

    // 创建 PPTX 提取器
    let extractor = Arc::new(PptxTextExtractor::new());

    // 创建 Google TTS 客户端
    let tts_config = GoogleTtsClientConfig {
        base_url: config.tts.base_url.clone(),
        timeout_secs: config.tts.timeout_secs,
    };
    let tts_engine = Arc::new(
        GoogleTtsClient::new(tts_config)
            .map_err(|e| anyhow::anyhow!("Failed to create TTS client: {}", e))?,
    );

    // 创建文件音频存储
    let audio_store = Arc::new(FileAudioStore::new(&config.storage.uploads_dir));

    // 创建事件发布器
    let event_publisher = EventPublisher::new().arc();

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(
        &config.server.host,
        config.server.port,
        config.storage.max_upload_size,
    );
    let state = AppState::new(
        extractor,
        tts_engine,
        audio_store,
        event_publisher,
        config.tts.lang.clone(),
        config.server.strict_errors,
    );

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化 tracing 订阅器
///
/// `log.file` 配置后日志写入文件，否则输出到 stdout；
/// `log.json` 切换 JSON 格式
fn init_tracing(config: &slidevox::AppConfig) -> anyhow::Result<()> {
    let log_filter = format!(
        "{},slidevox={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    match &config.log.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("Failed to open log file {:?}: {}", path, e))?;
            let builder = builder.with_writer(Arc::new(file)).with_ansi(false);
            if config.log.json {
                builder.json().init();
            } else {
                builder.init();
            }
        }
        None => {
            if config.log.json {
                builder.json().init();
            } else {
                builder.init();
            }
        }
    }

    Ok(())
}
