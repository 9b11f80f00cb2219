//! HTTP Routes
//!
//! API 路由定义
//!
//! Endpoints:
//! - /            GET   上传页面
//! - /            POST  上传 PPTX 并返回合成音频（multipart，字段名 pptx_file）
//! - /api/ping    GET   健康检查
//! - /ws/events   WS    全局 WebSocket（转换开始/完成事件）

use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::upload_form).post(handlers::convert_deck),
        )
        .route("/api/ping", get(handlers::ping))
        .route("/ws/events", get(handlers::events_websocket_handler))
}
