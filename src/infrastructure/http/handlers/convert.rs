//! Convert Handler - 接收上传并返回合成音频

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::application::{ConvertDeck, ConvertOutcome};
use crate::infrastructure::http::error::{errno, ApiError, ErrorResponse};
use crate::infrastructure::http::handlers::index::UPLOAD_PAGE;
use crate::infrastructure::http::state::AppState;

/// 上传文件字段名
const UPLOAD_FIELD: &str = "pptx_file";

/// POST / - 转换上传的 PPTX
///
/// 没有 pptx_file 字段或文件名为空时重新渲染上传页（HTTP 200）。
/// 转换成功时以附件形式流式返回 MP3；
/// 转换失败时返回通用错误响应体，不区分失败阶段。
pub async fn convert_deck(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

        if !filename.is_empty() {
            upload = Some((filename, data.to_vec()));
        }
    }

    // 未选择文件：与 GET 一样返回上传页
    let Some((filename, data)) = upload else {
        return Ok(Html(UPLOAD_PAGE).into_response());
    };

    match state
        .convert_handler
        .handle(ConvertDeck { filename, data })
        .await
    {
        Ok(outcome) => stream_stored_audio(outcome).await,
        Err(_) => Ok(conversion_failure_response(state.strict_errors)),
    }
}

/// 以附件形式流式返回已落盘的音频文件
async fn stream_stored_audio(outcome: ConvertOutcome) -> Result<Response, ApiError> {
    let file = tokio::fs::File::open(&outcome.audio_path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to open audio file: {}", e)))?;

    let attachment_name = outcome
        .audio_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("audio.mp3")
        .to_string();

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/mpeg")
        .header(header::CONTENT_LENGTH, outcome.audio_size)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", attachment_name),
        )
        .body(body)
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

/// 转换失败的通用响应
///
/// 历史行为是 HTTP 200 + 错误响应体；strict_errors 开启时返回 500
fn conversion_failure_response(strict_errors: bool) -> Response {
    let status = if strict_errors {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };

    (
        status,
        Json(ErrorResponse::new(errno::INTERNAL_ERROR, "Conversion failed")),
    )
        .into_response()
}
