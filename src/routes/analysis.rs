use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Router,
    Json,
    http::Method,
};
use bytes::Bytes;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    models::{AnalysisRequest, AnalysisResult},
    services::prompt::AnalysisMode,
};
use tower_http::cors::{CorsLayer, Any};

/// Room for the non-file form fields and multipart boundaries.
const FORM_OVERHEAD: usize = 64 * 1024;

pub fn routes(max_file_size: usize) -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/api/analyze", post(analyze_report))
        .layer(DefaultBodyLimit::max(max_file_size + FORM_OVERHEAD))
        .layer(cors)
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    success: bool,
    data: AnalysisResult,
}

#[derive(Debug, Default)]
struct UploadForm {
    file_name: Option<String>,
    file_data: Option<Bytes>,
    prompt: Option<String>,
    mode: Option<String>,
    model: Option<String>,
}

async fn analyze_report(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let start = std::time::Instant::now();

    let form = read_form(&mut multipart).await?;

    let file_data = form.file_data
        .ok_or_else(|| AppError::InvalidUpload("请上传CSV文件".to_string()))?;
    let file_name = form.file_name.unwrap_or_default();

    if !is_csv_file_name(&file_name) {
        tracing::warn!("Rejected upload with unsupported file name: {}", file_name);
        return Err(AppError::InvalidUpload("只支持CSV文件".to_string()));
    }

    if file_data.len() > state.config.max_file_size {
        return Err(AppError::InvalidUpload(format!(
            "文件大小超过限制（最大{}MB）",
            state.config.max_file_size / (1024 * 1024)
        )));
    }

    let instruction = form.prompt.unwrap_or_default();
    if instruction.trim().is_empty() {
        return Err(AppError::Validation("请提供分析提示词".to_string()));
    }

    let mode = match form.mode.as_deref().map(str::trim) {
        None | Some("") => AnalysisMode::default(),
        Some(raw) => raw.parse()?,
    };

    let model = form.model
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| state.config.model_name.clone());

    tracing::info!(
        "Processing file: {} ({}KB), mode: {}, model: {}",
        file_name,
        file_data.len() / 1024,
        mode,
        model
    );

    let csv_text = String::from_utf8_lossy(&file_data).into_owned();
    let result = state.analyzer
        .analyze(AnalysisRequest {
            csv_text,
            instruction,
            mode,
            model,
        })
        .await?;

    tracing::info!("Request for {} completed in {:?}", file_name, start.elapsed());

    Ok(Json(AnalyzeResponse {
        success: true,
        data: result,
    }))
}

async fn read_form(multipart: &mut Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                form.file_name = field.file_name().map(str::to_string);
                form.file_data = Some(field.bytes().await.map_err(upload_error)?);
            }
            "prompt" => form.prompt = Some(field.text().await.map_err(upload_error)?),
            "mode" => form.mode = Some(field.text().await.map_err(upload_error)?),
            "model" => form.model = Some(field.text().await.map_err(upload_error)?),
            other => tracing::debug!("Ignoring unknown form field: {}", other),
        }
    }

    Ok(form)
}

fn upload_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::InvalidUpload(format!("上传内容解析失败: {}", err.body_text()))
}

fn is_csv_file_name(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
