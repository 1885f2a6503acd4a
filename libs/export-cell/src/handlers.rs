use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{ExportQuery, ExportRequest};
use crate::services::ExportService;

#[axum::debug_handler]
pub async fn export_dataset(
    State(config): State<Arc<AppConfig>>,
    Path(dataset): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let request = ExportRequest::parse(&dataset, query)?;
    let service = ExportService::new(&config);

    let file = service
        .export(&request)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let disposition = format!("attachment; filename=\"{}\"", file.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.body,
    )
        .into_response())
}
