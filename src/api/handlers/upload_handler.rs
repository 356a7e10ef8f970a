//! License document upload.
//!
//! Public, since doctors upload their license before the account exists.
//! The returned URL goes into `license_document_url` at registration.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::errors::{AppError, AppResult};
use crate::services::LicenseUpload;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    #[schema(example = "http://localhost:3000/uploads/licenses/0b7c9f1e.pdf")]
    pub url: String,
}

/// Multipart body of a license upload
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct LicenseForm {
    /// PDF, JPEG or PNG document
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/license", post(upload_license))
}

/// Upload a license document (PDF, JPEG or PNG, up to 5 MiB)
#[utoipa::path(
    post,
    path = "/api/upload/license",
    tag = "Upload",
    request_body(
        content = LicenseForm,
        content_type = "multipart/form-data",
        description = "One file part"
    ),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing file or unsupported type"),
        (status = 413, description = "File larger than 5 MiB")
    )
)]
pub async fn upload_license(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.file_name().is_none() {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        upload = Some(LicenseUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let upload = upload.ok_or_else(|| AppError::field("file", "A license file is required"))?;
    let url = state.upload_service.store_license(upload).await?;

    Ok(Json(UploadResponse { success: true, url }))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::validation(e.body_text())
    }
}
