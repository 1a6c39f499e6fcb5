use std::sync::Arc;

use actix_web::{post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{request::ExtractParams, response::ExtractedMaterialDto},
    services::content_processor::{truncate_text, DEFAULT_MAX_TEXT_CHARS},
};

/// Extracts text from an uploaded `.txt`, `.docx` or `.pdf` body so it can be sent
/// back as `context` for generation.
#[post("/materials/extract")]
pub async fn extract_material(
    state: web::Data<Arc<AppState>>,
    params: web::Query<ExtractParams>,
    body: web::Bytes,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let file_name = params.into_inner().file_name;
    let processor = Arc::clone(&state.content_processor);
    let name = file_name.clone();

    let text = web::block(move || processor.process_file(&body, &name))
        .await
        .map_err(|e| AppError::InternalError(format!("Extraction task failed: {}", e)))??;

    let truncated_text = truncate_text(&text, DEFAULT_MAX_TEXT_CHARS);
    log::info!("User {} extracted material from '{}'", auth.0.username, file_name);

    Ok(HttpResponse::Ok().json(ExtractedMaterialDto {
        truncated: truncated_text.len() != text.len(),
        file_name,
        text: truncated_text,
    }))
}
