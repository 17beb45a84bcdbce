// src/web/handlers/cover_letter_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

use crate::cover_letter::{CoverLetterError, CoverLetterService};
use crate::export::cover_letter_filename;
use crate::web::types::*;

fn cover_letter_error(e: CoverLetterError, conversation_id: Option<String>) -> ApiError {
    StandardErrorResponse::new(
        e.to_string(),
        e.code().to_string(),
        vec!["Company name and job title are required".to_string()],
        conversation_id,
    )
    .with_status(Status::UnprocessableEntity)
}

pub async fn generate_cover_letter_handler(
    request: Json<StandardRequest<CoverLetterRequest>>,
    service: &State<CoverLetterService>,
) -> Result<Json<DataResponse<CoverLetterData>>, ApiError> {
    let StandardRequest {
        data: request,
        conversation_id,
    } = request.into_inner();

    let letter = service
        .generate(&request.document, &request.inputs)
        .await
        .map_err(|e| cover_letter_error(e, conversation_id.clone()))?;

    Ok(Json(DataResponse::success(
        format!("Cover letter generated for {}", request.inputs.company_name),
        CoverLetterData {
            letter,
            filename: cover_letter_filename(&request.document.personal_info.full_name),
        },
        conversation_id,
    )))
}

/// Plain text download, generated without the visible delay
pub async fn download_cover_letter_handler(
    request: Json<StandardRequest<CoverLetterRequest>>,
) -> Result<AttachmentResponse, ApiError> {
    let StandardRequest {
        data: request,
        conversation_id,
    } = request.into_inner();

    let letter = crate::cover_letter::generate(&request.document, &request.inputs)
        .map_err(|e| cover_letter_error(e, conversation_id))?;

    Ok(AttachmentResponse::text(
        letter,
        cover_letter_filename(&request.document.personal_info.full_name),
    ))
}
