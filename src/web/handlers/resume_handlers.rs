// src/web/handlers/resume_handlers.rs
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use super::system_handlers::template_not_found;
use crate::export::resume_file_stem;
use crate::render::{preview, render};
use crate::template_system::{TemplateCatalog, DEFAULT_TEMPLATE_ID};
use crate::web::types::*;

pub async fn preview_resume_handler(
    request: Json<StandardRequest<ResumeRequest>>,
    catalog: &State<TemplateCatalog>,
) -> RawHtml<String> {
    let request = request.into_inner().data;
    let template_id = request.template_id.as_deref().unwrap_or(DEFAULT_TEMPLATE_ID);

    RawHtml(preview(catalog, template_id, &request.document).to_html())
}

pub async fn export_resume_handler(
    request: Json<StandardRequest<ResumeRequest>>,
    catalog: &State<TemplateCatalog>,
) -> Result<AttachmentResponse, ApiError> {
    let StandardRequest {
        data: request,
        conversation_id,
    } = request.into_inner();
    let template_id = request.template_id.as_deref().unwrap_or(DEFAULT_TEMPLATE_ID);

    let template = catalog
        .get_by_id(template_id)
        .map_err(|_| template_not_found(template_id, conversation_id))?;

    let filename = format!(
        "{}.html",
        resume_file_stem(&request.document.personal_info.full_name)
    );
    info!("Exporting {} with template {}", filename, template.id);

    Ok(AttachmentResponse::html(
        render(&request.document, template).to_html(),
        filename,
    ))
}
