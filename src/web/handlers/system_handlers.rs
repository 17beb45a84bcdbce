// src/web/handlers/system_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{debug, info};

use crate::template_system::{Category, CategoryFilter, TemplateCatalog, TemplateDescriptor};
use crate::web::types::*;

pub async fn health_handler() -> Json<TextResponse> {
    info!("Health check");
    Json(TextResponse::success("OK".to_string(), None))
}

pub fn template_not_found(template_id: &str, conversation_id: Option<String>) -> ApiError {
    StandardErrorResponse::new(
        format!("Template not found: {}", template_id),
        "TEMPLATE_NOT_FOUND".to_string(),
        vec![
            "Use GET /api/templates to list available templates".to_string(),
            "Template ids are lowercase, e.g. executive-navy".to_string(),
        ],
        conversation_id,
    )
    .with_status(Status::NotFound)
}

pub async fn get_templates_handler(
    category: Option<String>,
    catalog: &State<TemplateCatalog>,
) -> Result<Json<DataResponse<TemplatesData>>, ApiError> {
    let category = category.unwrap_or_else(|| "all".to_string());
    let filter = category.parse::<CategoryFilter>().map_err(|e| {
        StandardErrorResponse::new(
            e.to_string(),
            "UNKNOWN_CATEGORY".to_string(),
            vec![format!(
                "Use one of: all, {}",
                Category::ALL
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )],
            None,
        )
        .with_status(Status::BadRequest)
    })?;

    let templates: Vec<TemplateDescriptor> = catalog
        .filter_by_category(filter)
        .into_iter()
        .cloned()
        .collect();
    debug!("{} templates for category {}", templates.len(), category);

    Ok(Json(DataResponse::success(
        format!("{} templates available", templates.len()),
        TemplatesData {
            category,
            templates,
        },
        None,
    )))
}

pub async fn get_template_handler(
    id: &str,
    catalog: &State<TemplateCatalog>,
) -> Result<Json<DataResponse<TemplateDescriptor>>, ApiError> {
    let template = catalog
        .get_by_id(id)
        .map_err(|_| template_not_found(id, None))?;

    Ok(Json(DataResponse::success(
        format!("Template {}", template.name),
        template.clone(),
        None,
    )))
}
