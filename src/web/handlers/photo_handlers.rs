// src/web/handlers/photo_handlers.rs
use rocket::serde::json::Json;
use tracing::info;

use crate::photo::{photo_data_url, PhotoValidator};
use crate::web::types::*;

/// Unusable uploads are not an error: the photo is just left unset
pub async fn upload_photo_handler(content_type: &str, bytes: &[u8]) -> Json<DataResponse<PhotoData>> {
    if let Err(e) = PhotoValidator::validate(bytes, content_type) {
        return Json(DataResponse::success(
            "Photo ignored".to_string(),
            PhotoData {
                data_url: None,
                warning: Some(format!("{}. {}", e.message, e.suggestion)),
                warning_code: Some(e.code().to_string()),
            },
            None,
        ));
    }

    let data_url = photo_data_url(content_type, bytes);
    let message = match &data_url {
        Some(_) => {
            info!("Photo accepted ({} bytes, {})", bytes.len(), content_type);
            "Photo converted"
        }
        None => "Photo ignored",
    };

    Json(DataResponse::success(
        message.to_string(),
        PhotoData {
            data_url,
            warning: None,
            warning_code: None,
        },
        None,
    ))
}
