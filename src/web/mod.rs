// src/web/mod.rs
//! HTTP API under `/api`

pub mod handlers;
pub mod types;

pub use types::*;

use anyhow::Result;
use rocket::data::{ByteUnit, Data, Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::figment::Figment;
use rocket::http::{ContentType, Header, Status};
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::cover_letter::CoverLetterService;
use crate::photo::MAX_PHOTO_BYTES;
use crate::reviews::{ReviewService, StoredReviews};
use crate::storage::SqliteStore;
use crate::template_system::{TemplateCatalog, TemplateDescriptor};
use crate::types::{Review, ReviewInput};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new(
            "Access-Control-Expose-Headers",
            "Content-Disposition",
        ));
    }
}

// ===== Routes =====

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

#[get("/templates?<category>")]
pub async fn get_templates(
    category: Option<String>,
    catalog: &State<TemplateCatalog>,
) -> Result<Json<DataResponse<TemplatesData>>, ApiError> {
    handlers::get_templates_handler(category, catalog).await
}

#[get("/templates/<id>")]
pub async fn get_template(
    id: &str,
    catalog: &State<TemplateCatalog>,
) -> Result<Json<DataResponse<TemplateDescriptor>>, ApiError> {
    handlers::get_template_handler(id, catalog).await
}

#[post("/resume/preview", data = "<request>")]
pub async fn preview_resume(
    request: Json<StandardRequest<ResumeRequest>>,
    catalog: &State<TemplateCatalog>,
) -> RawHtml<String> {
    handlers::preview_resume_handler(request, catalog).await
}

#[post("/resume/export", data = "<request>")]
pub async fn export_resume(
    request: Json<StandardRequest<ResumeRequest>>,
    catalog: &State<TemplateCatalog>,
) -> Result<AttachmentResponse, ApiError> {
    handlers::export_resume_handler(request, catalog).await
}

#[post("/cover-letter", data = "<request>")]
pub async fn generate_cover_letter(
    request: Json<StandardRequest<CoverLetterRequest>>,
    service: &State<CoverLetterService>,
) -> Result<Json<DataResponse<CoverLetterData>>, ApiError> {
    handlers::generate_cover_letter_handler(request, service).await
}

#[post("/cover-letter/download", data = "<request>")]
pub async fn download_cover_letter(
    request: Json<StandardRequest<CoverLetterRequest>>,
) -> Result<AttachmentResponse, ApiError> {
    handlers::download_cover_letter_handler(request).await
}

#[get("/reviews")]
pub async fn list_reviews(
    service: &State<ReviewService>,
) -> Result<Json<DataResponse<ReviewsData>>, ApiError> {
    handlers::list_reviews_handler(service).await
}

#[get("/reviews/showcase")]
pub async fn showcase_reviews(
    service: &State<ReviewService>,
) -> Result<Json<DataResponse<Vec<Review>>>, ApiError> {
    handlers::showcase_reviews_handler(service).await
}

#[post("/reviews", data = "<request>")]
pub async fn submit_review(
    request: Json<StandardRequest<ReviewInput>>,
    service: &State<ReviewService>,
) -> Result<Json<DataResponse<Review>>, ApiError> {
    handlers::submit_review_handler(request, service).await
}

#[post("/photo", data = "<data>")]
pub async fn upload_photo(
    content_type: Option<&ContentType>,
    data: Data<'_>,
) -> Result<Json<DataResponse<PhotoData>>, ApiError> {
    // One byte over the limit is enough for the validator to report it
    let bytes = data
        .open((MAX_PHOTO_BYTES as u64 + 1).bytes())
        .into_bytes()
        .await
        .map_err(|e| {
            error!("Failed to read photo upload: {}", e);
            StandardErrorResponse::new(
                "Failed to read upload".to_string(),
                "UPLOAD_FAILED".to_string(),
                vec!["Try uploading the image again".to_string()],
                None,
            )
            .with_status(Status::BadRequest)
        })?
        .into_inner();

    let content_type = content_type.map(|ct| ct.to_string()).unwrap_or_default();
    Ok(handlers::upload_photo_handler(&content_type, &bytes).await)
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(404)]
pub fn not_found(request: &Request<'_>) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        format!("No route for {}", request.uri()),
        "NOT_FOUND".to_string(),
        vec!["Check the endpoint path and method".to_string()],
        None,
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be parsed".to_string(),
        "UNPROCESSABLE".to_string(),
        vec![
            "Send a JSON body matching the endpoint".to_string(),
            "Skill levels are Beginner, Intermediate, Advanced or Expert".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body is too large".to_string(),
        "PAYLOAD_TOO_LARGE".to_string(),
        vec![
            format!("Photos must be at most {} MB", MAX_PHOTO_BYTES / (1024 * 1024)),
            "Upload the photo again through /api/photo".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

// ===== Server =====

/// Everything the routes need, built once at startup
pub struct Services {
    pub catalog: TemplateCatalog,
    pub reviews: ReviewService,
    pub cover_letters: CoverLetterService,
}

/// Room for a base64 photo data URL (4/3 of the raw bytes) plus the rest of the document
pub fn json_body_limit() -> ByteUnit {
    (MAX_PHOTO_BYTES as u64 / 3 * 4 + 4 + 2 * 1024 * 1024).bytes()
}

pub fn build_rocket(figment: Figment, services: Services) -> Rocket<Build> {
    let figment = figment.merge(("limits", Limits::default().limit("json", json_body_limit())));

    rocket::custom(figment)
        .attach(Cors)
        .manage(services.catalog)
        .manage(services.reviews)
        .manage(services.cover_letters)
        .register(
            "/api",
            catchers![
                bad_request,
                not_found,
                payload_too_large,
                unprocessable,
                internal_error
            ],
        )
        .mount(
            "/api",
            routes![
                health,
                get_templates,
                get_template,
                preview_resume,
                export_resume,
                generate_cover_letter,
                download_cover_letter,
                list_reviews,
                showcase_reviews,
                submit_review,
                upload_photo,
                options,
            ],
        )
}

pub async fn start_web_server(config: &AppConfig) -> Result<()> {
    config.ensure_directories()?;

    let catalog = TemplateCatalog::with_custom_dir(&config.templates_path)?;
    let store = match SqliteStore::open(&config.database_path).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialize database: {:#}", e);
            return Err(e);
        }
    };

    let services = Services {
        catalog,
        reviews: ReviewService::new(Arc::new(StoredReviews::new(store)), config.review_pacer()),
        cover_letters: CoverLetterService::new(config.generation_pacer()),
    };

    info!("Starting Resume Studio API server");
    info!("Database: {}", config.database_path.display());
    info!("Server: http://0.0.0.0:{}", config.port);

    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", config.port));

    build_rocket(figment, services)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::Pacer;
    use crate::storage::MemoryStore;
    use rocket::local::asynchronous::Client;
    use serde_json::{json, Value};

    async fn client() -> Client {
        let services = Services {
            catalog: TemplateCatalog::builtin(),
            reviews: ReviewService::new(
                Arc::new(StoredReviews::new(MemoryStore::new())),
                Pacer::immediate(),
            ),
            cover_letters: CoverLetterService::new(Pacer::immediate()),
        };
        Client::tracked(build_rocket(rocket::Config::figment(), services))
            .await
            .unwrap()
    }

    fn sample_document() -> Value {
        json!({
            "personal_info": { "full_name": "Ada Lovelace", "email": "ada@example.com" },
            "summary": "Analytical engine enthusiast",
            "experience": [
                { "job_title": "Analyst", "company": "Babbage & Co", "start_date": "1842-01",
                  "end_date": "1843-09", "description": "Wrote the first program" }
            ],
            "skills": [ { "name": "Mathematics", "level": "Expert" } ]
        })
    }

    #[rocket::async_test]
    async fn test_health() {
        let client = client().await;
        let response = client.get("/api/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.headers().get_one("Access-Control-Allow-Origin"),
            Some("*")
        );
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["message"], "OK");
    }

    #[rocket::async_test]
    async fn test_templates_listing_and_filter() {
        let client = client().await;

        let body: Value = client
            .get("/api/templates")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert_eq!(body["data"]["templates"].as_array().unwrap().len(), 12);
        assert_eq!(body["data"]["templates"][0]["id"], "executive-navy");

        let body: Value = client
            .get("/api/templates?category=creative")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        let templates = body["data"]["templates"].as_array().unwrap();
        assert_eq!(templates.len(), 3);
        assert!(templates.iter().all(|t| t["category"] == "creative"));

        let response = client.get("/api/templates?category=retro").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "UNKNOWN_CATEGORY");
        assert_eq!(
            body["suggestions"][0],
            "Use one of: all, executive, professional, modern, creative, minimal"
        );
    }

    #[rocket::async_test]
    async fn test_template_by_id() {
        let client = client().await;

        let body: Value = client
            .get("/api/templates/modern-teal")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert_eq!(body["data"]["layout"], "sidebar");
        assert_eq!(body["data"]["colors"]["primary"], "#0d9488");

        let response = client.get("/api/templates/neon").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "TEMPLATE_NOT_FOUND");
        assert_eq!(body["success"], false);
    }

    #[rocket::async_test]
    async fn test_resume_preview() {
        let client = client().await;

        let response = client
            .post("/api/resume/preview")
            .json(&json!({ "document": sample_document(), "template_id": "creative-coral" }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.content_type(), Some(ContentType::HTML));
        let html = response.into_string().await.unwrap();
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("Babbage &amp; Co"));
        assert!(html.contains("• Wrote the first program"));

        let html = client
            .post("/api/resume/preview")
            .json(&json!({ "document": sample_document(), "template_id": "vaporwave" }))
            .dispatch()
            .await
            .into_string()
            .await
            .unwrap();
        assert!(html.contains("Template not found"));
    }

    #[rocket::async_test]
    async fn test_resume_export_is_an_attachment() {
        let client = client().await;

        let response = client
            .post("/api/resume/export")
            .json(&json!({ "document": sample_document() }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.headers().get_one("Content-Disposition"),
            Some(content_disposition("Ada Lovelace_Resume.html").as_str())
        );

        let response = client
            .post("/api/resume/export")
            .json(&json!({ "document": sample_document(), "template_id": "neon" }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn test_cover_letter() {
        let client = client().await;

        let response = client
            .post("/api/cover-letter")
            .json(&json!({
                "document": sample_document(),
                "inputs": { "company_name": "Acme", "job_title": "Engineer" },
                "conversation_id": "c-1"
            }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["conversation_id"], "c-1");
        assert_eq!(body["data"]["filename"], "Ada Lovelace_Cover_Letter.txt");
        let letter = body["data"]["letter"].as_str().unwrap();
        assert!(letter.starts_with("Dear Hiring Manager,"));
        assert!(letter.contains("previous role as Analyst at Babbage & Co"));

        let response = client
            .post("/api/cover-letter")
            .json(&json!({ "document": sample_document(), "inputs": { "company_name": "Acme" } }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "MISSING_FIELD");
    }

    #[rocket::async_test]
    async fn test_cover_letter_download() {
        let client = client().await;

        let response = client
            .post("/api/cover-letter/download")
            .json(&json!({
                "document": sample_document(),
                "inputs": { "company_name": "Acme", "job_title": "Engineer", "hiring_manager_name": "Jane Lee" }
            }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.content_type(), Some(ContentType::Plain));
        assert_eq!(
            response.headers().get_one("Content-Disposition"),
            Some(content_disposition("Ada Lovelace_Cover_Letter.txt").as_str())
        );
        let text = response.into_string().await.unwrap();
        assert!(text.starts_with("Dear Jane Lee,"));
    }

    #[rocket::async_test]
    async fn test_reviews_flow() {
        let client = client().await;

        let body: Value = client
            .get("/api/reviews/showcase")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert_eq!(body["data"][0]["name"], "Sarah Chen");

        for (name, rating) in [("Ana", 4), ("Ben", 5)] {
            let response = client
                .post("/api/reviews")
                .json(&json!({ "name": name, "rating": rating, "comment": "Helpful" }))
                .dispatch()
                .await;
            assert_eq!(response.status(), Status::Ok);
        }

        let body: Value = client
            .get("/api/reviews")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        let reviews = body["data"]["reviews"].as_array().unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0]["name"], "Ben");
        assert_eq!(reviews[0]["role"], "Professional");
        assert_eq!(body["data"]["average_rating"], 4.5);

        let body: Value = client
            .get("/api/reviews/showcase")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let response = client
            .post("/api/reviews")
            .json(&json!({ "name": "", "comment": "Anonymous" }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "INVALID_REVIEW");
    }

    #[rocket::async_test]
    async fn test_photo_upload() {
        let client = client().await;
        let png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

        let body: Value = client
            .post("/api/photo")
            .header(ContentType::PNG)
            .body(png)
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert!(body["data"]["data_url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,"));

        let body: Value = client
            .post("/api/photo")
            .header(ContentType::PDF)
            .body("%PDF-1.7")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert!(body["data"]["data_url"].is_null());
        assert_eq!(body["data"]["warning_code"], "IMAGE_WRONG_FORMAT");
    }

    #[rocket::async_test]
    async fn test_large_photo_round_trips_into_preview_and_review() {
        let client = client().await;
        let mut png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        png.resize(2 * 1024 * 1024, 0);

        let body: Value = client
            .post("/api/photo")
            .header(ContentType::PNG)
            .body(png)
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        let data_url = body["data"]["data_url"].as_str().unwrap().to_string();
        assert!(data_url.len() > 2 * 1024 * 1024);

        let mut document = sample_document();
        document["personal_info"]["photo"] = json!(data_url);
        let response = client
            .post("/api/resume/preview")
            .json(&json!({ "document": document, "template_id": "modern-teal" }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let html = response.into_string().await.unwrap();
        assert!(html.contains(&data_url));

        let response = client
            .post("/api/reviews")
            .json(&json!({ "name": "Ana", "comment": "Great", "photo": data_url }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["data"]["avatar"], json!(data_url));
    }

    #[rocket::async_test]
    async fn test_oversized_body_gets_error_envelope() {
        let client = client().await;
        let oversized = "a".repeat(json_body_limit().as_u64() as usize + 1);

        let response = client
            .post("/api/resume/preview")
            .json(&json!({ "document": { "summary": oversized } }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::PayloadTooLarge);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "PAYLOAD_TOO_LARGE");
    }

    #[rocket::async_test]
    async fn test_options_and_unknown_route() {
        let client = client().await;

        let response = client.options("/api/reviews").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let response = client.get("/api/nowhere").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "NOT_FOUND");
    }
}
