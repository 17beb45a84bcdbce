// src/web/handlers/review_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

use crate::reviews::{average_rating, ReviewError, ReviewService};
use crate::types::{Review, ReviewInput};
use crate::web::types::*;

fn storage_error(e: anyhow::Error) -> ApiError {
    error!("Review storage failed: {:#}", e);
    StandardErrorResponse::new(
        "Failed to access stored reviews".to_string(),
        "STORAGE_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
        None,
    )
    .with_status(Status::InternalServerError)
}

pub async fn list_reviews_handler(
    service: &State<ReviewService>,
) -> Result<Json<DataResponse<ReviewsData>>, ApiError> {
    let reviews = service.list().await.map_err(storage_error)?;
    let average_rating = average_rating(&reviews);

    Ok(Json(DataResponse::success(
        format!("{} reviews", reviews.len()),
        ReviewsData {
            reviews,
            average_rating,
        },
        None,
    )))
}

pub async fn showcase_reviews_handler(
    service: &State<ReviewService>,
) -> Result<Json<DataResponse<Vec<Review>>>, ApiError> {
    let reviews = service.showcase().await.map_err(storage_error)?;
    Ok(Json(DataResponse::success(
        "Featured reviews".to_string(),
        reviews,
        None,
    )))
}

pub async fn submit_review_handler(
    request: Json<StandardRequest<ReviewInput>>,
    service: &State<ReviewService>,
) -> Result<Json<DataResponse<Review>>, ApiError> {
    let StandardRequest {
        data: input,
        conversation_id,
    } = request.into_inner();

    match service.submit(input).await {
        Ok(review) => Ok(Json(DataResponse::success(
            "Thank you for your review!".to_string(),
            review,
            conversation_id,
        ))),
        Err(ReviewError::Storage(e)) => Err(storage_error(e)),
        Err(e) => Err(StandardErrorResponse::new(
            e.to_string(),
            e.code().to_string(),
            vec![
                "Name and comment are required".to_string(),
                "Rating must be between 1 and 5".to_string(),
            ],
            conversation_id,
        )
        .with_status(Status::UnprocessableEntity)),
    }
}
