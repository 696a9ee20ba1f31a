use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use crate::{
    app_state::AppState,
    moderation::ModerationRequest,
    reviews::dtos::{
        CheckContentRequest, CheckContentResponse, ErrorResponse, RejectionResponse,
        ReviewResponse, SubmitReviewRequest,
    },
};

fn moderation_request(text: &str, submitter_id: Option<&str>) -> ModerationRequest {
    let request = ModerationRequest::new(text);
    match submitter_id {
        Some(id) => request.with_submitter(id),
        None => request,
    }
}

#[utoipa::path(
    post,
    path = "/v1/reviews",
    tag = "reviews",
    request_body = SubmitReviewRequest,
    responses(
        (status = 201, description = "Review stored", body = ReviewResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 422, description = "Rejected by moderation", body = RejectionResponse),
        (status = 429, description = "Too many submissions", body = ErrorResponse)
    )
)]
pub async fn submit_review(
    State(state): State<AppState>,
    Json(payload): Json<SubmitReviewRequest>,
) -> Response {
    if let Err(error) = payload.validate() {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response();
    }

    let request = moderation_request(&payload.text, payload.submitter_id.as_deref());
    let verdict = state.moderator.moderate(&request).await;
    if !verdict.allowed {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(RejectionResponse::new(verdict.reasons)),
        )
            .into_response();
    }

    match state.review_repo.insert(payload.into_new_review()).await {
        Ok(review) => {
            info!(review_id = %review.id, professor_id = %review.professor_id, "review stored");
            (StatusCode::CREATED, Json(ReviewResponse::from(review))).into_response()
        }
        Err(e) => {
            error!("failed to store review: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to store review".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/v1/moderation/check",
    tag = "moderation",
    request_body = CheckContentRequest,
    responses(
        (status = 200, description = "Moderation outcome", body = CheckContentResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn check_content(
    State(state): State<AppState>,
    Json(payload): Json<CheckContentRequest>,
) -> Response {
    if let Err(error) = payload.validate() {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response();
    }

    let request = moderation_request(&payload.text, payload.submitter_id.as_deref());
    let verdict = state.moderator.moderate(&request).await;
    (
        StatusCode::OK,
        Json(CheckContentResponse {
            allowed: verdict.allowed,
            reasons: verdict.reasons,
        }),
    )
        .into_response()
}
