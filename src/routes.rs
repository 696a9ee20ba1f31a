use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    app_state::AppState,
    health::{self, HealthResponse},
    middleware::{RateLimit, rate_limit_middleware},
    reviews::{
        self,
        dtos::{
            CheckContentRequest, CheckContentResponse, ErrorResponse, RejectionResponse,
            ReviewResponse, SubmitReviewRequest,
        },
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        reviews::handlers::submit_review,
        reviews::handlers::check_content
    ),
    components(schemas(
        HealthResponse,
        SubmitReviewRequest,
        ReviewResponse,
        CheckContentRequest,
        CheckContentResponse,
        RejectionResponse,
        ErrorResponse
    )),
    tags(
        (name = "reviews", description = "Moderated review submission"),
        (name = "moderation", description = "Dry-run content checks"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Full application router. Submissions go through the per-IP rate limit,
/// which needs the server to provide `ConnectInfo<SocketAddr>`.
pub fn router(state: AppState, rate_limit: RateLimit) -> Router {
    let submissions = Router::new()
        .route("/v1/reviews", post(reviews::submit_review))
        .route_layer(from_fn_with_state(rate_limit, rate_limit_middleware));

    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/v1/moderation/check", post(reviews::check_content))
        .merge(submissions)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
