use crate::core::advisory::{
    AdvisoryService, AssessmentResponse, RangesResponse, ReadingResponse, SeasonResponse,
};
use crate::utils::error::{AdvisorError, ErrorCategory};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router(service: AdvisoryService) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/sensor-reading", get(sensor_reading))
        // path used by the dashboard frontend
        .route("/api/reading", get(sensor_reading))
        .route("/api/season", get(season))
        .route("/api/ranges", get(ranges))
        .route("/api/assessment", get(assessment))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn sensor_reading(
    State(service): State<AdvisoryService>,
) -> Result<Json<ReadingResponse>, AdvisorError> {
    Ok(Json(service.sensor_reading().await?))
}

async fn season(State(service): State<AdvisoryService>) -> Json<SeasonResponse> {
    Json(service.season())
}

async fn ranges(State(service): State<AdvisoryService>) -> Json<RangesResponse> {
    Json(service.ranges())
}

async fn assessment(
    State(service): State<AdvisoryService>,
) -> Result<Json<AssessmentResponse>, AdvisorError> {
    Ok(Json(service.assessment().await?))
}

impl IntoResponse for AdvisorError {
    fn into_response(self) -> Response {
        let status = match self.category() {
            ErrorCategory::Upstream | ErrorCategory::Data => StatusCode::BAD_GATEWAY,
            ErrorCategory::Input => StatusCode::BAD_REQUEST,
            ErrorCategory::Configuration | ErrorCategory::System => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        tracing::error!(
            "Request failed: {} (Category: {:?}, Severity: {:?})",
            self,
            self.category(),
            self.severity()
        );

        let body = Json(serde_json::json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
