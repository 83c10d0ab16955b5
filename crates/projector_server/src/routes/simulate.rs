//! Projection endpoints
//!
//! - `POST /api/v1/simulate`: validates the request, runs the engine on a
//!   blocking thread and returns the full projection
//! - `GET /api/v1/simulate`: usage document for the POST endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::get,
    Router,
};
use projector_core::{
    ParameterError, SimulationParameters, MAX_HORIZON, MAX_PATH_COUNT, MAX_VOLATILITY,
    MIN_HORIZON, MIN_PATH_COUNT, MIN_VOLATILITY,
};
use projector_engine::{Projection, QuantileMethod};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::{ApiError, ApiResult};

/// Route of the projection endpoint
pub const SIMULATE_ROUTE: &str = "/api/v1/simulate";

/// Projection request body
///
/// Fields are optional at the wire level so that a missing field is reported
/// per field alongside any range violations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulateRequest {
    pub initial_value: Option<f64>,
    pub annual_volatility: Option<f64>,
    pub horizon: Option<i64>,
    pub path_count: Option<i64>,
    /// Base seed; a fresh one is drawn when absent.
    ///
    /// Any `u64` is accepted, but only seeds up to 2^53 - 1 survive a
    /// JavaScript client. Drawn seeds always stay in that range.
    pub seed: Option<u64>,
}

impl SimulateRequest {
    /// Validate into a parameter set, collecting every violation
    pub fn to_parameters(&self) -> Result<SimulationParameters, ParameterError> {
        let mut builder = SimulationParameters::builder();
        if let Some(v) = self.initial_value {
            builder = builder.initial_value(v);
        }
        if let Some(v) = self.annual_volatility {
            builder = builder.annual_volatility(v);
        }
        if let Some(v) = self.horizon {
            builder = builder.horizon(v);
        }
        if let Some(v) = self.path_count {
            builder = builder.path_count(v);
        }
        builder.build()
    }
}

/// Projection response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateResponse {
    pub simulated_paths: Vec<Vec<f64>>,
    pub mean_per_step: Vec<f64>,
    pub low_quantile_per_step: Vec<f64>,
    pub high_quantile_per_step: Vec<f64>,
    pub terminal_mean: f64,
    pub terminal_min: f64,
    pub terminal_max: f64,
    pub tail_risk_absolute: f64,
    pub tail_risk_percentage: f64,
    /// Seed the run can be replayed with
    pub seed: Option<u64>,
}

impl From<&Projection> for SimulateResponse {
    fn from(projection: &Projection) -> Self {
        Self {
            simulated_paths: projection.simulated_paths().to_rows(),
            mean_per_step: projection.mean_per_step().to_vec(),
            low_quantile_per_step: projection.low_quantile_per_step().to_vec(),
            high_quantile_per_step: projection.high_quantile_per_step().to_vec(),
            terminal_mean: projection.terminal_mean(),
            terminal_min: projection.terminal_min(),
            terminal_max: projection.terminal_max(),
            tail_risk_absolute: projection.tail_risk_absolute(),
            tail_risk_percentage: projection.tail_risk_percentage(),
            seed: projection.seed(),
        }
    }
}

/// Accepted range of one request field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRange {
    pub field: String,
    pub constraint: String,
}

/// Usage document served on GET
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateInfo {
    pub service: String,
    pub version: String,
    pub route: String,
    pub method: String,
    pub usage: String,
    pub fields: Vec<FieldRange>,
    pub quantile_method: QuantileMethod,
    pub parallel: bool,
}

/// Build the simulate routes
pub fn routes() -> Router<AppState> {
    Router::new().route(SIMULATE_ROUTE, get(info_handler).post(simulate_handler))
}

/// POST /api/v1/simulate - Run a projection
async fn simulate_handler(
    State(state): State<AppState>,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> ApiResult<Json<SimulateResponse>> {
    let Json(request) = payload?;
    let params = request.to_parameters()?;

    let engine = state.engine;
    let seed = request.seed;
    let projection = tokio::task::spawn_blocking(move || engine.run(&params, seed))
        .await
        .map_err(|e| ApiError::SimulationFailed(e.to_string()))?;

    tracing::info!(
        horizon = params.horizon(),
        path_count = params.path_count(),
        seed = ?projection.seed(),
        tail_risk_percentage = projection.tail_risk_percentage(),
        "Projection served"
    );

    Ok(Json(SimulateResponse::from(&projection)))
}

/// GET /api/v1/simulate - Usage document
async fn info_handler(State(state): State<AppState>) -> Json<SimulateInfo> {
    let range = |field: &str, constraint: String| FieldRange {
        field: field.to_string(),
        constraint,
    };

    Json(SimulateInfo {
        service: "projector_server".to_string(),
        version: crate::VERSION.to_string(),
        route: SIMULATE_ROUTE.to_string(),
        method: "POST".to_string(),
        usage: "POST a JSON body with initial_value, annual_volatility (percent), \
                horizon (steps) and path_count; seed is optional"
            .to_string(),
        fields: vec![
            range("initial_value", "> 0".to_string()),
            range(
                "annual_volatility",
                format!("{} to {} (percent)", MIN_VOLATILITY, MAX_VOLATILITY),
            ),
            range("horizon", format!("{} to {}", MIN_HORIZON, MAX_HORIZON)),
            range(
                "path_count",
                format!("{} to {}", MIN_PATH_COUNT, MAX_PATH_COUNT),
            ),
        ],
        quantile_method: state.engine.config().quantile_method,
        parallel: state.engine.config().parallel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::error::ErrorResponse;
    use approx::assert_relative_eq;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        AppState::new(Arc::new(ServerConfig::default()))
    }

    async fn post(body: &str) -> (StatusCode, axum::body::Bytes) {
        let router = routes().with_state(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(SIMULATE_ROUTE)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn test_reference_scenario() {
        let (status, body) = post(
            r#"{"initial_value": 100, "annual_volatility": 20, "horizon": 10, "path_count": 1000, "seed": 42}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let result: SimulateResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.simulated_paths.len(), 1000);
        assert!(result.simulated_paths.iter().all(|row| row.len() == 11));
        assert!(result.simulated_paths.iter().all(|row| row[0] == 100.0));
        assert_eq!(result.mean_per_step.len(), 11);
        assert_eq!(result.low_quantile_per_step.len(), 11);
        assert_eq!(result.high_quantile_per_step.len(), 11);
        assert!(result.terminal_min < result.terminal_mean);
        assert!(result.terminal_mean < result.terminal_max);
        assert!(result.tail_risk_percentage < 0.0);
        assert_relative_eq!(
            result.tail_risk_absolute,
            -result.tail_risk_percentage,
            max_relative = 1e-9
        );
        assert_eq!(result.seed, Some(42));
    }

    #[tokio::test]
    async fn test_response_uses_snake_case_fields() {
        let (_, body) = post(
            r#"{"initial_value": 50, "annual_volatility": 10, "horizon": 2, "path_count": 100}"#,
        )
        .await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        for key in [
            "simulated_paths",
            "mean_per_step",
            "low_quantile_per_step",
            "high_quantile_per_step",
            "terminal_mean",
            "terminal_min",
            "terminal_max",
            "tail_risk_absolute",
            "tail_risk_percentage",
            "seed",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        // Unseeded requests still report the seed used, exact as a double
        let seed = json["seed"].as_u64().unwrap();
        assert!(seed <= projector_engine::rng::MAX_FRESH_SEED);
        assert_eq!(json["seed"].as_f64().unwrap() as u64, seed);
    }

    #[tokio::test]
    async fn test_same_seed_same_response() {
        let body =
            r#"{"initial_value": 10, "annual_volatility": 80, "horizon": 30, "path_count": 200, "seed": 7}"#;
        let (_, first) = post(body).await;
        let (_, second) = post(body).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_zero_volatility() {
        let (status, body) = post(
            r#"{"initial_value": 100, "annual_volatility": 0, "horizon": 5, "path_count": 100}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let result: SimulateResponse = serde_json::from_slice(&body).unwrap();
        assert!(result.simulated_paths.iter().flatten().all(|&v| v == 100.0));
        assert_eq!(result.tail_risk_absolute, 0.0);
    }

    #[tokio::test]
    async fn test_zero_initial_value_rejected() {
        let (status, body) = post(
            r#"{"initial_value": 0, "annual_volatility": 20, "horizon": 10, "path_count": 1000}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.error, "invalid_parameters");
        assert_eq!(err.details.len(), 1);
        assert_eq!(err.details[0].field, "initial_value");
    }

    #[tokio::test]
    async fn test_low_path_count_rejected() {
        let (status, body) = post(
            r#"{"initial_value": 100, "annual_volatility": 20, "horizon": 10, "path_count": 50}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.details[0].field, "path_count");
    }

    #[tokio::test]
    async fn test_every_violation_reported() {
        let (status, body) = post(r#"{"annual_volatility": 250, "horizon": -1}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        let fields: Vec<&str> = err.details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["initial_value", "annual_volatility", "horizon", "path_count"]
        );
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let (status, body) = post(r#"{"initial_value": 100,"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.error, "malformed_request");
    }

    #[tokio::test]
    async fn test_wrong_field_type_rejected() {
        let (status, body) = post(
            r#"{"initial_value": 100, "annual_volatility": 20, "horizon": "ten", "path_count": 100}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.error, "malformed_request");
    }

    #[tokio::test]
    async fn test_info_document() {
        let router = routes().with_state(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .uri(SIMULATE_ROUTE)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let info: SimulateInfo = serde_json::from_slice(&body).unwrap();

        assert_eq!(info.route, SIMULATE_ROUTE);
        assert_eq!(info.method, "POST");
        assert_eq!(info.fields.len(), 4);
        assert_eq!(info.quantile_method, QuantileMethod::NearestRank);
        assert!(info.parallel);
    }

    #[test]
    fn test_request_to_parameters() {
        let request = SimulateRequest {
            initial_value: Some(100.0),
            annual_volatility: Some(20.0),
            horizon: Some(10),
            path_count: Some(1000),
            seed: None,
        };
        let params = request.to_parameters().unwrap();
        assert_eq!(params.columns(), 11);

        let err = SimulateRequest::default().to_parameters().unwrap_err();
        assert_eq!(err.violations().len(), 4);
    }
}
