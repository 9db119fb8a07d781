use axum::{routing::{get, post}, Router};

use crate::controllers::simulation_controller::{get_defaults, health, simulate};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/simulate",            post(simulate))
        .route("/simulation/defaults", get(get_defaults))
        .route("/health",              get(health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::Config;

    fn app() -> (Router, AppState) {
        let config: Config = serde_json::from_str(r#"{ "server": { "port": 0 } }"#).unwrap();
        let state = AppState::new(config);
        (Router::new().nest("/api", api_routes(state.clone())), state)
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_owned()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn simulate_returns_hourly_points() {
        let (app, state) = app();
        let (status, body) = post_json(app, "/api/simulate", r#"{ "duration": 24, "fixedTemp": "None" }"#).await;

        assert_eq!(status, StatusCode::OK);
        let temps = body["temperatures"].as_array().unwrap();
        assert_eq!(temps.len(), 24);
        assert_eq!(temps[0]["time"], 0);
        assert_eq!(temps[23]["time"], 23);
        for key in ["fluidTemp", "panelTemp", "tankTemp", "ambientTemp"] {
            assert!(temps[5][key].is_f64(), "missing {key}");
        }
        assert_eq!(state.runs_completed(), 1);
    }

    #[tokio::test]
    async fn simulate_accepts_numbers_posted_as_text() {
        let (app, _) = app();
        let body = r#"{ "area": 2, "efficiency": "0.5", "transmittance": "0.9", "duration": 24, "fixedTemp": "None" }"#;
        let (status, body) = post_json(app.clone(), "/api/simulate", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["temperatures"].as_array().unwrap().len(), 24);

        let (status, body) = post_json(app, "/api/simulate", r#"{ "efficiency": "half" }"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BadRequest");
    }

    #[tokio::test]
    async fn simulate_resumes_from_start_hour() {
        let (app, _) = app();
        let body = r#"{
            "startHour": 12,
            "currentState": { "fluidTemp": 80, "panelTemp": 95, "tankTemp": 75 },
            "inputChanges": { "12": { "cloudCover": 60 } }
        }"#;
        let (status, body) = post_json(app, "/api/simulate", body).await;

        assert_eq!(status, StatusCode::OK);
        let temps = body["temperatures"].as_array().unwrap();
        assert_eq!(temps.len(), 12);
        assert_eq!(temps[0]["time"], 12);
    }

    #[tokio::test]
    async fn invalid_parameter_is_bad_request() {
        let (app, state) = app();
        let (status, body) = post_json(app, "/api/simulate", r#"{ "U_L": 0 }"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "InvalidParameter");
        assert_eq!(state.runs_completed(), 0);
    }

    #[tokio::test]
    async fn start_past_duration_is_bad_request() {
        let (app, _) = app();
        let (status, body) = post_json(app, "/api/simulate", r#"{ "duration": 10, "startHour": 11 }"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "InvalidTimeline");
    }

    #[tokio::test]
    async fn defaults_and_health() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(Request::get("/api/simulation/defaults").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let defaults: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(defaults["U_L"], 8.0);
        assert_eq!(defaults["duration"], 24);

        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
