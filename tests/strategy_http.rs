use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use betlab::{strategy_router, StrategyValidator};
use tower::util::ServiceExt;

fn app() -> Router {
    strategy_router(Arc::new(StrategyValidator::default()))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn validate_endpoint_reports_conflicts() {
    let (status, body) = send(
        app(),
        "POST",
        "/strategies/validate",
        Some(
            r#"{"conditions":[
                {"metric":"goals_scored","operator":">","value":2.0,"last_n_games":5},
                {"metric":"goals_scored","operator":"<","value":1.0,"last_n_games":5}
            ]}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["is_valid"], false);
    assert_eq!(json["errors"][0]["metric"], "goals_scored");
    assert_eq!(json["errors"][0]["affected_conditions"], serde_json::json!([0, 1]));
}

#[tokio::test]
async fn validate_endpoint_rejects_malformed_conditions_with_index() {
    let (status, body) = send(
        app(),
        "POST",
        "/strategies/validate",
        Some(
            r#"{"conditions":[
                {"metric":"win_rate","operator":">","value":50,"last_n_games":5},
                {"metric":"win_rate","operator":"<","value":60,"last_n_games":-1}
            ]}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["condition_index"], 1);
    assert!(json["error"].as_str().unwrap().contains("lookback"));
}

#[tokio::test]
async fn feedback_endpoint_returns_html_fragment() {
    let (status, body) = send(
        app(),
        "POST",
        "/strategies/validate/feedback",
        Some(r#"{"conditions":[{"metric":"win_rate","operator":">","value":95,"last_n_games":5}]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("validation-feedback"));
    assert!(body.contains("feedback-warning-high"));
}

#[tokio::test]
async fn preflight_blocks_conflicts_and_accepts_warnings() {
    let (status, body) = send(
        app(),
        "POST",
        "/strategies/preflight",
        Some(
            r#"{"name":"never","target_outcome":"home_win","conditions":[
                {"metric":"win_rate","operator":">","value":70,"last_n_games":5},
                {"metric":"win_rate","operator":"<","value":50,"last_n_games":5}
            ]}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["validation"]["is_valid"], false);

    let (status, body) = send(
        app(),
        "POST",
        "/strategies/preflight",
        Some(
            r#"{"name":"bold","target_outcome":"over_2.5","leagues":["Primeira Liga"],"conditions":[
                {"metric":"total_goals_avg","operator":">","value":3.5,"last_n_games":10}
            ]}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["strategy"]["target_outcome"], "over_2.5");
    assert_eq!(json["strategy"]["leagues"][0], "Primeira Liga");
    assert_eq!(json["advisories"]["warnings"][0]["severity"], "medium");
}

#[tokio::test]
async fn preflight_rejects_blank_name() {
    let (status, body) = send(
        app(),
        "POST",
        "/strategies/preflight",
        Some(r#"{"name":"  ","conditions":[]}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("name is empty"));
}

#[tokio::test]
async fn catalog_and_template_routes() {
    let (status, body) = send(app(), "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    let metrics: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(metrics.as_array().unwrap().len(), 18);
    assert_eq!(metrics[0]["id"], "win_rate");
    assert_eq!(metrics[0]["default_operator"], ">");
    assert_eq!(metrics[0]["category"], "form");
    assert_eq!(metrics[0]["category_label"], "Form & Performance");

    let (status, body) = send(app(), "GET", "/templates", None).await;
    assert_eq!(status, StatusCode::OK);
    let templates: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(templates.as_array().unwrap().len(), 7);
    assert_eq!(templates[0]["category_label"], "Value Betting");

    let (status, body) = send(app(), "GET", "/templates/draw_specialist", None).await;
    assert_eq!(status, StatusCode::OK);
    let template: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(template["target_outcome"], "draw");
    assert_eq!(template["conditions"][0]["last_n_games"], 10);

    let (status, _) = send(app(), "GET", "/templates/martingale", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
