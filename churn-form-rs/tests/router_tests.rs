//! End-to-end tests for the churn form router

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use churn_form::{ChurnForm, FieldKind, CUSTOMER_SCHEMA};
use scoring_sdk::{Scorer, ScoringClient, ScoringError, ScoringPayload, ScoringResult};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCORING_PATH: &str = "/ml/v4/deployments/churn/predictions";
const TOKEN: &str = "router_test_token";

/// Scorer returning a canned outcome and recording every payload it sees
struct StubScorer {
    outcome: Result<Value, ScoringError>,
    seen: Mutex<Vec<ScoringPayload>>,
}

impl StubScorer {
    fn replying(outcome: Result<Value, ScoringError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Scorer for StubScorer {
    fn name(&self) -> &str {
        "stub"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn score(&self, payload: &ScoringPayload) -> scoring_sdk::Result<ScoringResult> {
        self.seen.lock().unwrap().push(payload.clone());
        match &self.outcome {
            Ok(fields) => {
                let fields = fields.as_object().cloned().unwrap_or_default();
                ScoringResult::from_fields(fields)
            }
            Err(err) => Err(err.clone()),
        }
    }
}

fn router_with(scorer: Arc<dyn Scorer>) -> Router {
    Arc::new(ChurnForm::new(scorer)).create_router()
}

/// Default value of every field, as the untouched form would submit it
fn default_form() -> Vec<(String, String)> {
    CUSTOMER_SCHEMA
        .iter()
        .map(|field| {
            let value = match field.kind {
                FieldKind::BoundedFloat { default, .. } => default.to_string(),
                FieldKind::BoundedInteger { default, .. } => default.to_string(),
                FieldKind::Enumeration { options } => options[0].to_string(),
            };
            (field.name.to_string(), value)
        })
        .collect()
}

fn with_value(mut form: Vec<(String, String)>, name: &str, value: &str) -> Vec<(String, String)> {
    for (field, current) in form.iter_mut() {
        if field == name {
            *current = value.to_string();
        }
    }
    form
}

fn encode(form: &[(String, String)]) -> String {
    form.iter()
        .map(|(k, v)| format!("{}={}", k, v.replace('(', "%28").replace(')', "%29").replace(' ', "+")))
        .collect::<Vec<_>>()
        .join("&")
}

fn post_form(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Percentage shown beside `label` in the probabilities table
fn percent_for(html: &str, label: &str) -> f64 {
    let cell = format!("<tr><td>{}</td><td>", label);
    let start = html.find(&cell).unwrap() + cell.len();
    let end = start + html[start..].find('%').unwrap();
    html[start..end].parse().unwrap()
}

fn churn_reply() -> Value {
    json!({
        "predictions": [{
            "fields": ["prediction", "predictedLabel", "probability"],
            "values": [[1.0, "Yes", [0.25, 0.75]]]
        }]
    })
}

#[tokio::test]
async fn test_get_renders_form() {
    let app = router_with(StubScorer::replying(Ok(json!({}))));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"<form method="post" action="/">"#));
    for field in CUSTOMER_SCHEMA.iter() {
        assert!(html.contains(&format!(r#"name="{}""#, field.name)), "missing {}", field.name);
    }
}

#[tokio::test]
async fn test_post_scores_through_remote_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SCORING_PATH))
        .and(header_matcher("Authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(churn_reply()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ScoringClient::builder()
        .endpoint(format!("{}{}", server.uri(), SCORING_PATH))
        .token(TOKEN)
        .build()
        .unwrap();
    let app = router_with(Arc::new(client));

    let form = with_value(default_form(), "tenure", "5");
    let response = app.oneshot(post_form(encode(&form))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Percentage of this customer leaving is: 75%"));
    assert!(html.contains(r#"<span class="churn-risk churn-risk-yes">yes</span>"#));
    assert!(html.contains("<tr><td>tenure</td><td>5</td></tr>"));

    let no_percent = percent_for(&html, "No Churn");
    let yes_percent = percent_for(&html, "Churn");
    assert!((no_percent - 25.0).abs() < 1e-9);
    assert!((no_percent + yes_percent - 100.0).abs() < 1e-9);

    // scorer field order is kept on the result page
    let prediction = html.find("<td>prediction</td>").unwrap();
    let label = html.find("<td>predictedLabel</td>").unwrap();
    let probability = html.find("<td>probability</td>").unwrap();
    assert!(prediction < label && label < probability);

    let requests = server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let row = &sent["input_data"][0];
    assert_eq!(row["fields"][0], "MonthlyCharges");
    assert_eq!(row["fields"].as_array().unwrap().len(), CUSTOMER_SCHEMA.len());
    assert_eq!(row["values"][0][3], json!(5));
    assert_eq!(row["values"][0][4], json!("Female"));
}

#[tokio::test]
async fn test_non_numeric_integer_is_rejected() {
    let scorer = StubScorer::replying(Ok(json!({})));
    let app = router_with(scorer.clone());

    let form = with_value(default_form(), "tenure", "abc");
    let response = app.oneshot(post_form(encode(&form))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("tenure"));
    assert!(scorer.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_field_is_rejected() {
    let scorer = StubScorer::replying(Ok(json!({})));
    let app = router_with(scorer.clone());

    let form: Vec<_> = default_form().into_iter().filter(|(k, _)| k != "Contract").collect();
    let response = app.oneshot(post_form(encode(&form))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Contract"));
    assert!(scorer.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unconfigured_scorer_fails_without_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(churn_reply()))
        .expect(0)
        .mount(&server)
        .await;

    // endpoint known, token missing
    let client = ScoringClient::builder()
        .endpoint(format!("{}{}", server.uri(), SCORING_PATH))
        .build()
        .unwrap();
    let app = router_with(Arc::new(client));

    let response = app.oneshot(post_form(encode(&default_form()))).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("not configured"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_failure_maps_to_bad_gateway() {
    let scorer = StubScorer::replying(Err(ScoringError::upstream(503, "deployment is scaling")));
    let app = router_with(scorer.clone());

    let response = app.oneshot(post_form(encode(&default_form()))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let html = body_text(response).await;
    assert!(html.contains("HTTP 503"));
    assert_eq!(scorer.seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_result_maps_to_bad_gateway() {
    let scorer = StubScorer::replying(Ok(json!({"predictedLabel": "Yes"})));
    let app = router_with(scorer);

    let response = app.oneshot(post_form(encode(&default_form()))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_extra_fields_are_ignored() {
    let scorer = StubScorer::replying(Ok(json!({
        "predictedLabel": "No",
        "probability": [0.9, 0.1]
    })));
    let app = router_with(scorer.clone());

    let mut form = default_form();
    form.push(("csrf_token".to_string(), "abc".to_string()));
    let response = app.oneshot(post_form(encode(&form))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Percentage of this customer leaving is: 10%"));

    let seen = scorer.seen.lock().unwrap();
    assert_eq!(seen[0].len(), CUSTOMER_SCHEMA.len());
    assert!(seen[0].fields().iter().all(|f| f != "csrf_token"));
}

#[tokio::test]
async fn test_health_reports_scorer_state() {
    let client = ScoringClient::builder().build().unwrap();
    let app = router_with(Arc::new(client));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(health["healthy"], json!(true));
    assert_eq!(health["service_name"], json!("churn-form"));
    assert_eq!(health["scorer_configured"], json!(false));
    assert_eq!(health["status"], json!("DEGRADED"));
}
