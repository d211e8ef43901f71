use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Form, Json, Router,
};
use log::{debug, info, log};
use once_cell::sync::Lazy;
use scoring_sdk::Scorer;
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;

pub mod error;
pub mod form;
pub mod payload;
pub mod presenter;
pub mod schema;
pub mod views;

pub use error::AppError;
pub use payload::{build_payload, SubmissionError, SubmittedRecord};
pub use presenter::{present, DisplayModel};
pub use schema::{FieldDefinition, FieldKind, FieldSchema, CUSTOMER_SCHEMA};

/// Largest accepted form body (the full form is well under 2KB)
pub const MAX_FORM_BYTES: usize = 64 * 1024;

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// State of one submission, passed through the pipeline and dropped with the response
#[derive(Debug, Clone)]
pub struct SubmissionContext {
    pub request_id: String,
    pub record: SubmittedRecord,
}

impl SubmissionContext {
    pub fn new(record: SubmittedRecord) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            record,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service_name: String,
    pub uptime_seconds: u64,
    pub status: String,
    pub scorer_configured: bool,
}

/// The churn form service: read-only schema plus the scorer it submits to
pub struct ChurnForm {
    scorer: Arc<dyn Scorer>,
    schema: &'static FieldSchema,
    form_markup: String,
}

impl ChurnForm {
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        Self::with_schema(scorer, &CUSTOMER_SCHEMA)
    }

    pub fn with_schema(scorer: Arc<dyn Scorer>, schema: &'static FieldSchema) -> Self {
        Lazy::force(&START_TIME);
        Self {
            scorer,
            schema,
            form_markup: form::render_form(schema),
        }
    }

    /// Create the Axum router with all routes and middleware
    pub fn create_router(self: Arc<Self>) -> Router {
        Router::new()
            .route("/", get(Self::index_handler).post(Self::submit_handler))
            .route("/health", get(Self::health_handler))
            .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
            .with_state(self)
    }

    /// Coerce, score and present one submission, returning the result page
    pub async fn handle_submission(&self, ctx: &SubmissionContext) -> Result<String, AppError> {
        let payload = build_payload(self.schema, &ctx.record)?;
        debug!(
            "[{}] scoring {} fields with {}",
            ctx.request_id,
            payload.len(),
            self.scorer.name()
        );

        let result = self.scorer.score(&payload).await?;
        let model = present(result);
        info!(
            "[{}] scored: churn_risk={}, churn={:.1}%",
            ctx.request_id, model.churn_risk, model.yes_percent
        );

        Ok(views::score_page(&model, &ctx.record, self.schema))
    }

    async fn index_handler(State(state): State<Arc<Self>>) -> Html<String> {
        Html(views::input_page(&state.form_markup))
    }

    async fn submit_handler(
        State(state): State<Arc<Self>>,
        Form(record): Form<SubmittedRecord>,
    ) -> Result<Html<String>, AppError> {
        let ctx = SubmissionContext::new(record);
        info!("[{}] submission received with {} fields", ctx.request_id, ctx.record.len());

        match state.handle_submission(&ctx).await {
            Ok(page) => Ok(Html(page)),
            Err(err) => {
                log!(
                    err.log_level(),
                    "[{}] submission failed ({}): {}",
                    ctx.request_id,
                    err.kind(),
                    err
                );
                Err(err)
            }
        }
    }

    async fn health_handler(State(state): State<Arc<Self>>) -> impl IntoResponse {
        let scorer_configured = state.scorer.is_configured();

        Json(HealthResponse {
            healthy: true,
            service_name: "churn-form".to_string(),
            uptime_seconds: START_TIME.elapsed().as_secs(),
            status: if scorer_configured { "SERVING" } else { "DEGRADED" }.to_string(),
            scorer_configured,
        })
    }
}
