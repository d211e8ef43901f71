use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use scoring_sdk::ScoringError;
use thiserror::Error;

use crate::payload::SubmissionError;
use crate::views::error_page;

/// Failure of a single form submission. Never fatal to the process.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid submission: {0}")]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Submission(_) => StatusCode::BAD_REQUEST,
            AppError::Scoring(err) if err.is_configuration() => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Scoring(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short category name, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Submission(_) => "submission",
            AppError::Scoring(err) => err.kind(),
        }
    }

    /// Message safe to show to the user
    pub fn public_message(&self) -> String {
        match self {
            AppError::Submission(err) => format!("The submitted form is invalid: {}.", err),
            AppError::Scoring(ScoringError::Configuration(_)) => {
                "The scoring service is not configured. Set URL and TOKEN and try again.".to_string()
            }
            AppError::Scoring(ScoringError::Transport(_)) => {
                "The scoring service could not be reached.".to_string()
            }
            AppError::Scoring(ScoringError::Upstream { status, .. }) => {
                format!("The scoring service rejected the request (HTTP {}).", status)
            }
            AppError::Scoring(ScoringError::ResponseFormat(_)) => {
                "The scoring service returned an unexpected response.".to_string()
            }
        }
    }

    pub fn log_level(&self) -> log::Level {
        match self {
            AppError::Submission(_) => log::Level::Warn,
            AppError::Scoring(_) => log::Level::Error,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Html(error_page(status, &self.public_message()))).into_response()
    }
}
