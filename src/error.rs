use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Failure talking to the speech provider.
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Provider API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Startup configuration problems. Never produced while serving requests.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("Invalid service account credentials: {0}")]
    Credentials(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[from] ProviderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Synthesis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!("Request failed: {}", self);

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "Error processing request",
        )
            .into_response()
    }
}
