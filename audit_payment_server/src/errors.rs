use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Amount is required")]
    AmountRequired,
    #[error("{0}")]
    InvalidRequestBody(String),
    /// A verification callback was rejected (forged signature, tampered amount, unknown or already-failed order).
    /// Carries only the public message; the specifics are logged server-side at the point of rejection.
    #[error("{0}")]
    PaymentRejected(String),
    #[error("The payment processor could not be reached. {0}")]
    PaymentGatewayDown(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AmountRequired => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::PaymentRejected(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PaymentGatewayDown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            // Order creation validation failures
            Self::AmountRequired | Self::InvalidRequestBody(_) => {
                json!({ "success": false, "error": self.to_string() })
            },
            // Verification rejections carry a deliberately terse public message
            Self::PaymentRejected(message) => json!({ "success": false, "message": message }),
            _ => json!({
                "success": false,
                "message": "The request could not be processed",
                "error": self.to_string(),
            }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}
