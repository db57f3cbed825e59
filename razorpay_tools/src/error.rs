use thiserror::Error;

#[derive(Debug, Error)]
pub enum RazorpayApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("The payment processor could not be reached: {0}")]
    GatewayUnavailable(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("No payment exists with id {0}")]
    PaymentNotFound(String),
}
