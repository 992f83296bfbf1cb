use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use ledger_engine::{LedgerError, ReportingError};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("Invalid query. {0}")]
    InvalidQuery(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("The request conflicts with the current state of the ledger. {0}")]
    Conflict(String),
    #[error("The ledger cannot handle this request right now. {0}")]
    ServiceUnavailable(String),
    #[error("The ledger did not complete the request in time. {0}")]
    Timeout(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<LedgerError> for ServerError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InvalidAmount(_) | LedgerError::ValidationError(_) => Self::InvalidRequestBody(e.to_string()),
            LedgerError::UserNotFound(_) |
            LedgerError::WalletNotFound(_) |
            LedgerError::WalletIdNotFound(_) |
            LedgerError::ProducerOrWalletNotFound(_) |
            LedgerError::OrderNotFound(_) |
            LedgerError::ReversementNotFound(_) => Self::NoRecordFound(e.to_string()),
            LedgerError::AlreadySettled { .. } | LedgerError::WalletAlreadyExists(_) => Self::Conflict(e.to_string()),
            LedgerError::CodeGenerationExhausted { .. } => Self::ServiceUnavailable(e.to_string()),
            LedgerError::Timeout(_) => Self::Timeout(e.to_string()),
            LedgerError::PlatformWalletNotFound => {
                error!("💻️ The platform wallet is missing. Settlements cannot proceed until it is created.");
                Self::BackendError(e.to_string())
            },
            LedgerError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
        }
    }
}

impl From<ReportingError> for ServerError {
    fn from(e: ReportingError) -> Self {
        match e {
            ReportingError::QueryError(s) => Self::InvalidQuery(s),
            ReportingError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
        }
    }
}
