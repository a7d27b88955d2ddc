use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which of the two game transactions produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxOrigin {
    StartGame,
    FinalizeResults,
    DepositToBank,
    WithdrawToWallet,
}

impl TxOrigin {
    pub fn function_name(&self) -> &'static str {
        match self {
            TxOrigin::StartGame => crate::constants::FN_START_GAME,
            TxOrigin::FinalizeResults => crate::constants::FN_FINALIZE_RESULTS,
            TxOrigin::DepositToBank => crate::constants::FN_DEPOSIT_TO_BANK,
            TxOrigin::WithdrawToWallet => crate::constants::FN_WITHDRAW_TO_WALLET,
        }
    }
}

impl fmt::Display for TxOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Blockchain RPC error: {0}")]
    ChainRPC(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Faucet error: {0}")]
    Faucet(String),

    #[error("Transaction timeout: {0}")]
    TransactionTimeout(String),

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Maximum retry limit of {max_retries} reached. Unable to fund {reason}.")]
    RetryExhausted { max_retries: u32, reason: String },

    #[error("Error: Some error occurred during the transaction. ({origin}: {vm_status})")]
    TransactionFailed { origin: TxOrigin, vm_status: String },

    #[error("Error: {code}: {message}")]
    DomainAbort {
        code: u64,
        message: String,
        origin: Option<TxOrigin>,
    },

    #[error("Error fetching {what}: {source}")]
    Fetch {
        what: &'static str,
        #[source]
        source: Box<AppError>,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn fetching(what: &'static str, source: AppError) -> Self {
        AppError::Fetch {
            what,
            source: Box::new(source),
        }
    }

    /// Transaction that produced this error, when it came out of a submission.
    pub fn origin(&self) -> Option<TxOrigin> {
        match self {
            AppError::TransactionFailed { origin, .. } => Some(*origin),
            AppError::DomainAbort { origin, .. } => *origin,
            _ => None,
        }
    }

    /// Attaches a transaction origin to errors raised while submitting it.
    pub fn with_origin(self, tag: TxOrigin) -> Self {
        match self {
            AppError::DomainAbort {
                code,
                message,
                origin: None,
            } => AppError::DomainAbort {
                code,
                message,
                origin: Some(tag),
            },
            other => other,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = self
            .origin()
            .map(|origin| serde_json::json!({ "origin": origin }));

        let (status, code) = match self {
            AppError::AccountNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::InsufficientBalance => (StatusCode::BAD_REQUEST, "INSUFFICIENT_BALANCE"),
            AppError::RetryExhausted { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "FUNDING_RETRY_EXHAUSTED")
            }
            AppError::TransactionFailed { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "TRANSACTION_FAILED")
            }
            AppError::DomainAbort { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "CONTRACT_ABORT"),
            AppError::TransactionTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TRANSACTION_TIMEOUT"),
            AppError::ChainRPC(_) | AppError::Faucet(_) | AppError::Fetch { .. } => {
                (StatusCode::BAD_GATEWAY, "CHAIN_ERROR")
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
