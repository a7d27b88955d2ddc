use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::{ApiResponse, Notice},
    services::BankService,
    utils::parse_apt_amount,
};

use super::{require_admin, AppState};

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    /// APT to withdraw; absent or blank withdraws the whole bank.
    pub amount: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BankBalanceResponse {
    pub bank_balance: f64,
}

// Blank means "everything"; anything else must parse to a positive amount.
fn withdraw_octas(raw: Option<&str>) -> Result<Option<u64>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(amount) => match parse_apt_amount(amount) {
            0 => Err(AppError::BadRequest(
                "No active account or Invalid Amount".to_string(),
            )),
            octas => Ok(Some(octas)),
        },
    }
}

/// GET /api/v1/bank/balance
pub async fn get_bank_balance(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BankBalanceResponse>>> {
    let service = BankService::new(state.chain.clone(), &state.config);
    let bank_balance = service.fetch_bank_balance().await?;

    Ok(Json(ApiResponse::success(BankBalanceResponse { bank_balance })))
}

/// POST /api/v1/bank/deposit
pub async fn deposit(
    State(state): State<AppState>,
    Json(req): Json<DepositRequest>,
) -> Result<Json<ApiResponse<Notice>>> {
    require_admin(&state)?;

    let service = BankService::new(state.chain.clone(), &state.config);
    let _signing = state.signer_lock.lock().await;
    let notice = service
        .deposit(state.signer.as_ref(), parse_apt_amount(&req.amount))
        .await?;

    Ok(Json(ApiResponse::success(notice)))
}

/// POST /api/v1/bank/withdraw
pub async fn withdraw(
    State(state): State<AppState>,
    Json(req): Json<WithdrawRequest>,
) -> Result<Json<ApiResponse<Notice>>> {
    require_admin(&state)?;
    let octas = withdraw_octas(req.amount.as_deref())?;

    let service = BankService::new(state.chain.clone(), &state.config);
    let _signing = state.signer_lock.lock().await;
    let notice = service.withdraw(state.signer.as_ref(), octas).await?;

    Ok(Json(ApiResponse::success(notice)))
}
