use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    error::Result,
    models::ApiResponse,
    services::{BalanceReconciler, BalanceReport},
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct CachedBalance {
    /// Last reconciled balance in APT.
    pub balance: Option<f64>,
    pub loading: bool,
}

/// GET /api/v1/wallet/balance
///
/// Funds the player wallet from the faucet first when it is new or low.
pub async fn get_wallet_balance(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BalanceReport>>> {
    let reconciler = BalanceReconciler::new(state.chain.clone(), &state.config);
    let _signing = state.signer_lock.lock().await;
    let report = reconciler
        .reconcile(state.signer.address(), state.wallet_balance.as_ref())
        .await?;

    Ok(Json(ApiResponse::success(report)))
}

/// GET /api/v1/wallet/balance/cached
///
/// Last value published by a reconcile, without touching the chain.
pub async fn get_cached_wallet_balance(
    State(state): State<AppState>,
) -> Json<ApiResponse<CachedBalance>> {
    let balance = *state.wallet_balance.borrow();

    Json(ApiResponse::success(CachedBalance {
        balance,
        loading: balance.is_none(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::{test_signer, BalanceReply, MockChain};
    use crate::config::sample_config;
    use std::sync::Arc;

    #[tokio::test]
    async fn cached_balance_follows_last_reconcile() {
        let chain = Arc::new(
            MockChain::new().with_balances(vec![BalanceReply::Octas(250_000_000)]),
        );
        let state = AppState::new(sample_config(), chain, Arc::new(test_signer()));

        let before = get_cached_wallet_balance(State(state.clone())).await;
        assert!(before.0.data.loading);
        assert_eq!(before.0.data.balance, None);

        get_wallet_balance(State(state.clone()))
            .await
            .expect("reconciled");

        let after = get_cached_wallet_balance(State(state)).await;
        assert!(!after.0.data.loading);
        assert_eq!(after.0.data.balance, Some(2.5));
    }
}
