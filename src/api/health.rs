use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;
use crate::services::BankService;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub network: String,
    pub contract: String,
    pub player: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // A bank balance view exercises both the node and the deployed module.
    let contract_status = match BankService::new(state.chain.clone(), &state.config)
        .fetch_bank_balance()
        .await
    {
        Ok(_) => "reachable".to_string(),
        Err(e) => {
            tracing::warn!("Health check view failed: {}", e);
            "unreachable".to_string()
        }
    };

    let network = if state.config.is_testnet() {
        "testnet"
    } else {
        "custom"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        network: network.to_string(),
        contract: contract_status,
        player: state.signer.address().to_string(),
    })
}
