use crate::{
    chain::{types::value_as_u64, ChainClient, EntryFunctionPayload, TransactionSigner},
    config::Config,
    constants::{FN_DEPOSIT_TO_BANK, FN_GET_BANK_BALANCE, FN_GET_GAMES, FN_WITHDRAW_TO_WALLET},
    error::{AppError, Result, TxOrigin},
    models::{GameRecord, GameStats, Notice},
    services::onchain::OnchainInvoker,
    utils::octas_to_apt,
};
use serde_json::{json, Value};
use std::sync::Arc;

// Move `Option<u64>` in entry-function JSON.
fn move_option(amount: Option<u64>) -> Value {
    match amount {
        Some(octas) => json!({ "vec": [octas.to_string()] }),
        None => json!({ "vec": [] }),
    }
}

/// Bank balance, game history and the admin deposit/withdraw entry points.
pub struct BankService {
    chain: Arc<dyn ChainClient>,
    invoker: OnchainInvoker,
    balance_function: String,
    games_function: String,
    deposit_function: String,
    withdraw_function: String,
}

impl BankService {
    pub fn new(chain: Arc<dyn ChainClient>, config: &Config) -> Self {
        Self {
            invoker: OnchainInvoker::new(chain.clone()),
            chain,
            balance_function: config.module_function(FN_GET_BANK_BALANCE),
            games_function: config.module_function(FN_GET_GAMES),
            deposit_function: config.module_function(FN_DEPOSIT_TO_BANK),
            withdraw_function: config.module_function(FN_WITHDRAW_TO_WALLET),
        }
    }

    /// Bank balance in APT. An empty view result counts as 0.
    pub async fn fetch_bank_balance(&self) -> Result<f64> {
        let values = self
            .chain
            .view(&self.balance_function, vec![], vec![])
            .await
            .map_err(|e| AppError::fetching("bank balance", e))?;

        let octas = values.first().and_then(value_as_u64).unwrap_or(0);
        Ok(octas_to_apt(octas))
    }

    /// Games played by `address`, newest first.
    pub async fn get_games(&self, address: &str) -> Result<Vec<GameRecord>> {
        let values = self
            .chain
            .view(&self.games_function, vec![], vec![json!(address)])
            .await
            .map_err(|e| AppError::fetching("games", e))?;

        let mut games: Vec<GameRecord> = match values.into_iter().next() {
            Some(list) => serde_json::from_value(list).map_err(|e| {
                AppError::fetching("games", AppError::ChainRPC(format!("malformed games: {}", e)))
            })?,
            None => Vec::new(),
        };
        games.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(games)
    }

    pub fn game_stats(&self, games: &[GameRecord]) -> GameStats {
        GameStats::from_games(games)
    }

    pub async fn deposit(&self, signer: &dyn TransactionSigner, octas: u64) -> Result<Notice> {
        if octas == 0 {
            return Err(AppError::BadRequest(
                "No active account or Invalid Amount".to_string(),
            ));
        }

        let payload = EntryFunctionPayload::new(
            self.deposit_function.clone(),
            vec![json!(octas.to_string())],
        );
        self.invoker
            .invoke(signer, payload, TxOrigin::DepositToBank)
            .await?;

        tracing::info!("Deposited {} octas to the bank from {}", octas, signer.address());
        Ok(Notice::success("Coins Deposited to the Bank!"))
    }

    /// Withdraws `octas` from the bank, or everything when `None`.
    pub async fn withdraw(
        &self,
        signer: &dyn TransactionSigner,
        octas: Option<u64>,
    ) -> Result<Notice> {
        let payload =
            EntryFunctionPayload::new(self.withdraw_function.clone(), vec![move_option(octas)]);
        self.invoker
            .invoke(signer, payload, TxOrigin::WithdrawToWallet)
            .await?;

        match octas {
            Some(amount) => tracing::info!("Withdrew {} octas to {}", amount, signer.address()),
            None => tracing::info!("Withdrew full bank balance to {}", signer.address()),
        }
        Ok(Notice::success("Withdrawal Successful"))
    }
}
