use crate::{
    chain::{types::apt_balance_octas, ChainClient},
    config::Config,
    constants::FAUCET_BENIGN_TIMEOUT_MARKERS,
    error::{AppError, Result},
    models::{FundingReason, Notice},
    utils::octas_to_apt,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// Receives the wallet balance as it is being reconciled.
///
/// `None` means a fetch is in flight.
pub trait BalanceSink: Send + Sync {
    fn publish(&self, balance: Option<f64>);
}

impl BalanceSink for watch::Sender<Option<f64>> {
    fn publish(&self, balance: Option<f64>) {
        self.send_replace(balance);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceReport {
    pub balance: f64,
    pub balance_octas: u64,
    pub top_ups: Vec<FundingReason>,
    pub notices: Vec<Notice>,
}

// Faucet waits that time out may still have credited the account.
fn is_benign_faucet_error(error: &AppError) -> bool {
    let text = error.to_string();
    FAUCET_BENIGN_TIMEOUT_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
}

/// Keeps a wallet above the playable threshold using the faucet.
pub struct BalanceReconciler {
    chain: Arc<dyn ChainClient>,
    min_balance_octas: u64,
    fund_amount_octas: u64,
    max_retries: u32,
}

impl BalanceReconciler {
    pub fn new(chain: Arc<dyn ChainClient>, config: &Config) -> Self {
        Self::with_limits(
            chain,
            config.min_balance_octas,
            config.faucet_fund_octas,
            config.max_funding_retries,
        )
    }

    pub fn with_limits(
        chain: Arc<dyn ChainClient>,
        min_balance_octas: u64,
        fund_amount_octas: u64,
        max_retries: u32,
    ) -> Self {
        Self {
            chain,
            min_balance_octas,
            fund_amount_octas,
            max_retries,
        }
    }

    /// Fetches the wallet balance, topping it up from the faucet when the
    /// account is missing or below the threshold.
    ///
    /// At most `max_retries` faucet requests are made, each followed by one
    /// re-check. When the ceiling is hit the sink receives `0` and the call
    /// fails with `AppError::RetryExhausted`.
    pub async fn reconcile(&self, address: &str, sink: &dyn BalanceSink) -> Result<BalanceReport> {
        sink.publish(None);

        let mut top_ups = Vec::new();
        let mut notices = Vec::new();
        let mut attempts: u32 = 0;

        loop {
            let reason = match self.check(address).await {
                Ok(octas) => {
                    let balance = octas_to_apt(octas);
                    sink.publish(Some(balance));
                    return Ok(BalanceReport {
                        balance,
                        balance_octas: octas,
                        top_ups,
                        notices,
                    });
                }
                Err(AppError::InsufficientBalance) => FundingReason::LowBalance,
                Err(AppError::AccountNotFound(msg)) => {
                    tracing::info!("Account {} not on chain yet: {}", address, msg);
                    FundingReason::NewAccount
                }
                Err(e) => return Err(e),
            };

            if attempts >= self.max_retries {
                tracing::warn!(
                    "Funding retries exhausted for {} after {} attempts ({})",
                    address,
                    attempts,
                    reason.label()
                );
                sink.publish(Some(0.0));
                return Err(AppError::RetryExhausted {
                    max_retries: self.max_retries,
                    reason: reason.label().to_string(),
                });
            }

            attempts += 1;
            self.request_funding(address, reason).await?;
            top_ups.push(reason);
            notices.push(Notice::success(format!(
                "{} Detected: Funded with {} APT",
                reason.label(),
                octas_to_apt(self.fund_amount_octas)
            )));
        }
    }

    /// Spendable octas, or `InsufficientBalance` below the threshold.
    /// Missing accounts surface as `AccountNotFound`.
    async fn check(&self, address: &str) -> Result<u64> {
        let resources = self.chain.get_account_resources(address).await?;
        let octas = apt_balance_octas(&resources);
        if octas < self.min_balance_octas {
            tracing::info!(
                "Balance of {} is {} octas, below {}",
                address,
                octas,
                self.min_balance_octas
            );
            return Err(AppError::InsufficientBalance);
        }
        Ok(octas)
    }

    async fn request_funding(&self, address: &str, reason: FundingReason) -> Result<()> {
        tracing::info!(
            "Trying to fund the account. Reason: {}",
            reason.label()
        );
        match self.chain.fund_account(address, self.fund_amount_octas).await {
            Ok(hashes) => {
                tracing::debug!("Faucet transactions for {}: {:?}", address, hashes);
                Ok(())
            }
            Err(e) if is_benign_faucet_error(&e) => {
                // The credit may still land; the re-check decides.
                tracing::warn!("Faucet wait timed out for {}: {}", address, e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
