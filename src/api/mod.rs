pub mod bank;
pub mod events;
pub mod game;
pub mod health;
pub mod wallet;

use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use crate::chain::{ChainClient, TransactionSigner};
use crate::config::Config;
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub chain: Arc<dyn ChainClient>,
    pub signer: Arc<dyn TransactionSigner>,
    /// Last reconciled wallet balance; `None` while a fetch is running.
    pub wallet_balance: Arc<watch::Sender<Option<f64>>>,
    /// Held across anything that signs or funds with `signer`, so sequence
    /// numbers and the start/finalize pair never interleave.
    pub signer_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: Config, chain: Arc<dyn ChainClient>, signer: Arc<dyn TransactionSigner>) -> Self {
        let (wallet_balance, _) = watch::channel(None);
        Self {
            config,
            chain,
            signer,
            wallet_balance: Arc::new(wallet_balance),
            signer_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Rejects bank administration from accounts outside `ADMIN_ADDRESSES`.
pub fn require_admin(state: &AppState) -> Result<()> {
    if !state.config.enforce_admin_access {
        return Ok(());
    }
    let address = state.signer.address();
    if state.config.is_admin(address) {
        Ok(())
    } else {
        tracing::warn!("Rejected admin request from {}", address);
        Err(AppError::Unauthorized(format!(
            "{} is not an admin account",
            address
        )))
    }
}
