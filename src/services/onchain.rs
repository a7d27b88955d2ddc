use crate::{
    chain::{ChainClient, EntryFunctionPayload, TransactionReceipt, TransactionSigner},
    error::{AppError, Result, TxOrigin},
    services::error_translator,
};
use std::sync::Arc;

/// Fails with `TransactionFailed` unless the VM reported success.
pub fn check_transaction_status(receipt: &TransactionReceipt, origin: TxOrigin) -> Result<()> {
    if receipt.is_success() {
        return Ok(());
    }
    Err(AppError::TransactionFailed {
        origin,
        vm_status: receipt.vm_status.clone(),
    })
}

/// Builds, signs, submits and waits for entry-function transactions.
pub struct OnchainInvoker {
    chain: Arc<dyn ChainClient>,
}

impl OnchainInvoker {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }

    /// Runs one transaction to commit and checks its status.
    ///
    /// Every failure is passed through the abort translator and carries
    /// `origin` when it is a transaction or contract failure.
    pub async fn invoke(
        &self,
        signer: &dyn TransactionSigner,
        payload: EntryFunctionPayload,
        origin: TxOrigin,
    ) -> Result<TransactionReceipt> {
        self.invoke_untranslated(signer, payload, origin)
            .await
            .map_err(|e| error_translator::translate(e).with_origin(origin))
    }

    async fn invoke_untranslated(
        &self,
        signer: &dyn TransactionSigner,
        payload: EntryFunctionPayload,
        origin: TxOrigin,
    ) -> Result<TransactionReceipt> {
        let raw = self.chain.build_transaction(signer.address(), payload).await?;
        let pending = self.chain.sign_and_submit(signer, raw).await?;
        let receipt = self.chain.wait_for_transaction(&pending.hash).await?;
        tracing::info!(
            "{} committed as {} ({})",
            origin,
            receipt.hash,
            receipt.vm_status
        );
        check_transaction_status(&receipt, origin)?;
        Ok(receipt)
    }
}
