use crate::{
    chain::{ChainClient, EntryFunctionPayload, TransactionReceipt, TransactionSigner},
    config::Config,
    constants::{FN_FINALIZE_RESULTS, FN_START_GAME},
    error::{Result, TxOrigin},
    models::{GameOutcome, GameRecord, GameStats, Notice, PlayerMove},
    services::{
        balance_reconciler::{BalanceReconciler, BalanceReport, BalanceSink},
        bank::BankService,
        onchain::OnchainInvoker,
    },
    utils::parse_apt_amount,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Receipts of one round. `finalize` is `None` when finalization failed.
#[derive(Debug, Clone, Serialize)]
pub struct GameReceipt {
    pub start: TransactionReceipt,
    pub finalize: Option<TransactionReceipt>,
}

/// A step that failed without aborting the round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFailure {
    pub origin: TxOrigin,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundSummary {
    pub player_move: PlayerMove,
    pub bet_octas: u64,
    pub receipt: GameReceipt,
    pub finalize_error: Option<StepFailure>,
    pub outcome: GameOutcome,
    pub latest_game: Option<GameRecord>,
    pub wallet: Option<BalanceReport>,
    pub bank_balance: Option<f64>,
    pub stats: GameStats,
    pub notices: Vec<Notice>,
}

/// Drives `start_game` then `finalize_results` and resolves the round.
pub struct GameSequencer {
    invoker: OnchainInvoker,
    bank: BankService,
    reconciler: BalanceReconciler,
    start_function: String,
    finalize_function: String,
}

impl GameSequencer {
    pub fn new(chain: Arc<dyn ChainClient>, config: &Config) -> Self {
        Self {
            invoker: OnchainInvoker::new(chain.clone()),
            bank: BankService::new(chain.clone(), config),
            reconciler: BalanceReconciler::new(chain, config),
            start_function: config.module_function(FN_START_GAME),
            finalize_function: config.module_function(FN_FINALIZE_RESULTS),
        }
    }

    pub async fn start_game(
        &self,
        signer: &dyn TransactionSigner,
        player_move: PlayerMove,
        bet_octas: u64,
        nonce_ms: u64,
    ) -> Result<TransactionReceipt> {
        let payload = EntryFunctionPayload::new(
            self.start_function.clone(),
            vec![
                json!(u8::from(player_move)),
                json!(bet_octas.to_string()),
                json!(nonce_ms.to_string()),
            ],
        );
        self.invoker
            .invoke(signer, payload, TxOrigin::StartGame)
            .await
    }

    pub async fn finalize_results(
        &self,
        signer: &dyn TransactionSigner,
    ) -> Result<TransactionReceipt> {
        let payload = EntryFunctionPayload::new(self.finalize_function.clone(), vec![]);
        self.invoker
            .invoke(signer, payload, TxOrigin::FinalizeResults)
            .await
    }

    /// Plays one round for `signer`.
    ///
    /// A failed `start_game` is returned as the error and nothing else runs.
    /// A failed `finalize_results` becomes an error notice; balances and the
    /// game list are still refreshed so the caller sees the resulting state.
    pub async fn play_round(
        &self,
        signer: &dyn TransactionSigner,
        player_move: PlayerMove,
        amount: &str,
        sink: &dyn BalanceSink,
    ) -> Result<RoundSummary> {
        let bet_octas = parse_apt_amount(amount);
        if bet_octas == 0 {
            tracing::warn!("Bet amount {:?} parsed to 0 octas", amount);
        }
        let nonce_ms = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();

        let start = self
            .start_game(signer, player_move, bet_octas, nonce_ms)
            .await?;

        let mut notices = Vec::new();
        let (finalize, finalize_error) = match self.finalize_results(signer).await {
            Ok(receipt) => (Some(receipt), None),
            Err(e) => {
                tracing::warn!("finalize_results failed for {}: {}", signer.address(), e);
                let failure = StepFailure {
                    origin: e.origin().unwrap_or(TxOrigin::FinalizeResults),
                    message: e.to_string(),
                };
                notices.push(Notice::error(failure.message.clone()));
                (None, Some(failure))
            }
        };

        let address = signer.address();
        let wallet = match self.reconciler.reconcile(address, sink).await {
            Ok(report) => {
                notices.extend(report.notices.iter().cloned());
                Some(report)
            }
            Err(e) => {
                notices.push(Notice::error(e.to_string()));
                None
            }
        };

        let bank_balance = match self.bank.fetch_bank_balance().await {
            Ok(balance) => Some(balance),
            Err(e) => {
                notices.push(Notice::error(e.to_string()));
                None
            }
        };

        let games = match self.bank.get_games(address).await {
            Ok(games) => games,
            Err(e) => {
                notices.push(Notice::error(e.to_string()));
                Vec::new()
            }
        };

        let latest_game = games.first().cloned();
        let outcome = latest_game
            .as_ref()
            .map(GameRecord::outcome)
            .unwrap_or(GameOutcome::Undeclared);
        notices.push(outcome.notice());

        tracing::info!(
            "Round for {}: {} with {} octas -> {:?}",
            address,
            player_move.label(),
            bet_octas,
            outcome
        );

        Ok(RoundSummary {
            player_move,
            bet_octas,
            receipt: GameReceipt { start, finalize },
            finalize_error,
            outcome,
            latest_game,
            wallet,
            bank_balance,
            stats: self.bank.game_stats(&games),
            notices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::{test_signer, BalanceReply, MockChain};
    use crate::config::sample_config;
    use crate::error::AppError;
    use crate::models::game::NoticeLevel;
    use serde_json::Value;
    use tokio::sync::watch;

    fn won_game(timestamp: u64) -> Value {
        json!({
            "player": "0xa",
            "player_move": 1,
            "computer_move": 3,
            "result": 2,
            "bet_amount": "150000000",
            "timestamp": timestamp.to_string(),
        })
    }

    fn funded_chain() -> MockChain {
        MockChain::new()
            .with_balances(vec![BalanceReply::Octas(500_000_000)])
            .with_view("get_bank_balance", vec![json!("1000000000")])
    }

    fn sink() -> (watch::Sender<Option<f64>>, watch::Receiver<Option<f64>>) {
        watch::channel(None)
    }

    fn sequencer(chain: Arc<MockChain>) -> GameSequencer {
        GameSequencer::new(chain, &sample_config())
    }

    #[tokio::test]
    async fn round_submits_both_steps_in_order() {
        let chain = Arc::new(
            funded_chain().with_view("get_games", vec![json!([won_game(1), won_game(5)])]),
        );
        let (tx, rx) = sink();

        let summary = sequencer(chain.clone())
            .play_round(&test_signer(), PlayerMove::Rock, "1.5", &tx)
            .await
            .expect("round");

        assert_eq!(chain.submitted(), vec!["start_game", "finalize_results"]);
        let args = chain.submitted_arguments("start_game").expect("start args");
        assert_eq!(args[0], json!(1));
        assert_eq!(args[1], json!("150000000"));
        assert_eq!(summary.bet_octas, 150_000_000);
        assert_eq!(summary.outcome, GameOutcome::Won);
        assert_eq!(summary.latest_game.map(|g| g.timestamp), Some(5));
        assert_eq!(summary.bank_balance, Some(10.0));
        assert_eq!(summary.stats.wins, 2);
        assert_eq!(summary.notices, vec![Notice::success("You Won")]);
        assert!(summary.finalize_error.is_none());
        assert_eq!(*rx.borrow(), Some(5.0));
    }

    #[tokio::test]
    async fn start_failure_never_finalizes() {
        let chain = Arc::new(funded_chain().with_vm_status("start_game", "OUT_OF_GAS"));
        let (tx, _rx) = sink();

        let err = sequencer(chain.clone())
            .play_round(&test_signer(), PlayerMove::Paper, "1", &tx)
            .await
            .expect_err("start fails");

        assert_eq!(err.origin(), Some(TxOrigin::StartGame));
        assert!(matches!(err, AppError::TransactionFailed { .. }));
        assert_eq!(chain.submitted(), vec!["start_game"]);
        assert_eq!(chain.resource_calls(), 0);
    }

    #[tokio::test]
    async fn start_abort_is_translated_and_tagged() {
        let chain = Arc::new(funded_chain().with_vm_status(
            "start_game",
            "Move abort in 0xcafe::RockPaperScissors: 401",
        ));
        let (tx, _rx) = sink();

        let err = sequencer(chain.clone())
            .play_round(&test_signer(), PlayerMove::Scissors, "100", &tx)
            .await
            .expect_err("bank cannot cover");

        assert_eq!(err.to_string(), "Error: 401: Insufficient funds in Bank");
        assert_eq!(err.origin(), Some(TxOrigin::StartGame));
        assert_eq!(chain.submitted(), vec!["start_game"]);
    }

    #[tokio::test]
    async fn finalize_failure_still_refreshes_state() {
        let chain = Arc::new(funded_chain().with_vm_status(
            "finalize_results",
            "Move abort in 0xcafe::RockPaperScissors: 403",
        ));
        let (tx, rx) = sink();

        let summary = sequencer(chain.clone())
            .play_round(&test_signer(), PlayerMove::Rock, "0.5", &tx)
            .await
            .expect("round continues");

        assert!(summary.receipt.finalize.is_none());
        assert_eq!(
            summary.finalize_error,
            Some(StepFailure {
                origin: TxOrigin::FinalizeResults,
                message: "Error: 403: Unauthorized Access".to_string(),
            })
        );
        assert_eq!(summary.outcome, GameOutcome::Undeclared);
        assert_eq!(
            summary.notices,
            vec![
                Notice::error("Error: 403: Unauthorized Access"),
                Notice::warning("Result Undeclared"),
            ]
        );
        assert_eq!(summary.notices[1].level, NoticeLevel::Warning);
        assert_eq!(summary.bank_balance, Some(10.0));
        assert_eq!(*rx.borrow(), Some(5.0));
    }

    #[tokio::test]
    async fn finalize_vm_failure_keeps_origin_as_data() {
        let chain = Arc::new(funded_chain().with_vm_status("finalize_results", "OUT_OF_GAS"));
        let (tx, _rx) = sink();

        let summary = sequencer(chain)
            .play_round(&test_signer(), PlayerMove::Paper, "1", &tx)
            .await
            .expect("round continues");

        let json = serde_json::to_value(&summary).expect("serializable");
        assert_eq!(json["finalize_error"]["origin"], "finalize_results");
        assert_eq!(
            json["finalize_error"]["message"],
            "Error: Some error occurred during the transaction. (finalize_results: OUT_OF_GAS)"
        );
    }

    #[tokio::test]
    async fn unparsable_amount_bets_zero() {
        let chain = Arc::new(funded_chain());
        let (tx, _rx) = sink();

        let summary = sequencer(chain.clone())
            .play_round(&test_signer(), PlayerMove::Rock, "abc", &tx)
            .await
            .expect("round");

        assert_eq!(summary.bet_octas, 0);
        let args = chain.submitted_arguments("start_game").expect("start args");
        assert_eq!(args[1], json!("0"));
    }
}
