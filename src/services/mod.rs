pub mod balance_reconciler;
pub mod bank;
pub mod error_translator;
pub mod event_history;
pub mod game_sequencer;
pub mod onchain;

pub use balance_reconciler::{BalanceReconciler, BalanceReport};
pub use bank::BankService;
pub use event_history::EventHistoryService;
pub use game_sequencer::{GameSequencer, RoundSummary};
