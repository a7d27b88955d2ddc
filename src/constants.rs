/// Application constants

// Currency
pub const OCTAS_PER_APT: u64 = 100_000_000;
pub const APT_DECIMALS: u32 = 8;
pub const APTOS_COIN_STORE: &str = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>";

// Contract
pub const GAME_MODULE: &str = "RockPaperScissors";
pub const DEFAULT_MODULE_OWNER: &str =
    "0x947d5d37b8d1498635e23e5bef4f8918967815e563aa428ab829587133b327e4";
pub const FN_START_GAME: &str = "start_game";
pub const FN_FINALIZE_RESULTS: &str = "finalize_results";
pub const FN_DEPOSIT_TO_BANK: &str = "deposit_to_bank";
pub const FN_WITHDRAW_TO_WALLET: &str = "withdraw_to_wallet";
pub const FN_GET_BANK_BALANCE: &str = "get_bank_balance";
pub const FN_GET_GAMES: &str = "get_games";
pub const EVENT_STRUCT: &str = "Event";

// Module events are emitted under the zero address
pub const EVENT_ACCOUNT_ADDRESS: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

// Transaction status
pub const VM_STATUS_SUCCESS: &str = "Executed successfully";

// Funding configuration
pub const MIN_BALANCE_OCTAS: u64 = 100_000;
pub const FAUCET_FUND_OCTAS: u64 = 100_000_000;
pub const MAX_FUNDING_RETRIES: u32 = 3;

// Faucet errors that can surface even when the credit went through
pub const FAUCET_BENIGN_TIMEOUT_MARKERS: [&str; 2] =
    ["timed out in pending state", "failed and timed out"];

// Bank statement paging
pub const EVENTS_PAGE_SIZE: u64 = 10;

// Transactions
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 200_000;
pub const DEFAULT_TX_EXPIRATION_SECS: i64 = 60;
pub const DEFAULT_TX_WAIT_TIMEOUT_SECS: u64 = 20;
pub const TX_POLL_INTERVAL_MILLIS: u64 = 500;

// Game payout multipliers
pub const WIN_MULTIPLIER: f64 = 1.8;
pub const DRAW_MULTIPLIER: f64 = 1.0;

// Testnet endpoints
pub const DEFAULT_NODE_URL: &str = "https://api.testnet.aptoslabs.com/v1";
pub const DEFAULT_FAUCET_URL: &str = "https://faucet.testnet.aptoslabs.com";
pub const DEFAULT_INDEXER_URL: &str = "https://api.testnet.aptoslabs.com/v1/graphql";
pub const EXPLORER_TX_URL: &str = "https://explorer.aptoslabs.com/txn";

// API version
pub const API_VERSION: &str = "v1";
