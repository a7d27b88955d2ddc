use crate::constants::{
    DEFAULT_FAUCET_URL, DEFAULT_INDEXER_URL, DEFAULT_MODULE_OWNER, DEFAULT_NODE_URL,
    DEFAULT_TX_WAIT_TIMEOUT_SECS, FAUCET_FUND_OCTAS, GAME_MODULE, MAX_FUNDING_RETRIES,
    MIN_BALANCE_OCTAS,
};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Chain endpoints
    pub aptos_node_url: String,
    pub aptos_faucet_url: String,
    pub aptos_indexer_url: String,

    // Contract
    pub module_owner: String,

    // Signing
    pub player_private_key: String,

    // Admin
    pub admin_addresses: Vec<String>,
    pub enforce_admin_access: bool,

    // Funding
    pub min_balance_octas: u64,
    pub faucet_fund_octas: u64,
    pub max_funding_retries: u32,

    // Transactions
    pub tx_wait_timeout_secs: u64,

    // CORS
    pub cors_allowed_origins: String,
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

// Comma, semicolon or whitespace separated; lowercased.
fn parse_address_list(raw: &str) -> Vec<String> {
    raw.split([',', ';', '\n', ' '])
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| value.to_ascii_lowercase())
        .collect()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let module_owner =
            env::var("MODULE_OWNER").unwrap_or_else(|_| DEFAULT_MODULE_OWNER.to_string());
        let admin_addresses = env::var("ADMIN_ADDRESSES")
            .map(|raw| parse_address_list(&raw))
            .unwrap_or_else(|_| vec![module_owner.to_ascii_lowercase()]);

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "testnet".to_string()),

            aptos_node_url: env::var("APTOS_NODE_URL")
                .unwrap_or_else(|_| DEFAULT_NODE_URL.to_string()),
            aptos_faucet_url: env::var("APTOS_FAUCET_URL")
                .unwrap_or_else(|_| DEFAULT_FAUCET_URL.to_string()),
            aptos_indexer_url: env::var("APTOS_INDEXER_URL")
                .unwrap_or_else(|_| DEFAULT_INDEXER_URL.to_string()),

            module_owner,

            player_private_key: env::var("PLAYER_PRIVATE_KEY")?,

            admin_addresses,
            enforce_admin_access: env::var("ENFORCE_ADMIN_ACCESS")
                .map(|v| is_truthy(&v))
                .unwrap_or(false),

            min_balance_octas: env::var("MIN_BALANCE_OCTAS")
                .unwrap_or_else(|_| MIN_BALANCE_OCTAS.to_string())
                .parse()?,
            faucet_fund_octas: env::var("FAUCET_FUND_OCTAS")
                .unwrap_or_else(|_| FAUCET_FUND_OCTAS.to_string())
                .parse()?,
            max_funding_retries: env::var("MAX_FUNDING_RETRIES")
                .unwrap_or_else(|_| MAX_FUNDING_RETRIES.to_string())
                .parse()?,

            tx_wait_timeout_secs: env::var("TX_WAIT_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_TX_WAIT_TIMEOUT_SECS.to_string())
                .parse()?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.aptos_node_url.trim().is_empty() {
            anyhow::bail!("APTOS_NODE_URL is empty");
        }
        if self.aptos_faucet_url.trim().is_empty() {
            anyhow::bail!("APTOS_FAUCET_URL is empty");
        }
        if self.aptos_indexer_url.trim().is_empty() {
            anyhow::bail!("APTOS_INDEXER_URL is empty");
        }
        if !self.module_owner.starts_with("0x") {
            anyhow::bail!("MODULE_OWNER must be a 0x-prefixed account address");
        }
        if self.player_private_key.trim().is_empty() {
            anyhow::bail!("PLAYER_PRIVATE_KEY is empty");
        }
        if self.tx_wait_timeout_secs == 0 {
            anyhow::bail!("TX_WAIT_TIMEOUT_SECS must be > 0");
        }

        if self.min_balance_octas >= self.faucet_fund_octas {
            tracing::warn!(
                "MIN_BALANCE_OCTAS ({}) is not below FAUCET_FUND_OCTAS ({}); a single top-up cannot clear the threshold",
                self.min_balance_octas,
                self.faucet_fund_octas
            );
        }
        if self.max_funding_retries == 0 {
            tracing::warn!("MAX_FUNDING_RETRIES is 0; low balances will never be topped up");
        }
        if !self.is_testnet() {
            tracing::warn!(
                "Environment {} is not a testnet; faucet top-ups will fail",
                self.environment
            );
        }
        if self.enforce_admin_access && self.admin_addresses.is_empty() {
            tracing::warn!("ENFORCE_ADMIN_ACCESS is on but ADMIN_ADDRESSES is empty");
        }
        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    pub fn is_testnet(&self) -> bool {
        matches!(
            self.environment.to_ascii_lowercase().as_str(),
            "development" | "testnet" | "devnet" | "local"
        )
    }

    /// Fully qualified `<owner>::RockPaperScissors::<name>` identifier.
    pub fn module_function(&self, name: &str) -> String {
        format!("{}::{}::{}", self.module_owner, GAME_MODULE, name)
    }

    pub fn is_admin(&self, address: &str) -> bool {
        let address = address.trim().to_ascii_lowercase();
        self.admin_addresses.iter().any(|admin| admin == &address)
    }
}

#[cfg(test)]
pub(crate) fn sample_config() -> Config {
    Config {
        host: "0.0.0.0".to_string(),
        port: 3000,
        environment: "testnet".to_string(),
        aptos_node_url: "http://localhost:8080/v1".to_string(),
        aptos_faucet_url: "http://localhost:8081".to_string(),
        aptos_indexer_url: "http://localhost:8090/v1/graphql".to_string(),
        module_owner: "0xcafe".to_string(),
        player_private_key: "0x".to_string() + &"11".repeat(32),
        admin_addresses: vec!["0xcafe".to_string()],
        enforce_admin_access: false,
        min_balance_octas: MIN_BALANCE_OCTAS,
        faucet_fund_octas: FAUCET_FUND_OCTAS,
        max_funding_retries: MAX_FUNDING_RETRIES,
        tx_wait_timeout_secs: 5,
        cors_allowed_origins: "*".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_function_builds_qualified_name() {
        let cfg = sample_config();
        assert_eq!(
            cfg.module_function("start_game"),
            "0xcafe::RockPaperScissors::start_game"
        );
    }

    #[test]
    fn parse_address_list_lowercases_and_skips_blanks() {
        let list = parse_address_list("0xAB, ,0xcd;0xEF");
        assert_eq!(list, vec!["0xab", "0xcd", "0xef"]);
    }

    #[test]
    fn is_admin_ignores_case_and_whitespace() {
        let cfg = sample_config();
        assert!(cfg.is_admin(" 0xCAFE "));
        assert!(!cfg.is_admin("0xbeef"));
    }

    #[test]
    fn validate_rejects_unprefixed_owner() {
        let mut cfg = sample_config();
        cfg.module_owner = "cafe".to_string();
        assert!(cfg.validate().is_err());
    }
}
