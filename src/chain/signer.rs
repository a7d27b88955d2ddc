use crate::error::{AppError, Result};
use ed25519_dalek::{Signer, SigningKey};
use sha3::{Digest, Sha3_256};

// Authentication-key scheme byte for single Ed25519 keys.
const ED25519_SCHEME: u8 = 0x00;
const AIP80_ED25519_PREFIX: &str = "ed25519-priv-";

/// Account that can authorise transactions on behalf of a player.
pub trait TransactionSigner: Send + Sync {
    fn address(&self) -> &str;

    fn public_key_hex(&self) -> String;

    /// Signs the node-provided signing message, returning `0x`-prefixed hex.
    fn sign(&self, message: &[u8]) -> String;
}

/// Derives the account address of a single Ed25519 key.
pub fn derive_address(public_key: &[u8; 32]) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(public_key);
    hasher.update([ED25519_SCHEME]);
    format!("0x{}", hex::encode(hasher.finalize()))
}

pub struct LocalSigner {
    key: SigningKey,
    address: String,
}

impl LocalSigner {
    pub fn from_private_key_hex(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix(AIP80_ED25519_PREFIX).unwrap_or(trimmed);
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        let bytes = hex::decode(trimmed)
            .map_err(|e| AppError::Internal(format!("Invalid private key hex: {}", e)))?;
        let secret: [u8; 32] = bytes
            .try_into()
            .map_err(|_| AppError::Internal("Private key must be 32 bytes".to_string()))?;

        let key = SigningKey::from_bytes(&secret);
        let address = derive_address(&key.verifying_key().to_bytes());
        Ok(Self { key, address })
    }
}

impl TransactionSigner for LocalSigner {
    fn address(&self) -> &str {
        &self.address
    }

    fn public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.key.verifying_key().to_bytes()))
    }

    fn sign(&self, message: &[u8]) -> String {
        format!("0x{}", hex::encode(self.key.sign(message).to_bytes()))
    }
}
