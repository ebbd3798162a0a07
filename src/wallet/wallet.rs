use crate::core::{calculate_balance, Block, Transaction};
use crate::error::{BlockchainError, Result};
use crate::utils::{ecdsa_p256_sha256_sign_digest, hex_encode, new_key_pair};
use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, KeyPair, ECDSA_P256_SHA256_FIXED_SIGNING};

/// A signing identity. The address is the hex encoded public key, so anyone
/// holding a transaction can verify it without a key directory.
#[derive(Clone)]
pub struct Wallet {
    pkcs8: Vec<u8>,
    public_key: Vec<u8>,
    address: String,
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Wallet {
    pub fn new() -> Result<Wallet> {
        let pkcs8 = new_key_pair()?;
        Self::from_pkcs8(pkcs8)
    }

    pub fn from_pkcs8(pkcs8: Vec<u8>) -> Result<Wallet> {
        let rng = SystemRandom::new();
        let key_pair =
            EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8.as_ref(), &rng)
                .map_err(|e| {
                    BlockchainError::Crypto(format!("Failed to create key pair from PKCS8: {e}"))
                })?;
        let public_key = key_pair.public_key().as_ref().to_vec();
        let address = hex_encode(&public_key);
        Ok(Wallet {
            pkcs8,
            public_key,
            address,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key(&self) -> &[u8] {
        self.public_key.as_slice()
    }

    /// Sign `message`, returning the hex encoded signature
    pub fn sign(&self, message: &[u8]) -> Result<String> {
        let signature = ecdsa_p256_sha256_sign_digest(&self.pkcs8, message)?;
        Ok(hex_encode(&signature))
    }

    /// Spendable balance according to `chain`
    pub fn balance(&self, chain: &[Block]) -> u64 {
        calculate_balance(chain, &self.address)
    }

    /// Build a signed transfer funded by this wallet's balance on `chain`
    pub fn create_transaction(
        &self,
        recipient: &str,
        amount: u64,
        chain: &[Block],
    ) -> Result<Transaction> {
        let balance = self.balance(chain);
        Transaction::new_transfer(self, recipient, amount, balance)
    }
}
