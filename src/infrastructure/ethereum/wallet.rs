//! Wallet clients - local key signing and the "no wallet" placeholder

use alloy::primitives::{Address, B256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use anyhow::{bail, Context, Result};
use tracing::info;

use crate::domain::chain::{ContractCall, WalletClient};

/// Wallet backed by a private key held in memory
pub struct LocalWallet {
    signer: PrivateKeySigner,
    provider: DynProvider,
}

impl LocalWallet {
    /// Build a signing provider for `url` from a hex private key
    pub fn connect_http(url: &str, private_key: &str) -> Result<Self> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .context("Invalid private key")?;
        let rpc_url = url.parse().context("Invalid HTTP URL")?;
        let provider = ProviderBuilder::new()
            .wallet(signer.clone())
            .connect_http(rpc_url)
            .erased();
        Ok(Self { signer, provider })
    }
}

#[async_trait::async_trait]
impl WalletClient for LocalWallet {
    async fn connect(&self) -> Result<Address> {
        Ok(self.signer.address())
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn submit_transaction(&self, call: &ContractCall, account: Address) -> Result<B256> {
        if account != self.signer.address() {
            bail!("Account {} is not controlled by this wallet", account);
        }
        let request = call.request(Some(account))?;
        let pending = self.provider.send_transaction(request).await?;
        let hash = *pending.tx_hash();
        info!(%hash, function = %call.function.signature, "transaction submitted");
        Ok(hash)
    }
}

/// Stand-in used when no private key is configured
pub struct NoWallet {
    env_var: String,
}

impl NoWallet {
    pub fn new(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
        }
    }

    fn missing(&self) -> anyhow::Error {
        anyhow::anyhow!("No wallet found. Please set {} to a private key.", self.env_var)
    }
}

#[async_trait::async_trait]
impl WalletClient for NoWallet {
    async fn connect(&self) -> Result<Address> {
        Err(self.missing())
    }

    async fn chain_id(&self) -> Result<u64> {
        Err(self.missing())
    }

    async fn submit_transaction(&self, _call: &ContractCall, _account: Address) -> Result<B256> {
        Err(self.missing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_wallet_names_env_var() {
        let wallet = NoWallet::new("PLAYGROUND_PRIVATE_KEY");
        let err = wallet.connect().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "No wallet found. Please set PLAYGROUND_PRIVATE_KEY to a private key."
        );
    }

    #[test]
    fn test_local_wallet_address() {
        // Well-known first Anvil development key
        let wallet = LocalWallet::connect_http(
            "http://127.0.0.1:8545",
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        assert_eq!(
            wallet.signer.address().to_checksum(None),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_invalid_private_key() {
        assert!(LocalWallet::connect_http("http://127.0.0.1:8545", "nope").is_err());
    }
}
