use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::core::TargetChain;

pub const DEFAULT_RPC: &str = "https://arb1.arbitrum.io/rpc";
pub const ARBITRUM_CHAIN_ID: u64 = 42161;
pub const USDC_ARBITRUM: &str = "0xaf88d065e77c8cC2239327C5EDb3A432268e5831";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP JSON-RPC endpoint
    pub rpc: String,

    /// Chain the wallet must be connected to
    pub chain_id: u64,

    /// Display name of that chain
    pub chain_name: String,

    /// Block explorer base URL, used for transaction links
    pub explorer: String,

    /// Environment variable holding the wallet private key
    pub private_key_env: String,

    /// USDC token contract for the balance viewer
    pub usdc_address: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: DEFAULT_RPC.to_string(),
            chain_id: ARBITRUM_CHAIN_ID,
            chain_name: "Arbitrum".to_string(),
            explorer: "https://arbiscan.io".to_string(),
            private_key_env: "PLAYGROUND_PRIVATE_KEY".to_string(),
            usdc_address: USDC_ARBITRUM.to_string(),
        }
    }
}

impl Config {
    pub fn target_chain(&self) -> TargetChain {
        TargetChain {
            id: self.chain_id,
            name: self.chain_name.clone(),
        }
    }

    /// Explorer link for a transaction hash
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer.trim_end_matches('/'), tx_hash)
    }

    /// Private key from the configured environment variable, if set
    pub fn private_key(&self) -> Option<String> {
        std::env::var(&self.private_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    parse(&content)
}

/// Parse config text, falling back to defaults when it is malformed
pub fn parse(content: &str) -> Config {
    match toml::from_str::<Config>(content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring malformed config");
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("PLAYGROUND_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("contract-playground").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(
            home.join(".config")
                .join("contract-playground")
                .join("config.toml"),
        );
    }

    directories::ProjectDirs::from("io", "contract-playground", "contract-playground")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("contract-playground"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(
            home.join(".local")
                .join("share")
                .join("contract-playground"),
        );
    }
    directories::ProjectDirs::from("io", "contract-playground", "contract-playground")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn form_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("form.sqlite3"))
}
