//! The hand-off document the deployer writes once the contract is live.

use std::fmt::{self, Debug, Formatter};
use std::path::Path;

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use eyre::{Result, WrapErr, eyre};
use serde::{Deserialize, Serialize};

use crate::retry::{RetryPolicy, retry};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractInfo {
    pub contract_address: Address,
    pub abi: JsonAbi,
    #[serde(default)]
    pub wallets: Vec<Wallet>,
    #[serde(default)]
    pub deployed_at: u64,
}

/// Funded test identity, used by the simulator only.
#[derive(Clone, Deserialize, Serialize)]
pub struct Wallet {
    pub address: Address,
    pub private_key: String,
}

impl Debug for Wallet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

pub fn load_contract_info(path: &Path) -> Result<ContractInfo> {
    if !path.exists() {
        return Err(eyre!("Contract info not found at {}", path.display()));
    }
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read contract info at {}", path.display()))?;
    parse_contract_info(&contents)
}

pub fn parse_contract_info(contents: &str) -> Result<ContractInfo> {
    serde_json::from_str(contents).wrap_err("Malformed contract info")
}

/// Polls for the hand-off file until it exists and parses. A file the deployer
/// is still writing is retried within the same budget.
pub async fn wait_for_contract_info(path: &Path, policy: &RetryPolicy) -> Result<ContractInfo> {
    tracing::info!("Loading contract info from: {}", path.display());
    retry(policy, "contract info file", || async move { load_contract_info(path) }).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const CONTRACT_INFO: &str = r#"{
        "contract_address": "0x5FbDB2315678afecb367f032d93F642f64180aa3",
        "abi": [
            {
                "type": "event",
                "name": "PurchaseMade",
                "anonymous": false,
                "inputs": [
                    { "name": "buyer", "type": "address", "indexed": true },
                    { "name": "productId", "type": "uint256", "indexed": true },
                    { "name": "price", "type": "uint256", "indexed": false },
                    { "name": "quantity", "type": "uint256", "indexed": false },
                    { "name": "timestamp", "type": "uint256", "indexed": false }
                ]
            }
        ],
        "wallets": [
            {
                "address": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
                "private_key": "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d"
            }
        ],
        "deployed_at": 1700000000
    }"#;

    #[test]
    fn parses_published_document() -> Result<()> {
        let info = parse_contract_info(CONTRACT_INFO)?;

        assert_eq!(
            info.contract_address,
            "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse::<Address>()?
        );
        assert_eq!(info.abi.events.get("PurchaseMade").map(Vec::len), Some(1));
        assert_eq!(info.wallets.len(), 1);
        assert_eq!(info.deployed_at, 1_700_000_000);
        Ok(())
    }

    #[test]
    fn debug_output_redacts_private_keys() -> Result<()> {
        let info = parse_contract_info(CONTRACT_INFO)?;
        let printed = format!("{info:?}");

        assert!(!printed.contains("59c6995e"));
        assert!(printed.contains("<redacted>"));
        Ok(())
    }

    #[test]
    fn rejects_document_without_address() {
        assert!(parse_contract_info(r#"{ "abi": [] }"#).is_err());
    }

    #[tokio::test]
    async fn waits_for_file_to_appear() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("contract_info.json");
        let writer_path = path.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            std::fs::write(writer_path, CONTRACT_INFO).unwrap();
        });

        let policy = RetryPolicy::new(100, Duration::from_millis(10));
        let info = wait_for_contract_info(&path, &policy).await?;
        assert_eq!(info.wallets.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn retries_partially_written_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("contract_info.json");
        std::fs::write(&path, &CONTRACT_INFO[..CONTRACT_INFO.len() / 2])?;
        let writer_path = path.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            std::fs::write(writer_path, CONTRACT_INFO).unwrap();
        });

        let policy = RetryPolicy::new(100, Duration::from_millis(10));
        let info = wait_for_contract_info(&path, &policy).await?;
        assert_eq!(info.wallets.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_fatal_after_budget() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("contract_info.json");
        std::fs::write(&path, "{ not json")?;

        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        assert!(wait_for_contract_info(&path, &policy).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_fatal_after_budget() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("never.json");

        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        assert!(wait_for_contract_info(&path, &policy).await.is_err());
        Ok(())
    }
}
