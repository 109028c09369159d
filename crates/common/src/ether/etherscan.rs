//! Etherscan contract metadata source.

use alloy::primitives::Address;
use async_trait::async_trait;
use eyre::{eyre, OptionExt, Result};
use serde_json::Value;
use tracing::trace;

use super::sources::{AbiSource, ContractRecord};
use crate::{
    constants::{DEFAULT_ETHERSCAN_BASE_URL, HTTP_TIMEOUT_SECS},
    error::SourceError,
    utils::http::get_json_from_url,
};

/// Sentinel Etherscan returns in the `ABI` field for unverified contracts.
const NOT_VERIFIED: &str = "Contract source code not verified";

/// Fetches verified-contract records from the Etherscan
/// `contract.getsourcecode` endpoint.
pub struct Etherscan {
    api_key: String,
    base_url: String,
}

impl Etherscan {
    /// Creates a source against the default Etherscan API.
    pub fn new(api_key: impl ToString) -> Self {
        Self::with_base_url(api_key, DEFAULT_ETHERSCAN_BASE_URL)
    }

    /// Creates a source against a custom Etherscan-compatible API, e.g. a
    /// chain-specific explorer.
    pub fn with_base_url(api_key: impl ToString, base_url: impl ToString) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.to_string().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AbiSource for Etherscan {
    fn name(&self) -> &'static str {
        "etherscan"
    }

    async fn get_contract(
        &self,
        address: Address,
    ) -> Result<Option<ContractRecord>, SourceError> {
        let url = format!(
            "{}/api?module=contract&action=getsourcecode&address={}&apikey={}",
            self.base_url, address, self.api_key
        );

        trace!("fetching contract record for {} from etherscan", address);

        let response = get_json_from_url(&url, HTTP_TIMEOUT_SECS)
            .await
            .map_err(|e| SourceError::new(self.name(), address, e))?
            .ok_or_else(|| {
                SourceError::new(self.name(), address, eyre!("no response from etherscan"))
            })?;

        parse_getsourcecode_response(&response)
            .map_err(|e| SourceError::new(self.name(), address, e))
    }
}

/// Walks a `getsourcecode` response body. `Ok(None)` is the unverified /
/// no-record outcome; a malformed body is an error.
fn parse_getsourcecode_response(response: &Value) -> Result<Option<ContractRecord>> {
    let status = response.get("status").and_then(|s| s.as_str()).unwrap_or("0");
    if status != "1" {
        let message = response
            .get("result")
            .and_then(|r| r.as_str())
            .or_else(|| response.get("message").and_then(|m| m.as_str()))
            .unwrap_or("unknown etherscan error");
        if message.contains(NOT_VERIFIED) {
            return Ok(None);
        }
        return Err(eyre!("etherscan error: {message}"));
    }

    let item = response
        .get("result")
        .and_then(|r| r.as_array())
        .and_then(|items| items.first())
        .ok_or_eyre("error parsing contract record from etherscan")?;

    let abi_text =
        item.get("ABI").and_then(|a| a.as_str()).ok_or_eyre("etherscan record has no ABI")?;
    if abi_text.contains(NOT_VERIFIED) {
        return Ok(None);
    }
    let abi: Value = serde_json::from_str(abi_text)?;

    let field = |key: &str| {
        item.get(key).and_then(|v| v.as_str()).map(|v| v.to_string()).unwrap_or_default()
    };

    Ok(Some(ContractRecord {
        abi,
        name: field("ContractName"),
        evm_version: field("EVMVersion"),
        compiler_version: field("CompilerVersion"),
        runs: item.get("Runs").and_then(|r| r.as_str()).and_then(|r| r.parse().ok()).unwrap_or(0),
    }))
}
