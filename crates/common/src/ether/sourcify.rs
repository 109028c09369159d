//! Sourcify contract metadata source.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

use super::sources::{AbiSource, ContractRecord};
use crate::{
    constants::{HTTP_TIMEOUT_SECS, SOURCIFY_REPO_URL},
    error::SourceError,
    utils::http::get_json_from_url,
};

/// Fetches verified-contract records from the Sourcify repository.
///
/// Sourcify stores a compiler `metadata.json` per verified contract, keyed
/// by chain id and address under either `full_match` or `partial_match`.
pub struct Sourcify {
    chain_id: u64,
}

impl Sourcify {
    /// Creates a source for the given chain id.
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }
}

#[async_trait]
impl AbiSource for Sourcify {
    fn name(&self) -> &'static str {
        "sourcify"
    }

    async fn get_contract(
        &self,
        address: Address,
    ) -> Result<Option<ContractRecord>, SourceError> {
        // a full match is preferred, but a partial match still carries the ABI
        for match_kind in ["full_match", "partial_match"] {
            let url = format!(
                "{}/{}/{}/{}/metadata.json",
                SOURCIFY_REPO_URL, match_kind, self.chain_id, address
            );

            trace!("fetching {} metadata for {} from sourcify", match_kind, address);

            let metadata = get_json_from_url(&url, HTTP_TIMEOUT_SECS)
                .await
                .map_err(|e| SourceError::new(self.name(), address, e))?;

            if let Some(record) = metadata.as_ref().and_then(parse_metadata) {
                return Ok(Some(record));
            }
        }

        Ok(None)
    }
}

/// Walks a Sourcify compiler `metadata.json` document. Documents without an
/// `output.abi` section are treated as no record.
fn parse_metadata(metadata: &Value) -> Option<ContractRecord> {
    let abi = metadata.get("output")?.get("abi")?.clone();
    let settings = metadata.get("settings");

    // the compilation target maps source path -> contract name
    let name = settings
        .and_then(|s| s.get("compilationTarget"))
        .and_then(|t| t.as_object())
        .and_then(|o| o.values().next())
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    Some(ContractRecord {
        abi,
        name,
        evm_version: settings
            .and_then(|s| s.get("evmVersion"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        compiler_version: metadata
            .get("compiler")
            .and_then(|c| c.get("version"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        runs: settings
            .and_then(|s| s.get("optimizer"))
            .and_then(|o| o.get("runs"))
            .and_then(|r| r.as_u64())
            .unwrap_or(0),
    })
}
