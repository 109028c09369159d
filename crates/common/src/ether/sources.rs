//! Contract metadata sources.
//!
//! A source maps a deployed address to the record a verification service
//! holds for it. Sources are fallible network collaborators and live behind
//! the [`AbiSource`] trait so they can be chained: [`AnySource`] queries its
//! members in order and hands back the first record found.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::SourceError;

/// A verified-contract record returned by a metadata source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    /// The contract ABI, as parsed JSON.
    pub abi: Value,
    /// The contract name. For example, `WETH9`.
    pub name: String,
    /// The EVM version the contract targets. For example, `london`.
    pub evm_version: String,
    /// The compiler version the contract was built with.
    pub compiler_version: String,
    /// The optimizer run count.
    pub runs: u64,
}

/// A source of verified-contract metadata.
#[async_trait]
pub trait AbiSource: Send + Sync {
    /// A short name identifying the source in logs and errors.
    fn name(&self) -> &'static str;

    /// Looks up the record for `address`. `Ok(None)` means the source holds
    /// no record for the address; transport and malformed-response problems
    /// are errors.
    async fn get_contract(&self, address: Address)
        -> Result<Option<ContractRecord>, SourceError>;
}

/// A composite source that queries its members in order and returns the
/// first record found. A member with no record advances the chain; a member
/// that fails short-circuits it.
pub struct AnySource {
    sources: Vec<Box<dyn AbiSource>>,
}

impl AnySource {
    /// Builds a composite over the given sources, queried in order.
    pub fn new(sources: Vec<Box<dyn AbiSource>>) -> Self {
        Self { sources }
    }

    /// Looks up `address` across all member sources.
    pub async fn get_contract(
        &self,
        address: Address,
    ) -> Result<Option<ContractRecord>, SourceError> {
        for source in &self.sources {
            trace!("querying {} for contract {}", source.name(), address);
            if let Some(record) = source.get_contract(address).await? {
                debug!("{} resolved contract {} as '{}'", source.name(), address, record.name);
                return Ok(Some(record));
            }
        }

        debug!("no source holds a record for contract {}", address);
        Ok(None)
    }
}
