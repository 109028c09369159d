//! This module contains the logic for resolving human-readable signatures
//! from a 4-byte function selector or a 32-byte event topic hash.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    constants::{FOURBYTE_API_URL, HTTP_TIMEOUT_SECS, OPENCHAIN_LOOKUP_URL},
    error::SourceError,
    utils::{http::get_json_from_url, strings::replace_last},
};

/// A resolved function signature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedFunction {
    /// The name of the function. For example, `transfer`.
    pub name: String,
    /// The function signature. For example, `transfer(address,uint256)`.
    pub signature: String,
    /// The inputs of the function. For example, `["address", "uint256"]`.
    pub inputs: Vec<String>,
}

/// A resolved log signature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedLog {
    /// The name of the log. For example, `Transfer`.
    pub name: String,
    /// The log signature. For example, `Transfer(address,address,uint256)`.
    pub signature: String,
    /// The inputs of the log. For example, `["address", "address", "uint256"]`.
    pub inputs: Vec<String>,
}

/// A directory mapping selectors and topic hashes to text signatures.
#[async_trait]
pub trait SignatureDirectory: Send + Sync {
    /// A short name identifying the directory in logs and errors.
    fn name(&self) -> &'static str;

    /// Resolves a 4-byte function selector. `Ok(None)` when the directory
    /// holds no entry for it.
    async fn load_functions(
        &self,
        selector: &str,
    ) -> Result<Option<Vec<ResolvedFunction>>, SourceError>;

    /// Resolves a 32-byte event topic hash. `Ok(None)` when the directory
    /// holds no entry for it.
    async fn load_events(&self, hash: &str) -> Result<Option<Vec<ResolvedLog>>, SourceError>;
}

/// Splits a text signature like `transfer(address,uint256)` into its record
/// parts. Entries that are not of that shape are skipped by callers.
fn parse_signature_parts(text_signature: &str) -> Option<(String, Vec<String>)> {
    let (name, params) = text_signature.split_once('(')?;
    let inputs = replace_last(params, ")", "")
        .split(',')
        .filter(|input| !input.is_empty())
        .map(|input| input.to_string())
        .collect();
    Some((name.to_string(), inputs))
}

/// Strips an optional `0x` prefix from a selector or hash.
fn normalize(selector: &str) -> &str {
    selector.strip_prefix("0x").unwrap_or(selector)
}

/// The OpenChain signature database.
pub struct OpenChain;

impl OpenChain {
    async fn lookup(
        &self,
        kind: &'static str,
        selector: &str,
    ) -> Result<Option<Vec<String>>, SourceError> {
        let selector = normalize(selector);

        trace!("resolving {} selector {} via openchain", kind, selector);

        let response = get_json_from_url(
            &format!("{OPENCHAIN_LOOKUP_URL}?filter=false&{kind}=0x{selector}"),
            HTTP_TIMEOUT_SECS,
        )
        .await
        .map_err(|e| SourceError::new(self.name(), selector, e))?;

        let Some(response) = response else { return Ok(None) };

        // walk result.<kind>.<0xselector> to the match array
        let results = match response
            .get("result")
            .and_then(|result| result.get(kind))
            .and_then(|entries| entries.get(format!("0x{selector}")))
            .and_then(|item| item.as_array())
        {
            Some(results) => results.to_vec(),
            None => return Ok(None),
        };

        trace!("found {} possible signatures for selector {}", results.len(), selector);

        let signatures = results
            .iter()
            .filter_map(|entry| entry.get("name").and_then(|name| name.as_str()))
            .map(|text| text.to_string())
            .collect::<Vec<_>>();

        Ok(match signatures.len() {
            0 => None,
            _ => Some(signatures),
        })
    }
}

#[async_trait]
impl SignatureDirectory for OpenChain {
    fn name(&self) -> &'static str {
        "openchain"
    }

    async fn load_functions(
        &self,
        selector: &str,
    ) -> Result<Option<Vec<ResolvedFunction>>, SourceError> {
        Ok(self.lookup("function", selector).await?.map(|signatures| {
            signatures
                .into_iter()
                .filter_map(|signature| {
                    let (name, inputs) = parse_signature_parts(&signature)?;
                    Some(ResolvedFunction { name, signature, inputs })
                })
                .collect()
        }))
    }

    async fn load_events(&self, hash: &str) -> Result<Option<Vec<ResolvedLog>>, SourceError> {
        Ok(self.lookup("event", hash).await?.map(|signatures| {
            signatures
                .into_iter()
                .filter_map(|signature| {
                    let (name, inputs) = parse_signature_parts(&signature)?;
                    Some(ResolvedLog { name, signature, inputs })
                })
                .collect()
        }))
    }
}

/// The 4byte.directory signature database.
pub struct FourByte;

impl FourByte {
    async fn lookup(
        &self,
        endpoint: &'static str,
        selector: &str,
    ) -> Result<Option<Vec<String>>, SourceError> {
        let selector = normalize(selector);

        trace!("resolving selector {} via 4byte {}", selector, endpoint);

        let response = get_json_from_url(
            &format!("{FOURBYTE_API_URL}/{endpoint}/?hex_signature=0x{selector}"),
            HTTP_TIMEOUT_SECS,
        )
        .await
        .map_err(|e| SourceError::new(self.name(), selector, e))?;

        let Some(response) = response else { return Ok(None) };

        let results = match response.get("results").and_then(|r| r.as_array()) {
            Some(results) => results.to_vec(),
            None => return Ok(None),
        };

        let signatures = parse_fourbyte_results(&results);

        Ok(match signatures.len() {
            0 => None,
            _ => Some(signatures),
        })
    }
}

/// Pulls the text signatures out of a 4byte result array, oldest first so
/// the earliest (least spammy) submission leads.
fn parse_fourbyte_results(results: &[Value]) -> Vec<String> {
    let mut entries = results
        .iter()
        .filter_map(|entry| {
            let id = entry.get("id").and_then(|id| id.as_u64()).unwrap_or(u64::MAX);
            let text = entry.get("text_signature").and_then(|t| t.as_str())?;
            Some((id, text.to_string()))
        })
        .collect::<Vec<_>>();
    entries.sort_by_key(|(id, _)| *id);
    entries.into_iter().map(|(_, text)| text).collect()
}

#[async_trait]
impl SignatureDirectory for FourByte {
    fn name(&self) -> &'static str {
        "fourbyte"
    }

    async fn load_functions(
        &self,
        selector: &str,
    ) -> Result<Option<Vec<ResolvedFunction>>, SourceError> {
        Ok(self.lookup("signatures", selector).await?.map(|signatures| {
            signatures
                .into_iter()
                .filter_map(|signature| {
                    let (name, inputs) = parse_signature_parts(&signature)?;
                    Some(ResolvedFunction { name, signature, inputs })
                })
                .collect()
        }))
    }

    async fn load_events(&self, hash: &str) -> Result<Option<Vec<ResolvedLog>>, SourceError> {
        Ok(self.lookup("event-signatures", hash).await?.map(|signatures| {
            signatures
                .into_iter()
                .filter_map(|signature| {
                    let (name, inputs) = parse_signature_parts(&signature)?;
                    Some(ResolvedLog { name, signature, inputs })
                })
                .collect()
        }))
    }
}

/// A composite directory that queries its members in order and returns the
/// first non-empty answer. Same fallback discipline as
/// [`AnySource`](super::sources::AnySource): no entry advances, failure
/// short-circuits.
pub struct AnyDirectory {
    directories: Vec<Box<dyn SignatureDirectory>>,
}

impl AnyDirectory {
    /// Builds a composite over the given directories, queried in order.
    pub fn new(directories: Vec<Box<dyn SignatureDirectory>>) -> Self {
        Self { directories }
    }

    /// Resolves a 4-byte function selector across all member directories.
    pub async fn load_functions(
        &self,
        selector: &str,
    ) -> Result<Option<Vec<ResolvedFunction>>, SourceError> {
        for directory in &self.directories {
            if let Some(resolved) = directory.load_functions(selector).await? {
                debug!(
                    "{} resolved {} function signatures for {}",
                    directory.name(),
                    resolved.len(),
                    selector
                );
                return Ok(Some(resolved));
            }
        }
        Ok(None)
    }

    /// Resolves a 32-byte event topic hash across all member directories.
    pub async fn load_events(
        &self,
        hash: &str,
    ) -> Result<Option<Vec<ResolvedLog>>, SourceError> {
        for directory in &self.directories {
            if let Some(resolved) = directory.load_events(hash).await? {
                debug!(
                    "{} resolved {} event signatures for {}",
                    directory.name(),
                    resolved.len(),
                    hash
                );
                return Ok(Some(resolved));
            }
        }
        Ok(None)
    }
}
