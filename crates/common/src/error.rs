/// Generic error type for shared utilities.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic error
    #[error("Error: {0}")]
    Generic(String),
    /// A metadata or signature lookup failed
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// A failure raised by an external metadata or signature provider.
///
/// "No record found" is not a failure. Providers report it as `Ok(None)` so
/// that a fallback chain can advance to the next provider; only transport
/// and malformed-response problems surface here, and they short-circuit the
/// chain.
#[derive(Debug, thiserror::Error)]
#[error("{provider} lookup for {lookup} failed: {cause}")]
pub struct SourceError {
    /// The provider that failed.
    pub provider: &'static str,
    /// What was being looked up: an address, selector, or topic hash.
    pub lookup: String,
    /// The underlying failure.
    #[source]
    pub cause: eyre::Report,
}

impl SourceError {
    /// Wraps a provider failure with its lookup context.
    pub fn new(provider: &'static str, lookup: impl ToString, cause: impl Into<eyre::Report>) -> Self {
        Self { provider, lookup: lookup.to_string(), cause: cause.into() }
    }
}
