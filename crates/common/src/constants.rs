/// The default Etherscan API base URL.
pub const DEFAULT_ETHERSCAN_BASE_URL: &str = "https://api.etherscan.io";

/// The Sourcify contract repository root.
pub const SOURCIFY_REPO_URL: &str = "https://repo.sourcify.dev/contracts";

/// The OpenChain signature database lookup endpoint.
pub const OPENCHAIN_LOOKUP_URL: &str = "https://api.openchain.xyz/signature-database/v1/lookup";

/// The 4byte.directory API root.
pub const FOURBYTE_API_URL: &str = "https://www.4byte.directory/api/v1";

/// Seconds before a metadata or signature request is abandoned.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// How many times a failed metadata or signature request is retried before
/// it is reported as "no record".
pub const HTTP_MAX_RETRIES: u32 = 2;

/// Base delay for the exponential backoff between request retries, doubled
/// on every attempt.
pub const HTTP_RETRY_BASE_DELAY_MS: u64 = 250;
