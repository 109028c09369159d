use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep as async_sleep;
use tracing::trace;

use crate::constants::{HTTP_MAX_RETRIES, HTTP_RETRY_BASE_DELAY_MS};

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Make a GET request to the target URL and return the response body as
/// JSON.
///
/// Transport failures are retried with exponential backoff under the policy
/// in [`crate::constants`]. Exhausted retries and non-JSON bodies (error
/// pages, plain-text 404s) both come back as `Ok(None)`, the "no record"
/// outcome that fallback chains advance past.
///
/// ```no_run
/// use mimir_common::utils::http::get_json_from_url;
///
/// let url = "https://example.com";
/// let timeout = 5;
/// // get_json_from_url(url, timeout).await;
/// ```
pub async fn get_json_from_url(url: &str, timeout: u64) -> Result<Option<Value>, reqwest::Error> {
    let client = Client::builder()
        .user_agent(APP_USER_AGENT)
        .timeout(Duration::from_secs(timeout))
        .build()?;

    let mut attempt = 0u32;
    let response = loop {
        trace!("GET {} (attempt {})", &url, attempt + 1);

        match client.get(url).send().await {
            Ok(response) => break response,
            Err(e) => {
                trace!("GET {}: {:?}", &url, &e);

                attempt += 1;
                if attempt > HTTP_MAX_RETRIES {
                    return Ok(None);
                }
                async_sleep(Duration::from_millis(HTTP_RETRY_BASE_DELAY_MS << attempt)).await;
            }
        }
    };

    let body = response.text().await?;

    match serde_json::from_str(&body) {
        Ok(json) => Ok(Some(json)),
        Err(_) => Ok(None),
    }
}
