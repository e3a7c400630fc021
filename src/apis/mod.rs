pub mod nist;
pub mod pubchem;
pub mod urls;
pub mod wikipedia;

use crate::app::ports::HttpClientPort;
use crate::error::LookupFailure;
use tracing::debug;

/// GET a page for HTML scraping. A 404 means the source has no such entry.
pub(crate) async fn fetch_html(
    http: &dyn HttpClientPort,
    url: &str,
) -> Result<String, LookupFailure> {
    debug!("GET {}", url);
    let resp = http.get(url).await.map_err(LookupFailure::Fetch)?;
    match resp.status {
        404 => Err(LookupFailure::NotFound),
        _ if resp.is_success() => Ok(resp.body),
        status => Err(LookupFailure::Fetch(format!("HTTP {status} from {url}"))),
    }
}
