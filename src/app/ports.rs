use crate::error::LookupFailure;
use crate::types::{CasNumber, CasSource};
use async_trait::async_trait;

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub body: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Plain GET of a page, no script execution.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult, String>;
}

/// One source that can turn a chemical name into a CAS number.
#[async_trait]
pub trait CasLookup: Send + Sync {
    fn source(&self) -> CasSource;

    async fn lookup(&self, name: &str) -> Result<CasNumber, LookupFailure>;
}

/// Loads a page in a script-executing browser and returns the text of the
/// usage section once it has rendered.
#[async_trait]
pub trait UsesRenderer: Send + Sync {
    async fn render_uses(&self, url: &str) -> Result<String, LookupFailure>;
}
