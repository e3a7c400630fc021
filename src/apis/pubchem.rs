use crate::app::ports::UsesRenderer;
use crate::error::LookupFailure;
use tracing::{info, instrument, warn};

/// Fetches the raw "Uses" section of a PubChem compound page.
///
/// The section is filled in by client-side script, so this needs a
/// rendering browser rather than a plain GET.
#[instrument(skip(renderer))]
pub async fn fetch_uses(renderer: &dyn UsesRenderer, url: &str) -> Result<String, LookupFailure> {
    if url.trim().is_empty() {
        return Err(LookupFailure::NoUrl);
    }
    match renderer.render_uses(url).await {
        Ok(text) => {
            info!("    Found uses.");
            Ok(text)
        }
        Err(LookupFailure::Timeout) => {
            warn!("    Failed to establish connection");
            Err(LookupFailure::Timeout)
        }
        Err(e) => {
            warn!("    Could not find uses: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedRenderer {
        reply: Result<String, LookupFailure>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl UsesRenderer for ScriptedRenderer {
        async fn render_uses(&self, url: &str) -> Result<String, LookupFailure> {
            self.calls.lock().unwrap().push(url.to_string());
            self.reply.clone()
        }
    }

    fn renderer(reply: Result<String, LookupFailure>) -> ScriptedRenderer {
        ScriptedRenderer {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_empty_url_never_reaches_browser() {
        let r = renderer(Ok("used in glue".into()));
        assert_eq!(fetch_uses(&r, "").await, Err(LookupFailure::NoUrl));
        assert!(r.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rendered_text_is_returned() {
        let r = renderer(Ok("used in glue".into()));
        let url = "https://pubchem.ncbi.nlm.nih.gov/compound/50-00-0";
        assert_eq!(fetch_uses(&r, url).await.unwrap(), "used in glue");
        assert_eq!(r.calls.lock().unwrap().as_slice(), [url.to_string()]);
    }

    #[tokio::test]
    async fn test_timeout_is_passed_through() {
        let r = renderer(Err(LookupFailure::Timeout));
        assert_eq!(fetch_uses(&r, "http://x").await, Err(LookupFailure::Timeout));
    }
}
