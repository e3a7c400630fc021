use crate::app::ports::UsesRenderer;
use crate::config::BrowserConfig;
use crate::error::{LookupFailure, Result, ScraperError};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Chrome stays alive between page loads, so give it slack beyond a single wait.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(300);

/// A single headless Chrome process with one tab.
///
/// Not meant to be shared between concurrent fetches; stages use it one page
/// at a time. The Chrome process is killed when the session is dropped.
pub struct BrowserSession {
    _browser: Browser,
    tab: Arc<Tab>,
    element_selector: String,
    render_wait: Duration,
}

impl BrowserSession {
    pub fn launch(config: &BrowserConfig) -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .idle_browser_timeout(IDLE_BROWSER_TIMEOUT.max(config.render_wait() * 2))
            .build()
            .map_err(|e| ScraperError::Browser(format!("invalid launch options: {e}")))?;

        let browser = Browser::new(options)
            .map_err(|e| ScraperError::Browser(format!("failed to launch Chrome: {e}")))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ScraperError::Browser(format!("failed to open tab: {e}")))?;

        info!("Browser session started (headless={})", config.headless);
        Ok(Self {
            _browser: browser,
            tab,
            element_selector: format!("#{}", config.uses_element_id),
            render_wait: config.render_wait(),
        })
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        info!("Browser session closed");
    }
}

#[async_trait]
impl UsesRenderer for BrowserSession {
    async fn render_uses(&self, url: &str) -> std::result::Result<String, LookupFailure> {
        let tab = Arc::clone(&self.tab);
        let url = url.to_string();
        let selector = self.element_selector.clone();
        let wait = self.render_wait;

        tokio::task::spawn_blocking(move || render_blocking(&*tab, &url, &selector, wait))
            .await
            .map_err(|e| LookupFailure::Fetch(format!("render task failed: {e}")))?
    }
}

/// The tab operations a render needs, so the sequencing can be exercised without Chrome.
trait PageDriver {
    fn navigate_to(&self, url: &str) -> anyhow::Result<()>;
    fn wait_until_navigated(&self) -> anyhow::Result<()>;
    fn wait_for(&self, selector: &str, wait: Duration) -> anyhow::Result<()>;
    fn inner_text(&self, selector: &str) -> anyhow::Result<String>;
}

impl PageDriver for Tab {
    fn navigate_to(&self, url: &str) -> anyhow::Result<()> {
        Tab::navigate_to(self, url).map(|_| ())
    }

    fn wait_until_navigated(&self) -> anyhow::Result<()> {
        Tab::wait_until_navigated(self).map(|_| ())
    }

    fn wait_for(&self, selector: &str, wait: Duration) -> anyhow::Result<()> {
        self.wait_for_element_with_custom_timeout(selector, wait)
            .map(|_| ())
    }

    fn inner_text(&self, selector: &str) -> anyhow::Result<String> {
        self.find_element(selector)?.get_inner_text()
    }
}

fn render_blocking<D: PageDriver + ?Sized>(
    driver: &D,
    url: &str,
    selector: &str,
    wait: Duration,
) -> std::result::Result<String, LookupFailure> {
    // The tab is reused, so until the new document commits #Uses from the
    // previous page would satisfy the wait.
    driver
        .navigate_to(url)
        .and_then(|_| driver.wait_until_navigated())
        .map_err(|e| LookupFailure::Fetch(e.to_string()))?;

    if let Err(e) = driver.wait_for(selector, wait) {
        debug!("Wait for {} on {} ended: {}", selector, url, e);
        return Err(LookupFailure::Timeout);
    }

    // The element can be replaced by further rendering between the wait and this lookup.
    driver
        .inner_text(selector)
        .map_err(|_| LookupFailure::ElementMissing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// A tab whose navigation only takes effect once it is waited for.
    #[derive(Default)]
    struct FakeTab {
        pages: HashMap<String, Option<String>>,
        current: RefCell<Option<String>>,
        pending: RefCell<Option<String>>,
        fail_navigation: bool,
    }

    impl FakeTab {
        fn with_page(mut self, url: &str, uses: Option<&str>) -> Self {
            self.pages.insert(url.to_string(), uses.map(str::to_string));
            self
        }
    }

    impl PageDriver for FakeTab {
        fn navigate_to(&self, url: &str) -> anyhow::Result<()> {
            if self.fail_navigation {
                anyhow::bail!("net::ERR_NAME_NOT_RESOLVED");
            }
            *self.pending.borrow_mut() = Some(url.to_string());
            Ok(())
        }

        fn wait_until_navigated(&self) -> anyhow::Result<()> {
            if let Some(url) = self.pending.borrow_mut().take() {
                *self.current.borrow_mut() = self.pages.get(&url).cloned().flatten();
            }
            Ok(())
        }

        fn wait_for(&self, _selector: &str, _wait: Duration) -> anyhow::Result<()> {
            match self.current.borrow().as_ref() {
                Some(_) => Ok(()),
                None => anyhow::bail!("timeout"),
            }
        }

        fn inner_text(&self, _selector: &str) -> anyhow::Result<String> {
            self.current
                .borrow()
                .clone()
                .ok_or_else(|| anyhow::anyhow!("no node"))
        }
    }

    const WAIT: Duration = Duration::from_millis(10);

    #[test]
    fn test_second_page_does_not_return_previous_uses() {
        let tab = FakeTab::default()
            .with_page("https://p/50-00-0", Some("used in resins"))
            .with_page("https://p/67-56-1", Some("used as fuel"));

        assert_eq!(
            render_blocking(&tab, "https://p/50-00-0", "#Uses", WAIT).unwrap(),
            "used in resins"
        );
        assert_eq!(
            render_blocking(&tab, "https://p/67-56-1", "#Uses", WAIT).unwrap(),
            "used as fuel"
        );
    }

    #[test]
    fn test_page_without_uses_times_out_after_previous_hit() {
        let tab = FakeTab::default()
            .with_page("https://p/50-00-0", Some("used in resins"))
            .with_page("https://p/7732-18-5", None);

        render_blocking(&tab, "https://p/50-00-0", "#Uses", WAIT).unwrap();
        assert_eq!(
            render_blocking(&tab, "https://p/7732-18-5", "#Uses", WAIT),
            Err(LookupFailure::Timeout)
        );
    }

    #[test]
    fn test_navigation_error_is_a_fetch_failure() {
        let tab = FakeTab {
            fail_navigation: true,
            ..Default::default()
        };
        assert!(matches!(
            render_blocking(&tab, "https://p/50-00-0", "#Uses", WAIT),
            Err(LookupFailure::Fetch(_))
        ));
    }
}
