use crate::apis::{fetch_html, urls};
use crate::app::ports::{CasLookup, HttpClientPort};
use crate::constants::{WIKI_CAS_SPAN_TITLE, WIKI_HEADING_ID};
use crate::error::LookupFailure;
use crate::types::{CasNumber, CasSource};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::{debug, instrument};

static HEADING: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!("h1#{WIKI_HEADING_ID}")).expect("valid heading selector")
});
static CAS_SPAN: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!("span[title=\"{WIKI_CAS_SPAN_TITLE}\"]")).expect("valid span selector")
});

/// Encyclopedia lookup.
///
/// Wikipedia resolves near-miss titles to whatever article it thinks is meant,
/// so the page heading has to equal the requested name before the infobox value
/// is trusted.
pub struct WikipediaLookup {
    http: Arc<dyn HttpClientPort>,
}

impl WikipediaLookup {
    pub fn new(http: Arc<dyn HttpClientPort>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl CasLookup for WikipediaLookup {
    fn source(&self) -> CasSource {
        CasSource::Encyclopedia
    }

    #[instrument(skip(self))]
    async fn lookup(&self, name: &str) -> Result<CasNumber, LookupFailure> {
        let html = fetch_html(&*self.http, &urls::wiki_url(name)).await?;
        let raw = extract_cas(&html, name)?;
        debug!("Wikipedia gave '{}' for {}", raw, name);
        CasNumber::parse(&raw)
    }
}

/// Pulls the CAS text out of an article, checking the heading first.
pub fn extract_cas(html: &str, name: &str) -> Result<String, LookupFailure> {
    let document = Html::parse_document(html);

    let heading = document
        .select(&HEADING)
        .next()
        .ok_or(LookupFailure::NotFound)?;
    let page_title = heading.text().collect::<String>().trim().to_string();
    if page_title.to_lowercase() != name.to_lowercase() {
        return Err(LookupFailure::TitleMismatch { page_title });
    }

    document
        .select(&CAS_SPAN)
        .next()
        .map(|span| span.text().collect::<String>())
        .ok_or(LookupFailure::NotFound)
}
