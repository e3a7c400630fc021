use crate::apis::{fetch_html, urls};
use crate::app::ports::{CasLookup, HttpClientPort};
use crate::config::LocatorKind;
use crate::constants::{NIST_CAS_LABEL, NIST_ITEM_INDEX, NIST_LIST_INDEX};
use crate::error::LookupFailure;
use crate::types::{CasNumber, CasSource};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{debug, instrument};

static LIST: Lazy<Selector> = Lazy::new(|| Selector::parse("ul").expect("valid ul selector"));
static ITEM: Lazy<Selector> = Lazy::new(|| Selector::parse("li").expect("valid li selector"));
static CAS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{2,7}-\d{2}-\d\b").expect("valid CAS regex"));

/// Finds the CAS text inside a parsed NIST WebBook page.
pub trait CasLocator: Send + Sync {
    fn name(&self) -> &'static str;

    fn locate(&self, document: &Html) -> Option<String>;
}

/// Reads a fixed list item and takes the text after its `": "` label.
///
/// Silently wrong if NIST reorders the page; nothing checks what the label says.
pub struct PositionalLocator {
    pub list_index: usize,
    pub item_index: usize,
}

impl Default for PositionalLocator {
    fn default() -> Self {
        Self {
            list_index: NIST_LIST_INDEX,
            item_index: NIST_ITEM_INDEX,
        }
    }
}

impl CasLocator for PositionalLocator {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn locate(&self, document: &Html) -> Option<String> {
        let list = document.select(&LIST).nth(self.list_index)?;
        let item = list.select(&ITEM).nth(self.item_index)?;
        item_text(item).split(": ").nth(1).map(str::to_string)
    }
}

/// Scans every list item for one starting with `label` and pulls a
/// CAS-shaped token out of it.
pub struct LabeledLocator {
    pub label: String,
}

impl Default for LabeledLocator {
    fn default() -> Self {
        Self {
            label: NIST_CAS_LABEL.to_string(),
        }
    }
}

impl CasLocator for LabeledLocator {
    fn name(&self) -> &'static str {
        "labeled"
    }

    fn locate(&self, document: &Html) -> Option<String> {
        document
            .select(&ITEM)
            .map(item_text)
            .filter(|text| text.trim_start().starts_with(&self.label))
            .find_map(|text| CAS_PATTERN.find(&text).map(|m| m.as_str().to_string()))
    }
}

pub fn locator_for(kind: LocatorKind) -> Box<dyn CasLocator> {
    match kind {
        LocatorKind::Positional => Box::new(PositionalLocator::default()),
        LocatorKind::Labeled => Box::new(LabeledLocator::default()),
    }
}

fn item_text(item: ElementRef<'_>) -> String {
    item.text().collect()
}

/// Standards-database lookup against the NIST Chemistry WebBook.
pub struct NistLookup {
    http: Arc<dyn HttpClientPort>,
    locator: Box<dyn CasLocator>,
}

impl NistLookup {
    pub fn new(http: Arc<dyn HttpClientPort>, locator: Box<dyn CasLocator>) -> Self {
        Self { http, locator }
    }

    /// Runs the configured locator over a page body.
    pub fn extract_cas(&self, html: &str) -> Result<String, LookupFailure> {
        let document = Html::parse_document(html);
        self.locator
            .locate(&document)
            .ok_or(LookupFailure::NotFound)
    }
}

#[async_trait]
impl CasLookup for NistLookup {
    fn source(&self) -> CasSource {
        CasSource::StandardsDatabase
    }

    #[instrument(skip(self))]
    async fn lookup(&self, name: &str) -> Result<CasNumber, LookupFailure> {
        let html = fetch_html(&*self.http, &urls::nist_url(name)).await?;
        let raw = self.extract_cas(&html)?;
        debug!("NIST ({} locator) gave '{}' for {}", self.locator.name(), raw, name);
        CasNumber::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shaped like a WebBook compound page: four navigation lists, then the
    /// details list whose 7th item carries the registry number.
    fn webbook_page(cas_item: &str) -> String {
        let nav = "<ul><li>nav</li></ul>".repeat(4);
        format!(
            r#"<html><body>{nav}
            <ul>
              <li><strong>Formula</strong>: CH2O</li>
              <li><strong>Molecular weight</strong>: 30.0260</li>
              <li>IUPAC Standard InChI: InChI=1S/CH2O/c1-2/h1H2</li>
              <li>IUPAC Standard InChIKey: WSFSSNUMVMOOMR-UHFFFAOYSA-N</li>
              <li>Copy Sheet of InChI</li>
              <li>Other names: Methanal</li>
              <li>{cas_item}</li>
            </ul></body></html>"#
        )
    }

    #[test]
    fn test_positional_reads_seventh_item_of_fifth_list() {
        let doc = Html::parse_document(&webbook_page("<strong>CAS Registry Number:</strong> 50-00-0"));
        assert_eq!(
            PositionalLocator::default().locate(&doc).as_deref(),
            Some("50-00-0")
        );
    }

    #[test]
    fn test_positional_is_none_when_list_is_short() {
        let doc = Html::parse_document("<ul><li>a: b</li></ul>");
        assert_eq!(PositionalLocator::default().locate(&doc), None);
    }

    #[test]
    fn test_positional_returns_whatever_sits_there() {
        let doc = Html::parse_document(&webbook_page("Stereoisomers: none"));
        assert_eq!(
            PositionalLocator::default().locate(&doc).as_deref(),
            Some("none")
        );
    }

    #[test]
    fn test_labeled_ignores_position() {
        let html = "<ul><li>Formula: CH2O</li><li>CAS Registry Number: 50-00-0</li></ul>";
        let doc = Html::parse_document(html);
        assert_eq!(
            LabeledLocator::default().locate(&doc).as_deref(),
            Some("50-00-0")
        );
    }

    #[test]
    fn test_labeled_without_label_is_none() {
        let doc = Html::parse_document(&webbook_page("Stereoisomers: none"));
        assert_eq!(LabeledLocator::default().locate(&doc), None);
    }

    #[test]
    fn test_locator_for_kind() {
        assert_eq!(locator_for(LocatorKind::Positional).name(), "positional");
        assert_eq!(locator_for(LocatorKind::Labeled).name(), "labeled");
    }
}
