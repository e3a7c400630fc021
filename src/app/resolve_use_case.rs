use crate::apis::nist::{locator_for, NistLookup};
use crate::apis::wikipedia::WikipediaLookup;
use crate::app::ports::{CasLookup, HttpClientPort};
use crate::config::LocatorKind;
use crate::types::{CasNumber, Resolution, ResolvedCas};
use std::sync::Arc;
use tracing::debug;

/// Resolves chemical names to CAS numbers by asking each source in turn.
///
/// The first source that returns a valid number wins; later sources are not
/// contacted.
pub struct IdentifierResolver {
    lookups: Vec<Box<dyn CasLookup>>,
}

impl IdentifierResolver {
    pub fn new(lookups: Vec<Box<dyn CasLookup>>) -> Self {
        Self { lookups }
    }

    /// Wikipedia first, then the NIST WebBook.
    pub fn standard(http: Arc<dyn HttpClientPort>, locator: LocatorKind) -> Self {
        Self::new(vec![
            Box::new(WikipediaLookup::new(http.clone())),
            Box::new(NistLookup::new(http, locator_for(locator))),
        ])
    }

    pub async fn resolve(&self, name: &str) -> Resolution {
        let mut failures = Vec::with_capacity(self.lookups.len());
        for lookup in &self.lookups {
            match lookup.lookup(name).await {
                Ok(cas) => {
                    return Resolution::Found(ResolvedCas {
                        cas,
                        source: lookup.source(),
                    })
                }
                Err(failure) => {
                    debug!("{} lookup for {} failed: {}", lookup.source(), name, failure);
                    failures.push((lookup.source(), failure));
                }
            }
        }
        Resolution::Missing(failures)
    }

    /// The CAS number alone, discarding why a miss happened.
    pub async fn resolve_identifier(&self, name: &str) -> Option<CasNumber> {
        self.resolve(name).await.cas().cloned()
    }
}
