use crate::error::LookupFailure;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A chemical moving through the stages. Each stage fills in more fields and
/// carries the earlier ones forward untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChemicalRecord {
    pub name: String,
    pub cas_number: Option<String>,
    pub product_url: Option<String>,
    pub uses_text: Option<String>,
}

#[cfg(test)]
impl ChemicalRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A validated CAS registry number such as `50-00-0`.
///
/// Only obtainable through [`CasNumber::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CasNumber(String);

impl CasNumber {
    /// Accepts the text when, with hyphens removed, it reads as a number.
    pub fn parse(raw: &str) -> Result<Self, LookupFailure> {
        let trimmed = raw.trim();
        let digits = trimmed.replace('-', "");
        if digits.is_empty() || digits.parse::<f64>().is_err() {
            return Err(LookupFailure::Validation(trimmed.to_string()));
        }
        Ok(CasNumber(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CasNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One short usage fragment split out of PubChem prose.
pub type UsePhrase = String;

/// Where an identifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasSource {
    Encyclopedia,
    StandardsDatabase,
}

impl CasSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CasSource::Encyclopedia => "encyclopedia",
            CasSource::StandardsDatabase => "standards_database",
        }
    }
}

impl fmt::Display for CasSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCas {
    pub cas: CasNumber,
    pub source: CasSource,
}

/// Outcome of resolving one name against every configured source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ResolvedCas),
    /// Every source failed; one entry per source in the order consulted.
    Missing(Vec<(CasSource, LookupFailure)>),
}

impl Resolution {
    pub fn cas(&self) -> Option<&CasNumber> {
        match self {
            Resolution::Found(resolved) => Some(&resolved.cas),
            Resolution::Missing(_) => None,
        }
    }

    /// Value for the `cas_status` column.
    pub fn status(&self) -> String {
        match self {
            Resolution::Found(resolved) => format!("ok:{}", resolved.source),
            Resolution::Missing(failures) if failures.is_empty() => "not_found".to_string(),
            Resolution::Missing(failures) => failures
                .iter()
                .map(|(source, failure)| format!("{}={}", source, failure.code()))
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}

/// Stage 1 output row.
#[derive(Debug, Clone, Serialize)]
pub struct IdentifierRow {
    pub name: String,
    pub cas_number: Option<String>,
    pub product_url: Option<String>,
    pub cas_status: String,
}

/// Stage 2 output row.
#[derive(Debug, Clone, Serialize)]
pub struct UsesRow {
    pub name: String,
    pub cas_number: Option<String>,
    pub product_url: Option<String>,
    pub uses: String,
    pub uses_status: String,
}

/// Stage 3 output row.
#[derive(Debug, Clone, Serialize)]
pub struct UseRow {
    pub name: String,
    pub cas_number: Option<String>,
    pub product_url: Option<String>,
    pub use_phrase: UsePhrase,
}
