//! URL builders for the three sources.
//!
//! Names are concatenated as given. Nothing is percent-encoded here, so a
//! name containing `&`, `#` or `?` changes the meaning of the request.

use crate::constants::{NIST_URL_END, NIST_URL_START, PUBCHEM_URL_START, WIKI_URL_START};

pub fn nist_url(chemical: &str) -> String {
    format!("{NIST_URL_START}{chemical}{NIST_URL_END}")
}

pub fn wiki_url(chemical: &str) -> String {
    format!("{WIKI_URL_START}{chemical}")
}

/// Expects a CAS number with its hyphens; without them PubChem reads it as a CID.
pub fn pubchem_url(cas: &str) -> String {
    format!("{PUBCHEM_URL_START}{cas}")
}
