/// Source endpoints. Builders in `apis::urls` concatenate onto these verbatim.
pub const NIST_URL_START: &str = "https://webbook.nist.gov/cgi/cbook.cgi?Name=";
pub const NIST_URL_END: &str = "&Units=SI";
pub const WIKI_URL_START: &str = "https://en.wikipedia.org/wiki/";
pub const PUBCHEM_URL_START: &str = "https://pubchem.ncbi.nlm.nih.gov/compound/";

/// Wikipedia marks the CAS number with a link titled after this registry.
pub const WIKI_CAS_SPAN_TITLE: &str = "www.commonchemistry.org";
pub const WIKI_HEADING_ID: &str = "firstHeading";

/// Label NIST prints in front of the registry number.
pub const NIST_CAS_LABEL: &str = "CAS Registry Number";
/// Position of the CAS entry in the NIST compound page (5th list, 7th item).
pub const NIST_LIST_INDEX: usize = 4;
pub const NIST_ITEM_INDEX: usize = 6;

/// Element PubChem renders the usage section into.
pub const USES_ELEMENT_ID: &str = "Uses";
pub const DEFAULT_RENDER_WAIT_SECS: u64 = 10;

// Default stage file chain
pub const DEFAULT_CHEMICALS_FILE: &str = "sample_chemicals1.csv";
pub const DEFAULT_IDENTIFIERS_FILE: &str = "sample_output1.csv";
pub const DEFAULT_USES_FILE: &str = "sample_output2.csv";
pub const DEFAULT_USE_ROWS_FILE: &str = "sample_output3.csv";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_CONFIG_FILE: &str = "chem_scraper.toml";
pub const DEFAULT_USER_AGENT: &str = "chem_scraper/0.1";

/// Status written for a record that produced a value.
pub const STATUS_OK: &str = "ok";
