use crate::constants::*;
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub files: FilesConfig,
    pub browser: BrowserConfig,
    pub http: HttpConfig,
    pub standards: StandardsConfig,
}

/// The file chain between stages.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub chemicals: String,
    pub identifiers: String,
    pub uses: String,
    pub use_rows: String,
    pub log_dir: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            chemicals: DEFAULT_CHEMICALS_FILE.to_string(),
            identifiers: DEFAULT_IDENTIFIERS_FILE.to_string(),
            uses: DEFAULT_USES_FILE.to_string(),
            use_rows: DEFAULT_USE_ROWS_FILE.to_string(),
            log_dir: DEFAULT_LOG_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub render_wait_secs: u64,
    pub uses_element_id: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            render_wait_secs: DEFAULT_RENDER_WAIT_SECS,
            uses_element_id: USES_ELEMENT_ID.to_string(),
        }
    }
}

impl BrowserConfig {
    pub fn render_wait(&self) -> Duration {
        Duration::from_secs(self.render_wait_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// How the CAS number is picked out of a NIST compound page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorKind {
    #[default]
    Positional,
    Labeled,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StandardsConfig {
    pub locator: LocatorKind,
}

impl Config {
    /// Reads `path` if it exists; a missing file means all defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }
        let config_content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        if config.browser.uses_element_id.trim().is_empty() {
            return Err(ScraperError::Config(
                "browser.uses_element_id must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.files.chemicals, DEFAULT_CHEMICALS_FILE);
        assert_eq!(config.browser.render_wait(), Duration::from_secs(10));
        assert_eq!(config.browser.uses_element_id, "Uses");
        assert_eq!(config.standards.locator, LocatorKind::Positional);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[browser]\nrender_wait_secs = 3\n\n[standards]\nlocator = \"labeled\""
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.browser.render_wait_secs, 3);
        assert!(config.browser.headless);
        assert_eq!(config.standards.locator, LocatorKind::Labeled);
        assert_eq!(config.files.uses, DEFAULT_USES_FILE);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[browser\nheadless = maybe").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ScraperError::Toml(_))));
    }

    #[test]
    fn test_blank_element_id_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[browser]\nuses_element_id = \" \"").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ScraperError::Config(_))));
    }
}
