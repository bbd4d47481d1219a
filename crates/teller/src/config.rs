//! Portal configuration.
//!
//! Read once at startup from `config.yaml` in the data directory. The
//! session identity lives here too: the portal has read-only access to
//! the logged-in customer's identifier and token, it never negotiates or
//! refreshes them.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use teller_core::api::Session;
use teller_core::model::CustomerId;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_institution() -> String {
    "Teller Bank".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// URL of the single transaction endpoint.
    pub endpoint: String,
    /// Institution name printed on letterheads and the title bar.
    #[serde(default = "default_institution")]
    pub institution: String,
    /// The logged-in customer's identifier.
    pub customer_id: String,
    /// Session token attached to every backend call.
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl PortalConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        serde_saphyr::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn session(&self) -> Session {
        Session {
            customer: CustomerId(self.customer_id.clone()),
            token: self.token.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// A display label that does not spell out the full identifier.
    pub fn customer_label(&self) -> String {
        let id = self.customer_id.as_str();
        if id.len() <= 4 {
            format!("Customer ****{id}")
        } else {
            format!("Customer ****{}", &id[id.len() - 4..])
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_a_minimal_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "endpoint: http://localhost:9000/transaction\ncustomer_id: c-9301\ntoken: t-abc"
        )
        .unwrap();

        let config = PortalConfig::load(file.path()).unwrap();
        assert_eq!(config.endpoint, "http://localhost:9000/transaction");
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.institution, "Teller Bank");
        assert_eq!(config.customer_label(), "Customer ****9301");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PortalConfig::load(Path::new("/nonexistent/config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
