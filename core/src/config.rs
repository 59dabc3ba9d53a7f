use crate::store::{DEFAULT_AUDIT_FILE, DEFAULT_SQLITE_FILE};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Json,
    Sqlite,
    Memory,
}

impl StoreBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "sqlite" => Some(Self::Sqlite),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    /// When unset, each backend uses its own default file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: None,
        }
    }
}

impl StoreConfig {
    pub fn resolved_path(&self) -> String {
        match (&self.path, self.backend) {
            (Some(p), _) => p.clone(),
            (None, StoreBackend::Json) => DEFAULT_AUDIT_FILE.to_string(),
            (None, StoreBackend::Sqlite) => DEFAULT_SQLITE_FILE.to_string(),
            (None, StoreBackend::Memory) => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Requests with a larger body are rejected before parsing.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            store: StoreConfig::default(),
        }
    }
}

impl DeskConfig {
    /// Load from a JSON file. Missing keys take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DeskConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Apply `PORT` and `REGE_STORE_PATH` from the environment.
    pub fn apply_env(mut self) -> Self {
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Ok(path) = std::env::var("REGE_STORE_PATH") {
            if !path.trim().is_empty() {
                self.store.path = Some(path);
            }
        }
        self
    }

    /// Config with an in-memory store for use in tests.
    pub fn default_test() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 0,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            store: StoreConfig {
                backend: StoreBackend::Memory,
                path: None,
            },
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn default_backend() -> StoreBackend {
    StoreBackend::Json
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let config: DeskConfig =
            serde_json::from_str(r#"{ "port": 8080, "store": { "backend": "sqlite" } }"#).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.store.path, None);
        assert_eq!(config.store.resolved_path(), DEFAULT_SQLITE_FILE);
    }

    #[test]
    fn each_backend_has_its_own_default_file() {
        let json = StoreConfig::default();
        assert_eq!(json.resolved_path(), DEFAULT_AUDIT_FILE);

        let sqlite = StoreConfig { backend: StoreBackend::Sqlite, path: None };
        assert_eq!(sqlite.resolved_path(), "data/audit-log.db");

        let explicit = StoreConfig { backend: StoreBackend::Sqlite, path: Some("x.db".into()) };
        assert_eq!(explicit.resolved_path(), "x.db");
    }

    #[test]
    fn test_config_uses_memory_store() {
        let config = DeskConfig::default_test();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.addr(), "127.0.0.1:0");
    }

    #[test]
    fn backend_names_parse_case_insensitively() {
        assert_eq!(StoreBackend::parse("SQLite"), Some(StoreBackend::Sqlite));
        assert_eq!(StoreBackend::parse(" json "), Some(StoreBackend::Json));
        assert_eq!(StoreBackend::parse("postgres"), None);
    }
}
