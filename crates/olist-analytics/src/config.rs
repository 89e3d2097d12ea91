use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Connection settings for the analytics database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5433,
            dbname: "data_visualization".to_string(),
            user: "postgres".to_string(),
            password: "5432".to_string(),
        }
    }
}

/// Load database settings from a JSON file.
pub fn load_db_config<P: AsRef<Path>>(path: P) -> Result<DbConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: DbConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_development_database() {
        let config = DbConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5433);
        assert_eq!(config.dbname, "data_visualization");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: DbConfig = serde_json::from_str(r#"{"host": "db.internal"}"#).unwrap();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 5433);
        assert_eq!(config.user, "postgres");
    }

    #[test]
    fn round_trips_through_json() {
        let config = DbConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: DbConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.port, config.port);
        assert_eq!(back.dbname, config.dbname);
    }
}
