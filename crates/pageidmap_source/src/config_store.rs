use crate::error::SourceError;
use crate::mysql_source::{DEFAULT_CHARSET, DEFAULT_PORT, MysqlAddress};
use pageidmap_domain::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Commented template printed by `generate-config`.
pub const DEFAULT_CONFIG: &str = r#"# Confluence Page ID Mapper configuration

[database]
# MySQL server holding the Confluence database
host = "localhost"
port = 3306
database = "confluence"
user = "confluence_user"
# Prompted for when absent or empty
# password = ""
charset = "utf8mb4"

# SQLite snapshot, used when there is no [database] section
# [snapshot]
# path = "confluence.db"

[processing]
# Space keys queried when --spaces is not given
default_spaces = ["INFO", "DOCS"]
# Output format: tsv, csv, json, nginx, apache
output_format = "tsv"
# Required for nginx and apache output
# target_domain = "example.atlassian.net"
# Suppress all diagnostics on stderr
silent = false
"#;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: Option<DatabaseSettings>,
    pub snapshot: Option<SnapshotSettings>,
    pub processing: ProcessingSettings,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: Option<String>,
    pub charset: String,
}

impl DatabaseSettings {
    pub fn address(&self) -> MysqlAddress {
        MysqlAddress::new(&self.host, self.port, &self.database)
    }

    /// The configured password, treating an empty one as absent.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            database: String::new(),
            user: String::new(),
            password: None,
            charset: DEFAULT_CHARSET.to_string(),
        }
    }
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("charset", &self.charset)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    pub default_spaces: Vec<String>,
    pub output_format: OutputFormat,
    pub target_domain: Option<String>,
    pub silent: bool,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            default_spaces: vec!["INFO".to_string()],
            output_format: OutputFormat::Tsv,
            target_domain: None,
            silent: false,
        }
    }
}

pub struct TomlConfigStore {
    path: PathBuf,
}

impl TomlConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the config, falling back to defaults when the file is absent.
    pub fn load(&self) -> Result<AppConfig, SourceError> {
        if !self.path.exists() {
            return Ok(AppConfig::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        let config: AppConfig = toml::from_str(&data)?;
        Ok(config)
    }

    /// Writes the commented [`DEFAULT_CONFIG`] template.
    pub fn write_template(&self) -> Result<(), SourceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, DEFAULT_CONFIG)?;

        // Owner read/write only (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}
