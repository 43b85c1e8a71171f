//! Output format selection and render settings.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{format} output requires a target domain")]
    MissingTargetDomain { format: OutputFormat },
    #[error("Unknown output format: {0} (expected tsv, csv, json, nginx or apache)")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tsv,
    Csv,
    Json,
    Nginx,
    Apache,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Tsv,
        OutputFormat::Csv,
        OutputFormat::Json,
        OutputFormat::Nginx,
        OutputFormat::Apache,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tsv => "tsv",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Nginx => "nginx",
            Self::Apache => "apache",
        }
    }

    /// Rewrite-rule formats embed an absolute URL and need a target domain.
    pub fn requires_domain(self) -> bool {
        matches!(self, Self::Nginx | Self::Apache)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownFormat(s.to_string()))
    }
}

/// Presentation settings for one render call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub target_domain: Option<String>,
    /// Only affects host diagnostics, never rendered content.
    pub silent: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_target_domain(mut self, domain: impl Into<String>) -> Self {
        self.target_domain = Some(domain.into());
        self
    }

    /// The target domain, if present and not blank.
    pub fn domain(&self) -> Option<&str> {
        self.target_domain
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Fails when a rewrite-rule format is requested without a usable domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.format.requires_domain() && self.domain().is_none() {
            return Err(ConfigError::MissingTargetDomain {
                format: self.format,
            });
        }
        Ok(())
    }
}
