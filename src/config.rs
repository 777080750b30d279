//! Record-source resolution.
//!
//! The source is either an explicit path (CLI `--file`) or an injected default
//! taken from `SALES_DEFAULT_SOURCE` (process environment or `.env`). There is
//! no built-in fallback path.

use std::path::{Path, PathBuf};

use crate::error::SalesError;

pub const DEFAULT_SOURCE_VAR: &str = "SALES_DEFAULT_SOURCE";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceConfig {
    pub default_source: Option<PathBuf>,
}

impl SourceConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (used by tests instead of the process env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default_source = lookup(DEFAULT_SOURCE_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self { default_source }
    }

    /// Pick the explicit path when given, else the configured default.
    pub fn resolve(&self, explicit: Option<&Path>) -> Result<PathBuf, SalesError> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        match &self.default_source {
            Some(path) => {
                tracing::info!(path = %path.display(), "using configured default source");
                Ok(path.clone())
            }
            None => Err(SalesError::NoDataSource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let config = SourceConfig::from_lookup(|_| Some("default.csv".to_string()));
        let path = config.resolve(Some(Path::new("upload.csv"))).unwrap();
        assert_eq!(path, PathBuf::from("upload.csv"));
    }

    #[test]
    fn falls_back_to_configured_default() {
        let config = SourceConfig::from_lookup(|key| {
            (key == DEFAULT_SOURCE_VAR).then(|| " data/superstore.csv ".to_string())
        });
        assert_eq!(config.resolve(None).unwrap(), PathBuf::from("data/superstore.csv"));
    }

    #[test]
    fn no_source_is_an_error() {
        let config = SourceConfig::from_lookup(|_| Some("   ".to_string()));
        assert!(matches!(config.resolve(None), Err(SalesError::NoDataSource)));
        assert!(matches!(SourceConfig::default().resolve(None), Err(SalesError::NoDataSource)));
    }
}
