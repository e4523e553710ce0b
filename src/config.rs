//! Checker configuration.
//!
//! Only two knobs exist: where plugins live and which file names declare
//! requirements. Both can come from a JSON document:
//!
//! ```json
//! { "plugins_dir": "/srv/app/plugins", "requirement_file_names": ["requirements"] }
//! ```

use crate::loader::DEFAULT_REQUIREMENT_FILE_NAMES;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    pub plugins_dir: PathBuf,
    #[serde(default = "default_file_names")]
    pub requirement_file_names: Vec<String>,
}

fn default_file_names() -> Vec<String> {
    DEFAULT_REQUIREMENT_FILE_NAMES.iter().map(|s| s.to_string()).collect()
}

impl CheckerConfig {
    pub fn new(plugins_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugins_dir: plugins_dir.into(),
            requirement_file_names: default_file_names(),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: CheckerConfig =
            serde_json::from_str(content).context("Failed to parse checker configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read checker configuration: {:?}", path))?;
        Self::from_json_str(&content).context(format!("Invalid configuration in {:?}", path))
    }

    /// Requirement file names must be plain names inside the plugin directory.
    pub fn validate(&self) -> Result<()> {
        if self.requirement_file_names.is_empty() {
            bail!("requirement_file_names must not be empty");
        }
        for name in &self.requirement_file_names {
            if name.is_empty() || name.contains('/') || name.contains('\\') || name == ".." {
                bail!("Invalid requirement file name: {:?}", name);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn new_uses_default_file_order() {
        let config = CheckerConfig::new("/plugins");
        assert_eq!(
            config.requirement_file_names,
            vec!["requirements", "require", "depends_on"]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_without_names_gets_defaults() {
        let config = CheckerConfig::from_json_str(r#"{"plugins_dir": "/srv/plugins"}"#).unwrap();
        assert_eq!(config.plugins_dir, PathBuf::from("/srv/plugins"));
        assert_eq!(config.requirement_file_names.len(), 3);
    }

    #[test]
    fn rejects_empty_or_nested_names() {
        assert!(CheckerConfig::from_json_str(
            r#"{"plugins_dir": "/p", "requirement_file_names": []}"#
        )
        .is_err());
        assert!(CheckerConfig::from_json_str(
            r#"{"plugins_dir": "/p", "requirement_file_names": ["deps/requirements"]}"#
        )
        .is_err());
    }

    #[test]
    fn load_reads_file_and_reports_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("checker.json");
        fs::write(&path, r#"{"plugins_dir": "plugins", "requirement_file_names": ["deps"]}"#)
            .unwrap();

        let config = CheckerConfig::load(&path).unwrap();
        assert_eq!(config.requirement_file_names, vec!["deps"]);

        let err = CheckerConfig::load(&temp.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read checker configuration"));
    }
}
