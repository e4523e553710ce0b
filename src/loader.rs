//! Requirement file discovery and parsing.
//!
//! A plugin declares its dependencies in an extensionless JSON file at the
//! root of its own directory:
//!
//! ```json
//! { "vendor/plugin-a": "vendor/plugin-a:2.1.0", "plugin-b": "plugin-b" }
//! ```
//!
//! Candidate names are tried in order (`requirements`, `require`,
//! `depends_on` by default) and the first existing file wins. Files are
//! never merged.

use crate::config::CheckerConfig;
use crate::error::{RequirementError, Result};
use crate::plugin::Requirements;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_REQUIREMENT_FILE_NAMES: [&str; 3] = ["requirements", "require", "depends_on"];

#[derive(Debug, Clone)]
pub struct RequirementLoader {
    plugins_dir: PathBuf,
    file_names: Vec<String>,
}

impl RequirementLoader {
    pub fn new(config: &CheckerConfig) -> Self {
        Self {
            plugins_dir: config.plugins_dir.clone(),
            file_names: config.requirement_file_names.clone(),
        }
    }

    /// Directory holding the plugin referenced by `plugin_file`.
    ///
    /// `vendor/plugin-a/plugin-a.php` maps to `<plugins_dir>/vendor/plugin-a`,
    /// a single-file plugin such as `hello.php` to `<plugins_dir>` itself.
    pub fn plugin_dir(&self, plugin_file: &str) -> PathBuf {
        match Path::new(plugin_file).parent() {
            Some(parent) => self.plugins_dir.join(parent),
            None => self.plugins_dir.clone(),
        }
    }

    /// First existing requirement file for the plugin, if any.
    pub fn find_requirement_file(&self, plugin_file: &str) -> Option<PathBuf> {
        let dir = self.plugin_dir(plugin_file);
        let found = self
            .file_names
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file());

        if let Some(path) = &found {
            tracing::debug!("Requirement file for {}: {:?}", plugin_file, path);
        }
        found
    }

    /// Load the plugin's requirements, surfacing I/O and parse failures.
    /// A plugin without a requirement file has no requirements.
    pub fn try_load(&self, plugin_file: &str) -> Result<Requirements> {
        let Some(path) = self.find_requirement_file(plugin_file) else {
            return Ok(Requirements::new());
        };

        let content = fs::read_to_string(&path)?;
        parse_requirements(&content).map_err(|e| match e {
            RequirementError::MalformedRequirements { message, .. } => {
                RequirementError::MalformedRequirements { path, message }
            }
            other => other,
        })
    }

    /// Load the plugin's requirements for a render cycle. Failures are
    /// logged and yield an empty declaration.
    pub fn load(&self, plugin_file: &str) -> Requirements {
        match self.try_load(plugin_file) {
            Ok(requirements) => requirements,
            Err(e) => {
                tracing::warn!("Ignoring requirements of {}: {}", plugin_file, e);
                Requirements::new()
            }
        }
    }
}

/// Parse requirement file contents: a JSON object of string to string.
pub fn parse_requirements(content: &str) -> Result<Requirements> {
    serde_json::from_str(content).map_err(|e| RequirementError::MalformedRequirements {
        path: PathBuf::new(),
        message: e.to_string(),
    })
}
