use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a plugin within the host inventory, e.g. `vendor/plugin-a/plugin-a.php`.
pub type PluginId = String;

/// Requirement declaration: dependency id mapped to its `<id>[:<version>]` constraint.
pub type Requirements = BTreeMap<PluginId, String>;

/// Attributes the host reports for one plugin.
///
/// Keys follow the host's header names (`Name`, `Version`, ...). Anything this
/// crate does not interpret is kept in `extra` and survives a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginMetadata {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PluginMetadata {
    pub fn new(name: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            name: name.into(),
            version: version.map(String::from),
            extra: BTreeMap::new(),
        }
    }

    /// Placeholder used when a dependency is missing from the inventory.
    pub fn unknown(id: &str) -> Self {
        Self::new(id, None)
    }

    /// Installed version, or `"*"` when the host did not report one.
    pub fn installed_version(&self) -> &str {
        match self.version.as_deref() {
            Some(v) if !v.trim().is_empty() => v,
            _ => "*",
        }
    }
}

/// Why a requirement ended up in the unsatisfied partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnsatisfiedReason {
    Inactive,
    VersionTooLow { installed: String },
    UnknownDependency,
    InvalidConstraint { message: String },
}

/// A dependency's metadata enriched with what the requiring plugin asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementRecord {
    #[serde(flatten)]
    pub metadata: PluginMetadata,
    /// Version part of the constraint, `"*"` when none was given.
    pub required_version: String,
    pub constraint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnsatisfiedReason>,
}
