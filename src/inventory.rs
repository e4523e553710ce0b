//! Inventory snapshot of the host's installed and active plugins.
//!
//! A snapshot is rebuilt from scratch every time the host enumerates its
//! plugins. Nothing is merged from the previous snapshot.

use crate::plugin::{PluginId, PluginMetadata};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// The host's raw active-plugins list.
///
/// Hosts persist it either as a plain array or as an index-keyed object
/// (`{"0": "a/a.php", "1": "b/b.php"}`); both decode to the same ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawActivePlugins")]
pub struct ActivePlugins(pub Vec<PluginId>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawActivePlugins {
    List(Vec<PluginId>),
    Indexed(BTreeMap<String, PluginId>),
}

impl From<RawActivePlugins> for ActivePlugins {
    fn from(raw: RawActivePlugins) -> Self {
        match raw {
            RawActivePlugins::List(ids) => ActivePlugins(ids),
            RawActivePlugins::Indexed(map) => {
                let mut entries: Vec<(String, PluginId)> = map.into_iter().collect();
                // Numeric keys sort by value, not lexically ("10" after "9").
                entries.sort_by(|(a, _), (b, _)| match (a.parse::<u64>(), b.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    _ => a.cmp(b),
                });
                ActivePlugins(entries.into_iter().map(|(_, id)| id).collect())
            }
        }
    }
}

impl ActivePlugins {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

impl<S: Into<PluginId>> FromIterator<S> for ActivePlugins {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ActivePlugins(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone)]
pub struct InventorySnapshot {
    available_plugins: BTreeMap<PluginId, PluginMetadata>,
    active_plugins: BTreeSet<PluginId>,
    built_at: DateTime<Utc>,
}

impl InventorySnapshot {
    /// Normalize one host enumeration into a snapshot.
    pub fn build(available: BTreeMap<PluginId, PluginMetadata>, active: ActivePlugins) -> Self {
        let active_plugins: BTreeSet<PluginId> = active.0.into_iter().collect();
        let snapshot = Self {
            available_plugins: available,
            active_plugins,
            built_at: Utc::now(),
        };
        tracing::debug!(
            available = snapshot.available_plugins.len(),
            active = snapshot.active_plugins.len(),
            "Rebuilt plugin inventory snapshot"
        );
        snapshot
    }

    pub fn empty() -> Self {
        Self::build(BTreeMap::new(), ActivePlugins::default())
    }

    pub fn metadata(&self, id: &str) -> Option<&PluginMetadata> {
        self.available_plugins.get(id)
    }

    pub fn is_installed(&self, id: &str) -> bool {
        self.available_plugins.contains_key(id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_plugins.contains(id)
    }

    pub fn available_plugins(&self) -> &BTreeMap<PluginId, PluginMetadata> {
        &self.available_plugins
    }

    pub fn active_plugins(&self) -> &BTreeSet<PluginId> {
        &self.active_plugins
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available() -> BTreeMap<PluginId, PluginMetadata> {
        let mut map = BTreeMap::new();
        map.insert("a/a.php".to_string(), PluginMetadata::new("A", Some("1.0")));
        map.insert("b/b.php".to_string(), PluginMetadata::new("B", None));
        map
    }

    #[test]
    fn active_list_decodes_from_array() {
        let active = ActivePlugins::from_json(r#"["a/a.php", "b/b.php"]"#).unwrap();
        assert_eq!(active.0, vec!["a/a.php", "b/b.php"]);
    }

    #[test]
    fn active_list_decodes_from_indexed_object() {
        let json = r#"{"10": "k/k.php", "2": "b/b.php", "0": "a/a.php"}"#;
        let active = ActivePlugins::from_json(json).unwrap();
        assert_eq!(active.0, vec!["a/a.php", "b/b.php", "k/k.php"]);
    }

    #[test]
    fn active_list_rejects_other_shapes() {
        assert!(ActivePlugins::from_json("42").is_err());
        assert!(ActivePlugins::from_json(r#"{"0": 1}"#).is_err());
    }

    #[test]
    fn build_normalizes_active_into_set() {
        let active: ActivePlugins = ["a/a.php", "a/a.php", "ghost/ghost.php"].into_iter().collect();
        let snapshot = InventorySnapshot::build(available(), active);

        assert_eq!(snapshot.active_plugins().len(), 2);
        assert!(snapshot.is_active("a/a.php"));
        assert!(!snapshot.is_active("b/b.php"));
        assert!(snapshot.is_installed("b/b.php"));
        assert!(!snapshot.is_installed("ghost/ghost.php"));
        assert_eq!(snapshot.metadata("a/a.php").unwrap().name, "A");
    }

    #[test]
    fn empty_snapshot_knows_nothing() {
        let snapshot = InventorySnapshot::empty();
        assert!(snapshot.available_plugins().is_empty());
        assert!(!snapshot.is_active("a/a.php"));
        assert!(snapshot.built_at() <= Utc::now());
    }
}
