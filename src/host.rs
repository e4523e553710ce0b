//! Host-facing surface: enumeration and action-link rendering.
//!
//! The host calls [`PluginHost::on_enumerate_plugins`] whenever it lists its
//! plugins and [`PluginHost::on_render_actions`] once per plugin row. When a
//! plugin has unmet requirements, its `activate` action is replaced by one
//! label per requirement so the user sees what is missing.

use crate::config::CheckerConfig;
use crate::evaluator::{check_requirements, Evaluation};
use crate::inventory::{ActivePlugins, InventorySnapshot};
use crate::loader::RequirementLoader;
use crate::plugin::{PluginId, PluginMetadata, RequirementRecord};
use serde::Serialize;
use std::collections::BTreeMap;

pub const ACTIVATE_ACTION: &str = "activate";

/// Callbacks a host drives. Implementations must not fail a render cycle.
pub trait PluginHost {
    fn on_enumerate_plugins(&mut self, plugins: BTreeMap<PluginId, PluginMetadata>, active: ActivePlugins);

    fn on_render_actions(&self, plugin_file: &str, actions: ActionLinks) -> ActionLinks;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementLabel {
    pub name: String,
    pub required_version: String,
    pub satisfied: bool,
}

impl RequirementLabel {
    fn from_record(record: &RequirementRecord, satisfied: bool) -> Self {
        Self {
            name: record.metadata.name.clone(),
            required_version: record.required_version.clone(),
            satisfied,
        }
    }

    pub fn css_class(&self) -> &'static str {
        if self.satisfied {
            "satisfied"
        } else {
            "unsatisfied"
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            "<span class=\"{}\">{} ({})</span><br>",
            self.css_class(),
            escape_html(&self.name),
            escape_html(&self.required_version)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Action {
    /// Host-provided markup, passed through untouched.
    Markup(String),
    Requirements(Vec<RequirementLabel>),
}

impl Action {
    pub fn render_html(&self) -> String {
        match self {
            Action::Markup(markup) => markup.clone(),
            Action::Requirements(labels) => labels.iter().map(RequirementLabel::to_html).collect(),
        }
    }
}

/// Ordered action links for one plugin row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionLinks {
    entries: Vec<(String, Action)>,
}

impl ActionLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Action> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, a)| a)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Replace an existing action in place or append a new one.
    pub fn insert(&mut self, key: impl Into<String>, action: Action) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = action,
            None => self.entries.push((key, action)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Action)> {
        self.entries.iter().map(|(k, a)| (k.as_str(), a))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render_html(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, a)| (k.clone(), a.render_html()))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, String)> for ActionLinks {
    fn from_iter<I: IntoIterator<Item = (K, String)>>(iter: I) -> Self {
        let mut links = ActionLinks::new();
        for (key, markup) in iter {
            links.insert(key, Action::Markup(markup));
        }
        links
    }
}

/// Requirement checker holding the snapshot of the latest enumeration.
///
/// Construct one per request scope, or wrap it in a lock when shared.
#[derive(Debug, Clone)]
pub struct RequirementsChecker {
    loader: RequirementLoader,
    snapshot: InventorySnapshot,
}

impl RequirementsChecker {
    pub fn new(config: &CheckerConfig) -> Self {
        Self {
            loader: RequirementLoader::new(config),
            snapshot: InventorySnapshot::empty(),
        }
    }

    pub fn snapshot(&self) -> &InventorySnapshot {
        &self.snapshot
    }

    pub fn loader(&self) -> &RequirementLoader {
        &self.loader
    }

    /// Load and evaluate the requirements of the plugin at `plugin_file`.
    pub fn evaluate(&self, plugin_file: &str) -> Evaluation {
        let requirements = self.loader.load(plugin_file);
        check_requirements(&self.snapshot, &requirements)
    }
}

impl PluginHost for RequirementsChecker {
    fn on_enumerate_plugins(&mut self, plugins: BTreeMap<PluginId, PluginMetadata>, active: ActivePlugins) {
        self.snapshot = InventorySnapshot::build(plugins, active);
    }

    fn on_render_actions(&self, plugin_file: &str, mut actions: ActionLinks) -> ActionLinks {
        if !actions.contains(ACTIVATE_ACTION) {
            return actions;
        }

        let evaluation = self.evaluate(plugin_file);
        if evaluation.is_satisfied() {
            return actions;
        }

        tracing::debug!(
            "{} has {} unsatisfied requirement(s)",
            plugin_file,
            evaluation.unsatisfied.len()
        );
        let labels = evaluation
            .satisfied
            .values()
            .map(|r| RequirementLabel::from_record(r, true))
            .chain(
                evaluation
                    .unsatisfied
                    .values()
                    .map(|r| RequirementLabel::from_record(r, false)),
            )
            .collect();
        actions.insert(ACTIVATE_ACTION, Action::Requirements(labels));
        actions
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_html_carries_class_and_escapes() {
        let label = RequirementLabel {
            name: "Tom & <Jerry>".into(),
            required_version: "1.0".into(),
            satisfied: false,
        };
        assert_eq!(
            label.to_html(),
            "<span class=\"unsatisfied\">Tom &amp; &lt;Jerry&gt; (1.0)</span><br>"
        );
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut links: ActionLinks = [
            ("activate", "<a>Activate</a>".to_string()),
            ("delete", "<a>Delete</a>".to_string()),
        ]
        .into_iter()
        .collect();
        links.insert("activate", Action::Requirements(Vec::new()));

        let keys: Vec<&str> = links.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["activate", "delete"]);
        assert_eq!(links.get("activate"), Some(&Action::Requirements(Vec::new())));
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn render_without_activate_is_untouched() {
        let checker = RequirementsChecker::new(&CheckerConfig::new("/nonexistent"));
        let links: ActionLinks = [("deactivate", "<a>Deactivate</a>".to_string())]
            .into_iter()
            .collect();
        assert_eq!(checker.on_render_actions("a/a.php", links.clone()), links);
    }

    #[test]
    fn plugin_without_requirement_file_keeps_activate() {
        let checker = RequirementsChecker::new(&CheckerConfig::new("/nonexistent"));
        let links: ActionLinks = [("activate", "<a>Activate</a>".to_string())]
            .into_iter()
            .collect();
        let rendered = checker.on_render_actions("a/a.php", links.clone());
        assert_eq!(rendered, links);
    }
}
