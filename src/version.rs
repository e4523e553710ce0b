//! Dotted versions and `<id>[:<version>]` constraints.
//!
//! Versions are fixed three-component tuples. Missing trailing components
//! are zero and a `*` component matches anything, so `"*" >= x` and
//! `x >= "1.*"` both hold.

use crate::error::{RequirementError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Grammar for constraint values in requirement files.
static CONSTRAINT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_./-]+)(?::((?:\d+\.)?(?:\d+\.)?(?:\*|\d+)))?$")
        .expect("constraint grammar is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Number(u64),
    Wildcard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    components: [Component; 3],
}

impl Version {
    pub const ANY: Version = Version {
        components: [Component::Wildcard; 3],
    };

    pub fn components(&self) -> [Component; 3] {
        self.components
    }

    /// Parse a version as reported by a host.
    ///
    /// Hosts report free-form strings (`2.1.0-beta`, `1.0.0.3`), so this never
    /// fails: each of the first three parts contributes its leading digits, a
    /// part that is exactly `*` is a wildcard, and anything else counts as 0.
    /// Blank input means the version is unknown and parses as [`Version::ANY`].
    pub fn parse_lenient(input: &str) -> Version {
        let input = input.trim();
        if input.is_empty() || input == "*" {
            return Version::ANY;
        }

        let mut components = [Component::Number(0); 3];
        for (slot, part) in components.iter_mut().zip(input.split('.')) {
            *slot = if part == "*" {
                Component::Wildcard
            } else {
                let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
                Component::Number(digits.parse().unwrap_or(0))
            };
        }
        Version { components }
    }

    /// `self >= required`, scanning left to right. A wildcard on either side
    /// settles the comparison as satisfied at that position.
    pub fn satisfies(&self, required: &Version) -> bool {
        for (have, want) in self.components.iter().zip(required.components.iter()) {
            match (have, want) {
                (Component::Wildcard, _) | (_, Component::Wildcard) => return true,
                (Component::Number(h), Component::Number(w)) if h > w => return true,
                (Component::Number(h), Component::Number(w)) if h < w => return false,
                _ => {}
            }
        }
        true
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .components
            .iter()
            .map(|c| match c {
                Component::Number(n) => n.to_string(),
                Component::Wildcard => "*".to_string(),
            })
            .collect();
        write!(f, "{}", parts.join("."))
    }
}

/// A parsed `<id>[:<version>]` constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    pub target: String,
    /// Version text as written, `"*"` when the constraint has none.
    pub version_text: String,
    pub minimum: Version,
}

impl VersionConstraint {
    /// Parse a constraint declared for dependency `id`.
    pub fn parse(id: &str, constraint: &str) -> Result<VersionConstraint> {
        let invalid = || RequirementError::InvalidConstraint {
            id: id.to_string(),
            constraint: constraint.to_string(),
        };

        let caps = CONSTRAINT_REGEX.captures(constraint.trim()).ok_or_else(invalid)?;
        let target = caps.get(1).ok_or_else(invalid)?.as_str().to_string();
        let version_text = caps
            .get(2)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "*".to_string());
        let minimum = parse_strict(&version_text).ok_or_else(invalid)?;

        Ok(VersionConstraint {
            target,
            version_text,
            minimum,
        })
    }

    pub fn is_satisfied_by(&self, installed: &Version) -> bool {
        installed.satisfies(&self.minimum)
    }
}

/// Parse version text already validated by the grammar. `1.2.*` keeps its
/// wildcard in third position, `2.*` in second.
fn parse_strict(text: &str) -> Option<Version> {
    if text == "*" {
        return Some(Version::ANY);
    }
    let mut components = [Component::Number(0); 3];
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() > 3 {
        return None;
    }
    for (slot, part) in components.iter_mut().zip(parts) {
        *slot = match part {
            "*" => Component::Wildcard,
            n => Component::Number(n.parse().ok()?),
        };
    }
    Some(Version { components })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse_lenient(s)
    }

    #[test]
    fn equal_versions_satisfy() {
        assert!(v("2.1.0").satisfies(&v("2.1.0")));
        assert!(v("1.0").satisfies(&v("1.0.0")));
    }

    #[test]
    fn patch_boundaries() {
        assert!(!v("2.0.9").satisfies(&v("2.1.0")));
        assert!(!v("2.1.0").satisfies(&v("2.1.1")));
        assert!(v("2.1.2").satisfies(&v("2.1.1")));
    }

    #[test]
    fn components_compare_numerically() {
        assert!(v("10.0.0").satisfies(&v("9.99.99")));
        assert!(!v("1.9").satisfies(&v("1.10")));
    }

    #[test]
    fn unknown_installed_version_satisfies_anything() {
        assert!(v("*").satisfies(&v("99.0.0")));
        assert!(v("").satisfies(&v("1.0")));
    }

    #[test]
    fn wildcard_component_settles_comparison() {
        assert!(v("1.*").satisfies(&v("1.5.0")));
        assert!(!v("1.*").satisfies(&v("2.0.0")));
        assert!(v("3.0.0").satisfies(&VersionConstraint::parse("x", "x:3.*").unwrap().minimum));
    }

    #[test]
    fn lenient_parse_takes_leading_digits() {
        assert_eq!(v("2.1.0-beta1").to_string(), "2.1.0");
        assert_eq!(v("4.7.2.1").to_string(), "4.7.2");
        assert_eq!(v("unknown").to_string(), "0.0.0");
    }

    #[test]
    fn constraint_with_version() {
        let c = VersionConstraint::parse("vendor/plugin-a", "vendor/plugin-a:2.1.0").unwrap();
        assert_eq!(c.target, "vendor/plugin-a");
        assert_eq!(c.version_text, "2.1.0");
        assert_eq!(c.minimum.to_string(), "2.1.0");
    }

    #[test]
    fn constraint_without_version_accepts_any() {
        let c = VersionConstraint::parse("plugin-b", "plugin-b").unwrap();
        assert_eq!(c.version_text, "*");
        assert!(c.is_satisfied_by(&v("0.0.1")));
    }

    #[test]
    fn constraint_short_versions() {
        assert_eq!(VersionConstraint::parse("b", "b:1").unwrap().minimum.to_string(), "1.0.0");
        assert_eq!(VersionConstraint::parse("b", "b:1.0").unwrap().minimum.to_string(), "1.0.0");
        assert_eq!(VersionConstraint::parse("b", "b:*").unwrap().minimum, Version::ANY);
    }

    #[test]
    fn constraint_grammar_rejects_garbage() {
        for bad in ["", "plugin a", "plugin:>=1.0", "plugin:1.2.3.4", "plugin:1.x", "plugin:"] {
            let err = VersionConstraint::parse("plugin", bad).unwrap_err();
            assert!(matches!(err, RequirementError::InvalidConstraint { .. }), "{bad}");
        }
    }
}
