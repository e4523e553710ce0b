//! Requirement evaluation against an inventory snapshot.
//!
//! A dependency is satisfied when it is active and its installed version is
//! at least the required one. Every declared dependency ends up in exactly
//! one of the two partitions of an [`Evaluation`].

use crate::error::{RequirementError, Result};
use crate::inventory::InventorySnapshot;
use crate::plugin::{PluginId, PluginMetadata, RequirementRecord, Requirements, UnsatisfiedReason};
use crate::version::{Version, VersionConstraint};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Evaluation {
    pub satisfied: BTreeMap<PluginId, RequirementRecord>,
    pub unsatisfied: BTreeMap<PluginId, RequirementRecord>,
}

impl Evaluation {
    pub fn is_satisfied(&self) -> bool {
        self.unsatisfied.is_empty()
    }

    pub fn len(&self) -> usize {
        self.satisfied.len() + self.unsatisfied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Check a single requirement.
///
/// Fails with `UnknownDependency` if `id` is not installed and with
/// `InvalidConstraint` if `constraint` does not parse.
pub fn check_requirement(snapshot: &InventorySnapshot, id: &str, constraint: &str) -> Result<bool> {
    classify(snapshot, id, constraint).map(|(_, reason)| reason.is_none())
}

/// Partition a declaration into satisfied and unsatisfied requirements.
///
/// Unknown dependencies and invalid constraints are logged and land in the
/// unsatisfied partition; they never abort the evaluation.
pub fn check_requirements(snapshot: &InventorySnapshot, requirements: &Requirements) -> Evaluation {
    let mut evaluation = Evaluation::default();

    for (id, constraint) in requirements {
        let record = match classify(snapshot, id, constraint) {
            Ok((parsed, reason)) => RequirementRecord {
                metadata: snapshot.metadata(id).cloned().unwrap_or_default(),
                required_version: parsed.version_text,
                constraint: constraint.clone(),
                reason,
            },
            Err(e) => {
                tracing::warn!("Requirement {} ({}) cannot be met: {}", id, constraint, e);
                failed_record(snapshot, id, constraint, &e)
            }
        };

        if record.reason.is_none() {
            evaluation.satisfied.insert(id.clone(), record);
        } else {
            evaluation.unsatisfied.insert(id.clone(), record);
        }
    }

    evaluation
}

fn classify(
    snapshot: &InventorySnapshot,
    id: &str,
    constraint: &str,
) -> Result<(VersionConstraint, Option<UnsatisfiedReason>)> {
    let parsed = VersionConstraint::parse(id, constraint)?;
    if parsed.target != id {
        tracing::debug!("Constraint {} names {} but is declared for {}", constraint, parsed.target, id);
    }

    let metadata = snapshot
        .metadata(id)
        .ok_or_else(|| RequirementError::UnknownDependency { id: id.to_string() })?;

    if !snapshot.is_active(id) {
        return Ok((parsed, Some(UnsatisfiedReason::Inactive)));
    }

    let installed = metadata.installed_version();
    let reason = if parsed.is_satisfied_by(&Version::parse_lenient(installed)) {
        None
    } else {
        Some(UnsatisfiedReason::VersionTooLow {
            installed: installed.to_string(),
        })
    };
    Ok((parsed, reason))
}

fn failed_record(
    snapshot: &InventorySnapshot,
    id: &str,
    constraint: &str,
    error: &RequirementError,
) -> RequirementRecord {
    let (reason, required_version) = match error {
        RequirementError::UnknownDependency { .. } => (
            UnsatisfiedReason::UnknownDependency,
            VersionConstraint::parse(id, constraint)
                .map(|c| c.version_text)
                .unwrap_or_else(|_| constraint.to_string()),
        ),
        other => (
            UnsatisfiedReason::InvalidConstraint {
                message: other.to_string(),
            },
            constraint.to_string(),
        ),
    };

    RequirementRecord {
        metadata: snapshot
            .metadata(id)
            .cloned()
            .unwrap_or_else(|| PluginMetadata::unknown(id)),
        required_version,
        constraint: constraint.to_string(),
        reason: Some(reason),
    }
}
