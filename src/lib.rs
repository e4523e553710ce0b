//! RequireCheck Core Library
//!
//! Checks whether a plugin's declared dependencies (other plugins, at minimum
//! versions) are installed and active in a host application, and reports the
//! result for the host's plugin list.
//!
//! # Architecture
//!
//! The host drives the library through the [`PluginHost`] trait:
//! - `on_enumerate_plugins` rebuilds the inventory snapshot
//! - `on_render_actions` replaces a plugin's `activate` action with
//!   requirement labels when something it depends on is missing
//!
//! ## Requirement Loading (`loader` module)
//! - `RequirementLoader::find_requirement_file()` - First of `requirements`,
//!   `require`, `depends_on` present in the plugin directory
//! - `RequirementLoader::load()` - Parse the declaration, empty on failure
//!
//! ## Evaluation (`evaluator` module)
//! - `check_requirement()` - Strict single check
//! - `check_requirements()` - Satisfied/unsatisfied partition
//!
//! ## Data Structures
//! - `PluginMetadata` - Host-reported plugin attributes
//! - `InventorySnapshot` - Installed plugins plus the active set
//! - `VersionConstraint` - Parsed `<id>[:<version>]` constraint
//! - `RequirementRecord` - Dependency metadata with the required version

pub mod config;
pub mod error;
pub mod evaluator;
pub mod host;
pub mod inventory;
pub mod loader;
pub mod plugin;
pub mod version;

pub use config::CheckerConfig;
pub use error::{RequirementError, Result};
pub use evaluator::{check_requirement, check_requirements, Evaluation};
pub use host::{Action, ActionLinks, PluginHost, RequirementLabel, RequirementsChecker};
pub use inventory::{ActivePlugins, InventorySnapshot};
pub use loader::{parse_requirements, RequirementLoader};
pub use plugin::{PluginId, PluginMetadata, RequirementRecord, Requirements, UnsatisfiedReason};
pub use version::{Version, VersionConstraint};
