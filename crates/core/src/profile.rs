//! Per-tool configuration
//!
//! The story-creation tool and the view tool query the same project but were
//! written with slightly different rules: the allowed status spelling differs
//! (`ON_QA` against `On QA`), and only the story tool treats an absent fix version
//! as valid. Both rule sets are kept as data so each entry point behaves exactly
//! as its users expect.

use serde::{Deserialize, Serialize};

use crate::version::is_numeric_fix_version;

/// Jira project the tools operate on
pub const DEFAULT_PROJECT_KEY: &str = "RHSTOR";

/// Product prefix used in fix-version tags (e.g. `ODF v4.19.0`)
pub const DEFAULT_PRODUCT_TAG: &str = "ODF";

/// Label searched when no filter is given
pub const DEFAULT_LABEL: &str = "ODF-4.19-candidate";

/// Statuses accepted by `rhstor-stories`
pub const STORIES_STATUSES: &[&str] = &[
    "To Do",
    "In Progress",
    "Code Review",
    "ON_QA",
    "Verified",
    "Closed",
];

/// Statuses accepted by `rhstor-view`
pub const VIEW_STATUSES: &[&str] = &[
    "To Do",
    "In Progress",
    "Code Review",
    "On QA",
    "Verified",
    "Closed",
];

/// Configuration handed to every component that needs project-level settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolProfile {
    pub project_key: String,
    pub product_tag: String,
    pub default_label: String,
    pub allowed_statuses: Vec<String>,
    /// Whether an empty or absent fix version passes validation
    pub empty_fix_version_valid: bool,
}

impl ToolProfile {
    /// Profile used by the story-creation tool
    pub fn stories() -> Self {
        Self::with_statuses(STORIES_STATUSES, true)
    }

    /// Profile used by the fetch/summary tool
    pub fn view() -> Self {
        Self::with_statuses(VIEW_STATUSES, false)
    }

    fn with_statuses(statuses: &[&str], empty_fix_version_valid: bool) -> Self {
        Self {
            project_key: DEFAULT_PROJECT_KEY.to_string(),
            product_tag: DEFAULT_PRODUCT_TAG.to_string(),
            default_label: DEFAULT_LABEL.to_string(),
            allowed_statuses: statuses.iter().map(|s| s.to_string()).collect(),
            empty_fix_version_valid,
        }
    }

    /// Validate a fix version under this profile's rules
    pub fn validate_fix_version(&self, version: Option<&str>) -> bool {
        match version {
            None | Some("") => self.empty_fix_version_valid,
            Some(v) => is_numeric_fix_version(v),
        }
    }

    /// Case-sensitive membership check against the allowed statuses
    pub fn validate_status(&self, status: &str) -> bool {
        self.allowed_statuses.iter().any(|s| s == status)
    }

    /// Transform a numeric fix version into this profile's Jira tag
    pub fn fix_version_tag(&self, version: Option<&str>) -> Option<String> {
        crate::version::transform_fix_version(&self.product_tag, version)
    }
}
