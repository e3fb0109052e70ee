//! JQL construction
//!
//! Builds the epic search expression from the user's filters and the duplicate
//! check expressions used before creating a story.

use serde::{Deserialize, Serialize};

use crate::profile::ToolProfile;
use crate::template::StoryKind;

/// Maximum number of existing stories fetched per duplicate check
pub const DUPLICATE_SEARCH_LIMIT: usize = 10;

/// Error type for query construction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid fix version format '{0}'. Use numerical format like '4.19.0' or '4.19'")]
    InvalidFixVersion(String),

    #[error("Invalid status '{status}'. Allowed statuses: {allowed}")]
    InvalidStatus { status: String, allowed: String },
}

/// Optional filters supplied on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub label: Option<String>,
    pub fix_version: Option<String>,
    pub status: Option<String>,
}

/// A ready-to-run epic search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpicQuery {
    pub jql: String,
    /// Human-readable account of what is being searched for
    pub description: String,
}

/// Base clause shared by every epic search
pub fn base_epic_clause(project_key: &str) -> String {
    format!("project = {project_key} AND issuetype = Epic")
}

/// Build the epic search for the given filters.
///
/// Clauses are appended in the order label, fix version, status. Empty strings
/// count as "not supplied". With no filters at all, the profile's default label
/// is searched instead. An invalid fix version or status is reported before any
/// query text is produced, so the caller never issues a search for it.
pub fn build_epic_query(
    profile: &ToolProfile,
    filters: &SearchFilters,
) -> Result<EpicQuery, QueryError> {
    let base = base_epic_clause(&profile.project_key);
    let mut clauses = Vec::new();
    let mut descriptions = Vec::new();

    if let Some(label) = non_empty(&filters.label) {
        clauses.push(format!("labels = \"{label}\""));
        descriptions.push(format!("label: {label}"));
    }

    if let Some(fix_version) = non_empty(&filters.fix_version) {
        if !profile.validate_fix_version(Some(fix_version)) {
            return Err(QueryError::InvalidFixVersion(fix_version.to_string()));
        }
        // Non-empty input always yields a tag.
        let tag = profile.fix_version_tag(Some(fix_version)).unwrap_or_default();
        clauses.push(format!("fixVersion = \"{tag}\""));
        descriptions.push(format!("fix version: {fix_version} (JIRA: {tag})"));
    }

    if let Some(status) = non_empty(&filters.status) {
        if !profile.validate_status(status) {
            return Err(QueryError::InvalidStatus {
                status: status.to_string(),
                allowed: profile.allowed_statuses.join(", "),
            });
        }
        clauses.push(format!("status = \"{status}\""));
        descriptions.push(format!("status: {status}"));
    }

    if clauses.is_empty() {
        let label = &profile.default_label;
        return Ok(EpicQuery {
            jql: format!("{base} AND labels = \"{label}\""),
            description: format!("default label: {label}"),
        });
    }

    Ok(EpicQuery {
        jql: format!("{base} AND {}", clauses.join(" AND ")),
        description: descriptions.join(" AND "),
    })
}

/// JQL finding stories under `epic_key` that already cover `kind`.
///
/// A story matches when it carries the kind's label or its summary contains the
/// kind's keyword (Jira's `~` operator is case-insensitive).
pub fn duplicate_story_query(project_key: &str, epic_key: &str, kind: StoryKind) -> String {
    format!(
        "project = {project_key} AND issuetype = Story AND \"Epic Link\" = {epic_key} AND (labels = \"{}\" OR summary ~ \"{}\")",
        kind.label(),
        kind.summary_keyword()
    )
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(label: Option<&str>, fix_version: Option<&str>, status: Option<&str>) -> SearchFilters {
        SearchFilters {
            label: label.map(String::from),
            fix_version: fix_version.map(String::from),
            status: status.map(String::from),
        }
    }

    #[test]
    fn test_label_only() {
        let query = build_epic_query(
            &ToolProfile::stories(),
            &filters(Some("ODF-4.19-candidate"), None, None),
        )
        .unwrap();

        assert_eq!(
            query.jql,
            r#"project = RHSTOR AND issuetype = Epic AND labels = "ODF-4.19-candidate""#
        );
        assert_eq!(query.description, "label: ODF-4.19-candidate");
    }

    #[test]
    fn test_fix_version_only_is_transformed() {
        let query =
            build_epic_query(&ToolProfile::stories(), &filters(None, Some("4.19"), None)).unwrap();

        assert_eq!(
            query.jql,
            r#"project = RHSTOR AND issuetype = Epic AND fixVersion = "ODF v4.19.0""#
        );
        assert_eq!(query.description, "fix version: 4.19 (JIRA: ODF v4.19.0)");
    }

    #[test]
    fn test_all_filters_in_order() {
        let query = build_epic_query(
            &ToolProfile::stories(),
            &filters(Some("X"), Some("4.19"), Some("In Progress")),
        )
        .unwrap();

        assert_eq!(
            query.jql,
            r#"project = RHSTOR AND issuetype = Epic AND labels = "X" AND fixVersion = "ODF v4.19.0" AND status = "In Progress""#
        );
        assert_eq!(
            query.description,
            "label: X AND fix version: 4.19 (JIRA: ODF v4.19.0) AND status: In Progress"
        );
    }

    #[test]
    fn test_no_filters_falls_back_to_default_label() {
        let query = build_epic_query(&ToolProfile::view(), &SearchFilters::default()).unwrap();

        assert_eq!(
            query.jql,
            r#"project = RHSTOR AND issuetype = Epic AND labels = "ODF-4.19-candidate""#
        );
        assert_eq!(query.description, "default label: ODF-4.19-candidate");
    }

    #[test]
    fn test_empty_strings_are_not_filters() {
        let query =
            build_epic_query(&ToolProfile::view(), &filters(Some(""), Some(""), Some(""))).unwrap();

        assert!(query.jql.ends_with(r#"labels = "ODF-4.19-candidate""#));
    }

    #[test]
    fn test_invalid_fix_version() {
        let err = build_epic_query(&ToolProfile::stories(), &filters(None, Some("invalid"), None))
            .unwrap_err();

        assert_eq!(err, QueryError::InvalidFixVersion("invalid".to_string()));
        assert!(err.to_string().contains("'4.19.0' or '4.19'"));
    }

    #[test]
    fn test_invalid_status_lists_allowed() {
        let err = build_epic_query(
            &ToolProfile::stories(),
            &filters(Some("X"), None, Some("Invalid Status")),
        )
        .unwrap_err();

        match &err {
            QueryError::InvalidStatus { status, allowed } => {
                assert_eq!(status, "Invalid Status");
                assert!(allowed.contains("ON_QA"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_spelling_is_per_tool() {
        let on_qa = filters(None, None, Some("ON_QA"));

        assert!(build_epic_query(&ToolProfile::stories(), &on_qa).is_ok());
        assert!(build_epic_query(&ToolProfile::view(), &on_qa).is_err());
    }

    #[test]
    fn test_duplicate_story_queries() {
        assert_eq!(
            duplicate_story_query("RHSTOR", "RHSTOR-1234", StoryKind::Kcs),
            r#"project = RHSTOR AND issuetype = Story AND "Epic Link" = RHSTOR-1234 AND (labels = "kcs" OR summary ~ "kcs")"#
        );
        assert_eq!(
            duplicate_story_query("RHSTOR", "RHSTOR-1234", StoryKind::HappyPath),
            r#"project = RHSTOR AND issuetype = Story AND "Epic Link" = RHSTOR-1234 AND (labels = "happy-path" OR summary ~ "happy")"#
        );
    }
}
