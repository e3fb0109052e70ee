//! Locating the "parent epic" field
//!
//! Jira instances expose the epic relationship as a custom field whose id and
//! display name vary between configurations. These functions pick a candidate
//! out of the field metadata; the shell decides what to do with it.

use crate::jira::{JiraField, JiraIssueLinkType};

/// Custom field ids commonly used for Epic Link, tried in this order when the
/// field cannot be found by name
pub const COMMON_EPIC_LINK_FIELDS: &[&str] = &[
    "customfield_10001",
    "customfield_10008",
    "customfield_10014",
    "customfield_10002",
];

/// Link type used when no epic-specific link type exists
pub const FALLBACK_LINK_TYPE: &str = "Relates";

/// Find the Epic Link field before creating a story.
///
/// 1. A field named exactly `epic link` or `epic name` (case-insensitive).
/// 2. Otherwise the first field whose name contains both `epic` and `link`.
///
/// The exact match always wins, wherever it sits in the list.
pub fn resolve_epic_link_field(fields: &[JiraField]) -> Option<&JiraField> {
    fields
        .iter()
        .find(|field| {
            let name = field.name.to_lowercase();
            name == "epic link" || name == "epic name"
        })
        .or_else(|| {
            fields.iter().find(|field| {
                let name = field.name.to_lowercase();
                name.contains("epic") && name.contains("link")
            })
        })
}

/// Looser lookup used after creation when the story is still unlinked: the
/// first field that is named `epic link` or mentions `epic` at all.
pub fn resolve_any_epic_field(fields: &[JiraField]) -> Option<&JiraField> {
    fields
        .iter()
        .find(|field| field.name.to_lowercase().contains("epic"))
}

/// Pick the issue link type: the first whose name mentions `epic`, otherwise
/// [`FALLBACK_LINK_TYPE`].
pub fn choose_link_type(link_types: &[JiraIssueLinkType]) -> String {
    link_types
        .iter()
        .find(|lt| lt.name.to_lowercase().contains("epic"))
        .map(|lt| lt.name.clone())
        .unwrap_or_else(|| FALLBACK_LINK_TYPE.to_string())
}

/// Comment attached to a generic issue link between story and epic
pub fn link_comment(story_key: &str, epic_key: &str) -> String {
    format!("Story {story_key} created for epic {epic_key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Vec<JiraField> {
        pairs
            .iter()
            .map(|(id, name)| JiraField::new(*id, *name))
            .collect()
    }

    #[test]
    fn test_exact_epic_link() {
        let fields = fields(&[
            ("summary", "Summary"),
            ("customfield_10008", "Epic Link"),
            ("priority", "Priority"),
        ]);

        let found = resolve_epic_link_field(&fields).map(|f| f.id.as_str());
        assert_eq!(found, Some("customfield_10008"));
    }

    #[test]
    fn test_exact_epic_name() {
        let fields = fields(&[("customfield_10011", "EPIC NAME")]);

        let found = resolve_epic_link_field(&fields).map(|f| f.id.as_str());
        assert_eq!(found, Some("customfield_10011"));
    }

    #[test]
    fn test_not_found() {
        let fields = fields(&[("summary", "Summary"), ("priority", "Priority")]);

        assert_eq!(resolve_epic_link_field(&fields), None);
        assert_eq!(resolve_epic_link_field(&[]), None);
    }

    #[test]
    fn test_exact_match_beats_partial_match() {
        let fields = fields(&[
            ("customfield_20000", "Epic-related-thing-link"),
            ("customfield_10008", "Epic Link"),
        ]);

        let found = resolve_epic_link_field(&fields).map(|f| f.id.as_str());
        assert_eq!(found, Some("customfield_10008"));
    }

    #[test]
    fn test_partial_match() {
        let fields = fields(&[
            ("customfield_1", "Epic Status"),
            ("customfield_2", "Parent Epic Link"),
        ]);

        let found = resolve_epic_link_field(&fields).map(|f| f.id.as_str());
        assert_eq!(found, Some("customfield_2"));
    }

    #[test]
    fn test_partial_match_ignores_unrelated_fields() {
        let fields = fields(&[("customfield_1", "Epic Status"), ("issuelinks", "Linked Issues")]);

        assert_eq!(resolve_epic_link_field(&fields), None);
    }

    #[test]
    fn test_loose_lookup_takes_first_epic_field() {
        let fields = fields(&[
            ("summary", "Summary"),
            ("customfield_1", "Epic Status"),
            ("customfield_2", "Epic Link"),
        ]);

        let found = resolve_any_epic_field(&fields).map(|f| f.id.as_str());
        assert_eq!(found, Some("customfield_1"));
    }

    #[test]
    fn test_choose_link_type() {
        let types = vec![
            JiraIssueLinkType {
                name: "Blocks".to_string(),
            },
            JiraIssueLinkType {
                name: "Epic-Story Link".to_string(),
            },
        ];
        assert_eq!(choose_link_type(&types), "Epic-Story Link");

        assert_eq!(choose_link_type(&types[..1]), "Relates");
        assert_eq!(choose_link_type(&[]), "Relates");
    }

    #[test]
    fn test_link_comment() {
        assert_eq!(
            link_comment("RHSTOR-2001", "RHSTOR-1234"),
            "Story RHSTOR-2001 created for epic RHSTOR-1234"
        );
    }
}
