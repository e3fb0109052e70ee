//! Story payload assembly

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::jira::Epic;
use crate::template::StoryTemplate;

/// Issue type of created stories
pub const STORY_ISSUE_TYPE: &str = "Story";

/// Everything needed to create one story for one epic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryDraft {
    pub project_key: String,
    pub epic_key: String,
    pub summary: String,
    pub description: String,
    pub label: Option<String>,
    /// Login name copied from the epic
    pub assignee: Option<String>,
    /// Epic Link field id set at creation time, when it was resolved up front
    pub epic_link_field: Option<String>,
}

impl StoryDraft {
    /// Render `template` for `epic`.
    ///
    /// The label comes from the template kind (`kcs`, `happy-path`, or none), the
    /// assignee is the epic's login name, and `epic_link_field` (if any) is set to
    /// the epic key so the link exists as soon as the issue does.
    pub fn new(
        project_key: &str,
        epic: &Epic,
        template: &StoryTemplate,
        epic_link_field: Option<&str>,
    ) -> Self {
        Self {
            project_key: project_key.to_string(),
            epic_key: epic.key.clone(),
            summary: template.render_summary(&epic.key, &epic.summary),
            description: template.render_description(&epic.key, &epic.summary),
            label: template.kind().map(|kind| kind.label().to_string()),
            assignee: epic.assignee_name().map(String::from),
            epic_link_field: epic_link_field.map(String::from),
        }
    }

    /// Whether the epic link is part of the create request
    pub fn links_at_creation(&self) -> bool {
        self.epic_link_field.is_some()
    }

    /// The `fields` object for `POST /rest/api/2/issue`
    pub fn to_fields(&self) -> Value {
        let mut fields = Map::new();
        fields.insert("project".into(), json!({ "key": self.project_key }));
        fields.insert("summary".into(), json!(self.summary));
        fields.insert("description".into(), json!(self.description));
        fields.insert("issuetype".into(), json!({ "name": STORY_ISSUE_TYPE }));

        if let Some(label) = &self.label {
            fields.insert("labels".into(), json!([label]));
        }

        if let Some(assignee) = &self.assignee {
            fields.insert("assignee".into(), json!({ "name": assignee }));
        }

        if let Some(field_id) = &self.epic_link_field {
            fields.insert(field_id.clone(), json!(self.epic_key));
        }

        Value::Object(fields)
    }
}

/// How a created story ended up linked to its epic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum LinkMethod {
    /// Epic Link field included in the create request
    AtCreation { field: String },
    /// Epic field rediscovered from metadata and set by update
    FieldUpdate { field: String },
    /// One of the commonly used custom field ids accepted the update
    CommonField { field: String },
    /// Generic issue link between story and epic
    IssueLink { link_type: String },
}

impl std::fmt::Display for LinkMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkMethod::AtCreation { field } => write!(f, "Epic Link set during creation ({field})"),
            LinkMethod::FieldUpdate { field } => write!(f, "Linked to epic using field {field}"),
            LinkMethod::CommonField { field } => write!(f, "Linked to epic using {field}"),
            LinkMethod::IssueLink { link_type } => {
                write!(f, "Linked to epic using issue link type '{link_type}'")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::{Assignee, Issue};

    fn epic(assignee: Option<&str>) -> Epic {
        Issue {
            key: "RHSTOR-1234".to_string(),
            summary: "Test Epic Summary".to_string(),
            status: "In Progress".to_string(),
            assignee: assignee.map(|name| Assignee {
                name: Some(name.to_string()),
                display_name: Some("Test User".to_string()),
            }),
            labels: vec!["ODF-4.19-candidate".to_string()],
            fix_versions: vec![],
        }
    }

    #[test]
    fn test_kcs_draft_with_prelinked_epic() {
        let draft = StoryDraft::new(
            "RHSTOR",
            &epic(Some("testuser")),
            &StoryTemplate::kcs(),
            Some("customfield_10008"),
        );

        assert!(draft.links_at_creation());

        let fields = draft.to_fields();
        assert_eq!(fields["project"]["key"], "RHSTOR");
        assert_eq!(fields["summary"], "KCS story for RHSTOR-1234");
        assert_eq!(fields["issuetype"]["name"], "Story");
        assert_eq!(fields["labels"], json!(["kcs"]));
        assert_eq!(fields["assignee"]["name"], "testuser");
        assert_eq!(fields["customfield_10008"], "RHSTOR-1234");
    }

    #[test]
    fn test_happy_path_draft_without_link_or_assignee() {
        let draft = StoryDraft::new("RHSTOR", &epic(None), &StoryTemplate::happy_path(), None);

        assert!(!draft.links_at_creation());

        let fields = draft.to_fields();
        assert_eq!(fields["labels"], json!(["happy-path"]));
        assert!(fields.get("assignee").is_none());
        assert_eq!(fields.as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_custom_template_has_no_label() {
        let template = StoryTemplate::new("Test story for {epic_key}", "About {epic_summary}", None);
        let draft = StoryDraft::new("RHSTOR", &epic(None), &template, None);

        assert_eq!(draft.label, None);
        assert_eq!(draft.description, "About Test Epic Summary");
        assert!(draft.to_fields().get("labels").is_none());
    }

    #[test]
    fn test_link_method_display() {
        assert_eq!(
            LinkMethod::IssueLink {
                link_type: "Relates".to_string()
            }
            .to_string(),
            "Linked to epic using issue link type 'Relates'"
        );
        assert_eq!(
            LinkMethod::CommonField {
                field: "customfield_10014".to_string()
            }
            .to_string(),
            "Linked to epic using customfield_10014"
        );
    }
}
