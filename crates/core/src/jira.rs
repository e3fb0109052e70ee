//! Jira REST (v2) wire models and transformation functions

use serde::{Deserialize, Serialize};

/// Fields requested on every issue search
pub const SEARCH_FIELDS: &str = "summary,status,assignee,labels,fixVersions";

/// Search response from `GET /rest/api/2/search`
#[derive(Debug, Deserialize, Clone)]
pub struct JiraSearchResponse {
    #[serde(default)]
    pub issues: Vec<JiraIssueResponse>,
}

/// Jira issue response from API
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraIssueResponse {
    pub key: String,
    pub fields: JiraIssueFields,
}

/// Fields from Jira issue
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct JiraIssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: Option<JiraStatus>,
    #[serde(default)]
    pub assignee: Option<JiraAssignee>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    #[serde(rename = "fixVersions")]
    pub fix_versions: Vec<JiraVersion>,
}

/// Jira status field
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraStatus {
    pub name: String,
}

/// Jira assignee field (Server/Data Center exposes the login `name`)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct JiraAssignee {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

/// Jira version (fixVersions entry)
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraVersion {
    pub name: String,
}

/// Field metadata entry from `GET /rest/api/2/field`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct JiraField {
    pub id: String,
    pub name: String,
}

impl JiraField {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Issue link type from `GET /rest/api/2/issueLinkType`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct JiraIssueLinkType {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JiraIssueLinkTypesResponse {
    #[serde(rename = "issueLinkTypes", default)]
    pub issue_link_types: Vec<JiraIssueLinkType>,
}

/// Response to `POST /rest/api/2/issue`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraCreatedIssue {
    pub key: String,
}

/// Project returned by `GET /rest/api/2/project/{key}`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraProject {
    pub key: String,
    pub name: String,
}

/// Issue type returned by `GET /rest/api/2/issuetype`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraIssueType {
    pub name: String,
}

/// Authenticated user returned by `GET /rest/api/2/myself`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

/// Assignee of an issue as the tools use it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Assignee {
    /// Login name, used when copying the assignee onto a new story
    pub name: Option<String>,
    pub display_name: Option<String>,
}

/// An issue as the tools use it: epics from the main search and existing stories
/// from duplicate checks share this shape
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub assignee: Option<Assignee>,
    pub labels: Vec<String>,
    pub fix_versions: Vec<String>,
}

/// Epics are plain issues of type Epic
pub type Epic = Issue;

impl Issue {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Display name of the assignee, or `Unassigned`
    pub fn assignee_display(&self) -> &str {
        self.assignee
            .as_ref()
            .and_then(|a| a.display_name.as_deref())
            .unwrap_or("Unassigned")
    }

    /// Login name of the assignee, if any
    pub fn assignee_name(&self) -> Option<&str> {
        self.assignee.as_ref().and_then(|a| a.name.as_deref())
    }
}

/// Convert a raw issue into the domain model
pub fn transform_issue(issue: JiraIssueResponse) -> Issue {
    let fields = issue.fields;
    Issue {
        key: issue.key,
        summary: fields.summary,
        status: fields
            .status
            .map(|s| s.name)
            .unwrap_or_else(|| "Unknown".to_string()),
        assignee: fields.assignee.map(|a| Assignee {
            name: a.name,
            display_name: a.display_name,
        }),
        labels: fields.labels,
        fix_versions: fields.fix_versions.into_iter().map(|v| v.name).collect(),
    }
}

/// Convert a search response into domain issues, preserving order
pub fn transform_search_response(search_response: JiraSearchResponse) -> Vec<Issue> {
    search_response
        .issues
        .into_iter()
        .map(transform_issue)
        .collect()
}

/// Browser URL for an issue
pub fn permalink(server: &str, key: &str) -> String {
    format!("{}/browse/{}", server.trim_end_matches('/'), key)
}

/// Flatten a Jira error body into readable lines.
///
/// Jira reports failures as `{"errorMessages": [...], "errors": {"field": "msg"}}`.
/// Bodies that are not JSON, or carry neither key, are returned unchanged.
pub fn summarize_error_body(body: &str) -> String {
    let Ok(error_json) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };

    let mut messages = Vec::new();

    if let Some(error_messages) = error_json.get("errorMessages").and_then(|em| em.as_array()) {
        for msg in error_messages {
            if let Some(text) = msg.as_str() {
                messages.push(text.to_string());
            }
        }
    }

    if let Some(errors) = error_json.get("errors").and_then(|e| e.as_object()) {
        for (field, error) in errors {
            if let Some(error_text) = error.as_str() {
                messages.push(format!("{field}: {error_text}"));
            }
        }
    }

    if messages.is_empty() {
        body.to_string()
    } else {
        messages.join("\n")
    }
}
