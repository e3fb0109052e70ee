//! In-memory [`JiraApi`] for unit tests

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use rhstor_core::jira::{
    Issue, JiraCreatedIssue, JiraField, JiraIssueLinkType, JiraIssueType, JiraProject, JiraUser,
};
use serde_json::Value;

use super::JiraApi;
use crate::error::Error;

/// A recorded call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Myself,
    Search { jql: String, max_results: usize },
    Fields,
    Create { fields: Value },
    Update { key: String, fields: Value },
    LinkTypes,
    Link { link_type: String, inward: String, outward: String },
    Project { key: String },
    IssueTypes,
}

/// Scriptable fake. Searches answer with the first rule whose needle appears in
/// the JQL; updates succeed only for the field ids listed in `updatable_fields`.
#[derive(Default)]
pub struct FakeJira {
    pub search_rules: Vec<(String, Vec<Issue>)>,
    pub fail_search: bool,
    pub field_metadata: Vec<JiraField>,
    pub fail_fields: bool,
    pub fail_create: bool,
    pub updatable_fields: HashSet<String>,
    pub link_types: Vec<JiraIssueLinkType>,
    pub fail_link: bool,
    pub calls: Mutex<Vec<Call>>,
    next_key: Mutex<u32>,
}

impl FakeJira {
    pub fn new() -> Self {
        Self {
            next_key: Mutex::new(2001),
            ..Default::default()
        }
    }

    /// Answer searches containing `needle` with `issues`
    pub fn with_search(mut self, needle: &str, issues: Vec<Issue>) -> Self {
        self.search_rules.push((needle.to_string(), issues));
        self
    }

    pub fn with_fields(mut self, fields: &[(&str, &str)]) -> Self {
        self.field_metadata = fields
            .iter()
            .map(|(id, name)| JiraField::new(*id, *name))
            .collect();
        self
    }

    pub fn with_link_types(mut self, names: &[&str]) -> Self {
        self.link_types = names
            .iter()
            .map(|name| JiraIssueLinkType {
                name: name.to_string(),
            })
            .collect();
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn failing_fields(mut self) -> Self {
        self.fail_fields = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_link(mut self) -> Self {
        self.fail_link = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn creates(&self) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Create { fields } => Some(fields),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn rejected() -> Error {
        Error::Api {
            status: 400,
            message: "rejected by fake".to_string(),
            body: r#"{"errorMessages":["rejected by fake"]}"#.to_string(),
        }
    }
}

#[async_trait]
impl JiraApi for FakeJira {
    fn server(&self) -> &str {
        "https://jira.example.com"
    }

    async fn myself(&self) -> Result<JiraUser, Error> {
        self.record(Call::Myself);
        Ok(JiraUser {
            name: Some("tester".to_string()),
            display_name: Some("Tester".to_string()),
        })
    }

    async fn search(&self, jql: &str, max_results: usize) -> Result<Vec<Issue>, Error> {
        self.record(Call::Search {
            jql: jql.to_string(),
            max_results,
        });

        if self.fail_search {
            return Err(Error::Network("search unavailable".to_string()));
        }

        Ok(self
            .search_rules
            .iter()
            .find(|(needle, _)| jql.contains(needle.as_str()))
            .map(|(_, issues)| issues.clone())
            .unwrap_or_default())
    }

    async fn fields(&self) -> Result<Vec<JiraField>, Error> {
        self.record(Call::Fields);
        if self.fail_fields {
            return Err(Error::Network("field metadata unavailable".to_string()));
        }
        Ok(self.field_metadata.clone())
    }

    async fn create_issue(&self, fields: &Value) -> Result<JiraCreatedIssue, Error> {
        self.record(Call::Create {
            fields: fields.clone(),
        });

        if self.fail_create {
            return Err(Self::rejected());
        }

        let mut next = self.next_key.lock().unwrap();
        let key = format!("RHSTOR-{}", *next);
        *next += 1;

        Ok(JiraCreatedIssue { key })
    }

    async fn update_issue(&self, key: &str, fields: &Value) -> Result<(), Error> {
        self.record(Call::Update {
            key: key.to_string(),
            fields: fields.clone(),
        });

        let accepted = fields
            .as_object()
            .map(|map| map.keys().all(|k| self.updatable_fields.contains(k)))
            .unwrap_or(false);

        if accepted {
            Ok(())
        } else {
            Err(Self::rejected())
        }
    }

    async fn issue_link_types(&self) -> Result<Vec<JiraIssueLinkType>, Error> {
        self.record(Call::LinkTypes);
        Ok(self.link_types.clone())
    }

    async fn create_issue_link(
        &self,
        link_type: &str,
        inward_key: &str,
        outward_key: &str,
        _comment: &str,
    ) -> Result<(), Error> {
        self.record(Call::Link {
            link_type: link_type.to_string(),
            inward: inward_key.to_string(),
            outward: outward_key.to_string(),
        });

        if self.fail_link {
            Err(Self::rejected())
        } else {
            Ok(())
        }
    }

    async fn project(&self, key: &str) -> Result<JiraProject, Error> {
        self.record(Call::Project {
            key: key.to_string(),
        });
        Ok(JiraProject {
            key: key.to_string(),
            name: "Red Hat Storage".to_string(),
        })
    }

    async fn issue_types(&self) -> Result<Vec<JiraIssueType>, Error> {
        self.record(Call::IssueTypes);
        Ok(vec![
            JiraIssueType {
                name: "Epic".to_string(),
            },
            JiraIssueType {
                name: "Story".to_string(),
            },
        ])
    }
}

/// Epic fixture
pub fn epic(key: &str, labels: &[&str], assignee: Option<&str>) -> Issue {
    Issue {
        key: key.to_string(),
        summary: format!("Summary of {key}"),
        status: "In Progress".to_string(),
        assignee: assignee.map(|name| rhstor_core::jira::Assignee {
            name: Some(name.to_string()),
            display_name: Some(format!("{name} (display)")),
        }),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        fix_versions: vec![],
    }
}
