//! Story creation and epic linkage
//!
//! A story is created in one request. When the Epic Link field was resolved up
//! front it is part of that request and nothing else happens. Otherwise the
//! [`LINK_STRATEGIES`] are tried in order after creation, stopping at the first
//! one that succeeds. A story that none of them can link is still reported as
//! created.

use colored::Colorize;
use rhstor_core::epic_link::{
    choose_link_type, link_comment, resolve_any_epic_field, resolve_epic_link_field,
    COMMON_EPIC_LINK_FIELDS,
};
use rhstor_core::jira::Epic;
use rhstor_core::story::{LinkMethod, StoryDraft};
use rhstor_core::template::StoryTemplate;
use serde_json::{json, Map, Value};

use crate::jira::JiraApi;
use crate::prelude::{eprintln, println, *};

/// Result of creating one story
#[derive(Debug)]
pub enum StoryOutcome {
    /// Created and attached to its epic
    Linked { story: String, method: LinkMethod },
    /// Created, but every linkage strategy failed
    CreatedUnlinked { story: String },
    /// Nothing was created. `fields` is what was submitted.
    CreationFailed { error: Error, fields: Value },
}

impl StoryOutcome {
    /// Key of the created story, if any
    pub fn story_key(&self) -> Option<&str> {
        match self {
            StoryOutcome::Linked { story, .. } | StoryOutcome::CreatedUnlinked { story } => {
                Some(story)
            }
            StoryOutcome::CreationFailed { .. } => None,
        }
    }

    pub fn is_created(&self) -> bool {
        self.story_key().is_some()
    }
}

/// One way of attaching an existing story to its epic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStrategy {
    /// Look the epic field up again and set it by update
    RediscoverField,
    /// Try the usual custom field ids one after another
    CommonFields,
    /// Fall back to a plain issue link
    IssueLink,
}

/// Post-creation strategies in the order they are attempted
pub const LINK_STRATEGIES: &[LinkStrategy] = &[
    LinkStrategy::RediscoverField,
    LinkStrategy::CommonFields,
    LinkStrategy::IssueLink,
];

impl LinkStrategy {
    pub async fn attempt<J: JiraApi + ?Sized>(
        self,
        jira: &J,
        story_key: &str,
        epic_key: &str,
    ) -> Result<LinkMethod, Error> {
        match self {
            LinkStrategy::RediscoverField => {
                let fields = jira.fields().await?;
                let field = resolve_any_epic_field(&fields).ok_or(Error::EpicFieldNotFound)?;
                log::debug!("Rediscovered epic field {} ({})", field.name, field.id);

                jira.update_issue(story_key, &epic_field_update(&field.id, epic_key))
                    .await?;

                Ok(LinkMethod::FieldUpdate {
                    field: field.id.clone(),
                })
            }
            LinkStrategy::CommonFields => {
                let mut last_error = Error::EpicFieldNotFound;

                for field in COMMON_EPIC_LINK_FIELDS {
                    match jira.update_issue(story_key, &epic_field_update(field, epic_key)).await {
                        Ok(()) => {
                            return Ok(LinkMethod::CommonField {
                                field: field.to_string(),
                            })
                        }
                        Err(e) => {
                            log::debug!("Failed with {field}: {e}");
                            last_error = e;
                        }
                    }
                }

                Err(last_error)
            }
            LinkStrategy::IssueLink => {
                let link_types = jira.issue_link_types().await?;
                let link_type = choose_link_type(&link_types);

                jira.create_issue_link(
                    &link_type,
                    story_key,
                    epic_key,
                    &link_comment(story_key, epic_key),
                )
                .await?;

                Ok(LinkMethod::IssueLink { link_type })
            }
        }
    }
}

/// `{ <field>: <epic key> }`
fn epic_field_update(field: &str, epic_key: &str) -> Value {
    let mut fields = Map::new();
    fields.insert(field.to_string(), json!(epic_key));
    Value::Object(fields)
}

/// Creates stories under epics of one project
pub struct StoryCreator<'a, J: JiraApi + ?Sized> {
    jira: &'a J,
    project_key: String,
    epic_link_field: Option<String>,
}

impl<'a, J: JiraApi + ?Sized> StoryCreator<'a, J> {
    /// Build a creator, resolving the Epic Link field once for the whole run.
    ///
    /// A failed metadata lookup is not an error: stories are then linked after
    /// creation instead.
    pub async fn new(jira: &'a J, project_key: &str) -> Self {
        let epic_link_field = match jira.fields().await {
            Ok(fields) => match resolve_epic_link_field(&fields) {
                Some(field) => {
                    println!("   Found Epic Link field: {} ({})", field.name, field.id);
                    Some(field.id.clone())
                }
                None => {
                    log::debug!("No Epic Link field in {} fields", fields.len());
                    None
                }
            },
            Err(e) => {
                eprintln!("   {} finding Epic Link field: {}", "Error".red(), e);
                None
            }
        };

        Self::with_epic_link_field(jira, project_key, epic_link_field)
    }

    pub fn with_epic_link_field(
        jira: &'a J,
        project_key: &str,
        epic_link_field: Option<String>,
    ) -> Self {
        Self {
            jira,
            project_key: project_key.to_string(),
            epic_link_field,
        }
    }

    pub fn epic_link_field(&self) -> Option<&str> {
        self.epic_link_field.as_deref()
    }

    /// Create one story for `epic` from `template` and link it.
    pub async fn create(&self, epic: &Epic, template: &StoryTemplate) -> StoryOutcome {
        let draft = StoryDraft::new(
            &self.project_key,
            epic,
            template,
            self.epic_link_field.as_deref(),
        );
        let fields = draft.to_fields();

        if let Some(field) = &draft.epic_link_field {
            println!("   Adding Epic Link during creation: {} = {}", field, epic.key);
        }
        log::debug!("Creating story with fields: {fields}");

        let story = match self.jira.create_issue(&fields).await {
            Ok(created) => created.key,
            Err(e) => {
                return StoryOutcome::CreationFailed {
                    error: Error::StoryCreationFailed(Box::new(e)),
                    fields,
                }
            }
        };
        println!("   {} Story created successfully: {}", "✓".green(), story);

        if let Some(field) = draft.epic_link_field {
            return StoryOutcome::Linked {
                story,
                method: LinkMethod::AtCreation { field },
            };
        }

        self.link(story, &epic.key).await
    }

    async fn link(&self, story: String, epic_key: &str) -> StoryOutcome {
        println!("   Attempting to link story {story} to epic {epic_key} (post-creation)");

        for strategy in LINK_STRATEGIES {
            match strategy.attempt(self.jira, &story, epic_key).await {
                Ok(method) => {
                    log::debug!("{strategy:?} linked {story} to {epic_key}");
                    return StoryOutcome::Linked { story, method };
                }
                Err(e) => log::debug!("{strategy:?} failed for {story}: {e}"),
            }
        }

        log::warn!("Could not link {story} to {epic_key}");
        StoryOutcome::CreatedUnlinked { story }
    }
}
