//! Existing-story detection

use colored::Colorize;
use rhstor_core::jira::Epic;
use rhstor_core::plan::ExistingStories;
use rhstor_core::query::{duplicate_story_query, DUPLICATE_SEARCH_LIMIT};
use rhstor_core::template::StoryKind;

use crate::jira::JiraApi;
use crate::prelude::{eprintln, *};

/// Look up KCS and Happy Path stories already linked to `epic`.
///
/// Best effort: if either search fails the epic is treated as having no
/// existing stories, so creation is never blocked by this check.
pub async fn check_existing_stories<J: JiraApi + ?Sized>(
    jira: &J,
    project_key: &str,
    epic: &Epic,
) -> ExistingStories {
    match search_existing(jira, project_key, epic).await {
        Ok(existing) => existing,
        Err(e) => {
            log::debug!("Duplicate check for {} failed: {}", epic.key, e);
            eprintln!(
                "   {} Could not check existing stories: {}",
                "Warning:".yellow().bold(),
                e
            );
            ExistingStories::default()
        }
    }
}

async fn search_existing<J: JiraApi + ?Sized>(
    jira: &J,
    project_key: &str,
    epic: &Epic,
) -> Result<ExistingStories, Error> {
    let kcs_query = duplicate_story_query(project_key, &epic.key, StoryKind::Kcs);
    let happy_query = duplicate_story_query(project_key, &epic.key, StoryKind::HappyPath);

    let kcs = jira.search(&kcs_query, DUPLICATE_SEARCH_LIMIT).await?;
    let happy = jira.search(&happy_query, DUPLICATE_SEARCH_LIMIT).await?;

    Ok(ExistingStories { kcs, happy })
}
