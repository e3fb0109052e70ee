//! Epic search shared by both tools

use colored::Colorize;
use rhstor_core::jira::Epic;
use rhstor_core::profile::ToolProfile;
use rhstor_core::query::{build_epic_query, SearchFilters};

use crate::jira::JiraApi;
use crate::prelude::eprintln;

/// Fetch epics matching `filters`. Progress goes to stderr.
///
/// Invalid filters and search failures are reported and produce an empty list;
/// no search is sent for filters that fail validation.
pub async fn fetch_epics<J: JiraApi + ?Sized>(
    jira: &J,
    profile: &ToolProfile,
    filters: &SearchFilters,
    max_results: usize,
) -> Vec<Epic> {
    let query = match build_epic_query(profile, filters) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return Vec::new();
        }
    };

    eprintln!("Searching for epics with {}", query.description.cyan());
    eprintln!("Query: {}", query.jql.bright_black());
    eprintln!("{}", "-".repeat(60));

    match jira.search(&query.jql, max_results).await {
        Ok(epics) => epics,
        Err(e) => {
            eprintln!("{} searching for epics: {}", "Error".red().bold(), e);
            Vec::new()
        }
    }
}
