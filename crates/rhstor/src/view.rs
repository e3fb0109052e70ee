//! `rhstor-view`: list RHSTOR epics or summarize them by status

use colored::Colorize;
use rhstor_core::jira::Epic;
use rhstor_core::profile::ToolProfile;
use rhstor_core::query::SearchFilters;
use rhstor_core::summary::summarize_statuses;

use crate::display;
use crate::jira::{connect, print_token_help, JiraApi, JiraConfig, DEFAULT_SERVER};
use crate::prelude::{println, *};
use crate::search::fetch_epics;

#[derive(Debug, clap::Parser)]
#[command(
    name = "rhstor-view",
    author,
    version,
    about = "Fetch and display RHSTOR epics"
)]
pub struct App {
    /// Filter epics by label (e.g. "ODF-4.19-candidate")
    #[clap(short, long)]
    pub label: Option<String>,

    /// Filter by numerical fix version (e.g. "4.19", "4.19.0")
    #[clap(short, long)]
    pub fix_version: Option<String>,

    /// Filter by epic status
    #[clap(short, long)]
    pub status: Option<String>,

    /// Maximum number of epics to fetch
    #[clap(short, long, default_value_t = 100)]
    pub max_results: usize,

    /// Show counts per status instead of the epic list
    #[clap(long)]
    pub status_summary: bool,

    /// Output as JSON
    #[clap(long)]
    pub json: bool,

    /// Verbose diagnostics
    #[clap(long)]
    pub debug: bool,

    /// Show detailed help with examples
    #[clap(long)]
    pub detailed_help: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub filters: SearchFilters,
    pub max_results: usize,
    pub status_summary: bool,
    pub json: bool,
}

pub fn detailed_help() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"
RHSTOR Epic Viewer v{version}
===================================

DESCRIPTION:
    Fetches RHSTOR epics and prints them, or counts them per status.

USAGE:
    rhstor-view [OPTIONS]

OPTIONS:
    -l, --label LABEL           Filter epics by label (e.g. "ODF-4.19-candidate")
    -f, --fix-version VERSION   Filter by numerical fix version (e.g. "4.19", "4.19.0")
    -s, --status STATUS         Filter by epic status
    -m, --max-results N         Maximum number of epics to fetch (default: 100)
        --status-summary        Count epics per status instead of listing them
        --json                  Print JSON instead of text
        --debug                 Verbose diagnostics
        --detailed-help         Show this help
    -V, --version               Show version information

    Without filters, epics labeled "ODF-4.19-candidate" are fetched.

STATUSES:
    To Do, In Progress, Code Review, On QA, Verified, Closed

EXAMPLES:
    rhstor-view --label "ODF-4.19-candidate"
    rhstor-view --fix-version "4.19" --status "On QA"
    rhstor-view --fix-version "4.19" --status-summary
    rhstor-view --label "ODF-4.19-candidate" --json

SETUP:
    1. export JIRA_API_TOKEN='your-token-here'
    2. Get a token from {DEFAULT_SERVER}
       -> Account Settings -> Security -> API Tokens
"#
    )
}

/// JSON for either output mode
pub fn render_json(epics: &[Epic], status_summary: bool) -> Result<String> {
    let json = if status_summary {
        serde_json::to_string_pretty(&summarize_statuses(epics))?
    } else {
        serde_json::to_string_pretty(epics)?
    };
    Ok(json)
}

fn print_epics(epics: &[Epic], server: &str) {
    if epics.is_empty() {
        println!("No epics found matching the criteria.");
        return;
    }

    println!("Found {} epic(s):", epics.len());
    println!("{}", display::heavy_rule());

    for (i, epic) in epics.iter().enumerate() {
        display::print_epic_details(i + 1, epic, server);
    }
}

/// Fetch epics and print them in the requested form
pub async fn run_view<J: JiraApi + ?Sized>(
    jira: &J,
    profile: &ToolProfile,
    options: &ViewOptions,
) -> Result<Vec<Epic>> {
    let epics = fetch_epics(jira, profile, &options.filters, options.max_results).await;

    if options.json {
        println!("{}", render_json(&epics, options.status_summary)?);
    } else if options.status_summary {
        display::print_status_summary(&summarize_statuses(&epics));
    } else {
        print_epics(&epics, jira.server());
        println!("\n{}", "Search completed!".green().bold());
    }

    Ok(epics)
}

pub async fn run(app: App) -> Result<()> {
    if app.detailed_help {
        println!("{}", detailed_help());
        return Ok(());
    }

    let config = match JiraConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            print_token_help();
            return Err(eyre!(e));
        }
    };
    log::debug!("Using JIRA server {}", config.server);

    let jira = connect(&config).await?;

    let options = ViewOptions {
        filters: SearchFilters {
            label: app.label,
            fix_version: app.fix_version,
            status: app.status,
        },
        max_results: app.max_results,
        status_summary: app.status_summary,
        json: app.json,
    };

    run_view(&jira, &ToolProfile::view(), &options).await?;

    Ok(())
}
