//! Terminal output shared by both tools

use colored::Colorize;
use rhstor_core::jira::{permalink, Epic};
use rhstor_core::plan::{EpicCategory, SkippedStory};
use rhstor_core::summary::StatusSummary;
use rhstor_core::template::{StoryTemplate, TemplateSelection};
use serde_json::Value;

use crate::creator::StoryOutcome;
use crate::prelude::{eprintln, println, *};

pub const HEAVY_RULE: usize = 80;
pub const LIGHT_RULE: usize = 60;

pub fn rule(width: usize) -> String {
    "-".repeat(width)
}

pub fn heavy_rule() -> String {
    "=".repeat(HEAVY_RULE)
}

/// Comma-separated labels, or `None`
pub fn labels_display(labels: &[String]) -> String {
    if labels.is_empty() {
        "None".to_string()
    } else {
        labels.join(", ")
    }
}

/// ` (3 story points)` or nothing
pub fn points_display(template: &StoryTemplate) -> String {
    template
        .story_points
        .map(|points| format!(" ({points} story points)"))
        .unwrap_or_default()
}

/// Key, title, status, assignee and labels of an epic
pub fn print_epic_header(index: usize, epic: &Epic) {
    println!("\n{}. Epic: {}", index, epic.key.bold().cyan());
    println!("   Title: {}", epic.summary.bright_white());
    println!("   Status: {}", epic.status.green());

    let assignee = epic.assignee_display();
    if epic.assignee.is_none() {
        println!("   Assignee: {}", assignee.bright_black());
    } else {
        println!("   Assignee: {}", assignee.bright_magenta());
    }

    println!("   Labels: {}", labels_display(&epic.labels));
}

/// Full epic block used by the view tool
pub fn print_epic_details(index: usize, epic: &Epic, server: &str) {
    print_epic_header(index, epic);
    println!("   Link: {}", permalink(server, &epic.key).blue());

    if !epic.fix_versions.is_empty() {
        println!("   Fix Versions: {}", epic.fix_versions.join(", "));
    }

    println!("{}", rule(LIGHT_RULE));
}

pub fn print_status_summary(summary: &StatusSummary) {
    println!(
        "{} {} epic(s)\n",
        "Status summary for".bold(),
        summary.total.to_string().cyan()
    );

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Status".bold().cyan(),
        "Count".bold().cyan(),
        "Share".bold().cyan()
    ]);

    for row in &summary.statuses {
        table.add_row(prettytable::row![
            row.status,
            row.count,
            format!("{:.1}%", row.percentage)
        ]);
    }

    table.printstd();
}

/// List the templates a run will use before anything is fetched
pub fn print_templates(selection: &TemplateSelection) {
    match selection {
        TemplateSelection::Auto => {
            println!(
                "\n{} Will create KCS stories for 'dev-preview' epics, Happy Path stories for others",
                "Auto mode:".bold()
            );
        }
        TemplateSelection::Manual(templates) => {
            println!("\nUsing {} story template(s):", templates.len());
            for (i, template) in templates.iter().enumerate() {
                println!("   {}. {}{}", i + 1, template.summary, points_display(template));
            }
        }
    }
}

pub fn print_auto_selection(category: EpicCategory) {
    let choice = match category {
        EpicCategory::DevPreview => "KCS story (dev-preview epic)",
        EpicCategory::Regular => "Happy Path story (regular epic)",
    };
    println!("   Auto-selected: {}", choice.yellow());
}

pub fn print_skipped(skipped: &SkippedStory) {
    println!(
        "   {} {} story already exists: {} - \"{}\"",
        "✓".green(),
        skipped.kind.display_name(),
        skipped.existing.key.cyan(),
        skipped.existing.summary
    );
}

/// Summaries the dry run would create for `epic`
pub fn print_dry_run(epic: &Epic, templates: &[StoryTemplate]) {
    println!(
        "   {} Would create {} stories:",
        "DRY RUN:".yellow().bold(),
        templates.len()
    );
    for (j, template) in templates.iter().enumerate() {
        println!(
            "      {}. {}",
            j + 1,
            template.render_summary(&epic.key, &epic.summary)
        );
    }
}

/// Per-story result line plus any follow-up the user has to act on
pub fn print_outcome(index: usize, outcome: &StoryOutcome, epic: &Epic, server: &str) {
    match outcome {
        StoryOutcome::Linked { story, method } => {
            println!("   {method}");
            println!("      {} {}. Created story: {}", "✓".green(), index, story.cyan());
        }
        StoryOutcome::CreatedUnlinked { story } => {
            print_manual_link_hint(server, story, &epic.key);
            println!("      {} {}. Created story: {}", "✓".green(), index, story.cyan());
        }
        StoryOutcome::CreationFailed { error, fields } => {
            print_creation_failure(error, fields);
            println!("      {} {}. Failed to create story", "✗".red(), index);
        }
    }
}

pub fn print_manual_link_hint(server: &str, story_key: &str, epic_key: &str) {
    println!(
        "   {} Could not link story to epic automatically",
        "Warning:".yellow().bold()
    );
    println!("   Manual action required: Set Epic Link for {story_key} to {epic_key}");
    println!("   Story URL: {}", permalink(server, story_key));
    println!("   Epic URL: {}", permalink(server, epic_key));
}

/// Everything known about a failed create request
pub fn print_creation_failure(error: &Error, fields: &Value) {
    eprintln!("   {} creating story:", "Error".red().bold());
    eprintln!("       Error type: {}", error.kind());
    eprintln!("       Error message: {error}");
    if let Some(body) = error.response_body() {
        eprintln!("       JIRA response: {body}");
    }
    eprintln!("   Story fields that failed: {fields}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_display() {
        assert_eq!(labels_display(&[]), "None");
        assert_eq!(
            labels_display(&["dev-preview".to_string(), "ODF-4.19-candidate".to_string()]),
            "dev-preview, ODF-4.19-candidate"
        );
    }

    #[test]
    fn test_points_display() {
        assert_eq!(points_display(&StoryTemplate::kcs()), " (3 story points)");
        assert_eq!(
            points_display(&StoryTemplate::new("Docs for {epic_key}", "", None)),
            ""
        );
    }

    #[test]
    fn test_rules() {
        assert_eq!(rule(LIGHT_RULE).len(), 60);
        assert_eq!(heavy_rule().len(), 80);
    }
}
