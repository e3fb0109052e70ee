//! `rhstor-stories`: create KCS and Happy Path stories under RHSTOR epics

use std::io::{self, BufRead, Write};

use colored::Colorize;
use rhstor_core::plan::{plan_epic, summarize_plans, EpicPlan, PlanTotals};
use rhstor_core::profile::ToolProfile;
use rhstor_core::query::SearchFilters;
use rhstor_core::story::STORY_ISSUE_TYPE;
use rhstor_core::template::{StoryTemplate, TemplateSelection, CUSTOM_DESCRIPTION_FALLBACK};

use crate::creator::{StoryCreator, StoryOutcome};
use crate::display;
use crate::duplicates::check_existing_stories;
use crate::jira::{connect, print_token_help, JiraApi, JiraConfig, DEFAULT_SERVER};
use crate::prelude::{println, *};
use crate::search::fetch_epics;

#[derive(Debug, clap::Parser)]
#[command(
    name = "rhstor-stories",
    author,
    version,
    about = "Create stories for RHSTOR epics and link them to their epic"
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

    /// Maximum number of epics to process
    #[clap(short, long, default_value_t = 20)]
    pub max_results: usize,

    /// Story template type
    #[clap(short, long, value_enum, default_value_t = TemplateChoice::Auto)]
    pub templates: TemplateChoice,

    /// Show what would be created without creating anything
    #[clap(short = 'n', long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[clap(short, long)]
    pub yes: bool,

    /// Verbose diagnostics
    #[clap(long)]
    pub debug: bool,

    /// Show detailed help with examples
    #[clap(long)]
    pub detailed_help: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TemplateChoice {
    /// KCS for 'dev-preview' epics, Happy Path for the rest
    Auto,
    /// Both KCS and Happy Path
    Default,
    /// KCS only
    Kcs,
    /// Happy Path only
    Happy,
    /// Prompt for custom templates
    Custom,
}

impl TemplateChoice {
    pub fn name(self) -> &'static str {
        match self {
            TemplateChoice::Auto => "auto",
            TemplateChoice::Default => "default",
            TemplateChoice::Kcs => "kcs",
            TemplateChoice::Happy => "happy",
            TemplateChoice::Custom => "custom",
        }
    }

    /// Resolve the choice, prompting on stdin for `custom`
    pub fn selection(self) -> Result<TemplateSelection> {
        if let Some(selection) = TemplateSelection::preset(self.name()) {
            return Ok(selection);
        }

        let stdin = io::stdin();
        let templates = prompt_custom_templates(&mut stdin.lock(), &mut io::stdout())
            .wrap_err("Failed to read custom templates")?;
        Ok(TemplateSelection::custom(templates))
    }
}

/// Everything a run needs besides the Jira connection
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub filters: SearchFilters,
    pub max_results: usize,
    pub selection: TemplateSelection,
    pub dry_run: bool,
    pub assume_yes: bool,
    pub debug: bool,
}

/// What a run did
#[derive(Debug, Default)]
pub struct RunReport {
    pub plans: Vec<EpicPlan>,
    pub totals: PlanTotals,
    pub linked: usize,
    pub unlinked: usize,
    pub failed: usize,
    pub cancelled: bool,
}

impl RunReport {
    /// Stories that exist now and did not before
    pub fn created(&self) -> usize {
        self.linked + self.unlinked
    }
}

pub fn detailed_help() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"
RHSTOR Story Creator v{version}
===================================

DESCRIPTION:
    Creates JIRA stories for RHSTOR epics and links them to their epic.
    Each epic gets stories rendered from predefined or custom templates.

USAGE:
    rhstor-stories [OPTIONS]

OPTIONS:
    -l, --label LABEL           Filter epics by label (e.g. "ODF-4.19-candidate")
    -f, --fix-version VERSION   Filter by numerical fix version (e.g. "4.19", "4.19.0")
    -s, --status STATUS         Filter by epic status
    -m, --max-results N         Maximum number of epics to process (default: 20)
    -t, --templates TYPE        Story templates: auto, default, kcs, happy, custom
    -n, --dry-run               Show what would be created without creating anything
    -y, --yes                   Do not ask for confirmation
        --debug                 Verbose diagnostics
        --detailed-help         Show this help
    -V, --version               Show version information

STORY TEMPLATES:
    auto:    KCS stories for 'dev-preview' epics, Happy Path for others (default)
    default: KCS and Happy Path stories for every epic
    kcs:     Only the KCS story
    happy:   Only the Happy Path validation story
    custom:  Prompt for summary, description and story points

EXAMPLES:
    # Auto mode for a release label
    rhstor-stories --label "ODF-4.19-candidate"

    # Epics of a fix version in a given status
    rhstor-stories --fix-version "4.19" --status "In Progress"

    # Preview auto mode
    rhstor-stories --label "ODF-4.19-candidate" --dry-run

    # KCS stories for every epic
    rhstor-stories --label "ODF-4.19-candidate" --templates kcs

STORY DETAILS:
    KCS story: asks for a Knowledge Center Solution article. Labeled "kcs".
    Happy Path story: validation steps required before the epic moves to
    ON_QA. Labeled "happy-path".
    Stories copy the epic's assignee and are linked to the epic.

DUPLICATE PREVENTION:
    Before creating, existing stories under the epic are looked up by label
    ("kcs", "happy-path") or by keyword in the summary ("kcs", "happy",
    case-insensitive). A story type that already exists is skipped and the
    existing key is reported.

SETUP:
    1. export JIRA_API_TOKEN='your-token-here'
    2. Get a token from {DEFAULT_SERVER}
       -> Account Settings -> Security -> API Tokens
    3. Optionally point JIRA_SERVER at another instance
"#
    )
}

/// Ask a yes/no question on the terminal
fn confirm(prompt: &str) -> bool {
    print!("{prompt} (y/N): ");
    io::stdout().flush().ok();

    let mut input = String::new();
    io::stdin().read_line(&mut input).ok();

    is_yes(&input)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn prompt_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Read custom templates interactively.
///
/// An empty summary ends input. A blank description falls back to
/// [`CUSTOM_DESCRIPTION_FALLBACK`] and unparsable story points are dropped.
pub fn prompt_custom_templates<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Vec<StoryTemplate>> {
    writeln!(output, "\nCustom Story Template Creation")?;
    writeln!(output, "{}", "=".repeat(40))?;

    let mut templates = Vec::new();
    loop {
        writeln!(output, "\nCreating template #{}:", templates.len() + 1)?;

        let summary = prompt_line(
            input,
            output,
            "Story summary template (use {epic_key} and {epic_summary}): ",
        )?;
        if summary.is_empty() {
            break;
        }

        let mut description = prompt_line(input, output, "Story description template: ")?;
        if description.is_empty() {
            description = CUSTOM_DESCRIPTION_FALLBACK.to_string();
        }

        let story_points = prompt_line(input, output, "Story points (or press Enter to skip): ")?
            .parse::<u32>()
            .ok();

        templates.push(StoryTemplate::new(summary, description, story_points));

        let another = prompt_line(input, output, "Add another template? (y/N): ")?;
        if !is_yes(&another) {
            break;
        }
    }

    Ok(templates)
}

/// Check project access and the Story issue type; never fatal
async fn debug_diagnostics<J: JiraApi + ?Sized>(jira: &J, profile: &ToolProfile) {
    println!("\n{}", "Debug mode: Testing JIRA operations...".bold());

    if let Err(e) = check_access(jira, profile).await {
        println!("   {} JIRA access test failed: {}", "Error".red().bold(), e);
        println!("   This may indicate permission or configuration issues");
    }
}

async fn check_access<J: JiraApi + ?Sized>(jira: &J, profile: &ToolProfile) -> Result<(), Error> {
    let project = jira.project(&profile.project_key).await?;
    println!(
        "   {} Can access {} project: {}",
        "✓".green(),
        project.key,
        project.name
    );

    let issue_types = jira.issue_types().await?;
    match issue_types.iter().find(|it| it.name == STORY_ISSUE_TYPE) {
        Some(story_type) => println!(
            "   {} Story issue type available: {}",
            "✓".green(),
            story_type.name
        ),
        None => {
            let names: Vec<&str> = issue_types.iter().map(|it| it.name.as_str()).collect();
            println!(
                "   {} Story issue type not found in available types: {:?}",
                "Warning:".yellow().bold(),
                names
            );
        }
    }

    Ok(())
}

fn print_plan_analysis(totals: &PlanTotals, selection: &TemplateSelection) {
    println!("\n{}", "Debug: Epic Analysis".bold());
    println!("   Total epics found: {}", totals.epics);

    match selection {
        TemplateSelection::Auto => {
            println!(
                "   Dev-preview epics: {} (will get KCS stories)",
                totals.dev_preview
            );
            println!(
                "   Regular epics: {} (will get Happy Path stories)",
                totals.regular
            );
            println!("   Epics needing new KCS stories: {}", totals.kcs_to_create);
            println!(
                "   Epics needing new Happy Path stories: {}",
                totals.happy_to_create
            );
        }
        TemplateSelection::Manual(templates) => {
            println!("   Templates selected: {}", templates.len());
            println!("   Epics needing new stories: {}", totals.epics_needing_stories);
        }
    }

    println!("   Total new stories to create: {}", totals.stories_to_create);
    if totals.stories_to_create == 0 {
        println!("   All epics already have the required stories!");
    }
    println!("   {}", "=".repeat(50));
}

fn print_summary(report: &RunReport, selection: &TemplateSelection, dry_run: bool) {
    let totals = &report.totals;
    let skipped = totals.epics_skipped();

    match (selection.is_auto(), dry_run) {
        (true, true) => {
            println!("\n{}", "AUTO MODE DRY RUN SUMMARY:".bold());
            println!("   {} dev-preview epics processed", totals.dev_preview);
            println!("   {} regular epics processed", totals.regular);
            println!(
                "   Epics that would get new KCS stories: {}",
                totals.kcs_to_create
            );
            println!(
                "   Epics that would get new Happy Path stories: {}",
                totals.happy_to_create
            );
            println!(
                "   Total new stories that would be created: {}",
                totals.stories_to_create
            );
        }
        (true, false) => {
            println!("\n{}", "AUTO MODE SUMMARY:".bold());
            println!("   {} dev-preview epics processed", totals.dev_preview);
            println!("   {} regular epics processed", totals.regular);
            println!(
                "   Total: {} new stories created for {} epics",
                report.created(),
                totals.epics
            );
        }
        (false, true) => {
            println!("\n{}", "DRY RUN SUMMARY:".bold());
            println!("   Total epics found: {}", totals.epics);
            println!(
                "   Epics that would get new stories: {}",
                totals.epics_needing_stories
            );
            println!(
                "   Total new stories that would be created: {}",
                totals.stories_to_create
            );
        }
        (false, false) => {
            println!(
                "\n{} Created {} new stories for {} epics",
                "SUMMARY:".bold(),
                report.created(),
                totals.epics
            );
        }
    }

    if !dry_run && (report.unlinked > 0 || report.failed > 0) {
        println!(
            "   {} not linked to their epic, {} failed",
            report.unlinked, report.failed
        );
    }

    if totals.stories_to_create == 0 {
        println!("   All epics already have the required stories - no new stories needed!");
    } else if skipped > 0 {
        println!(
            "   {} epics already have required stories and {}",
            skipped,
            if dry_run { "would be skipped" } else { "were skipped" }
        );
    }
}

/// Plan, confirm, and create stories for every matching epic.
///
/// Exactly one duplicate check runs per epic. No write call is made on a dry run
/// or when `confirm` declines.
pub async fn run_stories<J, C>(
    jira: &J,
    profile: &ToolProfile,
    options: &RunOptions,
    mut confirm: C,
) -> RunReport
where
    J: JiraApi + ?Sized,
    C: FnMut(&str) -> bool,
{
    let mut report = RunReport::default();

    if options.debug {
        debug_diagnostics(jira, profile).await;
    }

    display::print_templates(&options.selection);

    let epics = fetch_epics(jira, profile, &options.filters, options.max_results).await;
    if epics.is_empty() {
        println!("No epics found matching the criteria.");
        return report;
    }

    println!("Checking existing stories for {} epic(s)...", epics.len());
    let mut plans = Vec::with_capacity(epics.len());
    for epic in epics {
        let existing = check_existing_stories(jira, &profile.project_key, &epic).await;
        plans.push(plan_epic(epic, &existing, &options.selection));
    }
    report.totals = summarize_plans(&plans);

    if options.debug {
        print_plan_analysis(&report.totals, &options.selection);
    }

    let will_write = !options.dry_run && report.totals.stories_to_create > 0;

    if will_write && !options.assume_yes {
        println!(
            "\n{} This will create {} stories for {} epics.",
            "Warning:".yellow().bold(),
            report.totals.stories_to_create,
            report.totals.epics_needing_stories
        );
        if options.selection.is_auto() {
            println!("   'dev-preview' epics -> KCS stories");
            println!("   Other epics -> Happy Path stories");
        }

        if !confirm("Do you want to proceed?") {
            println!("{}", "Operation cancelled.".red());
            report.plans = plans;
            report.cancelled = true;
            return report;
        }
    }

    let creator = if will_write {
        Some(StoryCreator::new(jira, &profile.project_key).await)
    } else {
        None
    };

    println!(
        "\nFound {} epic(s) to create stories for:",
        report.totals.epics
    );
    println!("{}", display::heavy_rule());

    for (i, plan) in plans.iter().enumerate() {
        display::print_epic_header(i + 1, &plan.epic);
        for skipped in &plan.skipped {
            display::print_skipped(skipped);
        }
        if let Some(category) = plan.category {
            if !plan.to_create.is_empty() {
                display::print_auto_selection(category);
            }
        }

        match &creator {
            _ if plan.to_create.is_empty() => {
                println!("   No new stories to create for this epic");
            }
            None => display::print_dry_run(&plan.epic, &plan.to_create),
            Some(creator) => {
                println!("   Creating {} stories...", plan.to_create.len());
                let mut created = 0;

                for (j, template) in plan.to_create.iter().enumerate() {
                    let outcome = creator.create(&plan.epic, template).await;
                    display::print_outcome(j + 1, &outcome, &plan.epic, jira.server());

                    if outcome.is_created() {
                        created += 1;
                    }
                    match outcome {
                        StoryOutcome::Linked { .. } => report.linked += 1,
                        StoryOutcome::CreatedUnlinked { .. } => report.unlinked += 1,
                        StoryOutcome::CreationFailed { .. } => report.failed += 1,
                    }
                }

                println!(
                    "   Created {}/{} stories for this epic",
                    created,
                    plan.to_create.len()
                );
            }
        }

        println!("{}", display::rule(display::LIGHT_RULE));
    }

    report.plans = plans;
    print_summary(&report, &options.selection, options.dry_run);

    if options.dry_run {
        println!("\nRun without --dry-run to actually create the stories.");
    } else {
        println!("\n{}", "Story creation completed!".green().bold());
    }

    report
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

    println!(
        "{}",
        format!("RHSTOR Story Creator v{}", env!("CARGO_PKG_VERSION")).bold()
    );
    println!("JIRA Server: {}\n", config.server);

    let jira = connect(&config).await?;
    let selection = app.templates.selection()?;

    let options = RunOptions {
        filters: SearchFilters {
            label: app.label,
            fix_version: app.fix_version,
            status: app.status,
        },
        max_results: app.max_results,
        selection,
        dry_run: app.dry_run,
        assume_yes: app.yes,
        debug: app.debug,
    };

    run_stories(&jira, &ToolProfile::stories(), &options, confirm).await;

    Ok(())
}
