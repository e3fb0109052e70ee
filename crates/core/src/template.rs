//! Story templates
//!
//! Two built-in templates exist: the KCS reminder for dev-preview epics and the
//! Happy Path validation story for everything else. A template's kind is never
//! stored; it is inferred from the fixed text at the start of its summary
//! pattern, so custom templates that reuse that text are treated the same way.

use serde::{Deserialize, Serialize};

/// Placeholder replaced with the epic key
pub const EPIC_KEY_PLACEHOLDER: &str = "{epic_key}";

/// Placeholder replaced with the epic summary
pub const EPIC_SUMMARY_PLACEHOLDER: &str = "{epic_summary}";

/// Description used for a custom template when the user leaves it blank
pub const CUSTOM_DESCRIPTION_FALLBACK: &str = "Work related to epic {epic_key}: {epic_summary}";

const KCS_SUMMARY: &str = "KCS story for {epic_key}";

const KCS_DESCRIPTION: &str = "For a dev preview epic, we need to add a KCS article.
Please use the following link to create a KCS and reach out to Lijo to publish the same.

https://access.redhat.com/node/add/kcs-solution

*Related Epic:* {epic_key}
*Epic Summary:* {epic_summary}";

const HAPPY_PATH_SUMMARY: &str = "Happy Path Validation Story for {epic_key}";

const HAPPY_PATH_DESCRIPTION: &str = "Happy Path Validation:

1) The epic should be moved to ON_QA only if the happy path validation steps are provided. Please add the steps.

2) Make sure that the steps are clear and easy to follow.

3) Steps must be tested on a downstream setup.

*Related Epic:* {epic_key}
*Epic Summary:* {epic_summary}";

/// The two story categories the tools know how to deduplicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoryKind {
    Kcs,
    HappyPath,
}

impl StoryKind {
    /// Label attached to created stories of this kind
    pub fn label(self) -> &'static str {
        match self {
            StoryKind::Kcs => "kcs",
            StoryKind::HappyPath => "happy-path",
        }
    }

    /// Keyword searched in existing story summaries
    pub fn summary_keyword(self) -> &'static str {
        match self {
            StoryKind::Kcs => "kcs",
            StoryKind::HappyPath => "happy",
        }
    }

    /// Fixed summary text identifying a template of this kind
    pub fn summary_marker(self) -> &'static str {
        match self {
            StoryKind::Kcs => "KCS story for",
            StoryKind::HappyPath => "Happy Path Validation Story for",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            StoryKind::Kcs => "KCS",
            StoryKind::HappyPath => "Happy Path",
        }
    }
}

/// A story pattern rendered once per epic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryTemplate {
    pub summary: String,
    pub description: String,
    #[serde(default)]
    pub story_points: Option<u32>,
}

impl StoryTemplate {
    pub fn new(
        summary: impl Into<String>,
        description: impl Into<String>,
        story_points: Option<u32>,
    ) -> Self {
        Self {
            summary: summary.into(),
            description: description.into(),
            story_points,
        }
    }

    /// Built-in KCS template
    pub fn kcs() -> Self {
        Self::new(KCS_SUMMARY, KCS_DESCRIPTION, Some(3))
    }

    /// Built-in Happy Path validation template
    pub fn happy_path() -> Self {
        Self::new(HAPPY_PATH_SUMMARY, HAPPY_PATH_DESCRIPTION, Some(5))
    }

    /// Kind inferred from the summary pattern, KCS taking precedence
    pub fn kind(&self) -> Option<StoryKind> {
        [StoryKind::Kcs, StoryKind::HappyPath]
            .into_iter()
            .find(|kind| self.summary.contains(kind.summary_marker()))
    }

    pub fn render_summary(&self, epic_key: &str, epic_summary: &str) -> String {
        render(&self.summary, epic_key, epic_summary)
    }

    pub fn render_description(&self, epic_key: &str, epic_summary: &str) -> String {
        render(&self.description, epic_key, epic_summary)
    }
}

/// Both built-in templates, KCS first
pub fn default_templates() -> Vec<StoryTemplate> {
    vec![StoryTemplate::kcs(), StoryTemplate::happy_path()]
}

/// Substitute the epic placeholders in `pattern`
pub fn render(pattern: &str, epic_key: &str, epic_summary: &str) -> String {
    pattern
        .replace(EPIC_KEY_PLACEHOLDER, epic_key)
        .replace(EPIC_SUMMARY_PLACEHOLDER, epic_summary)
}

/// How templates are chosen for each epic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSelection {
    /// KCS for `dev-preview` epics, Happy Path for the rest
    Auto,
    /// Every listed template for every epic
    Manual(Vec<StoryTemplate>),
}

impl TemplateSelection {
    /// Resolve a named preset (`auto`, `default`, `kcs`, `happy`).
    ///
    /// `custom` is not a preset: its templates come from the user.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "auto" => Some(TemplateSelection::Auto),
            "default" => Some(TemplateSelection::Manual(default_templates())),
            "kcs" => Some(TemplateSelection::Manual(vec![StoryTemplate::kcs()])),
            "happy" => Some(TemplateSelection::Manual(vec![StoryTemplate::happy_path()])),
            _ => None,
        }
    }

    /// Custom templates, falling back to the defaults when none were entered
    pub fn custom(templates: Vec<StoryTemplate>) -> Self {
        if templates.is_empty() {
            TemplateSelection::Manual(default_templates())
        } else {
            TemplateSelection::Manual(templates)
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, TemplateSelection::Auto)
    }
}
