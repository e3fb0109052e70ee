//! Deciding which stories each epic needs
//!
//! The shell runs one duplicate check per epic and hands the result here. The
//! plan is the single source for what gets created, what the dry run prints,
//! and the counts in every summary.

use serde::Serialize;

use crate::jira::{Epic, Issue};
use crate::template::{StoryKind, StoryTemplate, TemplateSelection};

/// Label marking an early-access epic
pub const DEV_PREVIEW_LABEL: &str = "dev-preview";

/// Stories already present under an epic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExistingStories {
    pub kcs: Vec<Issue>,
    pub happy: Vec<Issue>,
}

impl ExistingStories {
    pub fn has_kcs(&self) -> bool {
        !self.kcs.is_empty()
    }

    pub fn has_happy(&self) -> bool {
        !self.happy.is_empty()
    }

    pub fn for_kind(&self, kind: StoryKind) -> &[Issue] {
        match kind {
            StoryKind::Kcs => &self.kcs,
            StoryKind::HappyPath => &self.happy,
        }
    }
}

/// Auto-mode classification of an epic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EpicCategory {
    DevPreview,
    Regular,
}

impl EpicCategory {
    pub fn of(epic: &Epic) -> Self {
        if epic.has_label(DEV_PREVIEW_LABEL) {
            EpicCategory::DevPreview
        } else {
            EpicCategory::Regular
        }
    }

    /// Template auto mode applies to this category
    pub fn template(self) -> StoryTemplate {
        match self {
            EpicCategory::DevPreview => StoryTemplate::kcs(),
            EpicCategory::Regular => StoryTemplate::happy_path(),
        }
    }
}

/// A template left out because a matching story already exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedStory {
    pub kind: StoryKind,
    pub existing: Issue,
}

/// What will happen to one epic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpicPlan {
    pub epic: Epic,
    /// Set in auto mode only
    pub category: Option<EpicCategory>,
    pub to_create: Vec<StoryTemplate>,
    pub skipped: Vec<SkippedStory>,
}

/// Plan the stories for one epic.
///
/// In auto mode the epic's category picks a single template. In manual mode
/// every selected template is considered. Either way a template is skipped when
/// a story of its kind already exists; templates with no recognizable kind are
/// always kept.
pub fn plan_epic(epic: Epic, existing: &ExistingStories, selection: &TemplateSelection) -> EpicPlan {
    let (category, candidates) = match selection {
        TemplateSelection::Auto => {
            let category = EpicCategory::of(&epic);
            (Some(category), vec![category.template()])
        }
        TemplateSelection::Manual(templates) => (None, templates.clone()),
    };

    let mut to_create = Vec::new();
    let mut skipped = Vec::new();

    for template in candidates {
        let duplicate = template
            .kind()
            .and_then(|kind| existing.for_kind(kind).first().map(|issue| (kind, issue)));

        match duplicate {
            Some((kind, issue)) => skipped.push(SkippedStory {
                kind,
                existing: issue.clone(),
            }),
            None => to_create.push(template),
        }
    }

    EpicPlan {
        epic,
        category,
        to_create,
        skipped,
    }
}

/// Aggregate counts over a set of plans
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanTotals {
    pub epics: usize,
    pub dev_preview: usize,
    pub regular: usize,
    pub epics_needing_stories: usize,
    pub stories_to_create: usize,
    pub kcs_to_create: usize,
    pub happy_to_create: usize,
}

impl PlanTotals {
    /// Epics that already have every story they need
    pub fn epics_skipped(&self) -> usize {
        self.epics - self.epics_needing_stories
    }
}

pub fn summarize_plans(plans: &[EpicPlan]) -> PlanTotals {
    let mut totals = PlanTotals {
        epics: plans.len(),
        ..Default::default()
    };

    for plan in plans {
        match plan.category {
            Some(EpicCategory::DevPreview) => totals.dev_preview += 1,
            Some(EpicCategory::Regular) => totals.regular += 1,
            None => {}
        }

        if !plan.to_create.is_empty() {
            totals.epics_needing_stories += 1;
        }

        totals.stories_to_create += plan.to_create.len();
        for template in &plan.to_create {
            match template.kind() {
                Some(StoryKind::Kcs) => totals.kcs_to_create += 1,
                Some(StoryKind::HappyPath) => totals.happy_to_create += 1,
                None => {}
            }
        }
    }

    totals
}
