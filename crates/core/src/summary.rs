//! Status counts for the view tool

use std::collections::HashMap;

use serde::Serialize;

use crate::jira::Issue;

/// One row of the status summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
    /// Share of all epics, 0.0..=100.0
    pub percentage: f64,
}

/// Output structure for `--status-summary`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub statuses: Vec<StatusCount>,
}

/// Count epics per status, most common first and ties broken by name
pub fn summarize_statuses(issues: &[Issue]) -> StatusSummary {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for issue in issues {
        *counts.entry(issue.status.as_str()).or_default() += 1;
    }

    let total = issues.len();
    let mut statuses: Vec<StatusCount> = counts
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
            percentage: count as f64 * 100.0 / total as f64,
        })
        .collect();

    statuses.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.status.cmp(&b.status)));

    StatusSummary { total, statuses }
}
