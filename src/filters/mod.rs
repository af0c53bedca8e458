//! Filter controller.
//!
//! Holds the project / member / date-range selection and keeps it
//! consistent: the member options follow the selected project, and a member
//! that is no longer offered falls back to `all`.

use crate::dataset::Dataset;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Selector value meaning "no restriction".
pub const ALL: &str = "all";

/// Date range selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum RangeMode {
    /// Last 7 days, including today
    #[value(name = "7d")]
    #[serde(rename = "7d")]
    Last7,
    /// Last 30 days, including today
    #[default]
    #[value(name = "30d")]
    #[serde(rename = "30d")]
    Last30,
    /// Last 90 days, including today
    #[value(name = "90d")]
    #[serde(rename = "90d")]
    Last90,
    /// Explicit --start / --end dates
    #[value(name = "custom")]
    #[serde(rename = "custom")]
    Custom,
}

impl RangeMode {
    /// Length of a preset range in days, `None` for custom.
    pub fn preset_days(&self) -> Option<i64> {
        match self {
            RangeMode::Last7 => Some(7),
            RangeMode::Last30 => Some(30),
            RangeMode::Last90 => Some(90),
            RangeMode::Custom => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeMode::Last7 => "7d",
            RangeMode::Last30 => "30d",
            RangeMode::Last90 => "90d",
            RangeMode::Custom => "custom",
        }
    }
}

/// A resolved filter selection, as consumed by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub project: String,
    pub member: String,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
}

impl FilterState {
    /// Build a state, swapping the range bounds if they are reversed.
    pub fn new(
        project: impl Into<String>,
        member: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        let (range_start, range_end) = ordered(start, end);
        Self {
            project: project.into(),
            member: member.into(),
            range_start,
            range_end,
        }
    }

    /// No project or member restriction over the given range.
    pub fn unfiltered(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(ALL, ALL, start, end)
    }

    /// The selected project id, or `None` for all projects.
    pub fn project_id(&self) -> Option<&str> {
        selected(&self.project)
    }

    /// The selected member, or `None` for all members.
    pub fn member_name(&self) -> Option<&str> {
        selected(&self.member)
    }

    /// Range bounds in ascending order.
    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        ordered(self.range_start, self.range_end)
    }
}

fn selected(value: &str) -> Option<&str> {
    if value == ALL {
        None
    } else {
        Some(value)
    }
}

fn ordered(a: NaiveDate, b: NaiveDate) -> (NaiveDate, NaiveDate) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// `[today - (days - 1), today]`.
pub fn preset_range(today: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(days.max(1) - 1), today)
}

/// Resolve a custom range, defaulting each missing bound and swapping a
/// reversed pair.
pub fn custom_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    fallback: (NaiveDate, NaiveDate),
) -> (NaiveDate, NaiveDate) {
    ordered(start.unwrap_or(fallback.0), end.unwrap_or(fallback.1))
}

/// Distinct assignees across the projects matching `project`, sorted.
pub fn member_options(dataset: &Dataset, project: &str) -> Vec<String> {
    let project = selected(project);

    dataset
        .projects()
        .iter()
        .filter(|p| project.map_or(true, |id| p.id == id))
        .flat_map(|p| p.tasks.iter().map(|t| t.assignee.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Interactive filter selection over a dataset.
#[derive(Debug, Clone)]
pub struct FilterController<'a> {
    dataset: &'a Dataset,
    today: NaiveDate,
    project: String,
    member: String,
    mode: RangeMode,
    preset_days: i64,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
    members: Vec<String>,
}

impl<'a> FilterController<'a> {
    /// All projects, all members, last 30 days.
    pub fn new(dataset: &'a Dataset, today: NaiveDate) -> Self {
        Self {
            dataset,
            today,
            project: ALL.to_string(),
            member: ALL.to_string(),
            mode: RangeMode::default(),
            preset_days: RangeMode::default().preset_days().unwrap_or(30),
            custom_start: None,
            custom_end: None,
            members: member_options(dataset, ALL),
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn mode(&self) -> RangeMode {
        self.mode
    }

    pub fn member_options(&self) -> &[String] {
        &self.members
    }

    /// `(id, name)` pairs in dataset order.
    pub fn project_options(&self) -> Vec<(&'a str, &'a str)> {
        self.dataset
            .projects()
            .iter()
            .map(|p| (p.id.as_str(), p.name.as_str()))
            .collect()
    }

    /// Select a project and recompute the member options.
    pub fn set_project(&mut self, project: impl Into<String>) {
        self.project = project.into();
        self.members = member_options(self.dataset, &self.project);
        debug!(
            "Project filter set to {} ({} members)",
            self.project,
            self.members.len()
        );
        self.reconcile_member();
    }

    /// Select a member. A member outside the current options resets to `all`.
    pub fn set_member(&mut self, member: impl Into<String>) {
        self.member = member.into();
        self.reconcile_member();
    }

    /// Switch range mode. Presets also become the custom-mode fallback.
    pub fn set_mode(&mut self, mode: RangeMode) {
        if let Some(days) = mode.preset_days() {
            self.preset_days = days;
        }
        self.mode = mode;
    }

    /// Switch to custom mode with the given bounds.
    pub fn set_custom_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.custom_start = start;
        self.custom_end = end;
        self.mode = RangeMode::Custom;
    }

    /// The resolved, ordered, inclusive date range.
    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        let preset = preset_range(self.today, self.preset_days);
        match self.mode {
            RangeMode::Custom => custom_range(self.custom_start, self.custom_end, preset),
            _ => preset,
        }
    }

    /// Snapshot of the current selection for the aggregator.
    pub fn state(&self) -> FilterState {
        let (start, end) = self.range();
        FilterState::new(self.project.clone(), self.member.clone(), start, end)
    }

    fn reconcile_member(&mut self) {
        if self.member != ALL && !self.members.contains(&self.member) {
            debug!("Member {} not in options, resetting to {}", self.member, ALL);
            self.member = ALL.to_string();
        }
    }
}
