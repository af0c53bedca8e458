//! Data models for the performance dashboard.
//!
//! This module contains the dataset entities (projects and their tasks)
//! and the derived view-model records produced by the aggregator.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Planned,
    Backlog,
    Completed,
    Cancelled,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectStatus::Active => write!(f, "Active"),
            ProjectStatus::Planned => write!(f, "Planned"),
            ProjectStatus::Backlog => write!(f, "Backlog"),
            ProjectStatus::Completed => write!(f, "Completed"),
            ProjectStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl ProjectStatus {
    /// Whether the project counts towards the on-track rate.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, ProjectStatus::Active | ProjectStatus::Planned)
    }
}

/// Kind of work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Bug,
    Improvement,
    Task,
}

impl TaskType {
    /// All task types, in display order.
    pub const ALL: [TaskType; 3] = [TaskType::Bug, TaskType::Improvement, TaskType::Task];
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskType::Bug => write!(f, "Bug"),
            TaskType::Improvement => write!(f, "Improvement"),
            TaskType::Task => write!(f, "Task"),
        }
    }
}

/// Workflow status of a task. Only `Done` counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }
}

/// A unit of work owned by exactly one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    /// Member name the task is assigned to.
    pub assignee: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }

    pub fn is_bug(&self) -> bool {
        self.task_type == TaskType::Bug
    }
}

/// A project and the tasks it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    /// Reported completion, 0-100.
    pub progress: u8,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    /// Whether any task of this project is assigned to `member`.
    pub fn has_member(&self, member: &str) -> bool {
        self.tasks.iter().any(|t| t.assignee == member)
    }
}

/// Visual tone attached to KPI cards and health labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Neutral,
    Warning,
    Danger,
    Muted,
}

impl Tone {
    /// Returns an emoji representation of the tone.
    pub fn emoji(&self) -> &'static str {
        match self {
            Tone::Positive => "🟢",
            Tone::Neutral => "⚪",
            Tone::Warning => "🟡",
            Tone::Danger => "🔴",
            Tone::Muted => "⚫",
        }
    }
}

/// Delivery-status classification of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthLabel {
    Completed,
    Cancelled,
    Ahead,
    OnTrack,
    AtRisk,
    Behind,
}

impl fmt::Display for HealthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthLabel::Completed => write!(f, "Completed"),
            HealthLabel::Cancelled => write!(f, "Cancelled"),
            HealthLabel::Ahead => write!(f, "Ahead"),
            HealthLabel::OnTrack => write!(f, "On track"),
            HealthLabel::AtRisk => write!(f, "At risk"),
            HealthLabel::Behind => write!(f, "Behind"),
        }
    }
}

impl HealthLabel {
    pub fn tone(&self) -> Tone {
        match self {
            HealthLabel::Completed | HealthLabel::Ahead => Tone::Positive,
            HealthLabel::Cancelled => Tone::Muted,
            HealthLabel::OnTrack => Tone::Neutral,
            HealthLabel::AtRisk => Tone::Warning,
            HealthLabel::Behind => Tone::Danger,
        }
    }

    /// Labels that put a project on the delivery-risk list.
    pub fn is_risk(&self) -> bool {
        matches!(self, HealthLabel::Behind | HealthLabel::AtRisk)
    }

    /// Labels that count towards the on-track rate.
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthLabel::OnTrack | HealthLabel::Ahead)
    }
}

/// Per-project health record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRow {
    pub project_id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub progress: u8,
    /// Share of the schedule elapsed at the end of the range, 0-100.
    pub schedule_progress: i64,
    /// Actual progress minus schedule progress, in percentage points.
    pub variance: i64,
    pub label: HealthLabel,
    pub tone: Tone,
    /// Days from the end of the range to the project's end date.
    pub days_to_due: i64,
    pub task_count: usize,
    pub done_count: usize,
}

/// A single summary metric card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiCard {
    pub key: String,
    pub label: String,
    pub value: String,
    pub hint: String,
    pub tone: Tone,
}

/// Task counts split by type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub bug: usize,
    pub improvement: usize,
    pub task: usize,
}

impl TypeCounts {
    pub fn add(&mut self, task_type: TaskType) {
        match task_type {
            TaskType::Bug => self.bug += 1,
            TaskType::Improvement => self.improvement += 1,
            TaskType::Task => self.task += 1,
        }
    }

    pub fn get(&self, task_type: TaskType) -> usize {
        match task_type {
            TaskType::Bug => self.bug,
            TaskType::Improvement => self.improvement,
            TaskType::Task => self.task,
        }
    }

    pub fn total(&self) -> usize {
        self.bug + self.improvement + self.task
    }
}

/// Percentages of each task type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TypePercents {
    pub bug: f64,
    pub improvement: f64,
    pub task: f64,
}

impl TypePercents {
    pub fn get(&self, task_type: TaskType) -> f64 {
        match task_type {
            TaskType::Bug => self.bug,
            TaskType::Improvement => self.improvement,
            TaskType::Task => self.task,
        }
    }
}

/// Work mix of the tasks active in the range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkMix {
    pub counts: TypeCounts,
    pub total: usize,
    pub percent: TypePercents,
}

/// A contiguous slice of the selected date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: u32,
    pub label: String,
}

/// A bucket with a single completion count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountPoint {
    #[serde(flatten)]
    pub bucket: Bucket,
    pub count: usize,
    /// Bar height relative to the busiest bucket, 0-100.
    pub height: u32,
}

/// A bucket with completions split by task type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixPoint {
    #[serde(flatten)]
    pub bucket: Bucket,
    pub counts: TypeCounts,
    pub total: usize,
    pub height: u32,
}

/// Headline counts shown next to the charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryCounts {
    pub projects_in_scope: usize,
    pub tasks_in_scope: usize,
    pub tasks_in_range: usize,
    pub done_tasks: usize,
    pub overdue_tasks: usize,
    pub completed_in_range: usize,
    pub completed_bugs_in_range: usize,
    pub open_bugs: usize,
    pub bug_clearance_rate: u32,
    pub on_track_rate: u32,
    pub at_risk_projects: usize,
    pub total_days: u32,
    pub bucket_count: u32,
}

/// The complete view-model bundle for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub project: String,
    pub member: String,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    pub kpis: Vec<KpiCard>,
    pub health: Vec<HealthRow>,
    pub risk: Vec<HealthRow>,
    pub work_mix: WorkMix,
    pub throughput: Vec<CountPoint>,
    pub bug_completions: Vec<CountPoint>,
    pub mix_trend: Vec<MixPoint>,
    pub summary: SummaryCounts,
}

/// Metadata about a rendered report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the dataset came from (file path or "built-in sample").
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Reference date used for preset ranges.
    pub today: NaiveDate,
    /// Range selection mode, e.g. "30d" or "custom".
    pub range_mode: String,
}

/// A dashboard plus the metadata needed to render it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub dashboard: Dashboard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_label_tones() {
        assert_eq!(HealthLabel::Completed.tone(), Tone::Positive);
        assert_eq!(HealthLabel::Cancelled.tone(), Tone::Muted);
        assert_eq!(HealthLabel::Ahead.tone(), Tone::Positive);
        assert_eq!(HealthLabel::OnTrack.tone(), Tone::Neutral);
        assert_eq!(HealthLabel::AtRisk.tone(), Tone::Warning);
        assert_eq!(HealthLabel::Behind.tone(), Tone::Danger);
    }

    #[test]
    fn test_health_label_display() {
        assert_eq!(HealthLabel::OnTrack.to_string(), "On track");
        assert_eq!(HealthLabel::AtRisk.to_string(), "At risk");
    }

    #[test]
    fn test_type_counts() {
        let mut counts = TypeCounts::default();
        counts.add(TaskType::Bug);
        counts.add(TaskType::Bug);
        counts.add(TaskType::Task);

        assert_eq!(counts.get(TaskType::Bug), 2);
        assert_eq!(counts.get(TaskType::Improvement), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_project_deserialize_camel_case() {
        let json = r#"{
            "id": "p1",
            "name": "Atlas",
            "status": "active",
            "progress": 40,
            "startDate": "2024-01-01",
            "endDate": "2024-01-31",
            "tasks": [{
                "id": "t1",
                "assignee": "Ada",
                "type": "bug",
                "status": "in-progress",
                "startDate": "2024-01-02",
                "endDate": "2024-01-05"
            }]
        }"#;

        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.tasks.len(), 1);
        assert_eq!(project.tasks[0].task_type, TaskType::Bug);
        assert!(!project.tasks[0].is_done());
        assert!(project.has_member("Ada"));
        assert!(!project.has_member("Grace"));
    }

    #[test]
    fn test_project_without_tasks() {
        let json = r#"{"id":"p2","name":"Beacon","status":"planned","progress":0,
            "startDate":"2024-02-01","endDate":"2024-03-01"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert!(project.tasks.is_empty());
        assert!(project.status.is_in_flight());
    }
}
