//! Project health scoring and delivery-risk ranking.

use super::{percent, round};
use crate::models::{HealthLabel, HealthRow, Project, ProjectStatus, Task};
use chrono::NaiveDate;

/// Maximum number of projects on the delivery-risk list.
pub const RISK_LIMIT: usize = 4;

/// Variance at or above which a project is ahead of schedule.
const AHEAD_AT: i64 = 8;
/// Variance at or below which a project is behind.
const BEHIND_AT: i64 = -12;
/// Variance at or below which a project is at risk.
const AT_RISK_AT: i64 = -4;

/// Share of the project's schedule elapsed at `as_of`, clamped to 0-100.
///
/// Zero-length or inverted schedules report 0.
pub fn schedule_progress(project: &Project, as_of: NaiveDate) -> f64 {
    let duration = (project.end_date - project.start_date).num_days();
    if duration <= 0 {
        return 0.0;
    }

    let elapsed = (as_of - project.start_date).num_days();
    (elapsed as f64 / duration as f64 * 100.0).clamp(0.0, 100.0)
}

/// Classify a project from its status and schedule variance.
pub fn classify(status: ProjectStatus, variance: i64) -> HealthLabel {
    match status {
        ProjectStatus::Completed => HealthLabel::Completed,
        ProjectStatus::Cancelled => HealthLabel::Cancelled,
        _ if variance >= AHEAD_AT => HealthLabel::Ahead,
        _ if variance <= BEHIND_AT => HealthLabel::Behind,
        _ if variance <= AT_RISK_AT => HealthLabel::AtRisk,
        _ => HealthLabel::OnTrack,
    }
}

/// Build the health row for a project, given its in-scope tasks.
pub fn health_row(project: &Project, tasks: &[&Task], as_of: NaiveDate) -> HealthRow {
    let schedule = schedule_progress(project, as_of);
    let variance = round(project.progress as f64 - schedule);
    let label = classify(project.status, variance);

    HealthRow {
        project_id: project.id.clone(),
        name: project.name.clone(),
        status: project.status,
        progress: project.progress,
        schedule_progress: round(schedule),
        variance,
        label,
        tone: label.tone(),
        days_to_due: (project.end_date - as_of).num_days(),
        task_count: tasks.len(),
        done_count: tasks.iter().filter(|t| t.is_done()).count(),
    }
}

/// Behind / at-risk rows, most negative variance first, capped at `limit`.
pub fn rank_risks(rows: &[HealthRow], limit: usize) -> Vec<HealthRow> {
    let mut risks: Vec<HealthRow> = rows.iter().filter(|r| r.label.is_risk()).cloned().collect();
    risks.sort_by_key(|r| r.variance);
    risks.truncate(limit);
    risks
}

/// Percentage of active or planned projects that are on track or ahead.
pub fn on_track_rate(rows: &[HealthRow]) -> u32 {
    let in_flight: Vec<&HealthRow> = rows.iter().filter(|r| r.status.is_in_flight()).collect();
    let healthy = in_flight.iter().filter(|r| r.label.is_healthy()).count();
    percent(healthy, in_flight.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskStatus, TaskType, Tone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project(status: ProjectStatus, progress: u8) -> Project {
        Project {
            id: "atlas".to_string(),
            name: "Atlas".to_string(),
            status,
            progress,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 31),
            tasks: Vec::new(),
        }
    }

    fn row(id: &str, status: ProjectStatus, variance: i64) -> HealthRow {
        let label = classify(status, variance);
        HealthRow {
            project_id: id.to_string(),
            name: id.to_string(),
            status,
            progress: 50,
            schedule_progress: 50,
            variance,
            label,
            tone: label.tone(),
            days_to_due: 10,
            task_count: 0,
            done_count: 0,
        }
    }

    #[test]
    fn test_behind_example() {
        let p = project(ProjectStatus::Active, 40);
        let health = health_row(&p, &[], date(2024, 1, 23));

        assert_eq!(health.schedule_progress, 73);
        assert_eq!(health.variance, -33);
        assert_eq!(health.label, HealthLabel::Behind);
        assert_eq!(health.tone, Tone::Danger);
        assert_eq!(health.days_to_due, 8);
        assert_eq!(health.task_count, 0);
    }

    #[test]
    fn test_schedule_progress_clamps() {
        let p = project(ProjectStatus::Active, 0);
        assert_eq!(schedule_progress(&p, date(2023, 12, 1)), 0.0);
        assert_eq!(schedule_progress(&p, date(2024, 3, 1)), 100.0);
    }

    #[test]
    fn test_schedule_progress_degenerate_durations() {
        let mut p = project(ProjectStatus::Active, 0);
        p.end_date = p.start_date;
        assert_eq!(schedule_progress(&p, date(2024, 1, 10)), 0.0);

        p.end_date = date(2023, 12, 1);
        assert_eq!(schedule_progress(&p, date(2024, 1, 10)), 0.0);
    }

    #[test]
    fn test_classify_order() {
        assert_eq!(classify(ProjectStatus::Completed, -50), HealthLabel::Completed);
        assert_eq!(classify(ProjectStatus::Cancelled, 50), HealthLabel::Cancelled);
        assert_eq!(classify(ProjectStatus::Active, 8), HealthLabel::Ahead);
        assert_eq!(classify(ProjectStatus::Active, 7), HealthLabel::OnTrack);
        assert_eq!(classify(ProjectStatus::Active, -3), HealthLabel::OnTrack);
        assert_eq!(classify(ProjectStatus::Active, -4), HealthLabel::AtRisk);
        assert_eq!(classify(ProjectStatus::Planned, -11), HealthLabel::AtRisk);
        assert_eq!(classify(ProjectStatus::Active, -12), HealthLabel::Behind);
        assert_eq!(classify(ProjectStatus::Backlog, -15), HealthLabel::Behind);
    }

    #[test]
    fn test_done_count() {
        let p = project(ProjectStatus::Active, 50);
        let done = Task {
            id: "t1".to_string(),
            assignee: "Ada".to_string(),
            task_type: TaskType::Bug,
            status: TaskStatus::Done,
            start_date: date(2024, 1, 2),
            end_date: date(2024, 1, 3),
        };
        let open = Task {
            id: "t2".to_string(),
            status: TaskStatus::Review,
            ..done.clone()
        };

        let health = health_row(&p, &[&done, &open], date(2024, 1, 16));
        assert_eq!(health.task_count, 2);
        assert_eq!(health.done_count, 1);
    }

    #[test]
    fn test_rank_risks_sorted_and_capped() {
        let rows = vec![
            row("a", ProjectStatus::Active, -5),
            row("b", ProjectStatus::Active, -30),
            row("c", ProjectStatus::Active, 2),
            row("d", ProjectStatus::Active, -12),
            row("e", ProjectStatus::Planned, -20),
            row("f", ProjectStatus::Active, -8),
            row("g", ProjectStatus::Completed, -40),
        ];

        let risks = rank_risks(&rows, RISK_LIMIT);
        let ids: Vec<_> = risks.iter().map(|r| r.project_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "e", "d", "f"]);
    }

    #[test]
    fn test_on_track_rate() {
        let rows = vec![
            row("a", ProjectStatus::Active, 0),
            row("b", ProjectStatus::Active, 10),
            row("c", ProjectStatus::Planned, -20),
            row("d", ProjectStatus::Completed, 0),
            row("e", ProjectStatus::Backlog, 0),
        ];
        assert_eq!(on_track_rate(&rows), 67);
        assert_eq!(on_track_rate(&[]), 0);
    }
}
