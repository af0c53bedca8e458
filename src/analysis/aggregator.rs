//! Dashboard aggregation.
//!
//! Scopes the project collection by the filter state, derives the task sets
//! the dashboard is built from, and assembles the view-model.

use super::health::{self, RISK_LIMIT};
use super::percent;
use super::timeline::BucketPlan;
use crate::filters::FilterState;
use crate::models::{
    Dashboard, HealthRow, KpiCard, Project, SummaryCounts, Task, TaskType, Tone, TypeCounts,
    TypePercents, WorkMix,
};
use chrono::NaiveDate;
use tracing::debug;

/// Projects and tasks selected by a filter state.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    /// In-scope projects, each with its in-scope tasks.
    pub projects: Vec<(&'a Project, Vec<&'a Task>)>,
}

impl<'a> Scope<'a> {
    /// Apply the project and member selectors.
    pub fn new(projects: &'a [Project], filters: &FilterState) -> Self {
        let project_id = filters.project_id();
        let member = filters.member_name();

        let projects = projects
            .iter()
            .filter(|p| project_id.map_or(true, |id| p.id == id))
            .filter(|p| member.map_or(true, |m| p.has_member(m)))
            .map(|p| {
                let tasks = p
                    .tasks
                    .iter()
                    .filter(|t| member.map_or(true, |m| t.assignee == m))
                    .collect();
                (p, tasks)
            })
            .collect();

        Self { projects }
    }

    pub fn tasks(&self) -> impl Iterator<Item = &'a Task> + '_ {
        self.projects.iter().flat_map(|(_, tasks)| tasks.iter().copied())
    }
}

/// Task sets derived from the in-scope tasks for one date range.
#[derive(Debug, Clone, Default)]
pub struct TaskSets<'a> {
    pub all: Vec<&'a Task>,
    pub done: Vec<&'a Task>,
    pub in_range: Vec<&'a Task>,
    pub overdue: Vec<&'a Task>,
    pub completed_in_range: Vec<&'a Task>,
    pub completed_bugs_in_range: Vec<&'a Task>,
    pub open_bugs: Vec<&'a Task>,
}

impl<'a> TaskSets<'a> {
    pub fn new<I>(tasks: I, start: NaiveDate, end: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut sets = TaskSets::default();

        for task in tasks {
            sets.all.push(task);

            let overlaps = task.start_date <= end && task.end_date >= start;
            let ends_in_range = task.end_date >= start && task.end_date <= end;

            if task.is_done() {
                sets.done.push(task);
                if ends_in_range {
                    sets.completed_in_range.push(task);
                    if task.is_bug() {
                        sets.completed_bugs_in_range.push(task);
                    }
                }
            } else if task.end_date < end && task.end_date >= start {
                sets.overdue.push(task);
            }

            if overlaps {
                sets.in_range.push(task);
                if task.is_bug() && !task.is_done() {
                    sets.open_bugs.push(task);
                }
            }
        }

        sets
    }
}

/// Compute the full dashboard for a filter state.
pub fn aggregate(projects: &[Project], filters: &FilterState) -> Dashboard {
    let (start, end) = filters.range();
    let scope = Scope::new(projects, filters);
    let sets = TaskSets::new(scope.tasks(), start, end);

    let health: Vec<HealthRow> = scope
        .projects
        .iter()
        .map(|(project, tasks)| health::health_row(project, tasks, end))
        .collect();
    let risk = health::rank_risks(&health, RISK_LIMIT);
    let at_risk_projects = health.iter().filter(|r| r.label.is_risk()).count();
    let on_track_rate = health::on_track_rate(&health);

    let plan = BucketPlan::new(start, end);
    let throughput = plan.count_series(sets.completed_in_range.iter().map(|t| t.end_date));
    let bug_completions =
        plan.count_series(sets.completed_bugs_in_range.iter().map(|t| t.end_date));
    let mix_trend = plan.mix_series(&sets.completed_in_range);

    let summary = SummaryCounts {
        projects_in_scope: scope.projects.len(),
        tasks_in_scope: sets.all.len(),
        tasks_in_range: sets.in_range.len(),
        done_tasks: sets.done.len(),
        overdue_tasks: sets.overdue.len(),
        completed_in_range: sets.completed_in_range.len(),
        completed_bugs_in_range: sets.completed_bugs_in_range.len(),
        open_bugs: sets.open_bugs.len(),
        bug_clearance_rate: bug_clearance_rate(
            sets.completed_bugs_in_range.len(),
            sets.open_bugs.len(),
        ),
        on_track_rate,
        at_risk_projects,
        total_days: plan.total_days(),
        bucket_count: plan.bucket_count(),
    };

    let in_flight = health.iter().filter(|r| r.status.is_in_flight()).count();
    let kpis = build_kpis(&summary, in_flight);

    debug!(
        "Aggregated {} projects, {} tasks in scope over {} days",
        summary.projects_in_scope, summary.tasks_in_scope, summary.total_days
    );

    Dashboard {
        project: filters.project.clone(),
        member: filters.member.clone(),
        range_start: start,
        range_end: end,
        kpis,
        health,
        risk,
        work_mix: work_mix(&sets.in_range),
        throughput,
        bug_completions,
        mix_trend,
        summary,
    }
}

/// Type breakdown of the given tasks.
pub fn work_mix(tasks: &[&Task]) -> WorkMix {
    let mut counts = TypeCounts::default();
    for task in tasks {
        counts.add(task.task_type);
    }

    let total = counts.total();
    let share = |task_type: TaskType| {
        if total == 0 {
            0.0
        } else {
            counts.get(task_type) as f64 / total as f64 * 100.0
        }
    };

    WorkMix {
        counts,
        total,
        percent: TypePercents {
            bug: share(TaskType::Bug),
            improvement: share(TaskType::Improvement),
            task: share(TaskType::Task),
        },
    }
}

/// Share of bugs touched in the range that were closed, 0 when none.
pub fn bug_clearance_rate(completed_bugs: usize, open_bugs: usize) -> u32 {
    percent(completed_bugs, completed_bugs + open_bugs)
}

/// The four headline cards, in display order.
pub fn build_kpis(summary: &SummaryCounts, in_flight: usize) -> Vec<KpiCard> {
    let on_track = summary.on_track_rate;
    let on_track_tone = if on_track >= 70 {
        Tone::Positive
    } else if on_track >= 50 {
        Tone::Warning
    } else {
        Tone::Danger
    };

    let overdue = summary.overdue_tasks;
    let overdue_tone = if overdue > 6 {
        Tone::Danger
    } else if overdue > 2 {
        Tone::Warning
    } else {
        Tone::Neutral
    };

    let completed = summary.completed_in_range;
    let completed_tone = if completed > 10 {
        Tone::Positive
    } else {
        Tone::Neutral
    };

    let at_risk = summary.at_risk_projects;
    let at_risk_tone = if at_risk > 3 {
        Tone::Danger
    } else if at_risk > 1 {
        Tone::Warning
    } else {
        Tone::Neutral
    };

    vec![
        KpiCard {
            key: "on_track".to_string(),
            label: "On-track projects".to_string(),
            value: format!("{}%", on_track),
            hint: format!("Across {} active or planned projects", in_flight),
            tone: on_track_tone,
        },
        KpiCard {
            key: "overdue".to_string(),
            label: "Overdue tasks".to_string(),
            value: overdue.to_string(),
            hint: "Open tasks that came due in the range".to_string(),
            tone: overdue_tone,
        },
        KpiCard {
            key: "completed".to_string(),
            label: "Completed in range".to_string(),
            value: completed.to_string(),
            hint: format!("{} of them bugs", summary.completed_bugs_in_range),
            tone: completed_tone,
        },
        KpiCard {
            key: "at_risk".to_string(),
            label: "At-risk projects".to_string(),
            value: at_risk.to_string(),
            hint: "Behind or at risk against schedule".to_string(),
            tone: at_risk_tone,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::ALL;
    use crate::models::{HealthLabel, ProjectStatus, TaskStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(
        id: &str,
        assignee: &str,
        task_type: TaskType,
        status: TaskStatus,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Task {
        Task {
            id: id.to_string(),
            assignee: assignee.to_string(),
            task_type,
            status,
            start_date: start,
            end_date: end,
        }
    }

    fn project(id: &str, status: ProjectStatus, progress: u8, tasks: Vec<Task>) -> Project {
        Project {
            id: id.to_string(),
            name: id.to_string(),
            status,
            progress,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 31),
            tasks,
        }
    }

    /// Range used by most tests: 2024-01-10 ..= 2024-01-16 (7 days).
    fn range() -> (NaiveDate, NaiveDate) {
        (date(2024, 1, 10), date(2024, 1, 16))
    }

    fn fixture() -> Vec<Project> {
        use crate::models::TaskStatus::{Done, InProgress, Todo};
        use crate::models::TaskType::{Bug, Improvement, Task as Chore};

        vec![
            project(
                "atlas",
                ProjectStatus::Active,
                40,
                vec![
                    // completed exactly on range start
                    task("a1", "Ada", Bug, Done, date(2024, 1, 5), date(2024, 1, 10)),
                    // completed exactly on range end
                    task("a2", "Ada", Chore, Done, date(2024, 1, 12), date(2024, 1, 16)),
                    // completed before the range
                    task("a3", "Grace", Chore, Done, date(2024, 1, 1), date(2024, 1, 9)),
                    // overdue: open, due inside the range but before its end
                    task("a4", "Grace", Bug, InProgress, date(2024, 1, 8), date(2024, 1, 12)),
                    // open and due on the last day: in range, not overdue
                    task("a5", "Ada", Improvement, Todo, date(2024, 1, 14), date(2024, 1, 16)),
                ],
            ),
            project(
                "beacon",
                ProjectStatus::Planned,
                30,
                vec![
                    task("b1", "Linus", Improvement, Done, date(2024, 1, 11), date(2024, 1, 13)),
                    // starts after the range
                    task("b2", "Linus", Bug, Todo, date(2024, 1, 20), date(2024, 1, 25)),
                ],
            ),
            project("comet", ProjectStatus::Completed, 100, Vec::new()),
        ]
    }

    fn filters(project: &str, member: &str) -> FilterState {
        let (start, end) = range();
        FilterState::new(project, member, start, end)
    }

    #[test]
    fn test_scope_by_project() {
        let data = fixture();
        let scope = Scope::new(&data, &filters("beacon", ALL));

        assert_eq!(scope.projects.len(), 1);
        assert_eq!(scope.tasks().count(), 2);
    }

    #[test]
    fn test_scope_by_member_drops_projects_without_member() {
        let data = fixture();
        let scope = Scope::new(&data, &filters(ALL, "Ada"));

        assert_eq!(scope.projects.len(), 1);
        assert_eq!(scope.projects[0].0.id, "atlas");
        assert!(scope.tasks().all(|t| t.assignee == "Ada"));
        assert_eq!(scope.tasks().count(), 3);
    }

    #[test]
    fn test_task_sets() {
        let data = fixture();
        let (start, end) = range();
        let scope = Scope::new(&data, &filters(ALL, ALL));
        let sets = TaskSets::new(scope.tasks(), start, end);

        let ids = |tasks: &[&Task]| tasks.iter().map(|t| t.id.clone()).collect::<Vec<_>>();

        assert_eq!(sets.all.len(), 7);
        assert_eq!(ids(&sets.done), vec!["a1", "a2", "a3", "b1"]);
        assert_eq!(ids(&sets.in_range), vec!["a1", "a2", "a4", "a5", "b1"]);
        assert_eq!(ids(&sets.overdue), vec!["a4"]);
        assert_eq!(ids(&sets.completed_in_range), vec!["a1", "a2", "b1"]);
        assert_eq!(ids(&sets.completed_bugs_in_range), vec!["a1"]);
        assert_eq!(ids(&sets.open_bugs), vec!["a4"]);
    }

    #[test]
    fn test_aggregate_all() {
        let data = fixture();
        let dashboard = aggregate(&data, &filters(ALL, ALL));

        assert_eq!(dashboard.health.len(), 3);
        assert_eq!(dashboard.summary.completed_in_range, 3);
        assert_eq!(dashboard.summary.overdue_tasks, 1);
        assert_eq!(dashboard.summary.bug_clearance_rate, 50);
        assert_eq!(dashboard.summary.total_days, 7);
        assert_eq!(dashboard.summary.bucket_count, 6);

        // throughput covers every completion, including both boundary days
        let total: usize = dashboard.throughput.iter().map(|p| p.count).sum();
        assert_eq!(total, dashboard.summary.completed_in_range);
        assert_eq!(dashboard.throughput[0].count, 1);
        assert_eq!(dashboard.throughput[5].count, 1);

        let bugs: usize = dashboard.bug_completions.iter().map(|p| p.count).sum();
        assert_eq!(bugs, 1);

        let mix_total: usize = dashboard.mix_trend.iter().map(|p| p.total).sum();
        assert_eq!(mix_total, 3);
    }

    #[test]
    fn test_aggregate_health_and_risk() {
        let data = fixture();
        let dashboard = aggregate(&data, &filters(ALL, ALL));

        // range end 2024-01-16: elapsed 15 of 30 days -> schedule 50
        let atlas = &dashboard.health[0];
        assert_eq!(atlas.schedule_progress, 50);
        assert_eq!(atlas.variance, -10);
        assert_eq!(atlas.label, HealthLabel::AtRisk);

        let beacon = &dashboard.health[1];
        assert_eq!(beacon.variance, -20);
        assert_eq!(beacon.label, HealthLabel::Behind);

        let comet = &dashboard.health[2];
        assert_eq!(comet.label, HealthLabel::Completed);
        assert_eq!(comet.task_count, 0);

        let risk_ids: Vec<_> = dashboard.risk.iter().map(|r| r.project_id.as_str()).collect();
        assert_eq!(risk_ids, vec!["beacon", "atlas"]);
        assert_eq!(dashboard.summary.at_risk_projects, 2);
        assert_eq!(dashboard.summary.on_track_rate, 0);
    }

    #[test]
    fn test_aggregate_kpis() {
        let data = fixture();
        let dashboard = aggregate(&data, &filters(ALL, ALL));
        let kpis = &dashboard.kpis;

        assert_eq!(kpis.len(), 4);
        assert_eq!(kpis[0].value, "0%");
        assert_eq!(kpis[0].tone, Tone::Danger);
        assert_eq!(kpis[1].value, "1");
        assert_eq!(kpis[1].tone, Tone::Neutral);
        assert_eq!(kpis[2].value, "3");
        assert_eq!(kpis[2].tone, Tone::Neutral);
        assert_eq!(kpis[3].value, "2");
        assert_eq!(kpis[3].tone, Tone::Warning);
    }

    #[test]
    fn test_aggregate_empty() {
        let (start, end) = range();
        let dashboard = aggregate(&[], &FilterState::unfiltered(start, end));

        assert!(dashboard.health.is_empty());
        assert!(dashboard.risk.is_empty());
        assert_eq!(dashboard.work_mix.total, 0);
        assert_eq!(dashboard.work_mix.percent, TypePercents::default());
        assert_eq!(dashboard.summary.bug_clearance_rate, 0);
        assert_eq!(dashboard.throughput.len(), 6);
        assert!(dashboard.throughput.iter().all(|p| p.height == 0));
    }

    #[test]
    fn test_aggregate_unknown_member() {
        let data = fixture();
        let dashboard = aggregate(&data, &filters(ALL, "Nobody"));
        assert_eq!(dashboard.summary.projects_in_scope, 0);
        assert_eq!(dashboard.summary.tasks_in_scope, 0);
    }

    #[test]
    fn test_work_mix_percentages_sum_to_hundred() {
        let data = fixture();
        let dashboard = aggregate(&data, &filters(ALL, ALL));
        let mix = &dashboard.work_mix;

        assert_eq!(mix.total, 5);
        assert_eq!(mix.counts.bug, 2);
        assert_eq!(mix.counts.improvement, 2);
        assert_eq!(mix.counts.task, 1);
        let sum = mix.percent.bug + mix.percent.improvement + mix.percent.task;
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_bug_clearance_rate() {
        assert_eq!(bug_clearance_rate(0, 0), 0);
        assert_eq!(bug_clearance_rate(3, 1), 75);
        assert_eq!(bug_clearance_rate(0, 4), 0);
    }

    #[test]
    fn test_kpi_thresholds() {
        let summary = SummaryCounts {
            on_track_rate: 70,
            overdue_tasks: 7,
            completed_in_range: 11,
            at_risk_projects: 4,
            ..SummaryCounts::default()
        };
        let kpis = build_kpis(&summary, 3);
        let tones: Vec<_> = kpis.iter().map(|k| k.tone).collect();
        assert_eq!(
            tones,
            vec![Tone::Positive, Tone::Danger, Tone::Positive, Tone::Danger]
        );

        let summary = SummaryCounts {
            on_track_rate: 50,
            overdue_tasks: 3,
            completed_in_range: 10,
            at_risk_projects: 2,
            ..SummaryCounts::default()
        };
        let kpis = build_kpis(&summary, 3);
        let tones: Vec<_> = kpis.iter().map(|k| k.tone).collect();
        assert_eq!(
            tones,
            vec![Tone::Warning, Tone::Warning, Tone::Neutral, Tone::Warning]
        );
    }
}
