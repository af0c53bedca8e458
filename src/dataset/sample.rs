//! Built-in sample dataset.
//!
//! Dates are expressed as day offsets from an anchor so the sample always
//! has activity around "today", whatever today is.

use super::Dataset;
use crate::models::TaskStatus::{Done, InProgress, Review, Todo};
use crate::models::TaskType::{Bug, Improvement, Task as Chore};
use crate::models::{Project, ProjectStatus, Task, TaskStatus, TaskType};
use chrono::{Duration, NaiveDate};

struct ProjectSeed {
    id: &'static str,
    name: &'static str,
    status: ProjectStatus,
    progress: u8,
    start: i64,
    end: i64,
}

/// (project, assignee, type, status, start offset, end offset)
type TaskSeed = (&'static str, &'static str, TaskType, TaskStatus, i64, i64);

const PROJECTS: &[ProjectSeed] = &[
    ProjectSeed {
        id: "checkout",
        name: "Checkout Revamp",
        status: ProjectStatus::Active,
        progress: 55,
        start: -60,
        end: 30,
    },
    ProjectSeed {
        id: "mobile",
        name: "Mobile App 2.0",
        status: ProjectStatus::Active,
        progress: 52,
        start: -45,
        end: 45,
    },
    ProjectSeed {
        id: "search",
        name: "Search Relevance",
        status: ProjectStatus::Active,
        progress: 45,
        start: -20,
        end: 40,
    },
    ProjectSeed {
        id: "billing",
        name: "Billing Migration",
        status: ProjectStatus::Active,
        progress: 82,
        start: -80,
        end: 10,
    },
    ProjectSeed {
        id: "analytics",
        name: "Analytics Pipeline",
        status: ProjectStatus::Planned,
        progress: 0,
        start: 5,
        end: 60,
    },
    ProjectSeed {
        id: "onboarding",
        name: "Onboarding Flow",
        status: ProjectStatus::Completed,
        progress: 100,
        start: -120,
        end: -15,
    },
    ProjectSeed {
        id: "legacy-api",
        name: "Legacy API Sunset",
        status: ProjectStatus::Cancelled,
        progress: 30,
        start: -90,
        end: 20,
    },
    ProjectSeed {
        id: "infra",
        name: "Infra Hardening",
        status: ProjectStatus::Backlog,
        progress: 0,
        start: 30,
        end: 120,
    },
];

const TASKS: &[TaskSeed] = &[
    // checkout
    ("checkout", "Amara Okafor", Chore, Done, -58, -40),
    ("checkout", "Amara Okafor", Bug, Done, -12, -9),
    ("checkout", "Ben Carter", Improvement, Done, -20, -3),
    ("checkout", "Ben Carter", Bug, InProgress, -8, -2),
    ("checkout", "Chen Wei", Chore, Todo, -5, 6),
    ("checkout", "Amara Okafor", Bug, Review, -15, -6),
    // mobile
    ("mobile", "Diego Alvarez", Chore, Done, -40, -26),
    ("mobile", "Diego Alvarez", Improvement, Done, -25, -18),
    ("mobile", "Priya Nair", Bug, Done, -7, -1),
    ("mobile", "Priya Nair", Chore, Done, -4, 0),
    ("mobile", "Chen Wei", Improvement, InProgress, -10, 12),
    ("mobile", "Diego Alvarez", Bug, Todo, -3, 4),
    // search
    ("search", "Chen Wei", Chore, Done, -18, -11),
    ("search", "Chen Wei", Improvement, Done, -14, -5),
    ("search", "Priya Nair", Improvement, Review, -6, 3),
    ("search", "Priya Nair", Bug, Done, -3, -2),
    // billing
    ("billing", "Ben Carter", Chore, Done, -78, -50),
    ("billing", "Ben Carter", Bug, Done, -30, -24),
    ("billing", "Amara Okafor", Chore, InProgress, -22, -8),
    ("billing", "Ben Carter", Bug, Todo, -9, -4),
    ("billing", "Diego Alvarez", Improvement, Todo, -2, 8),
    // analytics
    ("analytics", "Priya Nair", Chore, Todo, 5, 20),
    // onboarding
    ("onboarding", "Amara Okafor", Chore, Done, -118, -70),
    ("onboarding", "Diego Alvarez", Improvement, Done, -60, -28),
    ("onboarding", "Amara Okafor", Bug, Done, -25, -16),
    // legacy-api
    ("legacy-api", "Ben Carter", Chore, Done, -85, -60),
    ("legacy-api", "Chen Wei", Chore, Todo, -30, 15),
];

/// Build the sample dataset with dates relative to `anchor`.
pub fn dataset(anchor: NaiveDate) -> Dataset {
    let at = |offset: i64| anchor + Duration::days(offset);

    let projects = PROJECTS
        .iter()
        .map(|seed| {
            let tasks = TASKS
                .iter()
                .filter(|(project, ..)| *project == seed.id)
                .enumerate()
                .map(|(i, &(_, assignee, task_type, status, start, end))| Task {
                    id: format!("{}-{}", seed.id, i + 1),
                    assignee: assignee.to_string(),
                    task_type,
                    status,
                    start_date: at(start),
                    end_date: at(end),
                })
                .collect();

            Project {
                id: seed.id.to_string(),
                name: seed.name.to_string(),
                status: seed.status,
                progress: seed.progress,
                start_date: at(seed.start),
                end_date: at(seed.end),
                tasks,
            }
        })
        .collect();

    Dataset::new(projects)
}
