//! Markdown and JSON report generation.
//!
//! This module renders a computed dashboard. It never recomputes metrics;
//! everything shown comes from the `Dashboard` bundle.

use crate::config::ReportConfig;
use crate::filters::ALL;
use crate::models::{
    CountPoint, Dashboard, HealthRow, KpiCard, MixPoint, Report, ReportMetadata, SummaryCounts,
    TaskType, WorkMix,
};
use anyhow::Result;

/// Width of a full-height bar in trend charts.
const BAR_WIDTH: u32 = 20;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &ReportConfig) -> String {
    let dashboard = &report.dashboard;
    let mut output = String::new();

    output.push_str("# Performance Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata, dashboard));
    output.push_str(&generate_kpi_section(&dashboard.kpis));

    if options.include_health_table {
        output.push_str(&generate_health_section(&dashboard.health));
    }

    if options.include_risk {
        output.push_str(&generate_risk_section(&dashboard.risk));
    }

    output.push_str(&generate_work_mix_section(&dashboard.work_mix));
    output.push_str(&generate_bug_section(&dashboard.summary));

    if options.include_trends {
        output.push_str(&generate_trends_section(dashboard));
    }

    output.push_str(&generate_summary_section(&dashboard.summary));
    output.push_str(&generate_footer());

    output
}

/// Generate the filters and metadata section.
fn generate_metadata_section(metadata: &ReportMetadata, dashboard: &Dashboard) -> String {
    let mut section = String::new();

    section.push_str("## Filters\n\n");
    section.push_str(&format!("- **Data Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Project:** {}\n", selector(&dashboard.project)));
    section.push_str(&format!("- **Member:** {}\n", selector(&dashboard.member)));
    section.push_str(&format!(
        "- **Range:** {} to {} ({} days, `{}`)\n",
        dashboard.range_start,
        dashboard.range_end,
        dashboard.summary.total_days,
        metadata.range_mode
    ));
    section.push('\n');

    section
}

fn selector(value: &str) -> &str {
    if value == ALL {
        "All"
    } else {
        value
    }
}

/// Generate the KPI cards as a table.
fn generate_kpi_section(kpis: &[KpiCard]) -> String {
    let mut section = String::new();

    section.push_str("## Key Metrics\n\n");
    section.push_str("| | Metric | Value | Notes |\n");
    section.push_str("|:---:|:---|:---:|:---|\n");

    for kpi in kpis {
        section.push_str(&format!(
            "| {} | {} | **{}** | {} |\n",
            kpi.tone.emoji(),
            kpi.label,
            kpi.value,
            kpi.hint
        ));
    }
    section.push('\n');

    section
}

/// Generate the project health table.
fn generate_health_section(rows: &[HealthRow]) -> String {
    let mut section = String::new();

    section.push_str("## Project Health\n\n");

    if rows.is_empty() {
        section.push_str("_No projects match the current filters._\n\n");
        return section;
    }

    section.push_str("| Project | Status | Progress | Schedule | Variance | Health | Due | Tasks |\n");
    section.push_str("|:---|:---|:---:|:---:|:---:|:---|:---:|:---:|\n");

    for row in rows {
        section.push_str(&format!(
            "| {} | {} | {}% | {}% | {:+} | {} {} | {} | {}/{} |\n",
            row.name,
            row.status,
            row.progress,
            row.schedule_progress,
            row.variance,
            row.tone.emoji(),
            row.label,
            due_text(row.days_to_due),
            row.done_count,
            row.task_count
        ));
    }
    section.push('\n');

    section
}

fn due_text(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "in 1 day".to_string(),
        -1 => "1 day ago".to_string(),
        d if d > 0 => format!("in {} days", d),
        d => format!("{} days ago", -d),
    }
}

/// Generate the delivery-risk list.
fn generate_risk_section(risks: &[HealthRow]) -> String {
    let mut section = String::new();

    section.push_str("## Delivery Risk\n\n");

    if risks.is_empty() {
        section.push_str("No projects are behind or at risk. 🎉\n\n");
        return section;
    }

    for (i, row) in risks.iter().enumerate() {
        section.push_str(&format!(
            "{}. {} **{}** ({}) - {:+} pts vs schedule, due {}\n",
            i + 1,
            row.tone.emoji(),
            row.name,
            row.label,
            row.variance,
            due_text(row.days_to_due)
        ));
    }
    section.push('\n');

    section
}

/// Generate the work mix breakdown.
fn generate_work_mix_section(mix: &WorkMix) -> String {
    let mut section = String::new();

    section.push_str("## Work Mix\n\n");

    if mix.total == 0 {
        section.push_str("_No tasks in range._\n\n");
        return section;
    }

    section.push_str("| Type | Tasks | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for task_type in TaskType::ALL {
        section.push_str(&format!(
            "| {} | {} | {:.1}% |\n",
            task_type,
            mix.counts.get(task_type),
            mix.percent.get(task_type)
        ));
    }
    section.push_str(&format!("| **Total** | **{}** | |\n\n", mix.total));

    section
}

/// Generate the bug clearance line.
fn generate_bug_section(summary: &SummaryCounts) -> String {
    let mut section = String::new();

    section.push_str("## Bug Clearance\n\n");

    if summary.completed_bugs_in_range + summary.open_bugs == 0 {
        section.push_str("_No bugs in range._\n\n");
        return section;
    }

    section.push_str(&format!(
        "**{}%** cleared: {} closed in range, {} still open.\n\n",
        summary.bug_clearance_rate, summary.completed_bugs_in_range, summary.open_bugs
    ));

    section
}

/// Generate the bucketed trend charts.
fn generate_trends_section(dashboard: &Dashboard) -> String {
    let mut section = String::new();

    section.push_str("## Trends\n\n");

    section.push_str("### Throughput\n\n");
    section.push_str(&count_chart(&dashboard.throughput, "completed"));

    section.push_str("### Bugs Closed\n\n");
    section.push_str(&count_chart(&dashboard.bug_completions, "bugs"));

    section.push_str("### Work Mix by Type\n\n");
    section.push_str(&mix_chart(&dashboard.mix_trend));

    section
}

fn count_chart(points: &[CountPoint], unit: &str) -> String {
    if points.iter().all(|p| p.count == 0) {
        return "_No data for this range._\n\n".to_string();
    }

    let width = label_width(points.iter().map(|p| p.bucket.label.as_str()));
    let mut chart = String::from("```\n");
    for point in points {
        chart.push_str(&format!(
            "{:<width$} | {:<bar$} {} {}\n",
            point.bucket.label,
            bar(point.height),
            point.count,
            unit,
            width = width,
            bar = BAR_WIDTH as usize
        ));
    }
    chart.push_str("```\n\n");
    chart
}

fn mix_chart(points: &[MixPoint]) -> String {
    if points.iter().all(|p| p.total == 0) {
        return "_No data for this range._\n\n".to_string();
    }

    let width = label_width(points.iter().map(|p| p.bucket.label.as_str()));
    let mut chart = String::from("```\n");
    for point in points {
        chart.push_str(&format!(
            "{:<width$} | {:<bar$} {} (bug {}, improvement {}, task {})\n",
            point.bucket.label,
            bar(point.height),
            point.total,
            point.counts.bug,
            point.counts.improvement,
            point.counts.task,
            width = width,
            bar = BAR_WIDTH as usize
        ));
    }
    chart.push_str("```\n\n");
    chart
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0)
}

/// A bar of up to `BAR_WIDTH` blocks for a 0-100 height.
fn bar(height: u32) -> String {
    let blocks = (height.min(100) * BAR_WIDTH + 50) / 100;
    if blocks == 0 && height > 0 {
        return "▏".to_string();
    }
    "█".repeat(blocks as usize)
}

/// Generate the summary counts table.
fn generate_summary_section(summary: &SummaryCounts) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Measure | Count |\n");
    section.push_str("|:---|:---:|\n");

    let rows: [(&str, String); 10] = [
        ("Projects in scope", summary.projects_in_scope.to_string()),
        ("Tasks in scope", summary.tasks_in_scope.to_string()),
        ("Tasks active in range", summary.tasks_in_range.to_string()),
        ("Done tasks (all time)", summary.done_tasks.to_string()),
        ("Completed in range", summary.completed_in_range.to_string()),
        ("Overdue tasks", summary.overdue_tasks.to_string()),
        ("Open bugs", summary.open_bugs.to_string()),
        ("On-track rate", format!("{}%", summary.on_track_rate)),
        ("At-risk projects", summary.at_risk_projects.to_string()),
        (
            "Buckets",
            format!("{} over {} days", summary.bucket_count, summary.total_days),
        ),
    ];

    for (label, value) in rows {
        section.push_str(&format!("| {} | {} |\n", label, value));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by perfdash*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
