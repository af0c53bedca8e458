//! Perfdash - project and task performance dashboard.
//!
//! Loads a project dataset, applies the project / member / date-range
//! filters, and renders the dashboard metrics as Markdown or JSON.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (bad arguments, unreadable dataset or config, write failure)

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use perfdash::cli::{Args, OutputFormat};
use perfdash::config::{Config, CONFIG_FILE};
use perfdash::dataset::{sample, Dataset};
use perfdash::filters::{FilterController, RangeMode, ALL};
use perfdash::models::{Report, ReportMetadata};
use perfdash::{aggregate, report};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is loaded before logging so `[general] verbose` can raise the level
    let (config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(args.log_level(config.general.verbose));

    info!("perfdash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Config: {}", config_source);

    if let Err(e) = run(args, config) {
        error!("Failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .perfdash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to set the dataset path, default filters and report sections.");
    Ok(())
}

/// Initialize logging at the given level.
///
/// Logs go to stderr so a report written to stdout stays clean.
fn init_logging(level: Level) {

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the data, resolve filters, aggregate and render.
fn run(args: Args, config: Config) -> Result<()> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let (dataset, source) = load_dataset(&config, today)?;

    let mut controller = FilterController::new(&dataset, today);
    controller.set_project(config.filters.project.clone());
    controller.set_member(config.filters.member.clone());
    if controller.member() != config.filters.member {
        warn!(
            "Member {:?} has no tasks in project {:?}, showing all members",
            config.filters.member, config.filters.project
        );
    }
    if config.filters.project != ALL && dataset.project(&config.filters.project).is_none() {
        warn!("Unknown project {:?}, the report will be empty", config.filters.project);
    }

    match config.filters.range {
        RangeMode::Custom => controller.set_custom_range(args.start, args.end),
        preset => controller.set_mode(preset),
    }

    if args.list_projects || args.list_members {
        print_options(&controller, args.list_projects, args.list_members);
        return Ok(());
    }

    let state = controller.state();
    info!(
        "Aggregating {} / {} from {} to {}",
        state.project, state.member, state.range_start, state.range_end
    );
    let dashboard = aggregate(dataset.projects(), &state);

    let report = Report {
        metadata: ReportMetadata {
            source,
            generated_at: Utc::now(),
            today,
            range_mode: controller.mode().as_str().to_string(),
        },
        dashboard,
    };

    let output = match config.general.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    match config.general.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            print_summary(&report);
            println!("\n✅ Report saved to: {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Load configuration from file or use defaults, merged with the arguments.
///
/// Runs before logging is set up, so problems are reported on stderr and the
/// returned string describes where the settings came from.
fn load_config(args: &Args) -> Result<(Config, String)> {
    let (mut config, source) = if let Some(ref config_path) = args.config {
        (Config::load(config_path)?, config_path.display().to_string())
    } else {
        match Config::load_default() {
            Ok(Some(config)) => (config, CONFIG_FILE.to_string()),
            Ok(None) => (Config::default(), "defaults".to_string()),
            Err(e) => {
                eprintln!("⚠️  Failed to load config, using defaults: {:#}", e);
                (Config::default(), "defaults".to_string())
            }
        }
    };

    config.merge_with_args(args);
    Ok((config, source))
}

/// Load the configured dataset, or the sample anchored on `today`.
fn load_dataset(config: &Config, today: NaiveDate) -> Result<(Dataset, String)> {
    match config.data.path {
        Some(ref path) => {
            let dataset = Dataset::load(path)
                .with_context(|| format!("Failed to load dataset from {}", path.display()))?;
            Ok((dataset, path.display().to_string()))
        }
        None => {
            info!("No dataset given, using the built-in sample");
            Ok((sample::dataset(today), "built-in sample".to_string()))
        }
    }
}

/// Print the project and/or member options for the current selection.
fn print_options(controller: &FilterController<'_>, projects: bool, members: bool) {
    if projects {
        println!("Projects:");
        for (id, name) in controller.project_options() {
            println!("  {:<16} {}", id, name);
        }
    }

    if members {
        if projects {
            println!();
        }
        println!("Members ({}):", controller.project());
        let options = controller.member_options();
        if options.is_empty() {
            println!("  (none)");
        }
        for member in options {
            println!("  {}", member);
        }
    }
}

/// Print a short console summary after writing a report file.
fn print_summary(report: &Report) {
    let dashboard = &report.dashboard;

    println!("📊 Performance Summary:");
    println!(
        "   Range: {} to {} ({} days)",
        dashboard.range_start, dashboard.range_end, dashboard.summary.total_days
    );
    for kpi in &dashboard.kpis {
        println!("   {} {}: {}", kpi.tone.emoji(), kpi.label, kpi.value);
    }
    println!(
        "   Bug clearance: {}% | Projects in scope: {}",
        dashboard.summary.bug_clearance_rate, dashboard.summary.projects_in_scope
    );
}
