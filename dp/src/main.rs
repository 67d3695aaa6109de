//! Day Planner - daily agenda with AI priority suggestions
//!
//! CLI entry point for the interactive planner and its one-shot commands.

use std::fs;
use std::path::Path;

use chrono::Local;
use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use dayplanner::advisor::{AdvisorSettings, PriorityAdvisor, Suggestion};
use dayplanner::cli::{Cli, Command, OutputFormat, get_log_path};
use dayplanner::config::Config;
use dayplanner::domain::Task;
use dayplanner::effort;
use dayplanner::llm::Provider;
use dayplanner::planner::{Planner, Seed};
use dayplanner::repl::{self, render};

fn setup_logging(level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // CLI flag wins over config; INFO otherwise
    let level: tracing::Level = match level {
        Some(l) => l.parse().map_err(|_| eyre::eyre!("Invalid log level: {}", l))?,
        None => tracing::Level::INFO,
    };
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.clone().or_else(|| Config::load_log_level(cli.config.as_ref()));
    setup_logging(level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.advisor.provider(), "Day Planner loaded config");

    match cli.command {
        Some(Command::Plan { file, demo }) => cmd_plan(&config, file.as_deref(), demo).await,
        Some(Command::Check { file, format }) => cmd_check(&file, format),
        Some(Command::Suggest { file, provider }) => cmd_suggest(&config, &file, provider.as_deref()).await,
        Some(Command::Effort { text }) => cmd_effort(&text.join(" ")),
        None => cmd_plan(&config, None, false).await,
    }
}

fn load_planner(file: &Path) -> Result<Planner> {
    let seed = Seed::load(file).context(format!("Failed to load seed file {}", file.display()))?;
    Ok(Planner::from_seed(seed))
}

/// Start an interactive session
async fn cmd_plan(config: &Config, file: Option<&Path>, demo: bool) -> Result<()> {
    let planner = match file {
        Some(path) => load_planner(path)?,
        None if demo => Planner::from_seed(Seed::demo(Local::now().date_naive())),
        None => Planner::new(),
    };
    repl::run_interactive(config, planner).await
}

fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!({
        "name": task.name,
        "start": task.deadline(),
        "end": task.end_time().map(|t| t.format(dayplanner::domain::DEADLINE_FORMAT).to_string()),
        "effort": task.estimated_effort,
        "minutes": task.duration_minutes(),
        "completed": task.is_completed,
        "reminder": task.reminder_minutes,
        "overlap": task.has_overlap,
    })
}

/// Print a seed's agenda with overlap flags, and its backlog
fn cmd_check(file: &Path, format: OutputFormat) -> Result<()> {
    let planner = load_planner(file)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "agenda": planner.agenda().iter().map(task_json).collect::<Vec<_>>(),
                "backlog": planner
                    .backlog()
                    .iter()
                    .map(|t| serde_json::json!({
                        "name": t.name,
                        "effort": t.estimated_effort,
                        "minutes": t.duration_minutes(),
                    }))
                    .collect::<Vec<_>>(),
                "overlaps": planner.overlap_count(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            let today = Local::now().date_naive();
            println!("{}", "Agenda".bright_cyan());
            for line in render::agenda_block(planner.agenda(), today) {
                println!("{}", line);
            }
            println!();
            println!("{}", "Backlog".bright_cyan());
            for line in render::backlog_block(planner.backlog()) {
                println!("{}", line);
            }
            println!();
            match planner.overlap_count() {
                0 => println!("No overlaps"),
                n => println!("{} overlapping task(s)", n),
            }
        }
    }
    Ok(())
}

/// One-shot advisor call over a seed's pending agenda
async fn cmd_suggest(config: &Config, file: &Path, provider: Option<&str>) -> Result<()> {
    let planner = load_planner(file)?;

    let mut settings = AdvisorSettings::from_config(&config.advisor);
    if let Some(name) = provider {
        let provider: Provider = name.parse().map_err(|e: String| eyre::eyre!(e))?;
        settings.set_provider(provider);
    }
    settings.ensure_ready().map_err(|e| eyre::eyre!("{}", e))?;

    let advisor = PriorityAdvisor::new();
    let suggestion = advisor
        .suggest(planner.agenda(), &settings)
        .await
        .map_err(|e| match e.retry_after() {
            Some(wait) => eyre::eyre!("Suggestion failed: {} (try again in {}s)", e, wait.as_secs()),
            None => eyre::eyre!("Suggestion failed: {}", e),
        })?;

    match suggestion {
        Suggestion::NothingToPrioritize => println!("Nothing to prioritize: no pending tasks on the agenda."),
        Suggestion::Recommendations(recs) => {
            println!("{}", "Priority Suggestions:".bright_cyan());
            for rec in &recs {
                println!("{}", render::recommendation_line(rec));
            }
        }
    }
    Ok(())
}

/// Print the minutes an effort text parses to
fn cmd_effort(text: &str) -> Result<()> {
    let minutes = effort::parse_duration_minutes(text);
    println!("{} minutes", minutes);
    if !effort::is_well_formed(text) {
        eprintln!("note: '{}' has no leading number and counts as 0", text);
    }
    Ok(())
}
