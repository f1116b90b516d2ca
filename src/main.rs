use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::Utc;
use serde_json::Value;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use day_prep::briefing::DayBrief;
use day_prep::config::{ConfigStore, DayPlannerConfig, RuntimeConfig, export_file_name};
use day_prep::error::PrepError;
use day_prep::gateway::{AgentGateway, HttpGateway};
use day_prep::history::HistoryLog;
use day_prep::prep::PrepService;
use day_prep::storage::{FileStorage, Storage};

const USAGE: &str = "\
Usage: day-prep <command>

Commands:
  show                  Print the current configuration
  preview               Generate the day brief for the selected date
  export [dir]          Write the configuration to day-planner-config-<date>.json
  import <file>         Replace the configuration with a JSON file
  reset                 Restore the default configuration
  set <field> <value>   Change one configuration field (camelCase name)
  fetch-companies       Fill previousCompanies from the LinkedIn profile
  probe-calendar        Ask the calendar agent for the selected date";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let runtime = RuntimeConfig::from_env();

    // Logs go to stderr and a daily file under the data directory
    let file_appender = tracing_appender::rolling::daily(runtime.log_dir(), "day-prep.log");
    let (file_writer, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    // ── Wiring ───────────────────────────────────────────────────────────
    let file_storage = Arc::new(FileStorage::new(&runtime.data_dir));
    let storage: Arc<dyn Storage> = file_storage.clone();
    let config = ConfigStore::open(storage).await;

    let gateway: Arc<dyn AgentGateway> = Arc::new(
        HttpGateway::new(
            runtime.agent_url.clone(),
            runtime.api_key.clone(),
            runtime.request_timeout,
        )
        .context("failed to build agent gateway")?,
    );
    let history = HistoryLog::new();
    let service = PrepService::new(
        Arc::clone(&config),
        gateway,
        history,
        runtime.agents.clone(),
    );

    match command {
        "show" => {
            let bytes = config.export().await?;
            println!("{}", String::from_utf8_lossy(&bytes));
        }
        "preview" => {
            eprintln!("📅 Day Prep v{}", env!("CARGO_PKG_VERSION"));
            eprintln!("   Agent service: {}", runtime.agent_url);
            eprintln!("   Data: {}", file_storage.base_path().display());
            eprintln!("   Date: {}\n", config.current().await.selected_date);

            let report = service.generate_preview().await;
            print_brief(&report.brief);
            if report.is_failure() {
                std::process::exit(1);
            }
        }
        "export" => {
            let bytes = config.export().await?;
            let file_name = export_file_name(Utc::now().date_naive());
            let path = match args.get(1) {
                Some(dir) => {
                    let path = PathBuf::from(dir).join(&file_name);
                    tokio::fs::create_dir_all(dir).await?;
                    tokio::fs::write(&path, &bytes).await?;
                    path
                }
                None => file_storage.write_blob(&file_name, &bytes).await?,
            };
            println!("Exported configuration to {}", path.display());
        }
        "import" => {
            let Some(file) = args.get(1) else {
                bail!("import needs a file path\n\n{USAGE}");
            };
            config
                .import_file(Path::new(file))
                .await
                .with_context(|| format!("failed to import {file}"))?;
            println!("Configuration imported from {file}");
        }
        "reset" => {
            config.reset().await;
            println!("Configuration reset to defaults");
        }
        "set" => {
            let (Some(field), Some(value)) = (args.get(1), args.get(2)) else {
                bail!("set needs a field and a value\n\n{USAGE}");
            };
            let updated = with_field(&config.current().await, field, value)?;
            config.set(updated).await;
            println!("{field} updated");
        }
        "fetch-companies" => match service.fetch_previous_companies().await {
            Ok(Some(companies)) => println!("Previous companies: {companies}"),
            Ok(None) => println!("Could not extract previous companies from the profile"),
            Err(PrepError::MissingProfileUrl) => {
                bail!("set linkedInUrl first: day-prep set linkedInUrl <url>")
            }
            Err(e) => return Err(e.into()),
        },
        "probe-calendar" => match service.probe_calendar().await {
            Ok(normalized) => {
                println!("Calendar agent OK, {} meeting(s)", normalized.meetings.len());
            }
            Err(PrepError::Gateway(e)) => bail!("Calendar Agent Error: {}", e.message()),
            Err(e) => return Err(e.into()),
        },
        other => {
            eprintln!("Unknown command: {other}\n\n{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Copy of `config` with one field changed; booleans accept `true`/`false`.
fn with_field(
    config: &DayPlannerConfig,
    field: &str,
    value: &str,
) -> anyhow::Result<DayPlannerConfig> {
    let mut document = serde_json::to_value(config)?;
    let Some(slot) = document.get_mut(field) else {
        bail!("unknown configuration field: {field}");
    };
    *slot = match slot {
        Value::Bool(_) => Value::Bool(
            value
                .parse()
                .with_context(|| format!("{field} expects true or false"))?,
        ),
        _ => Value::String(value.to_string()),
    };
    Ok(DayPlannerConfig::from_value(&document))
}

fn print_brief(brief: &DayBrief) {
    if let Some(error) = &brief.error {
        eprintln!("❌ Preview failed: {error}");
        return;
    }

    if brief.meetings.is_empty() {
        println!("No meetings with external participants.");
    }
    for meeting in &brief.meetings {
        println!("■ {} ({}, {} min)", meeting.title, meeting.time, meeting.duration_minutes);
        for (participant, enriched) in brief.participants_for(meeting) {
            let sources = enriched.map(|p| p.source_count()).unwrap_or(0);
            println!("    {} <{}>  [{} source(s)]", participant.name, participant.email, sources);
        }
    }

    println!("\n{}", brief.email_content);
}
