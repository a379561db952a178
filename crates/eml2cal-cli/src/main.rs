//! eml2cal entry point.

use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use eml2cal_caldav::{CaldavClient, CaldavConfig};
use eml2cal_core::RunSummary;

use eml2cal_cli::cli::Cli;
use eml2cal_cli::config::Config;
use eml2cal_cli::error::{RunError, RunResult};
use eml2cal_cli::mailbox::Mailbox;
use eml2cal_cli::process::process_emails;
use eml2cal_cli::report::send_report;
use eml2cal_cli::secret::resolve_password;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&cli, &config) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            eprintln!("Encountered fatal error, check logs for further details: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, String> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let missing = config.missing();
    if !missing.is_empty() {
        return Err(format!(
            "missing required configuration: {}",
            missing.join(", ")
        ));
    }
    Ok(config)
}

fn init_tracing(cli: &Cli, config: &Config) -> Result<(), String> {
    let filter = if cli.debug || config.logging.debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()))
    };

    if let Some(log_dir) = &config.logging.log_dir {
        std::fs::create_dir_all(log_dir)
            .map_err(|e| format!("failed to create log dir {}: {}", log_dir.display(), e))?;
        let log_file = log_dir.join(format!("{}.log", Utc::now().format("%Y-%m-%dT%H-%M-%S")));
        let file = std::fs::File::create(&log_file)
            .map_err(|e| format!("failed to create log file {}: {}", log_file.display(), e))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

async fn run(config: &Config) -> RunResult<()> {
    let mut summary = RunSummary::new(Utc::now());

    let mailbox = Mailbox::open(&config.mailbox)?;
    let messages = mailbox.messages()?;
    info!(count = messages.len(), "read messages from mailbox");

    let events = process_emails(&messages, config, &mut summary).await?;
    info!(count = events.len(), "extracted unique events");

    let caldav = config
        .calendar
        .caldav
        .as_ref()
        .ok_or_else(|| RunError::Config("`calendar.caldav` not configured".to_string()))?;
    let password = resolve_password(&caldav.password_cmd).await?;
    let caldav_config = CaldavConfig::new(&caldav.calendar_url, &caldav.username, &password)?;
    let client = CaldavClient::new(caldav_config)?;
    eml2cal_caldav::upload_events(&client, events, &mut summary).await?;

    summary.finish(Utc::now());

    if summary.has_findings() {
        if let Some(smtp) = &config.report.smtp {
            send_report(smtp, &summary).await?;
        }
    }

    if config.mailbox.delete_processed_emails {
        info!("deleting all emails in mailbox");
        mailbox.clear()?;
    }

    Ok(())
}
