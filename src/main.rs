mod cli;
mod logging;
mod terminal;

use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use backup_monitor::config::{self, AppConfig};
use backup_monitor::schedule::ReportSchedule;
use backup_monitor::{BackupChecker, Error, ReportMode, SendDecision, SilentReporter};
use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use colored::*;
use dotenv::dotenv;
use terminal::{colored_status, CliReporter};
use tracing::{error, info, warn};

// Every exit path returns through here so the logger guard drops and the
// file log is flushed.
fn main() -> ExitCode {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Cli) -> anyhow::Result<ExitCode> {
    let config =
        config::load_configuration(&args.config).context("Error loading configuration")?;

    match args.command {
        Some(Commands::Check { date, mode }) => {
            let base_date = parse_date_arg(date.as_deref())?;
            let mode = mode.map(ReportMode::from).unwrap_or(config.report.mode);
            if !run_check(&config, base_date, mode)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Period { service, from, to }) => {
            let start = parse_date_arg(Some(from.as_str()))?;
            let end = parse_date_arg(Some(to.as_str()))?;
            run_period(&config, &service, start, end)?;
        }
        Some(Commands::Watch { interval_secs }) => {
            run_watch(&args.config, interval_secs);
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
        }
        None => {
            Cli::command().print_long_help()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_date_arg(arg: Option<&str>) -> Result<NaiveDate, Error> {
    match arg {
        None => Ok(Local::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| Error::InvalidDate(s.to_string())),
    }
}

fn run_check(config: &AppConfig, base_date: NaiveDate, mode: ReportMode) -> anyhow::Result<bool> {
    if config.services.is_empty() {
        bail!("no services configured");
    }

    info!("Checking {} services for {}", config.services.len(), base_date);
    let checker = BackupChecker::new();
    let reporter = CliReporter::new();
    let report = checker.build_report(&config.services, base_date, &reporter);

    terminal::print_results(&report.services, 0);
    println!();
    print!("{}", report.render(mode));

    match report.send_decision(mode) {
        SendDecision::Send => info!("Report would be delivered ({:?})", mode),
        SendDecision::Skipped(reason) => info!("Report delivery skipped: {}", reason),
        SendDecision::Failed(reason) => warn!("Report not built: {}", reason),
    }

    Ok(report.leaf_counts().all_ok())
}

fn run_period(
    config: &AppConfig,
    name: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<()> {
    let service = config
        .find_service(name)
        .ok_or_else(|| Error::ServiceNotFound(name.to_string()))
        .context("period check")?;

    let result = BackupChecker::new().check_period(service, start, end);

    println!(
        "{} {}: {}",
        colored_status(result.status()),
        service.name.bold(),
        result.summary(start, end)
    );
    for date in &result.missing_dates {
        println!("    {}", date.format("%Y-%m-%d").to_string().red());
    }

    Ok(())
}

fn run_watch(config_name: &str, interval_secs: u64) {
    let mut schedule = ReportSchedule::new();
    let checker = BackupChecker::new();
    info!("Watching send times, polling every {}s", interval_secs);

    loop {
        match config::load_configuration(config_name) {
            Ok(config) => {
                let now = Local::now();
                for send_time in schedule.due(&config.report.send_times, now.naive_local()) {
                    info!("Send time {} reached", send_time);
                    let report =
                        checker.build_report(&config.services, now.date_naive(), &SilentReporter);
                    match report.send_decision(config.report.mode) {
                        SendDecision::Send => info!("\n{}", report.render(config.report.mode)),
                        SendDecision::Skipped(reason) => info!("Report skipped: {}", reason),
                        SendDecision::Failed(reason) => warn!("Report not built: {}", reason),
                    }
                }
            }
            Err(err) => error!("Error reloading configuration: {}", err),
        }

        thread::sleep(Duration::from_secs(interval_secs.max(1)));
    }
}
