use backup_monitor::{CheckReporter, ServiceCheckResult, ServiceCheckStatus};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// CLI progress reporter: one progress bar tick per checked service.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }
}

impl CheckReporter for CliReporter {
    fn on_check_start(&self, total_services: usize) {
        let pb = ProgressBar::new(total_services as u64);
        pb.set_style(
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.set_message("Checking services...");
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_service_complete(&self, result: &ServiceCheckResult) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.set_message(result.service_name.clone());
                pb.inc(1);
            }
        }
    }

    fn on_check_complete(&self, results: &[ServiceCheckResult], duration_secs: f64) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
        eprintln!(
            "  {} Checked {} services in {:.2}s",
            "✓".green(),
            results.len(),
            duration_secs
        );
    }
}

pub fn colored_status(status: ServiceCheckStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        ServiceCheckStatus::Ok => text.green(),
        ServiceCheckStatus::Warning => text.yellow(),
        ServiceCheckStatus::Fail => text.red(),
        ServiceCheckStatus::Error => text.red().bold(),
    }
}

/// Indented tree of results with their detail lines.
pub fn print_results(results: &[ServiceCheckResult], depth: usize) {
    let indent = "  ".repeat(depth);
    for result in results {
        println!(
            "{}{} {}",
            indent,
            colored_status(result.status),
            result.service_name.bold()
        );
        for line in result.details_text().lines() {
            println!("{}    {}", indent, line.dimmed());
        }
        print_results(&result.children, depth + 1);
    }
}
