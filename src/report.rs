use crate::model::{ServiceCheckResult, ServiceCheckStatus};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which results a report shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ReportMode {
    #[default]
    FailOnly,
    OkOnly,
    Full,
}

impl ReportMode {
    pub fn shows(self, result: &ServiceCheckResult) -> bool {
        match self {
            ReportMode::FailOnly => !result.is_ok(),
            ReportMode::OkOnly => result.is_ok(),
            ReportMode::Full => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackupReport {
    pub generated_at: DateTime<Local>,
    pub services: Vec<ServiceCheckResult>,
}

/// Whether a report is worth delivering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendDecision {
    Send,
    Skipped(String),
    Failed(String),
}

/// Leaves of the result trees: groups are replaced by their children.
pub fn flatten_leaf_results(results: &[ServiceCheckResult]) -> Vec<&ServiceCheckResult> {
    let mut leaves = Vec::new();
    for result in results {
        if result.children.is_empty() {
            leaves.push(result);
        } else {
            leaves.extend(flatten_leaf_results(&result.children));
        }
    }
    leaves
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub ok: usize,
    pub warning: usize,
    pub fail: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn of_leaves(results: &[ServiceCheckResult]) -> Self {
        flatten_leaf_results(results)
            .into_iter()
            .fold(StatusCounts::default(), |mut counts, result| {
                match result.status {
                    ServiceCheckStatus::Ok => counts.ok += 1,
                    ServiceCheckStatus::Warning => counts.warning += 1,
                    ServiceCheckStatus::Fail => counts.fail += 1,
                    ServiceCheckStatus::Error => counts.error += 1,
                }
                counts
            })
    }

    pub fn all_ok(&self) -> bool {
        self.warning == 0 && self.fail == 0 && self.error == 0
    }
}

impl BackupReport {
    pub fn leaf_counts(&self) -> StatusCounts {
        StatusCounts::of_leaves(&self.services)
    }

    /// Decide on leaf results whether a report filtered by `mode` has
    /// anything to say.
    pub fn send_decision(&self, mode: ReportMode) -> SendDecision {
        if self.services.is_empty() {
            return SendDecision::Failed("no services configured for the report".to_string());
        }

        let leaves = flatten_leaf_results(&self.services);
        match mode {
            ReportMode::FailOnly if leaves.iter().all(|r| r.is_ok()) => {
                SendDecision::Skipped("all services OK, mode FailOnly".to_string())
            }
            ReportMode::OkOnly if leaves.iter().all(|r| !r.is_ok()) => {
                SendDecision::Skipped("no service OK, mode OkOnly".to_string())
            }
            _ => SendDecision::Send,
        }
    }

    /// Plain-text body as it would be delivered in `mode`.
    pub fn render(&self, mode: ReportMode) -> String {
        RenderedReport { report: self, mode }.to_string()
    }
}

struct RenderedReport<'a> {
    report: &'a BackupReport,
    mode: ReportMode,
}

impl fmt::Display for RenderedReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = self.report.leaf_counts();

        writeln!(f, "Backup Report")?;
        writeln!(f, "Date: {}", self.report.generated_at.format("%d.%m.%Y %H:%M"))?;
        writeln!(f)?;
        writeln!(
            f,
            "OK: {} | WARNING: {} | FAIL: {} | ERROR: {}",
            counts.ok, counts.warning, counts.fail, counts.error
        )?;
        writeln!(f)?;

        for result in self.report.services.iter().filter(|r| self.mode.shows(r)) {
            writeln!(f, "{}", status_line(result))?;
            if result.children.is_empty() {
                for detail in &result.details {
                    writeln!(f, "    {}", detail)?;
                }
                continue;
            }
            for child in &result.children {
                writeln!(f, "    {}", status_line(child))?;
                for detail in &child.details {
                    writeln!(f, "        {}", detail)?;
                }
            }
        }

        Ok(())
    }
}

fn status_line(result: &ServiceCheckResult) -> String {
    if result.message.trim().is_empty() {
        format!("[{}] {}", result.status, result.service_name)
    } else {
        format!(
            "[{}] {}: {}",
            result.status, result.service_name, result.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Service;
    use chrono::NaiveDate;

    fn result(name: &str, status: ServiceCheckStatus) -> ServiceCheckResult {
        let service = Service {
            name: name.to_string(),
            ..Service::default()
        };
        ServiceCheckResult::new(
            &service,
            status,
            NaiveDate::from_ymd_opt(2026, 1, 21).unwrap(),
            format!("{} message", name),
        )
    }

    fn group(
        name: &str,
        status: ServiceCheckStatus,
        children: Vec<ServiceCheckResult>,
    ) -> ServiceCheckResult {
        let mut g = result(name, status);
        g.children = children;
        g
    }

    fn report(services: Vec<ServiceCheckResult>) -> BackupReport {
        BackupReport {
            generated_at: Local::now(),
            services,
        }
    }

    #[test]
    fn test_flatten_leaf_results() {
        let results = vec![
            result("a", ServiceCheckStatus::Ok),
            group(
                "g",
                ServiceCheckStatus::Fail,
                vec![
                    result("g1", ServiceCheckStatus::Ok),
                    group(
                        "g2",
                        ServiceCheckStatus::Fail,
                        vec![result("g2a", ServiceCheckStatus::Fail)],
                    ),
                ],
            ),
        ];
        let names: Vec<_> = flatten_leaf_results(&results)
            .iter()
            .map(|r| r.service_name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "g1", "g2a"]);
    }

    #[test]
    fn test_send_decision() {
        assert!(matches!(
            report(vec![]).send_decision(ReportMode::Full),
            SendDecision::Failed(_)
        ));

        let all_ok = report(vec![group(
            "g",
            ServiceCheckStatus::Ok,
            vec![result("g1", ServiceCheckStatus::Ok)],
        )]);
        assert!(matches!(all_ok.send_decision(ReportMode::FailOnly), SendDecision::Skipped(_)));
        assert_eq!(all_ok.send_decision(ReportMode::OkOnly), SendDecision::Send);

        let none_ok = report(vec![result("a", ServiceCheckStatus::Error)]);
        assert!(matches!(none_ok.send_decision(ReportMode::OkOnly), SendDecision::Skipped(_)));
        assert_eq!(none_ok.send_decision(ReportMode::FailOnly), SendDecision::Send);
        assert_eq!(none_ok.send_decision(ReportMode::Full), SendDecision::Send);
    }

    #[test]
    fn test_render_filters_by_mode() {
        let mut failing = result("b", ServiceCheckStatus::Fail);
        failing.details.push("found 0 of 1 required files".to_string());
        let r = report(vec![result("a", ServiceCheckStatus::Ok), failing]);

        let text = r.render(ReportMode::FailOnly);
        assert!(text.contains("OK: 1 | WARNING: 0 | FAIL: 1 | ERROR: 0"));
        assert!(text.contains("[FAIL] b: b message"));
        assert!(text.contains("found 0 of 1 required files"));
        assert!(!text.contains("[OK] a"));

        let text = r.render(ReportMode::Full);
        assert!(text.contains("[OK] a: a message"));
    }

    #[test]
    fn test_leaf_counts() {
        let r = report(vec![group(
            "g",
            ServiceCheckStatus::Warning,
            vec![
                result("g1", ServiceCheckStatus::Ok),
                result("g2", ServiceCheckStatus::Fail),
            ],
        )]);
        let counts = r.leaf_counts();
        assert_eq!(counts.ok, 1);
        assert_eq!(counts.fail, 1);
        assert!(!counts.all_ok());
    }
}
