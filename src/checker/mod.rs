//! Backup freshness evaluation: single services, groups and date ranges.

pub mod group;
pub mod period;
pub mod single;

use crate::model::{Service, ServiceCheckResult, ServiceType};
use crate::progress::CheckReporter;
use crate::report::BackupReport;
use chrono::{Local, NaiveDate};
use rayon::prelude::*;
use std::time::Instant;
use tracing::debug;

pub use group::check_group;
pub use period::{check_period, PeriodCheckResult};
pub use single::check_single;

/// Dispatch on the service type.
pub fn check_service(service: &Service, base_date: NaiveDate) -> ServiceCheckResult {
    match service.service_type {
        ServiceType::Single => check_single(service, base_date),
        ServiceType::Group => check_group(service, base_date),
    }
}

/// Stateless entry point. Configuration is passed in on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct BackupChecker;

impl BackupChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check_service(&self, service: &Service, base_date: NaiveDate) -> ServiceCheckResult {
        check_service(service, base_date)
    }

    pub fn check_period(
        &self,
        service: &Service,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PeriodCheckResult {
        check_period(service, start, end)
    }

    /// Check every service concurrently; results keep the input order.
    pub fn check_all(
        &self,
        services: &[Service],
        base_date: NaiveDate,
        reporter: &dyn CheckReporter,
    ) -> Vec<ServiceCheckResult> {
        reporter.on_check_start(services.len());
        let start = Instant::now();

        let results: Vec<ServiceCheckResult> = services
            .par_iter()
            .map(|service| {
                reporter.on_service_start(service);
                let result = check_service(service, base_date);
                reporter.on_service_complete(&result);
                result
            })
            .collect();

        let duration = start.elapsed();
        debug!(
            "Checked {} services in {:.2}s",
            results.len(),
            duration.as_secs_f64()
        );
        reporter.on_check_complete(&results, duration.as_secs_f64());
        results
    }

    pub fn build_report(
        &self,
        services: &[Service],
        base_date: NaiveDate,
        reporter: &dyn CheckReporter,
    ) -> BackupReport {
        BackupReport {
            generated_at: Local::now(),
            services: self.check_all(services, base_date, reporter),
        }
    }
}
