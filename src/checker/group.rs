use crate::checker::check_service;
use crate::model::{Service, ServiceCheckResult, ServiceCheckStatus};
use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::info;

/// Evaluate a group: resolve its children, check them concurrently and fold
/// the results into one status.
pub fn check_group(service: &Service, base_date: NaiveDate) -> ServiceCheckResult {
    let expected = service.expected_date(base_date);
    let children = service.resolve_children();

    if children.is_empty() {
        info!("{}: FAIL, group has no children", service.name);
        return ServiceCheckResult::new(
            service,
            ServiceCheckStatus::Fail,
            expected,
            "group has no children",
        );
    }

    let results: Vec<ServiceCheckResult> = children
        .par_iter()
        .map(|child| check_service(child, base_date))
        .collect();

    aggregate(service, expected, &children, results)
}

/// Fold child results. Priority: any ERROR, then a required FAIL, then an
/// optional FAIL (WARNING), else OK.
pub fn aggregate(
    service: &Service,
    expected: NaiveDate,
    children: &[Service],
    results: Vec<ServiceCheckResult>,
) -> ServiceCheckResult {
    let mut required_total = 0;
    let mut required_ok = 0;
    let mut required_fail = 0;
    let mut optional_fail = 0;
    let mut any_error = false;

    for (child, result) in children.iter().zip(&results) {
        if result.status == ServiceCheckStatus::Error {
            any_error = true;
        }
        if child.required {
            required_total += 1;
            match result.status {
                ServiceCheckStatus::Ok => required_ok += 1,
                ServiceCheckStatus::Fail => required_fail += 1,
                _ => {}
            }
        } else if result.status == ServiceCheckStatus::Fail {
            optional_fail += 1;
        }
    }

    let status = if any_error {
        ServiceCheckStatus::Error
    } else if required_fail > 0 {
        ServiceCheckStatus::Fail
    } else if optional_fail > 0 {
        ServiceCheckStatus::Warning
    } else {
        ServiceCheckStatus::Ok
    };

    let message = format!(
        "required: {}/{} OK; optional FAIL: {}",
        required_ok, required_total, optional_fail
    );

    let mut result = ServiceCheckResult::new(service, status, expected, message);
    result.found_count = results.iter().map(|r| r.found_count).sum();
    result.min_required_count = results.iter().map(|r| r.min_required_count).sum::<usize>().max(1);
    result.last_observed_backup_date = results
        .iter()
        .filter_map(|r| r.last_observed_backup_date)
        .max();
    result.details = results
        .iter()
        .filter(|r| !r.is_ok())
        .map(|r| format!("{}: {} ({})", r.service_name, r.status, r.message))
        .collect();
    result.children = results;

    info!("{}: {} ({})", service.name, status, result.message);
    result
}
