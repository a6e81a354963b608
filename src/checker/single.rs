use crate::model::{CheckMode, Service, ServiceCheckResult, ServiceCheckStatus};
use crate::scanner::{self, Classifier};
use chrono::NaiveDate;
use tracing::{error, info};

/// Per-snapshot counts for one expected date.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateTally {
    pub extracted: usize,
    pub found: usize,
    pub last_observed: Option<NaiveDate>,
}

impl DateTally {
    pub fn from_dates(dates: &[Option<NaiveDate>], expected: NaiveDate) -> Self {
        dates
            .iter()
            .flatten()
            .fold(DateTally::default(), |mut tally, &date| {
                tally.extracted += 1;
                if date == expected {
                    tally.found += 1;
                }
                tally.last_observed = tally.last_observed.max(Some(date));
                tally
            })
    }
}

/// Evaluate one single service against the date its backup is due.
pub fn check_single(service: &Service, base_date: NaiveDate) -> ServiceCheckResult {
    let expected = service.expected_date(base_date);

    let candidates = match scanner::list_candidates(service) {
        Ok(candidates) => candidates,
        Err(err) => {
            error!("{}: {}", service.name, err);
            let message = err.to_string();
            return ServiceCheckResult::new(service, ServiceCheckStatus::Error, expected, message);
        }
    };

    if candidates.is_empty() {
        let message = if service.keywords.is_empty() {
            "no files found"
        } else {
            "no files matching keywords"
        };
        info!("{}: FAIL ({})", service.name, message);
        return ServiceCheckResult::new(service, ServiceCheckStatus::Fail, expected, message);
    }

    let dates = Classifier::for_service(service).classify_all(&candidates);
    let tally = DateTally::from_dates(&dates, expected);

    if service.check_mode == CheckMode::NameDate && tally.extracted == 0 {
        info!(
            "{}: FAIL, no date in {} candidate file names",
            service.name,
            candidates.len()
        );
        let mut result = ServiceCheckResult::new(
            service,
            ServiceCheckStatus::Fail,
            expected,
            "could not extract date from file name",
        );
        result
            .details
            .push("check the date patterns configured for this service".to_string());
        return result;
    }

    let min_required = service.min_required();
    let (status, message) = if tally.found >= min_required {
        (ServiceCheckStatus::Ok, "backup found")
    } else {
        (ServiceCheckStatus::Fail, "no files for expected date")
    };

    let mut result = ServiceCheckResult::new(service, status, expected, message);
    result.found_count = tally.found;
    result.last_observed_backup_date = tally.last_observed;
    if status == ServiceCheckStatus::Fail {
        result.details.push(format!(
            "found {} of {} required files",
            tally.found, min_required
        ));
    }

    info!(
        "{}: {} ({}/{} for {})",
        service.name, status, tally.found, min_required, expected
    );
    result
}
