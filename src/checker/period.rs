use crate::model::{CheckMode, Service, ServiceCheckStatus};
use crate::scanner::{self, Classifier};
use chrono::NaiveDate;
use dashmap::DashMap;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{error, info, warn};

/// Outcome of a gap analysis over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PeriodCheckResult {
    pub is_valid: bool,
    pub missing_dates: Vec<NaiveDate>,
    pub error_message: Option<String>,
}

impl PeriodCheckResult {
    fn error(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            missing_dates: Vec::new(),
            error_message: Some(message.into()),
        }
    }

    fn from_missing(missing_dates: Vec<NaiveDate>, error_message: Option<String>) -> Self {
        Self {
            is_valid: missing_dates.is_empty(),
            missing_dates,
            error_message,
        }
    }

    /// Any error message is displayed as ERROR, even the non-fatal ones.
    pub fn status(&self) -> ServiceCheckStatus {
        if self.error_message.is_some() {
            ServiceCheckStatus::Error
        } else if self.is_valid {
            ServiceCheckStatus::Ok
        } else {
            ServiceCheckStatus::Fail
        }
    }

    pub fn summary(&self, start: NaiveDate, end: NaiveDate) -> String {
        if let Some(message) = &self.error_message {
            return message.clone();
        }
        if self.missing_dates.is_empty() {
            "all backups found".to_string()
        } else {
            format!(
                "missing backups: {} days ({} - {})",
                self.missing_dates.len(),
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            )
        }
    }
}

/// Every calendar day in `[start, end]`, ascending. Empty when `start > end`.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Days in `[start, end]` with fewer than the required number of backups.
pub fn check_period(service: &Service, start: NaiveDate, end: NaiveDate) -> PeriodCheckResult {
    if service.is_group() {
        return PeriodCheckResult::error("period check not supported for groups");
    }

    let candidates = match scanner::list_candidates(service) {
        Ok(candidates) => candidates,
        Err(err) => {
            error!("{}: {}", service.name, err);
            return PeriodCheckResult::error(err.to_string());
        }
    };

    if candidates.is_empty() {
        info!("{}: no candidate files, whole period missing", service.name);
        return PeriodCheckResult::from_missing(days_in_range(start, end).collect(), None);
    }

    let classifier = Classifier::for_service(service);
    let histogram: DashMap<NaiveDate, usize> = DashMap::new();
    let extracted = AtomicUsize::new(0);

    candidates.par_iter().for_each(|candidate| {
        if let Some(date) = classifier.classify(candidate) {
            extracted.fetch_add(1, Ordering::Relaxed);
            if date >= start && date <= end {
                *histogram.entry(date).or_insert(0) += 1;
            }
        }
    });

    let error_message = if service.check_mode == CheckMode::NameDate
        && extracted.load(Ordering::Relaxed) == 0
    {
        warn!("{}: no dates extracted from file names", service.name);
        Some("could not extract date from any file name; check date patterns".to_string())
    } else {
        None
    };

    let min_required = service.min_required();
    let missing: Vec<NaiveDate> = days_in_range(start, end)
        .filter(|day| histogram.get(day).map_or(0, |count| *count) < min_required)
        .collect();

    info!(
        "{}: {} of {} days missing",
        service.name,
        missing.len(),
        days_in_range(start, end).count()
    );
    PeriodCheckResult::from_missing(missing, error_message)
}
