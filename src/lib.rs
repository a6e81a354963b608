pub mod checker;
pub mod config;
pub mod date_extract;
pub mod error;
pub mod model;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod schedule;

pub use checker::{BackupChecker, PeriodCheckResult};
pub use config::AppConfig;
pub use date_extract::{extract_date, parse_date_string, DateExtractor};
pub use error::{Error, ScanError};
pub use model::{
    normalize_min_required, CheckMode, FileTimeSource, Service, ServiceCheckResult,
    ServiceCheckStatus, ServiceType,
};
pub use progress::{CheckReporter, SilentReporter};
pub use report::{BackupReport, ReportMode, SendDecision};
