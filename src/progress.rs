use crate::model::{Service, ServiceCheckResult};

/// Trait for reporting check progress.
///
/// The CLI implements it with colored terminal output; tests use
/// [`SilentReporter`]. All methods have default no-op implementations and
/// may be called from several threads at once.
pub trait CheckReporter: Send + Sync {
    fn on_check_start(&self, _total_services: usize) {}
    fn on_service_start(&self, _service: &Service) {}
    fn on_service_complete(&self, _result: &ServiceCheckResult) {}
    fn on_check_complete(&self, _results: &[ServiceCheckResult], _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl CheckReporter for SilentReporter {}
