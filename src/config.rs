use crate::model::Service;
use crate::report::ReportMode;
use crate::error::Error;
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub mode: ReportMode,
    /// Daily send times as `HH:mm`.
    pub send_times: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub services: Vec<Service>,
    pub report: ReportConfig,
}

impl AppConfig {
    /// Top-level service by name, case-insensitive.
    pub fn find_service(&self, name: &str) -> Option<&Service> {
        self.services
            .iter()
            .find(|service| service.name.to_lowercase() == name.to_lowercase())
    }
}

/// Load from the file `name` (extension optional, TOML or JSON) and
/// `BACKUP_MONITOR__*` environment variables. A missing file is not an error.
pub fn load_configuration(name: &str) -> Result<AppConfig, Error> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name(name).required(false))
        .add_source(Environment::with_prefix("BACKUP_MONITOR").separator("__"))
        .build()?;
    Ok(builder.try_deserialize::<AppConfig>()?)
}
