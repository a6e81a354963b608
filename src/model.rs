use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum CheckMode {
    /// Extract the backup date from the file name.
    #[default]
    NameDate,
    /// Use a filesystem timestamp of the file.
    FileTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum FileTimeSource {
    #[default]
    LastWriteTime,
    CreationTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ServiceType {
    #[default]
    Single,
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ServiceCheckStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "WARNING")]
    Warning,
    #[serde(rename = "FAIL")]
    Fail,
    #[serde(rename = "ERROR")]
    Error,
}

impl fmt::Display for ServiceCheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceCheckStatus::Ok => "OK",
            ServiceCheckStatus::Warning => "WARNING",
            ServiceCheckStatus::Fail => "FAIL",
            ServiceCheckStatus::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// A monitored backup location. Groups carry either explicit `children` or
/// a list of `child_folders` from which single children are synthesized.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Service {
    pub name: String,
    pub path: String,
    pub keywords: Vec<String>,
    pub date_patterns: Vec<String>,
    pub expected_day_offset: u32,
    pub check_mode: CheckMode,
    pub file_time_source: FileTimeSource,
    pub min_files_per_day: i32,
    pub file_mask: Option<String>,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub children: Vec<Service>,
    pub required: bool,
    pub child_folders: Vec<String>,
    pub use_child_folder_as_keyword: bool,
}

impl Default for Service {
    fn default() -> Self {
        Self {
            name: String::new(),
            path: String::new(),
            keywords: Vec::new(),
            date_patterns: Vec::new(),
            expected_day_offset: 0,
            check_mode: CheckMode::NameDate,
            file_time_source: FileTimeSource::LastWriteTime,
            min_files_per_day: 1,
            file_mask: None,
            service_type: ServiceType::Single,
            children: Vec::new(),
            required: true,
            child_folders: Vec::new(),
            use_child_folder_as_keyword: true,
        }
    }
}

impl Service {
    pub fn is_group(&self) -> bool {
        self.service_type == ServiceType::Group
    }

    pub fn min_required(&self) -> usize {
        normalize_min_required(self.min_files_per_day)
    }

    pub fn expected_date(&self, base_date: NaiveDate) -> NaiveDate {
        expected_date(base_date, self.expected_day_offset)
    }

    /// Mask used for directory listing; blank masks mean every file.
    pub fn effective_file_mask(&self) -> &str {
        match self.file_mask.as_deref().map(str::trim) {
            Some(mask) if !mask.is_empty() => mask,
            _ => "*",
        }
    }

    /// Children of a group as evaluated: the explicit list when present,
    /// otherwise fresh single services built from `child_folders`.
    pub fn resolve_children(&self) -> Vec<Service> {
        if !self.children.is_empty() {
            return self.children.clone();
        }

        self.child_folders
            .iter()
            .map(|folder| folder.trim())
            .filter(|folder| !folder.is_empty())
            .map(|folder| self.synthesize_child(folder))
            .collect()
    }

    fn synthesize_child(&self, folder: &str) -> Service {
        let keywords = if !self.keywords.is_empty() {
            self.keywords.clone()
        } else if self.use_child_folder_as_keyword {
            vec![folder.to_string()]
        } else {
            Vec::new()
        };

        Service {
            name: folder.to_string(),
            path: Path::new(&self.path)
                .join(folder)
                .to_string_lossy()
                .into_owned(),
            keywords,
            date_patterns: self.date_patterns.clone(),
            expected_day_offset: self.expected_day_offset,
            check_mode: self.check_mode,
            file_time_source: self.file_time_source,
            min_files_per_day: self.min_files_per_day,
            file_mask: self.file_mask.clone(),
            service_type: ServiceType::Single,
            children: Vec::new(),
            required: true,
            child_folders: Vec::new(),
            use_child_folder_as_keyword: self.use_child_folder_as_keyword,
        }
    }
}

/// Outcome of evaluating one service (and, for groups, its children).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCheckResult {
    pub service_name: String,
    pub status: ServiceCheckStatus,
    pub expected_date: NaiveDate,
    pub found_count: usize,
    pub min_required_count: usize,
    pub last_observed_backup_date: Option<NaiveDate>,
    pub message: String,
    pub details: Vec<String>,
    pub children: Vec<ServiceCheckResult>,
}

impl ServiceCheckResult {
    pub fn new(
        service: &Service,
        status: ServiceCheckStatus,
        expected_date: NaiveDate,
        message: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service.name.clone(),
            status,
            expected_date,
            found_count: 0,
            min_required_count: service.min_required(),
            last_observed_backup_date: None,
            message: message.into(),
            details: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ServiceCheckStatus::Ok
    }

    /// Multi-line description used by the CLI and report rendering.
    pub fn details_text(&self) -> String {
        let mut parts = vec![
            format!("Expected date: {}", self.expected_date.format("%Y-%m-%d")),
            format!("Files: {}/{}", self.found_count, self.min_required_count),
        ];
        if let Some(last) = self.last_observed_backup_date {
            parts.push(format!("Last backup: {}", last.format("%Y-%m-%d")));
        }
        parts.push(self.message.clone());
        parts.extend(self.details.iter().cloned());

        parts
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn normalize_min_required(min_files_per_day: i32) -> usize {
    if min_files_per_day <= 0 {
        1
    } else {
        min_files_per_day as usize
    }
}

pub fn expected_date(base_date: NaiveDate, offset_days: u32) -> NaiveDate {
    base_date
        .checked_sub_days(Days::new(u64::from(offset_days)))
        .unwrap_or(NaiveDate::MIN)
}
