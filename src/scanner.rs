use crate::date_extract::DateExtractor;
use crate::error::ScanError;
use crate::model::{CheckMode, FileTimeSource, Service};
use chrono::{DateTime, Local, NaiveDate};
use glob::{MatchOptions, Pattern};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, error};

const MASK_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A file in a service directory that passed the mask and keyword filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub file_name: String,
}

pub fn ensure_directory(dir: &Path) -> Result<(), ScanError> {
    if dir.as_os_str().is_empty() || !dir.is_dir() {
        return Err(ScanError::DirectoryNotFound(dir.to_path_buf()));
    }
    Ok(())
}

/// Non-recursive listing of regular files in `dir` whose name matches the
/// glob `mask`, sorted by name.
pub fn list_files(dir: &Path, mask: &str) -> Result<Vec<PathBuf>, ScanError> {
    let pattern = Pattern::new(mask).map_err(|source| ScanError::InvalidFileMask {
        mask: mask.to_string(),
        source,
    })?;

    let entries = fs::read_dir(dir).map_err(|err| {
        if err.kind() == io::ErrorKind::PermissionDenied {
            error!("Access denied reading directory {}: {}", dir.display(), err);
        }
        ScanError::from_io(dir.to_path_buf(), err)
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|err| {
            ScanError::from_io(
                dir.to_path_buf(),
                io::Error::new(
                    err.kind(),
                    format!("Error reading entry in directory {}: {}", dir.display(), err),
                ),
            )
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let name = entry.file_name();
        if pattern.matches_with(&name.to_string_lossy(), MASK_OPTIONS) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Case-insensitive keyword filter; no keywords keeps every file.
pub fn filter_candidates(files: Vec<PathBuf>, keywords: &[String]) -> Vec<Candidate> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    files
        .into_iter()
        .filter_map(|path| {
            let file_name = path.file_name()?.to_string_lossy().into_owned();
            let lowered = file_name.to_lowercase();
            if keywords.is_empty() || keywords.iter().any(|k| lowered.contains(k.as_str())) {
                Some(Candidate { path, file_name })
            } else {
                None
            }
        })
        .collect()
}

/// One directory snapshot for a service: existence check, listing, keyword
/// filter.
pub fn list_candidates(service: &Service) -> Result<Vec<Candidate>, ScanError> {
    let dir = Path::new(&service.path);
    ensure_directory(dir)?;
    let files = list_files(dir, service.effective_file_mask())?;
    debug!(
        "{}: {} files matching '{}' in {}",
        service.name,
        files.len(),
        service.effective_file_mask(),
        dir.display()
    );
    Ok(filter_candidates(files, &service.keywords))
}

/// Maps a candidate file to a calendar date.
#[derive(Debug, Clone)]
pub enum Classifier {
    FileTime(FileTimeSource),
    NameDate(DateExtractor),
}

impl Classifier {
    pub fn for_service(service: &Service) -> Self {
        match service.check_mode {
            CheckMode::FileTime => Classifier::FileTime(service.file_time_source),
            CheckMode::NameDate => Classifier::NameDate(DateExtractor::new(&service.date_patterns)),
        }
    }

    pub fn classify(&self, candidate: &Candidate) -> Option<NaiveDate> {
        match self {
            Classifier::FileTime(source) => match file_time(&candidate.path, *source) {
                Ok(time) => Some(DateTime::<Local>::from(time).date_naive()),
                Err(err) => {
                    debug!("Error reading timestamp of {}: {}", candidate.path.display(), err);
                    None
                }
            },
            Classifier::NameDate(extractor) => extractor.extract(&candidate.file_name),
        }
    }

    /// Classify every candidate, keeping input order.
    pub fn classify_all(&self, candidates: &[Candidate]) -> Vec<Option<NaiveDate>> {
        candidates
            .par_iter()
            .map(|candidate| self.classify(candidate))
            .collect()
    }
}

fn file_time(path: &Path, source: FileTimeSource) -> io::Result<SystemTime> {
    let metadata = fs::metadata(path)?;
    match source {
        FileTimeSource::LastWriteTime => metadata.modified(),
        FileTimeSource::CreationTime => metadata.created(),
    }
}
