use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Service not found: {0}")]
    ServiceNotFound(String),
}

/// Path-level failures while taking a directory snapshot. These abort the
/// evaluation of a single service and surface as `ERROR` results.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("access denied to directory: {}", .0.display())]
    AccessDenied(PathBuf),

    #[error("invalid file mask '{mask}': {source}")]
    InvalidFileMask {
        mask: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("{source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    pub fn from_io(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied => ScanError::AccessDenied(path),
            io::ErrorKind::NotFound => ScanError::DirectoryNotFound(path),
            _ => ScanError::Io { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_maps_to_access_denied() {
        let err = ScanError::from_io(
            PathBuf::from("/backups/locked"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, ScanError::AccessDenied(ref path) if path.ends_with("locked")));
        assert_eq!(err.to_string(), "access denied to directory: /backups/locked");
    }

    #[test]
    fn test_not_found_maps_to_directory_not_found() {
        let err = ScanError::from_io(
            PathBuf::from("/backups/gone"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(matches!(err, ScanError::DirectoryNotFound(_)));
        assert_eq!(err.to_string(), "directory not found: /backups/gone");
    }

    #[test]
    fn test_other_io_errors_keep_their_source() {
        let err = ScanError::from_io(
            PathBuf::from("/backups/flaky"),
            io::Error::new(io::ErrorKind::Other, "device not ready"),
        );
        assert!(matches!(err, ScanError::Io { .. }));
        assert_eq!(err.to_string(), "device not ready");
    }
}
