use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum AppError {
    #[error("Crypto directory does not exist or is not a directory: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Failed to scan crypto directory: {}: {source}", .path.display())]
    DirectoryScan {
        path: PathBuf,
        #[source]
        source: Box<AppError>,
    },

    #[error("Error processing crypto data for symbol {symbol}: {message}")]
    DataProcessing { symbol: String, message: String },

    #[error("Unsupported or unavailable crypto: {0}")]
    SymbolNotFound(String),

    #[error("No valid data available for crypto: {0}")]
    NoValidData(String),

    #[error("No data available for the given date: {0}")]
    NoDataForDate(chrono::NaiveDate),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rate limit exceeded")]
    RateLimit,
}

/// Coarse classification used by the HTTP and CLI layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ScanFault,
    DataProcessing,
    SymbolNotFound,
    NoDataForDate,
    InvalidArgument,
    RateLimited,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::DirectoryNotFound(_) | AppError::DirectoryScan { .. } => ErrorKind::ScanFault,
            AppError::DataProcessing { .. } => ErrorKind::DataProcessing,
            AppError::SymbolNotFound(_) | AppError::NoValidData(_) => ErrorKind::SymbolNotFound,
            AppError::NoDataForDate(_) => ErrorKind::NoDataForDate,
            AppError::InvalidInput(_) => ErrorKind::InvalidArgument,
            AppError::RateLimit => ErrorKind::RateLimited,
            AppError::Config(_) | AppError::Io(_) => ErrorKind::Internal,
        }
    }

    /// Wrap a fault raised while scanning `path`
    pub fn scan_fault(path: impl Into<PathBuf>, source: AppError) -> Self {
        AppError::DirectoryScan {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Innermost cause of a scan fault (the error itself otherwise)
    pub fn root_cause(&self) -> &AppError {
        match self {
            AppError::DirectoryScan { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

// Alias for convenience
pub type Error = AppError;
