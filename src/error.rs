use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("path error: {}: {reason}", path.display())]
    Path { path: PathBuf, reason: String },

    #[error("parse error: {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("integrity conflict: {0}")]
    IntegrityConflict(String),

    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn path(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Path {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    #[must_use]
    pub fn is_integrity_conflict(&self) -> bool {
        matches!(self, Self::IntegrityConflict(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let storage = Error::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(storage.is_storage());
        assert!(!storage.is_integrity_conflict());

        let conflict = Error::IntegrityConflict("two rows".to_string());
        assert!(conflict.is_integrity_conflict());
        assert!(!conflict.is_storage());

        assert!(!Error::parse("a.xml", "bad").is_storage());
        assert!(!Error::NotFound.is_storage());
    }
}
