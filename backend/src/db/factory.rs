//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating repository instances based on
//! runtime configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositorySettings;
use super::repositories::{FileRepository, LocalRepository};
use super::repository::{PeakWindowRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// JSON-lines file on local disk
    File,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("file", "jsonl", "local", "memory").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "jsonl" => Ok(Self::File),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

/// Repository factory for creating repository instances.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `path` - Backing file (required for File)
    pub fn create(
        repo_type: RepositoryType,
        path: Option<PathBuf>,
    ) -> RepositoryResult<Arc<dyn PeakWindowRepository>> {
        match repo_type {
            RepositoryType::File => {
                let path = path.ok_or_else(|| {
                    RepositoryError::configuration("File repository requires a path")
                })?;
                Ok(Self::create_file(path))
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn PeakWindowRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create a JSON-lines file repository.
    pub fn create_file(path: impl Into<PathBuf>) -> Arc<dyn PeakWindowRepository> {
        Arc::new(FileRepository::new(path))
    }

    /// Create repository from the `[repository]` settings of a config file.
    pub fn from_settings(
        settings: &RepositorySettings,
    ) -> RepositoryResult<Arc<dyn PeakWindowRepository>> {
        let repo_type = settings.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        Self::create(repo_type, settings.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_from_str() {
        assert_eq!("file".parse::<RepositoryType>().unwrap(), RepositoryType::File);
        assert_eq!("JSONL".parse::<RepositoryType>().unwrap(), RepositoryType::File);
        assert_eq!("local".parse::<RepositoryType>().unwrap(), RepositoryType::Local);
        assert_eq!("Memory".parse::<RepositoryType>().unwrap(), RepositoryType::Local);
        let err = "postgres".parse::<RepositoryType>().unwrap_err();
        assert!(err.contains("Unknown repository type"));
    }

    #[test]
    fn test_create_file_requires_path() {
        let err = RepositoryFactory::create(RepositoryType::File, None).err().unwrap();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }

    #[test]
    fn test_create_backends() {
        let local = RepositoryFactory::create(RepositoryType::Local, None).unwrap();
        assert_eq!(local.backend_name(), "local");
        let file = RepositoryFactory::create(
            RepositoryType::File,
            Some(PathBuf::from("peak_windows.jsonl")),
        )
        .unwrap();
        assert_eq!(file.backend_name(), "file");
    }

    #[test]
    fn test_from_settings_rejects_unknown_type() {
        let settings = RepositorySettings {
            repo_type: "sqlite".to_string(),
            path: None,
        };
        let err = RepositoryFactory::from_settings(&settings).err().unwrap();
        assert!(err.to_string().contains("Invalid repository type"));
    }
}
