//! Repository settings as they appear in the `[repository]` section of the
//! service configuration file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use super::factory::RepositoryType;

/// Repository type and location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
    /// Backing file for the `file` repository.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_repo_type() -> String {
    "local".to_string()
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
            path: None,
        }
    }
}

impl RepositorySettings {
    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repo_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_settings() {
        let settings: RepositorySettings = toml::from_str(
            r#"
            type = "file"
            path = "/var/lib/cycle/peaks.jsonl"
            "#,
        )
        .unwrap();
        assert_eq!(settings.repository_type().unwrap(), RepositoryType::File);
        assert_eq!(
            settings.path,
            Some(PathBuf::from("/var/lib/cycle/peaks.jsonl"))
        );
    }

    #[test]
    fn test_defaults_to_local() {
        let settings: RepositorySettings = toml::from_str("").unwrap();
        assert_eq!(settings, RepositorySettings::default());
        assert_eq!(settings.repository_type().unwrap(), RepositoryType::Local);
    }
}
