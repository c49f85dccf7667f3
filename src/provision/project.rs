//! Target project precondition check
//!
//! Units are only installed into projects that look scaffolded: the
//! configured marker entries (dependency directory, source and public
//! directories by default) must all exist in the project root.

use crate::config::schema::ProjectConfig;
use crate::error::{StockpotError, StockpotResult};
use std::path::Path;
use tracing::debug;

/// Recognizer for scaffolded projects
#[derive(Debug, Clone)]
pub struct ProjectGate {
    markers: Vec<String>,
}

impl ProjectGate {
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }

    pub fn from_config(config: &ProjectConfig) -> Self {
        Self::new(config.markers.clone())
    }

    /// Markers absent from `project`
    pub fn missing(&self, project: &Path) -> Vec<&str> {
        self.markers
            .iter()
            .filter(|marker| !project.join(marker.as_str()).exists())
            .map(String::as_str)
            .collect()
    }

    /// Fail with `Precondition` unless every marker is present.
    ///
    /// Never touches the filesystem beyond existence checks.
    pub fn verify(&self, project: &Path) -> StockpotResult<()> {
        let missing = if project.is_dir() {
            self.missing(project)
        } else {
            self.markers.iter().map(String::as_str).collect()
        };

        if missing.is_empty() {
            debug!("Project {} passed precondition check", project.display());
            return Ok(());
        }

        Err(StockpotError::Precondition {
            path: project.to_path_buf(),
            missing: missing.join(", "),
        })
    }
}

impl Default for ProjectGate {
    fn default() -> Self {
        Self::from_config(&ProjectConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::scaffold_project;
    use tempfile::TempDir;

    #[test]
    fn scaffolded_project_passes() {
        let temp = TempDir::new().unwrap();
        scaffold_project(temp.path());
        assert!(ProjectGate::default().verify(temp.path()).is_ok());
    }

    #[test]
    fn missing_markers_are_listed() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("src")).unwrap();

        let err = ProjectGate::default().verify(temp.path()).unwrap_err();
        match err {
            StockpotError::Precondition { missing, .. } => {
                assert_eq!(missing, "node_modules, public");
            }
            other => panic!("expected Precondition, got {:?}", other),
        }
    }

    #[test]
    fn nonexistent_project_fails_without_creating_it() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("my-app");

        let err = ProjectGate::default().verify(&project).unwrap_err();
        assert!(matches!(err, StockpotError::Precondition { .. }));
        assert!(!project.exists());
    }

    #[test]
    fn custom_markers() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("package.json"), "{}").unwrap();

        let gate = ProjectGate::new(vec!["package.json".to_string()]);
        assert!(gate.verify(temp.path()).is_ok());
        assert_eq!(ProjectGate::default().missing(temp.path()).len(), 3);
    }
}
