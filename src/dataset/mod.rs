//! Dataset loading.
//!
//! The project collection is read once at startup, validated, and then
//! handed to the aggregator as a read-only value. It can come from a single
//! `.json` / `.toml` file, from a directory of such files, or from the
//! built-in sample.

pub mod sample;

use crate::error::{DataError, Result};
use crate::models::Project;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Read-only collection of projects and their tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Dataset {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// Load a dataset from a file or a directory of files.
    pub fn load(path: &Path) -> Result<Self> {
        let dataset = if path.is_dir() {
            Self::load_dir(path)?
        } else {
            Self::load_file(path)?
        };

        dataset.validate()?;
        info!(
            "Loaded {} projects ({} tasks) from {}",
            dataset.projects.len(),
            dataset.task_count(),
            path.display()
        );
        Ok(dataset)
    }

    /// Load a single `.json` or `.toml` dataset file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match extension(path).as_deref() {
            Some("json") => serde_json::from_str(&content).map_err(|source| DataError::Json {
                path: path.to_path_buf(),
                source,
            }),
            Some("toml") => toml::from_str(&content).map_err(|source| DataError::Toml {
                path: path.to_path_buf(),
                source,
            }),
            _ => Err(DataError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Merge every dataset file under `dir`, in path order.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut merged = Dataset::default();

        let walker = WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        for entry in walker {
            let entry = entry.map_err(|e| DataError::Io {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
                source: std::io::Error::from(e),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            match extension(path).as_deref() {
                Some("json") | Some("toml") => {
                    debug!("Reading dataset file {}", path.display());
                    let part = Self::load_file(path)?;
                    merged.projects.extend(part.projects);
                }
                _ => debug!("Skipping {}", path.display()),
            }
        }

        if merged.projects.is_empty() {
            warn!("No projects found under {}", dir.display());
        }

        Ok(merged)
    }

    /// Check the invariants the aggregator relies on.
    ///
    /// Inverted project dates are tolerated; they only make schedule
    /// progress fall back to zero.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for project in &self.projects {
            if !seen.insert(project.id.as_str()) {
                return Err(DataError::DuplicateProject(project.id.clone()));
            }
            if project.progress > 100 {
                return Err(DataError::InvalidProgress {
                    project: project.id.clone(),
                    progress: project.progress,
                });
            }
            if project.end_date < project.start_date {
                debug!(
                    "Project {} ends ({}) before it starts ({})",
                    project.id, project.end_date, project.start_date
                );
            }
        }

        Ok(())
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn task_count(&self) -> usize {
        self.projects.iter().map(|p| p.tasks.len()).sum()
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map(|n| n.starts_with('.')).unwrap_or(false)
}
