//! Config Store
//!
//! A single JSON document, by default `~/.landrc.json`, holding the
//! workspace root and the list of deployable projects.
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".landrc.json";
pub const DEFAULT_WORKSPACE: &str = "/data/frontend/workspace";
pub const DEFAULT_INSTALL: &str = "cnpm install";
pub const DEFAULT_BUILD: &str = "npm run build";
pub const DEFAULT_OUTPUT: &str = "dist";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {0:?} does not exist")]
    NotInitialized(PathBuf),
    #[error("config file {path:?} is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("can not access config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("can not serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub repo: String,
    pub dest: String,
    /// Dependency install command, `cnpm install` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install: Option<String>,
    /// Build command, `npm run build` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
    /// Build output directory relative to the checkout, `dist` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    pub fn new<N, R, D>(name: N, repo: R, dest: D) -> Self
    where
        N: Into<String>,
        R: Into<String>,
        D: Into<String>,
    {
        Self {
            name: name.into(),
            repo: repo.into(),
            dest: dest.into(),
            install: None,
            build: None,
            output: None,
            extra: Map::new(),
        }
    }

    pub fn install_command(&self) -> &str {
        self.install.as_deref().unwrap_or(DEFAULT_INSTALL)
    }

    pub fn build_command(&self) -> &str {
        self.build.as_deref().unwrap_or(DEFAULT_BUILD)
    }

    pub fn output_dir(&self) -> &str {
        self.output.as_deref().unwrap_or(DEFAULT_OUTPUT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub workspace: String,
    pub project: Vec<Project>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Config {
    pub fn new<W>(workspace: W, project: Project) -> Self
    where
        W: Into<String>,
    {
        Self {
            workspace: workspace.into(),
            project: vec![project],
            extra: Map::new(),
        }
    }

    /// Distinct project names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.project.iter().map(|p| p.name.clone()).unique().collect_vec()
    }

    pub fn find(&self, name: &str) -> Option<&Project> {
        self.project.iter().find(|p| p.name == name)
    }

    pub fn add(&mut self, project: Project) {
        self.project.push(project);
    }

    /// Remove every entry named `name`, returning how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.project.len();
        self.project.retain(|p| p.name != name);
        before - self.project.len()
    }
}

/// Location of the config file. Passed explicitly to every operation.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    /// `~/.landrc.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether anything, file or not, occupies the config path.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotInitialized(self.path.clone()));
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        log::debug!("load config {:?}", self.path);
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the file with pretty printed JSON.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(config)?;
        log::debug!("save config {:?}", self.path);
        std::fs::write(&self.path, text).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
