#![allow(dead_code)]

use anyhow::Result;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use land::config::{Config, ConfigStore, Project};
use land::pipeline::{Runner, Step};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?.into_persistent_if(false))
}

pub fn config_file(temp: &TempDir) -> ChildPath {
    temp.child(".landrc.json")
}

pub fn store(temp: &TempDir) -> ConfigStore {
    ConfigStore::new(config_file(temp).path())
}

/// Config with a workspace inside `temp` and the given `(name, repo)` projects,
/// each deploying to `<temp>/www/<name>`.
pub fn create_config(temp: &TempDir, projects: &[(&str, &str)]) -> Result<Config> {
    let workspace = temp.path().join("workspace");
    let mut config = Config {
        workspace: workspace.to_string_lossy().into_owned(),
        project: Vec::new(),
        extra: Default::default(),
    };
    for (name, repo) in projects {
        let dest = temp.path().join("www").join(name);
        config.add(Project::new(*name, *repo, dest.to_string_lossy()));
    }
    store(temp).save(&config)?;
    Ok(config)
}

/// Records every step and answers with scripted exit codes (0 once exhausted).
#[derive(Debug, Default)]
pub struct RecordingRunner {
    codes: VecDeque<i32>,
    pub steps: Vec<(Step, PathBuf)>,
}

impl RecordingRunner {
    pub fn new<I>(codes: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        Self {
            codes: codes.into_iter().collect(),
            steps: Vec::new(),
        }
    }

    pub fn programs(&self) -> Vec<String> {
        self.steps.iter().map(|(step, _)| step.to_string()).collect()
    }
}

impl Runner for RecordingRunner {
    fn run(&mut self, step: &Step, cwd: &Path) -> Result<i32> {
        self.steps.push((step.clone(), cwd.to_path_buf()));
        Ok(self.codes.pop_front().unwrap_or(0))
    }
}
