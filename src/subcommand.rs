//! Subcommand module
//!
//! This module contains subcommands.
//! Each subcommand is implemented as a function taking the config store
//! and the prompt it asks questions through.
use crate::config::{Config, ConfigStore, Project, DEFAULT_WORKSPACE};
use crate::pipeline::{Outcome, Pipeline, Runner};
use crate::prompt::Prompt;
use anyhow::{Context as _, Result};
use nu_ansi_term::Color::{Cyan, Green};

const DEFAULT_BRANCH: &str = "master";
pub const SUCCESS_BANNER: &str = "!!!!! SUCCESS !!!!!";

fn print_not_initialized(store: &ConfigStore) {
    println!(
        "Can't read config file at path:{}, please init first",
        store.path().display()
    );
}

/// Load the config, or print how to create it and return `None`.
fn load_initialized(store: &ConfigStore) -> Result<Option<Config>> {
    if !store.exists() {
        print_not_initialized(store);
        return Ok(None);
    }
    Ok(Some(store.load()?))
}

fn ask_project<P>(prompt: &mut P) -> Result<Project>
where
    P: Prompt + ?Sized,
{
    let name = prompt.text("Enter project name", None)?;
    let repo = prompt.text("Enter git repo", None)?;
    let dest = prompt.text("Enter deploy path", None)?;
    Ok(Project::new(name, repo, dest))
}

/// Create the config file with a first project.
///
/// An existing file is left untouched.
///
/// # Example
/// ```sh
/// $ land init
/// ```
pub fn init<P>(store: &ConfigStore, prompt: &mut P) -> Result<()>
where
    P: Prompt + ?Sized,
{
    if store.exists() {
        println!(
            "Exist config file at path:{}, please edit it directly",
            store.path().display()
        );
        return Ok(());
    }

    let workspace = prompt.text("Enter workspace path", Some(DEFAULT_WORKSPACE))?;
    let project = ask_project(prompt)?;
    store.save(&Config::new(workspace, project))?;
    println!("init success");
    Ok(())
}

/// Append a project.
///
/// # Example
/// ```sh
/// $ land add
/// ```
pub fn add<P>(store: &ConfigStore, prompt: &mut P) -> Result<()>
where
    P: Prompt + ?Sized,
{
    let Some(mut config) = load_initialized(store)? else {
        return Ok(());
    };

    let project = ask_project(prompt)?;
    if config.find(&project.name).is_some() {
        log::warn!("project {} is already configured", project.name);
    }
    config.add(project);
    store.save(&config)?;
    println!("add success");
    Ok(())
}

/// Remove a project chosen from the configured names.
///
/// # Example
/// ```sh
/// $ land delete
/// ```
pub fn delete<P>(store: &ConfigStore, prompt: &mut P) -> Result<()>
where
    P: Prompt + ?Sized,
{
    let Some(mut config) = load_initialized(store)? else {
        return Ok(());
    };
    if config.project.is_empty() {
        println!("No project configured");
        return Ok(());
    }

    let name = prompt.choice("Which one do you want to delete?", &config.names())?;
    let removed = config.remove(&name);
    log::debug!("removed {} entries named {}", removed, name);
    store.save(&config)?;
    println!("delete {} success", name);
    Ok(())
}

/// Build a project from a branch and copy the output to its destination.
///
/// Returns the pipeline outcome, `None` when nothing was deployed.
/// A failed build stage is not an error and prints nothing of its own.
///
/// # Example
/// ```sh
/// $ land deploy
/// ```
pub fn deploy<P, R>(store: &ConfigStore, prompt: &mut P, runner: &mut R) -> Result<Option<Outcome>>
where
    P: Prompt + ?Sized,
    R: Runner,
{
    let Some(config) = load_initialized(store)? else {
        return Ok(None);
    };
    if config.project.is_empty() {
        println!("No project configured");
        return Ok(None);
    }

    let name = prompt.choice("Which one do you want to deploy?", &config.names())?;
    let branch = prompt.text("Which branch?", Some(DEFAULT_BRANCH))?;
    let project = config
        .find(&name)
        .with_context(|| format!("Project {} not found", name))?;

    println!("Deploy {} ({})", Cyan.paint(&project.name), branch);
    println!("  {} => {}", project.repo, project.dest);

    let pipeline = Pipeline::new(&config, project, &branch)?;
    let outcome = pipeline.run(runner)?;
    if outcome.is_success() {
        println!("{}", Green.paint(SUCCESS_BANNER));
    }
    Ok(Some(outcome))
}
