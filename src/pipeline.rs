//! Deploy Pipeline
//!
//! A deploy is two stages run one after the other in the checkout
//! directory `<workspace>/<name>`:
//!
//! | Stage | Steps |
//! |-------|-------|
//! | clone | `git clone <repo> .`, `git checkout -B <branch> origin/<branch>` |
//! | build | install command, build command, `cp -R <output>/. <dest>` |
//!
//! Inside a stage a step runs only when the previous one exited with 0.
//! The exit status of the clone stage is not checked: the build stage
//! runs even when the clone failed.
use crate::config::{Config, Project};
use crate::fs;
use crate::path::expand_path;
use anyhow::{bail, Context as _, Result};
use core::fmt::{self, Display};
use log::{debug, info, trace};
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};

/// Exit code reported for a step whose program could not be started.
pub const SPAWN_FAILURE: i32 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub program: String,
    pub args: Vec<String>,
}

impl Step {
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Run `script` through `sh -c`.
    pub fn shell<S>(script: S) -> Self
    where
        S: Into<String>,
    {
        Self::new("sh", ["-c".to_string(), script.into()])
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Clone,
    Build,
}

impl Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Clone => write!(f, "clone"),
            StageKind::Build => write!(f, "build"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub kind: StageKind,
    pub steps: Vec<Step>,
}

/// Runs a single step and reports its exit code.
pub trait Runner {
    fn run(&mut self, step: &Step, cwd: &Path) -> Result<i32>;
}

/// Spawns real processes and waits for them.
///
/// Output goes straight to the terminal unless `quiet` is set.
#[derive(Debug, Default)]
pub struct SystemRunner {
    quiet: bool,
}

impl SystemRunner {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn stdio(&self) -> Stdio {
        if self.quiet {
            Stdio::null()
        } else {
            Stdio::inherit()
        }
    }
}

impl Runner for SystemRunner {
    fn run(&mut self, step: &Step, cwd: &Path) -> Result<i32> {
        info!("run {} (in {:?})", step, cwd);
        let status = Command::new(&step.program)
            .args(&step.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(self.stdio())
            .stderr(self.stdio())
            .status();

        match status {
            Ok(status) => Ok(status.code().unwrap_or(-1)),
            Err(e) => {
                debug!("can not start {}: {}", step.program, e);
                Ok(SPAWN_FAILURE)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed { stage: StageKind, code: i32 },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// `<workspace>/<name>`, only when `name` is a single plain path component.
fn checkout_dir(workspace: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => {
            Ok(workspace.join(name))
        }
        _ => bail!("Project name {:?} can not be used as a checkout directory", name),
    }
}

/// One deploy of one project, paths already resolved.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub checkout: PathBuf,
    pub dest: PathBuf,
    pub clone: Stage,
    pub build: Stage,
}

impl Pipeline {
    pub fn new(config: &Config, project: &Project, branch: &str) -> Result<Self> {
        let workspace = expand_path(&config.workspace)?;
        let checkout = fs::absolutize(checkout_dir(&workspace, &project.name)?)?;
        let dest = fs::absolutize(expand_path(&project.dest)?)?;

        let clone = Stage {
            kind: StageKind::Clone,
            steps: vec![
                Step::new("git", ["clone", project.repo.as_str(), "."]),
                Step::new(
                    "git",
                    [
                        "checkout".to_string(),
                        "-B".to_string(),
                        branch.to_string(),
                        format!("origin/{}", branch),
                    ],
                ),
            ],
        };

        let output = checkout.join(project.output_dir()).join(".");
        let build = Stage {
            kind: StageKind::Build,
            steps: vec![
                Step::shell(project.install_command()),
                Step::shell(project.build_command()),
                Step::new(
                    "cp",
                    [
                        "-R".to_string(),
                        output.to_string_lossy().into_owned(),
                        dest.to_string_lossy().into_owned(),
                    ],
                ),
            ],
        };

        Ok(Self {
            checkout,
            dest,
            clone,
            build,
        })
    }

    /// Reset the checkout directory, then run both stages.
    ///
    /// Nothing is rolled back when a stage fails.
    pub fn run<R>(&self, runner: &mut R) -> Result<Outcome>
    where
        R: Runner,
    {
        fs::reset_dir(&self.checkout)
            .with_context(|| format!("Can not prepare checkout {:?}", self.checkout))?;
        fs::create_dir_all(&self.dest)?;

        let code = self.run_stage(&self.clone, runner)?;
        if code != 0 {
            debug!("{} stage exited with {}, continue", self.clone.kind, code);
        }

        let code = self.run_stage(&self.build, runner)?;
        if code != 0 {
            debug!("{} stage exited with {}", self.build.kind, code);
            return Ok(Outcome::Failed {
                stage: self.build.kind,
                code,
            });
        }
        Ok(Outcome::Success)
    }

    fn run_stage<R>(&self, stage: &Stage, runner: &mut R) -> Result<i32>
    where
        R: Runner,
    {
        trace!("stage {}", stage.kind);
        for step in &stage.steps {
            let code = runner.run(step, &self.checkout)?;
            if code != 0 {
                return Ok(code);
            }
        }
        Ok(0)
    }
}
