use anyhow::{Context as _, Result};
use clap::{ArgGroup, Parser, Subcommand};
use is_terminal::IsTerminal;
use land::config::ConfigStore;
use land::pipeline::SystemRunner;
use land::prompt::{LinePrompt, Prompt, TermPrompt};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    arg_required_else_help = true,
)]
#[clap(group(ArgGroup::new("log").args(["quiet", "verbose", "debug", "trace"])))]
struct Args {
    #[clap(subcommand)]
    subcommand: SubCommands,

    /// Config file path. [default: ~/.landrc.json]
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// No log and no build output.
    #[clap(short, long)]
    quiet: bool,
    /// Log info messages.
    #[clap(short, long)]
    verbose: bool,
    /// Log debug messages.
    #[clap(short, long)]
    debug: bool,
    /// Log trace messages.
    #[clap(short, long)]
    trace: bool,
}

#[derive(Debug, Subcommand)]
enum SubCommands {
    /// Create the config file with a first project.
    Init,
    /// Add a project.
    Add,
    /// Delete a project.
    Delete,
    /// Clone, build and copy a project once.
    Deploy,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Off
        } else if self.trace {
            LevelFilter::Trace
        } else if self.debug {
            LevelFilter::Debug
        } else if self.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        }
    }

    fn store(&self) -> Result<ConfigStore> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => ConfigStore::default_path().context("Can not get home directory")?,
        };
        Ok(ConfigStore::new(path))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    TermLogger::init(
        args.log_level(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .unwrap_or_else(drop);

    let store = args.store()?;
    // answers are read one per line when piped in
    let mut prompt: Box<dyn Prompt> = if std::io::stdin().is_terminal() {
        Box::new(TermPrompt::new())
    } else {
        Box::new(LinePrompt::new(std::io::stdin().lock()))
    };
    let prompt = prompt.as_mut();
    match args.subcommand {
        SubCommands::Init => land::init(&store, prompt),
        SubCommands::Add => land::add(&store, prompt),
        SubCommands::Delete => land::delete(&store, prompt),
        SubCommands::Deploy => {
            let mut runner = SystemRunner::new(args.quiet);
            land::deploy(&store, prompt, &mut runner)?;
            Ok(())
        }
    }
}
