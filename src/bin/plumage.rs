// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use plumage::{
    animate::{CommandGenerator, Generate},
    config::SpotlightConfig,
    github::GitHubClient,
    path::default_config_path,
    pipeline::{self, Outcome, RunContext},
    publish::{GitCli, Publish},
    rank::ActivityWindow,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    process::exit,
};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "\n  plumage spotlight [options] <account>\n  plumage animate [options] <account>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    async fn run(self) -> Result<()> {
        match self.command {
            Command::Spotlight(opts) => run_spotlight(opts).await,
            Command::Animate(opts) => run_animate(opts),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Rank repositories by recent activity into the README spotlight line.
    #[command(override_usage = "plumage spotlight [options] <account>")]
    Spotlight(SpotlightOptions),

    /// Generate the profile animation artifact.
    #[command(override_usage = "plumage animate [options] <account>")]
    Animate(AnimateOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct SpotlightOptions {
    /// Account whose repositories get ranked.
    #[arg(required = true, value_name = "account")]
    pub account: String,

    /// Access token. Falls back to $GITHUB_TOKEN.
    #[arg(short, long, value_name = "token")]
    pub token: Option<String>,

    /// Path to configuration file.
    #[arg(short, long, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Path to README document carrying the spotlight line.
    #[arg(short, long, value_name = "path")]
    pub readme: Option<PathBuf>,

    /// Full names of repositories to leave out, comma-delimited.
    #[arg(short, long, value_name = "full_name", value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Trailing activity window length in days.
    #[arg(short, long, value_name = "days")]
    pub window_days: Option<u32>,

    /// How many repositories make the spotlight.
    #[arg(long, value_name = "count")]
    pub top: Option<usize>,

    /// Marker that locates the spotlight line.
    #[arg(short, long, value_name = "text")]
    pub marker: Option<String>,

    /// Commit and push the README when it changed.
    #[arg(short, long)]
    pub publish: bool,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct AnimateOptions {
    /// Account to generate the animation for.
    #[arg(required = true, value_name = "account")]
    pub account: String,

    /// Output path for the generated artifact.
    #[arg(short, long, required = true, value_name = "path")]
    pub output: PathBuf,

    /// External generator program to invoke.
    #[arg(short, long, required = true, value_name = "program")]
    pub generator: PathBuf,

    /// Commit and push the artifact.
    #[arg(short, long)]
    pub publish: bool,
}

#[tokio::main]
async fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_timer(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run().await {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

async fn run() -> Result<()> {
    Cli::parse().run().await
}

async fn run_spotlight(opts: SpotlightOptions) -> Result<()> {
    let config = load_config(opts.config)?;
    debug!("effective configuration:\n{config}");

    let token = opts.token.or_else(|| std::env::var("GITHUB_TOKEN").ok());
    let client = GitHubClient::try_new(token)?;

    let settings = config.settings;
    let ignore: HashSet<String> = if opts.ignore.is_empty() {
        settings.ignore.into_iter().collect()
    } else {
        opts.ignore.into_iter().collect()
    };
    let readme = opts.readme.unwrap_or(settings.readme);

    let ctx = RunContext {
        account: opts.account,
        window: ActivityWindow::trailing(opts.window_days.unwrap_or(settings.window_days)),
        top: opts.top.unwrap_or(settings.top),
        ignore,
        overrides: config.replacements,
        marker: opts.marker.unwrap_or(settings.marker),
        readme: readme.clone(),
        concurrency: settings.concurrency,
    };

    let outcome = pipeline::run(&ctx, &client).await?;
    if outcome == Outcome::Updated && opts.publish {
        let publisher = GitCli::new(repo_dir(&readme));
        publisher.publish([&readme], "chore: refresh spotlight line")?;
        println!("published");
        return Ok(());
    }

    println!("{outcome}");

    Ok(())
}

fn run_animate(opts: AnimateOptions) -> Result<()> {
    let generator = CommandGenerator::new(opts.generator);
    let artifact = generator.generate(&opts.account, &opts.output)?;

    if opts.publish {
        let publisher = GitCli::new(repo_dir(&artifact.path));
        publisher.publish([&artifact.path], "chore: refresh profile animation")?;
        println!("published");
        return Ok(());
    }

    println!("generated {}", artifact.path.display());

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<SpotlightConfig> {
    let (path, explicit) = match path {
        Some(path) => (path, true),
        None => (default_config_path()?, false),
    };

    if !explicit && !path.exists() {
        return Ok(SpotlightConfig::default());
    }

    Ok(fs::read_to_string(&path)?.parse()?)
}

fn repo_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
