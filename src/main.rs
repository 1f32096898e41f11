mod logging;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use miette::{Context, IntoDiagnostic, Result};

use threshold_core::{Config, DEFAULT_CONFIG_TEMPLATE};
use threshold_github::github::GitHubClient;
use threshold_server::event::{Delivery, PullRequestEvent};
use threshold_server::AppState;

const DEFAULT_CONFIG_PATH: &str = ".threshold.toml";

#[derive(Parser)]
#[command(
    name = "threshold",
    version,
    about = "Gate pull requests on complexity thresholds",
    long_about = "Threshold receives pull request webhooks and checks each pull request against\n\
                   configured complexity thresholds. Pull requests that change too many files get\n\
                   an explanatory comment and a failing `ci/threshold` status, or are closed\n\
                   outright in strict mode.\n\n\
                   Examples:\n  \
                     threshold init                          Create a .threshold.toml config file\n  \
                     threshold serve --max-files 50          Listen for webhooks\n  \
                     threshold check --file payload.json     Evaluate a saved webhook payload"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .threshold.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Listen for pull request webhooks
    #[command(long_about = "Listen for pull request webhooks.\n\n\
        Accepts POST deliveries on / and /webhook, evaluates the pull request, and\n\
        posts a status, a comment, or closes it. GET /health answers `ok`.\n\n\
        The GitHub token is read from --token, GITHUB_TOKEN, GH_TOKEN, or the config file.\n\n\
        Examples:\n  threshold serve --max-files 50\n  threshold serve --bind 0.0.0.0:9000 --strict")]
    Serve {
        /// Socket address to listen on (default: 127.0.0.1:8080)
        #[arg(long)]
        bind: Option<String>,

        /// API base URL for GitHub Enterprise
        #[arg(long)]
        host: Option<String>,

        /// GitHub token used to post comments and statuses
        #[arg(long)]
        token: Option<String>,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
    /// Evaluate a webhook payload without contacting GitHub
    #[command(long_about = "Evaluate a webhook payload without contacting GitHub.\n\n\
        Reads a pull_request webhook payload from a file or stdin and prints the\n\
        threshold violations. Exits with status 1 if the pull request would fail.\n\n\
        Examples:\n  threshold check --file payload.json --max-files 10\n  cat payload.json | threshold check")]
    Check {
        /// Read payload from file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
    /// Create a default .threshold.toml configuration file
    #[command(long_about = "Create a default .threshold.toml configuration file.\n\n\
        Generates a commented template with all available options.\n\
        Fails if .threshold.toml already exists.")]
    Init,
}

#[derive(Args)]
struct ThresholdArgs {
    /// Maximum number of changed files (0 disables the check)
    #[arg(long)]
    max_files: Option<u64>,

    /// Close violating pull requests instead of posting a failing status
    #[arg(long)]
    strict: bool,
}

impl ThresholdArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(max_files) = self.max_files {
            config.thresholds.max_files = max_files;
        }
        if self.strict {
            config.thresholds.strict = true;
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)
            .into_diagnostic()
            .wrap_err(format!("loading {}", path.display()))?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                Config::from_file(default_path)
                    .into_diagnostic()
                    .wrap_err(format!("loading {DEFAULT_CONFIG_PATH}"))?
            } else {
                Config::default()
            }
        }
    };
    config.apply_env();
    Ok(config)
}

fn read_payload(file: &Option<PathBuf>) -> Result<Vec<u8>> {
    match file {
        Some(path) => std::fs::read(path)
            .into_diagnostic()
            .wrap_err(format!("reading {}", path.display())),
        None => {
            let mut input = Vec::new();
            std::io::stdin()
                .read_to_end(&mut input)
                .into_diagnostic()
                .wrap_err("reading stdin")?;
            Ok(input)
        }
    }
}

fn warn_inert_thresholds(config: &Config) {
    for (name, value) in config.thresholds.inert_thresholds() {
        tracing::warn!(threshold = name, value, "threshold is configured but not evaluated");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    human_panic::setup_panic!();

    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli.command {
        None => {
            println!("threshold v{}: pull request complexity gate\n", env!("CARGO_PKG_VERSION"));
            println!("  threshold init     Create a .threshold.toml config file");
            println!("  threshold serve    Listen for pull request webhooks");
            println!("  threshold check    Evaluate a webhook payload offline\n");
            println!("Run 'threshold <command> --help' for details.");
        }
        Some(Command::Serve {
            bind,
            host,
            token,
            ref thresholds,
        }) => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(host) = host {
                config.github.host = Some(host);
            }
            if let Some(token) = token {
                config.github.token = Some(token);
            }
            thresholds.apply(&mut config);

            warn_inert_thresholds(&config);
            if config.github.token.is_none() {
                tracing::warn!("no GitHub token configured, requests will be unauthenticated");
            }
            tracing::info!(
                max_files = config.thresholds.max_files,
                strict = config.thresholds.strict,
                "thresholds loaded"
            );

            let client = GitHubClient::new(&config.github).into_diagnostic()?;
            let state = Arc::new(AppState::new(config.thresholds.clone(), Arc::new(client)));
            threshold_server::serve(&config.server.bind, state)
                .await
                .into_diagnostic()?;
        }
        Some(Command::Check {
            ref file,
            ref thresholds,
        }) => {
            let mut config = load_config(cli.config.as_deref())?;
            thresholds.apply(&mut config);
            warn_inert_thresholds(&config);

            let input = read_payload(file)?;
            let event = PullRequestEvent::parse(&input).into_diagnostic()?;
            let pr = match event.into_delivery().into_diagnostic()? {
                Delivery::Ignored(reason) => {
                    println!("Ignored: {reason}");
                    return Ok(());
                }
                Delivery::Evaluate(pr) => pr,
            };

            let violations = threshold_core::evaluate(&pr, &config.thresholds);
            if violations.is_empty() {
                println!("{pr}: all thresholds passed");
                if cli.verbose {
                    println!("would post a success status on {}", pr.head_sha);
                }
                return Ok(());
            }

            println!("{pr}: {} threshold(s) exceeded", violations.len());
            for violation in &violations {
                println!("  - {violation}");
            }
            if cli.verbose {
                let action = if config.thresholds.strict {
                    "comment and close the pull request"
                } else {
                    "comment and post a failure status"
                };
                println!("would {action}");
                println!(
                    "\n{}",
                    threshold_server::reactor::comment_body(&violations)
                );
            }
            std::process::exit(1);
        }
        Some(Command::Init) => {
            let path = Path::new(DEFAULT_CONFIG_PATH);
            if path.exists() {
                miette::bail!("{DEFAULT_CONFIG_PATH} already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG_TEMPLATE).into_diagnostic()?;
            println!("Created {DEFAULT_CONFIG_PATH} with default configuration");
        }
    }

    Ok(())
}
