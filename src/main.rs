//! quest-relay — store posted messages as files in a GitHub repository.
//!
//!   quest-relay serve --owner <user> --repo <repo> --token <token>   → HTTP relay
//!   quest-relay hash <message>                                       → print content id

use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, CommandFactory, Parser, Subcommand};
use quest_relay::config::{RelayConfig, DEFAULT_API_BASE};
use quest_relay::{logging, server, ContentId};

// ─── Help text ────────────────────────────────────────────────────────────────

const AFTER_HELP: &str = "\
ENVIRONMENT:
    TOKEN                   GitHub token used as `Authorization: token <TOKEN>`
    USER                    Owner of the target repository
    REPO                    Name of the target repository
    LISTEN_ADDR             Address to listen on (default 0.0.0.0:8080)

REQUEST:
    curl -X POST localhost:8080 -d '{\"message\": \"hello\"}'
    → writes contents/aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d";

const SERVE_AFTER_HELP: &str = "\
EXAMPLES:
    quest-relay serve --owner octocat --repo answers --token ghp_xxx
    TOKEN=ghp_xxx USER=octocat REPO=answers quest-relay serve --listen 127.0.0.1:3000";

// ─── CLI definition ───────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "quest-relay",
    version,
    about = "quest-relay — store posted messages as files in a GitHub repository",
    after_help = AFTER_HELP,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP relay (foreground)
    #[command(after_help = SERVE_AFTER_HELP)]
    Serve(ServeArgs),

    /// Print the content id a message would be stored under
    Hash {
        /// Message text, hashed exactly as given
        message: String,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// Address to listen on (e.g. 0.0.0.0:8080)
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    listen: String,
    /// Owner of the target repository
    #[arg(long, env = "USER")]
    owner: String,
    /// Name of the target repository
    #[arg(long, env = "REPO")]
    repo: String,
    /// GitHub token
    #[arg(long, env = "TOKEN", hide_env_values = true)]
    token: String,
    /// GitHub REST API root
    #[arg(long, env = "GITHUB_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,
    /// Timeout for the outbound request, in seconds
    #[arg(long, env = "RELAY_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RELAY_LOG_LEVEL", default_value = "info")]
    log_level: String,
    /// Log format (text, json)
    #[arg(long, env = "RELAY_LOG_FORMAT", default_value = "text")]
    log_format: String,
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        None => {
            Cli::command().print_help().ok();
            println!();
            ExitCode::SUCCESS
        }
        Some(Commands::Serve(args)) => run_serve(args),
        Some(Commands::Hash { message }) => {
            println!("{}", ContentId::of(&message));
            ExitCode::SUCCESS
        }
    }
}

// ─── Server mode ──────────────────────────────────────────────────────────────

fn run_serve(args: ServeArgs) -> ExitCode {
    if let Err(err) = logging::init_tracing(&args.log_level, &args.log_format) {
        eprintln!("error: cannot initialise logging: {err:#}");
        return ExitCode::FAILURE;
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("error: cannot start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let opts = server::ServeOptions {
        listen_addr: args.listen,
        config: RelayConfig::new(args.owner, args.repo, args.token)
            .with_api_base(args.api_base)
            .with_timeout(Duration::from_secs(args.timeout_secs)),
    };

    if let Err(err) = rt.block_on(server::run_serve(opts)) {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
