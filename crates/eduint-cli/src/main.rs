//! Eduint CLI
//!
//! `eduint serve` runs the generation endpoints. The learner commands run
//! the exercises in a terminal against a running server, after signing in.

mod client;
mod console;
mod runs;
mod session;

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use eduint_auth::{AuthClient, OAuthProvider, RetryPolicy};
use eduint_exercise::report::{json::JsonGenerator, MarkdownGenerator};
use eduint_exercise::{
    practice_page, Catalog, GameType, Module, Page, ResultsReport, SpeakingPart, WritingTask,
};
use eduint_server::{create_router, AppState, Config};

use crate::client::ApiClient;
use crate::console::Console;
use crate::session::{ensure_access, SessionStore};

/// Eduint IELTS - AI-generated IELTS practice
///
/// Serves the content generation endpoints and runs practice quizzes, mock
/// tests, games, writing and speaking exercises in the terminal.
#[derive(Parser, Debug)]
#[command(name = "eduint")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: eduint.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base URL of a running Eduint server (default: from config)
    #[arg(long, value_name = "URL", env = "EDUINT_SERVER_URL", global = true)]
    server: Option<String>,

    /// Print results as JSON instead of Markdown
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Run the generation endpoints.
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show practice modules, games and mock tests.
    Catalog,
    /// Practice questions for one module.
    Practice {
        /// reading, writing, listening or speaking
        #[arg(value_parser = parse_module)]
        module: Module,
        /// Number of questions
        #[arg(short = 'n', long)]
        count: Option<u32>,
    },
    /// Timed fifteen-question mock test.
    MockTest,
    /// Play a mini-game.
    Game {
        /// vocabulary-race, grammar-battle, listening-puzzle or reading-sprint
        #[arg(value_parser = parse_game)]
        game: GameType,
        /// Number of rounds
        #[arg(short = 'n', long)]
        count: Option<u32>,
    },
    /// Timed essay with examiner feedback.
    Writing {
        /// task1 or task2 (default: task2)
        #[arg(long, value_parser = parse_task)]
        task: Option<WritingTask>,
    },
    /// Listen to a transcript and answer questions.
    Listening,
    /// Answer a speaking topic and get band feedback.
    Speaking {
        /// part1, part2 or part3 (default: part1)
        #[arg(long, value_parser = parse_part)]
        part: Option<SpeakingPart>,
    },
    /// Print the URL that starts an OAuth sign-in.
    OauthUrl {
        /// google or facebook
        provider: String,
    },
    /// Sign out and forget the stored session.
    SignOut,
}

/// Exercise run by a learner command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exercise {
    /// Multiple-choice practice questions.
    Quiz { module: Module, count: Option<u32> },
    MockTest,
    Game { game: GameType, count: Option<u32> },
    Writing(WritingTask),
    Listening,
    Speaking(SpeakingPart),
}

impl Exercise {
    /// Page hosting the exercise, for the access gate.
    const fn page(self) -> Page {
        match self {
            Self::Quiz { module, .. } => practice_page(module),
            Self::MockTest => Page::TestTaking,
            Self::Game { .. } => Page::Gameplay,
            Self::Writing(_) => Page::WritingPractice,
            Self::Listening => Page::ListeningPractice,
            Self::Speaking(_) => Page::SpeakingPractice,
        }
    }
}

impl Command {
    /// The exercise this command runs, if any.
    ///
    /// Writing, listening and speaking practice have their own exercises
    /// rather than a question list.
    fn exercise(&self) -> Option<Exercise> {
        let exercise = match self {
            Self::Practice { module, count } => match module {
                Module::Writing => Exercise::Writing(WritingTask::default()),
                Module::Listening => Exercise::Listening,
                Module::Speaking => Exercise::Speaking(SpeakingPart::default()),
                Module::Reading => Exercise::Quiz {
                    module: *module,
                    count: *count,
                },
            },
            Self::MockTest => Exercise::MockTest,
            Self::Game { game, count } => Exercise::Game {
                game: *game,
                count: *count,
            },
            Self::Writing { task } => Exercise::Writing(task.unwrap_or_default()),
            Self::Listening => Exercise::Listening,
            Self::Speaking { part } => Exercise::Speaking(part.unwrap_or_default()),
            Self::Serve { .. } | Self::Catalog | Self::OauthUrl { .. } | Self::SignOut => {
                return None
            }
        };
        Some(exercise)
    }

    /// Page the command corresponds to, for the access gate.
    fn page(&self) -> Page {
        match self {
            Self::Catalog => Page::Home,
            _ => self.exercise().map_or(Page::Auth, Exercise::page),
        }
    }

    /// Where a learner lands when an exercise cannot be generated.
    const fn fallback_page(&self) -> Page {
        match self {
            Self::MockTest => Page::MockTests,
            Self::Game { .. } => Page::Gamified,
            _ => Page::Materials,
        }
    }
}

fn parse_module(s: &str) -> Result<Module, String> {
    Module::from_name(s)
        .ok_or_else(|| format!("unknown module '{s}': expected reading, writing, listening or speaking"))
}

fn parse_game(s: &str) -> Result<GameType, String> {
    GameType::from_name(s).ok_or_else(|| {
        format!("unknown game '{s}': expected vocabulary-race, grammar-battle, listening-puzzle or reading-sprint")
    })
}

fn parse_task(s: &str) -> Result<WritingTask, String> {
    match s.trim().to_lowercase().replace(' ', "").as_str() {
        "task1" | "1" => Ok(WritingTask::Task1),
        "task2" | "2" => Ok(WritingTask::Task2),
        _ => Err(format!("unknown task '{s}': expected task1 or task2")),
    }
}

fn parse_part(s: &str) -> Result<SpeakingPart, String> {
    match s.trim().to_lowercase().replace(' ', "").as_str() {
        "part1" | "1" => Ok(SpeakingPart::Part1),
        "part2" | "2" => Ok(SpeakingPart::Part2),
        "part3" | "3" => Ok(SpeakingPart::Part3),
        _ => Err(format!("unknown part '{s}': expected part1, part2 or part3")),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = ?args.config, command = ?args.command, "Starting");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;

    match args.command.clone() {
        Command::Serve { host, port } => serve(config, host, port).await,
        Command::Catalog => {
            print_catalog(args.json)?;
            Ok(())
        }
        Command::OauthUrl { provider } => {
            let provider = OAuthProvider::from_name(&provider)?;
            let auth = auth_client(&config)?;
            println!("{}", auth.oauth_url(provider)?);
            Ok(())
        }
        Command::SignOut => sign_out(&config).await,
        command => run_exercise(&args, &config, command).await,
    }
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

fn auth_client(config: &Config) -> anyhow::Result<AuthClient> {
    let retry = RetryPolicy::new(
        config.auth.max_attempts,
        Duration::from_millis(config.auth.base_delay_ms),
        Duration::from_millis(config.auth.max_delay_ms),
    );
    Ok(AuthClient::new(
        &config.auth.url,
        config.auth.anon_key(),
        config.auth.redirect_to.clone(),
    )?
    .with_retry(retry))
}

fn session_store() -> anyhow::Result<SessionStore> {
    let dir = std::env::current_dir()
        .map_err(|e| anyhow::anyhow!("Cannot determine current directory: {e}"))?;
    Ok(SessionStore::in_dir(&dir))
}

// ============================================================================
// Serve
// ============================================================================

async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    println!("Configuration loaded:");
    println!("  Gateway: {}", config.gateway.url);
    println!("  Model: {}", config.gateway.model);
    println!("  Practice questions: {}", config.generation.practice_count);
    println!("  Game rounds: {}", config.generation.game_count);

    let addr = config.server.bind_address();
    let router = create_router(AppState::new(config)?);

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {addr}: {e}\n\nSuggestion: Try a different port with --port"
        )
    })?;

    println!();
    println!("Eduint server running on http://{addr}");
    println!("Press Ctrl+C to stop");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down");
}

// ============================================================================
// Learner commands
// ============================================================================

async fn run_exercise(args: &Args, config: &Config, command: Command) -> anyhow::Result<()> {
    let Some(exercise) = command.exercise() else {
        return Ok(());
    };
    let auth = auth_client(config)?;
    let store = session_store()?;
    let mut console = Console::new();

    if let Some(user) = ensure_access(exercise.page(), &auth, &store, &mut console).await? {
        tracing::info!(user = %user.id, page = %exercise.page(), "Access granted");
    }

    let server_url = args
        .server
        .clone()
        .unwrap_or_else(|| config.server.base_url());
    let api = ApiClient::new(&server_url)?;

    let result = match exercise {
        Exercise::Quiz { module, count } => runs::practice(&api, &mut console, module, count).await,
        Exercise::MockTest => runs::mock_test(&api, &mut console).await,
        Exercise::Game { game, count } => runs::game(&api, &mut console, game, count).await,
        Exercise::Writing(task) => runs::writing(&api, &mut console, task).await,
        Exercise::Listening => runs::listening(&api, &mut console).await,
        Exercise::Speaking(part) => runs::speaking(&api, &mut console, part).await,
    };

    let report = result.map_err(|e| {
        let page = command.fallback_page();
        anyhow::anyhow!("{e}\n\nReturning to {page}")
    })?;
    print_report(&report, args.json)
}

async fn sign_out(config: &Config) -> anyhow::Result<()> {
    let store = session_store()?;
    let Some(session) = store.load() else {
        println!("Not signed in");
        return Ok(());
    };
    auth_client(config)?.sign_out(&session).await?;
    store.clear()?;
    println!("Signed out");
    Ok(())
}

fn print_report(report: &ResultsReport, json: bool) -> anyhow::Result<()> {
    println!();
    if json {
        println!("{}", JsonGenerator::new(report).generate_pretty()?);
    } else {
        print!("{}", MarkdownGenerator::new(report).generate());
    }
    Ok(())
}

fn print_catalog(json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::get();
    if json {
        println!("{}", serde_json::to_string_pretty(catalog)?);
        return Ok(());
    }

    println!("Practice modules:");
    for info in catalog.modules {
        println!("  {:<10} {}  ({})", info.module.name(), info.description, info.page());
    }
    println!();
    println!("Games:");
    for info in catalog.games {
        println!(
            "  {:<17} {}  [{}, {} points]",
            info.game.name(),
            info.description,
            info.duration,
            info.points
        );
    }
    println!();
    println!("Mock tests:");
    for test in catalog.mock_tests {
        println!("  {:<24} {}  ({})", test.title, test.description, test.duration);
    }
    Ok(())
}
