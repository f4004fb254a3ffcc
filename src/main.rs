//! cinesearch CLI - search movies, series and episodes from the terminal.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use cinesearch::render::{
    render_compact, render_details_state, render_search_view, POPULAR_SEARCHES, SUGGESTIONS,
};
use cinesearch::{
    load_details, ClientConfig, DetailsState, OmdbClient, SearchController, SearchQuery,
    SearchState, TypeFilter, DEFAULT_BASE_URL,
};

/// cinesearch - movie search over the OMDb API
#[derive(Parser)]
#[command(name = "cinesearch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// OMDb API key
    #[arg(long, env = "OMDB_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// API endpoint
    #[arg(long, env = "OMDB_BASE_URL", global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "10")]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for titles
    Search(SearchArgs),

    /// Reopen a shared search location, e.g. "q=batman&type=movie&page=2"
    Open(OpenArgs),

    /// Show the full record for one IMDb id
    Details(DetailsArgs),

    /// Start an interactive search session
    Interactive(InteractiveArgs),
}

#[derive(Parser)]
struct SearchArgs {
    /// Search text
    query: String,

    /// Type filter: all, movie, series or episode
    #[arg(short = 't', long = "type", default_value = "all")]
    type_filter: TypeFilter,

    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    page: u32,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Parser)]
struct OpenArgs {
    /// Location query string or full URL
    location: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Parser)]
struct DetailsArgs {
    /// IMDb id, e.g. tt0468569
    imdb_id: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Parser)]
struct InteractiveArgs {
    /// Location to restore before the first prompt
    location: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Compact tab-separated output
    Compact,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("cinesearch=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let api_key = cli
        .api_key
        .clone()
        .context("No API key: pass --api-key or set OMDB_API_KEY")?;
    let config = ClientConfig::new(api_key)
        .with_base_url(cli.base_url.clone())
        .with_timeout(cli.timeout);
    let client = Arc::new(OmdbClient::new(config)?);

    match cli.command {
        Commands::Search(args) => {
            let query = SearchQuery::new(args.query)
                .with_type(args.type_filter)
                .with_page(args.page);
            let mut controller = SearchController::new(client);
            if !controller.search(query).await {
                anyhow::bail!("Search text cannot be blank");
            }
            print_search(&controller, args.format)
        }
        Commands::Open(args) => {
            let mut controller = SearchController::new(client);
            if !controller.mount(&args.location).await {
                anyhow::bail!("Location '{}' has no search text (q=...)", args.location);
            }
            print_search(&controller, args.format)
        }
        Commands::Details(args) => {
            let state = load_details(&*client, &args.imdb_id).await;
            print_details(&state, args.format)
        }
        Commands::Interactive(args) => run_interactive(client, args.location).await,
    }
}

fn print_search(controller: &SearchController, format: OutputFormat) -> Result<ExitCode> {
    let state = controller.state();
    match format {
        OutputFormat::Text => {
            print!("{}", render_search_view(controller));
            println!("\nShare: ?{}", controller.location_string());
        }
        OutputFormat::Json => {
            let value = match state {
                SearchState::Success(outcome) => json!({
                    "location": controller.location_string(),
                    "status": "success",
                    "page": outcome.page,
                    "total_pages": outcome.pagination().total_pages,
                    "total_results": outcome.total_results,
                    "results": outcome.results,
                }),
                SearchState::Empty(message) => json!({
                    "location": controller.location_string(),
                    "status": "empty",
                    "message": message,
                    "results": [],
                }),
                SearchState::Error(message) => json!({
                    "location": controller.location_string(),
                    "status": "error",
                    "message": message,
                }),
                SearchState::Idle | SearchState::Loading => json!({ "status": "idle" }),
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Compact => match state {
            SearchState::Success(outcome) => print!("{}", render_compact(&outcome.results)),
            other => {
                if let Some(message) = other.message() {
                    eprintln!("{}", message);
                }
            }
        },
    }

    Ok(match state {
        SearchState::Error(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

fn print_details(state: &DetailsState, format: OutputFormat) -> Result<ExitCode> {
    match (format, state) {
        (OutputFormat::Json, DetailsState::Loaded(details)) => {
            println!("{}", serde_json::to_string_pretty(details)?);
        }
        (OutputFormat::Json, DetailsState::Failed(message)) => {
            println!("{}", serde_json::to_string_pretty(&json!({ "error": message }))?);
        }
        _ => print!("{}", render_details_state(state)),
    }

    Ok(match state {
        DetailsState::Failed(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

/// One line typed at the interactive prompt.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Blank,
    Search(String),
    Popular(String),
    Type(TypeFilter),
    Page(u32),
    Next,
    Prev,
    First,
    Last,
    Retry,
    Open(String),
    Location,
    Help,
    Quit,
    Invalid(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Blank;
        }
        let Some(command) = line.strip_prefix(':') else {
            return ReplCommand::Search(line.to_string());
        };
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "type" | "t" => match arg.parse() {
                Ok(filter) => ReplCommand::Type(filter),
                Err(e) => ReplCommand::Invalid(format!("{}", e)),
            },
            "page" => match arg.parse() {
                Ok(page) => ReplCommand::Page(page),
                Err(_) => ReplCommand::Invalid(format!("not a page number: '{}'", arg)),
            },
            "popular" => {
                let count = POPULAR_SEARCHES.len();
                match arg.parse::<usize>() {
                    Ok(n) if (1..=count).contains(&n) => {
                        ReplCommand::Popular(POPULAR_SEARCHES[n - 1].to_string())
                    }
                    _ => ReplCommand::Invalid(format!("usage: :popular 1-{}", count)),
                }
            }
            "next" | "n" => ReplCommand::Next,
            "prev" | "p" => ReplCommand::Prev,
            "first" => ReplCommand::First,
            "last" => ReplCommand::Last,
            "retry" | "r" => ReplCommand::Retry,
            "open" | "o" if !arg.is_empty() => ReplCommand::Open(arg.to_string()),
            "open" | "o" => ReplCommand::Invalid("usage: :open <imdb-id>".to_string()),
            "location" | "loc" => ReplCommand::Location,
            "help" | "h" | "?" => ReplCommand::Help,
            "quit" | "q" | "exit" => ReplCommand::Quit,
            other => ReplCommand::Invalid(format!("unknown command ':{}'", other)),
        }
    }
}

fn print_help() {
    println!("Type text to search, or a command:");
    println!("  :type all|movie|series|episode   change the type filter");
    println!("  :page N, :next, :prev, :first, :last");
    println!("  :popular N                        run popular search N across all types");
    println!("  :retry                            repeat the last search");
    println!("  :open <imdb-id>                   show details");
    println!("  :location                         print the shareable location");
    println!("  :quit");
    println!("Suggestions: {}", SUGGESTIONS.join(", "));
}

async fn run_interactive(client: Arc<OmdbClient>, location: Option<String>) -> Result<ExitCode> {
    let mut controller = SearchController::new(client.clone());

    if let Some(location) = location {
        controller.mount(&location).await;
    }
    print!("{}", render_search_view(&controller));
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let pagination = controller.state().outcome().map(|o| o.pagination());
        let issued = match ReplCommand::parse(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Blank => continue,
            ReplCommand::Help => {
                print_help();
                continue;
            }
            ReplCommand::Location => {
                println!("?{}", controller.location_string());
                continue;
            }
            ReplCommand::Invalid(message) => {
                eprintln!("{}", message);
                continue;
            }
            ReplCommand::Open(imdb_id) => {
                print!("{}", render_details_state(&DetailsState::Loading));
                let state = load_details(&*client, &imdb_id).await;
                print!("{}", render_details_state(&state));
                continue;
            }
            ReplCommand::Search(text) => controller.search_for(text).await,
            ReplCommand::Popular(term) => controller.search_popular(term).await,
            ReplCommand::Type(filter) => controller.select_type(filter).await,
            ReplCommand::Retry => controller.retry().await,
            ReplCommand::Page(page) => controller.change_page(page).await,
            ReplCommand::Next => go_to(&mut controller, pagination.and_then(|p| p.next())).await,
            ReplCommand::Prev => {
                go_to(&mut controller, pagination.and_then(|p| p.previous())).await
            }
            ReplCommand::First => go_to(&mut controller, pagination.and_then(|p| p.first())).await,
            ReplCommand::Last => go_to(&mut controller, pagination.and_then(|p| p.last())).await,
        };

        if issued {
            print!("{}", render_search_view(&controller));
            println!("\nShare: ?{}", controller.location_string());
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn go_to(controller: &mut SearchController, page: Option<u32>) -> bool {
    match page {
        Some(page) => controller.change_page(page).await,
        None => {
            eprintln!("No such page");
            false
        }
    }
}
