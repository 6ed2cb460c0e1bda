// ABOUTME: Command-line entry point for the scrape console
// ABOUTME: Parses arguments, sets up logging and dispatches to commands

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrape_console::commands::{self, hubspot::SendOptions, Console};
use scrape_console::remote::{LaunchRequest, NewSearch, SearchUpdate};
use scrape_console::Config;

#[derive(Parser)]
#[command(name = "scrape-console")]
#[command(about = "Operator console for the LinkedIn profile scraping service", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Backend base URL, overrides the config file
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        username: String,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Show backend and database health
    Status,
    /// List scraped profiles
    Profiles {
        /// Only profiles found by this search
        #[arg(long)]
        search: Option<i64>,
        /// Case-insensitive match on name, headline, location, email or phone
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Start a scraping job and wait for it to finish
    Run {
        #[arg(short, long)]
        name: String,
        /// LinkedIn search results URL to scrape
        #[arg(short, long)]
        url: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Manage saved searches
    #[command(subcommand)]
    Searches(SearchCommands),
    /// Look up emails for profiles that have not been checked yet
    EmailSearch,
    /// Push selected contacts to HubSpot
    #[command(subcommand)]
    Hubspot(HubspotCommands),
}

#[derive(Subcommand)]
enum SearchCommands {
    List,
    Show {
        id: i64,
    },
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        url: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// e.g. active or inactive
        #[arg(long)]
        status: Option<String>,
    },
    Delete {
        id: i64,
    },
    /// Profiles found by one search
    Profiles {
        id: i64,
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Totals and the searches with the most profiles
    Stats,
}

#[derive(Subcommand)]
enum HubspotCommands {
    Send(SendArgs),
}

#[derive(Args)]
struct SendArgs {
    /// Comma-separated profile ids
    #[arg(long, value_delimiter = ',')]
    ids: Vec<i64>,
    /// Send every profile that matches the filter
    #[arg(long, conflicts_with = "ids")]
    all: bool,
    #[arg(short, long)]
    filter: Option<String>,
    /// Pick from the profiles of this search instead of all profiles
    #[arg(long)]
    search: Option<i64>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scrape_console=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
        config.validate()?;
    }
    let mut console = Console::new(config)?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&mut console, &username, password).await
        }
        Commands::Logout => commands::auth::logout(&mut console),
        Commands::Status => commands::status::show(&console).await,
        Commands::Profiles { search, filter } => {
            commands::profiles::list(&console, search, filter.as_deref()).await
        }
        Commands::Run {
            name,
            url,
            description,
        } => commands::run::run(&console, LaunchRequest::new(url, name, description)).await,
        Commands::Searches(command) => match command {
            SearchCommands::List => commands::searches::list(&console).await,
            SearchCommands::Show { id } => commands::searches::show(&console, id).await,
            SearchCommands::Create {
                name,
                url,
                description,
            } => {
                let search = NewSearch {
                    name,
                    description,
                    search_url: url,
                };
                commands::searches::create(&console, search).await
            }
            SearchCommands::Update {
                id,
                name,
                description,
                status,
            } => {
                let update = SearchUpdate {
                    name,
                    description,
                    status,
                };
                commands::searches::update(&console, id, update).await
            }
            SearchCommands::Delete { id } => commands::searches::delete(&console, id).await,
            SearchCommands::Profiles { id, filter } => {
                commands::searches::profiles(&console, id, filter.as_deref()).await
            }
            SearchCommands::Stats => commands::searches::statistics(&console).await,
        },
        Commands::EmailSearch => commands::status::email_search(&console).await,
        Commands::Hubspot(HubspotCommands::Send(args)) => {
            let options = SendOptions {
                ids: args.ids,
                all: args.all,
                filter: args.filter,
                search_id: args.search,
            };
            commands::hubspot::send(&console, options).await
        }
    }
}
