use clap::{ArgAction, Parser, Subcommand};
use commands::{config, context::AppContext, login, movies, profile, search};
use movievault_models::MovieStatus;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "movievault")]
#[command(about = "MovieVault - Your personal movie watchlist, ratings and reviews")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as a user; all other commands act on this user's collection
    Login {
        /// User id that scopes the collection
        user_id: String,

        #[arg(long)]
        email: Option<String>,

        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
    /// Sign out
    Logout,
    /// List the movies in your collection
    List {
        /// How long to wait for the first snapshot before giving up
        #[arg(long, value_name = "MS", default_value_t = 5000)]
        wait_ms: u64,
    },
    /// Add a movie
    Add {
        title: String,

        #[arg(long, value_enum, default_value = "watchlist")]
        status: StatusArg,

        /// Rating from 1 to 10
        #[arg(long)]
        rating: Option<String>,

        #[arg(long)]
        review: Option<String>,
    },
    /// Change fields of a movie
    #[command(long_about = "Change fields of a movie. Fields not mentioned are left as they are; --clear-rating and --clear-review remove the field entirely.")]
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        #[arg(long, conflicts_with = "clear_rating")]
        rating: Option<String>,

        #[arg(long, action = ArgAction::SetTrue)]
        clear_rating: bool,

        #[arg(long, conflicts_with = "clear_review")]
        review: Option<String>,

        #[arg(long, action = ArgAction::SetTrue)]
        clear_review: bool,
    },
    /// Delete a movie
    Delete {
        id: String,
    },
    /// Search OMDb
    Search {
        query: String,
    },
    /// Show one title from OMDb by its IMDb id
    Info {
        /// IMDb id, e.g. tt0133093
        imdb_id: String,

        /// Also add it to your watchlist
        #[arg(long, action = ArgAction::SetTrue)]
        add: bool,
    },
    /// Search OMDb and add a result to your watchlist
    Import {
        query: String,

        /// Result to import (1-based); prompts when omitted
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Manage your profile
    Profile {
        #[command(subcommand)]
        cmd: ProfileCommands,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Change your display name
    Rename {
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Configure OMDb search
    #[command(long_about = "Configure the OMDb API used by search and import. Get a key at https://www.omdbapi.com/apikey.aspx.")]
    Omdb {
        /// OMDb API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        base_url: Option<String>,

        /// Turn search off
        #[arg(long, action = ArgAction::SetTrue)]
        disable: bool,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StatusArg {
    Watchlist,
    Watched,
}

impl From<StatusArg> for MovieStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Watchlist => MovieStatus::Watchlist,
            StatusArg::Watched => MovieStatus::Watched,
        }
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let ctx = AppContext::load()?;
    logging::init_logging(cli.verbose, cli.quiet, &ctx.config.logging)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Login { user_id, email, name } => login::run_login(ctx, user_id, email, name, &output).await,
        Commands::Logout => login::run_logout(ctx, &output),
        Commands::List { wait_ms } => movies::run_list(&ctx, wait_ms, &output).await,
        Commands::Add { title, status, rating, review } => {
            movies::run_add(&ctx, title, status.into(), rating, review, &output).await
        }
        Commands::Update {
            id,
            title,
            status,
            rating,
            clear_rating,
            review,
            clear_review,
        } => {
            let update = movies::build_update(title, status.map(Into::into), rating, clear_rating, review, clear_review);
            movies::run_update(&ctx, id, update, &output).await
        }
        Commands::Delete { id } => movies::run_delete(&ctx, id, &output).await,
        Commands::Search { query } => search::run_search(&ctx, query, &output).await,
        Commands::Info { imdb_id, add } => search::run_info(&ctx, imdb_id, add, &output).await,
        Commands::Import { query, pick } => search::run_import(&ctx, query, pick, &output).await,
        Commands::Profile { cmd } => profile::run_profile(ctx, cmd, &output).await,
        Commands::Config { cmd } => config::run_config(ctx, cmd, &output),
    }
}
