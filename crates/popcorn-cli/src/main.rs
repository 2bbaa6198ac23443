use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, config, details, search, watchlist, AppContext};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "Popcorn - search movies, rate them, and keep a watchlist")]
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
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive search and watchlist screen (default)
    #[command(long_about = "Open the interactive screen. Press Enter to focus the search box and type at least three characters to search. Tab switches between results and watchlist, 'o' opens the highlighted result, Escape closes the details panel, 'q' quits.")]
    Browse,
    /// Search titles once and print the matches
    Search {
        /// Free-text title query
        query: String,
    },
    /// Show the full record of one title
    Details {
        /// IMDb id, e.g. tt0120338
        imdb_id: String,
    },
    /// Inspect or edit the watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: Option<WatchlistCommands>,
    },
    /// Show or edit configuration
    #[command(long_about = "Manage the configuration file. Running without a subcommand shows the current configuration.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum WatchlistCommands {
    /// List entries with the summary line (default)
    List,
    /// Print count and averages only
    Summary,
    /// Fetch a title and add it with your rating
    Add {
        /// IMDb id, e.g. tt0120338
        imdb_id: String,

        /// Your rating, 1 up to the configured maximum
        #[arg(long)]
        rating: u8,
    },
    /// Remove every entry with this id
    Remove {
        imdb_id: String,
    },
    /// Remove all entries
    Clear {
        /// Do not ask for confirmation
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
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
    /// Interactive configuration wizard
    Init,
    /// Store a personal OMDb API key
    SetApiKey {
        api_key: String,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Browse);
    let output = output::Output::new(cli.output, cli.quiet);

    // The interactive screen owns the terminal, so its logs go to a file
    if matches!(command, Commands::Browse) {
        let paths = popcorn_config::PathManager::default();
        logging::init_logging_with_file(cli.verbose, cli.quiet, Some(paths.browse_log_file()))
            .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    } else {
        logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    }

    match command {
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &output).await
        }
        Commands::Browse => browse::run_browse(&AppContext::load()?, &output).await,
        Commands::Search { query } => search::run_search(&query, &AppContext::load()?, &output).await,
        Commands::Details { imdb_id } => details::run_details(&imdb_id, &AppContext::load()?, &output).await,
        Commands::Watchlist { cmd } => {
            let cmd = cmd.unwrap_or(WatchlistCommands::List);
            watchlist::run_watchlist(cmd, &AppContext::load()?, &output).await
        }
    }
}
