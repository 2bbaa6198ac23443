use super::prompts;
use crate::output::{styled_table, Output};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::Cell;
use popcorn_config::{Config, PathManager, DEFAULT_API_KEY};
use serde_json::json;
use std::path::Path;

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    match cmd {
        ConfigCommands::Show { full } => show_config(&paths, full, output),
        ConfigCommands::Init => init_config(&paths, output),
        ConfigCommands::SetApiKey { api_key } => set_api_key(&paths, &api_key, output),
    }
}

fn load(config_file: &Path) -> Result<Config> {
    Config::load_or_default(config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))
}

fn save(config: &Config, config_file: &Path) -> Result<()> {
    config
        .validate()
        .map_err(|e| eyre!("Refusing to save invalid configuration: {}", e))?;
    config
        .save_to_file(config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))
}

fn show_config(paths: &PathManager, full: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Built-in defaults are in use. Run 'popcorn config init' to create one.");
    }
    let config = load(&config_file)?;
    let api_key = if full { config.omdb.api_key.clone() } else { mask_key(&config.omdb.api_key) };

    output.json(&json!({
        "config_file": config_file.display().to_string(),
        "store_dir": paths.store_dir().display().to_string(),
        "omdb": {
            "api_key": api_key,
            "base_url": config.omdb.base_url,
            "timeout_seconds": config.omdb.timeout_seconds,
        },
        "search": { "min_query_len": config.search.min_query_len },
        "watchlist": { "storage_key": config.watchlist.storage_key },
        "rating": { "max_rating": config.rating.max_rating },
    }));

    let mut table = styled_table(["Setting", "Value"]);
    table.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display())]);
    table.add_row(vec![Cell::new("Store directory"), Cell::new(paths.store_dir().display())]);
    table.add_row(vec![Cell::new("OMDb API key"), Cell::new(api_key)]);
    table.add_row(vec![Cell::new("OMDb base URL"), Cell::new(&config.omdb.base_url)]);
    table.add_row(vec![
        Cell::new("Request timeout"),
        Cell::new(format!("{}s", config.omdb.timeout_seconds)),
    ]);
    table.add_row(vec![
        Cell::new("Minimum query length"),
        Cell::new(config.search.min_query_len),
    ]);
    table.add_row(vec![
        Cell::new("Watchlist storage key"),
        Cell::new(&config.watchlist.storage_key),
    ]);
    table.add_row(vec![Cell::new("Maximum rating"), Cell::new(config.rating.max_rating)]);
    output.table(&table);
    Ok(())
}

fn init_config(paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    let mut config = load(&config_file)?;

    if config_file.exists()
        && !prompts::prompt_yes_no(
            &format!("Overwrite existing configuration at {}?", config_file.display()),
            false,
        )?
    {
        output.info("Cancelled");
        return Ok(());
    }

    output.info("Get a free OMDb API key at https://www.omdbapi.com/apikey.aspx");
    let api_key = prompts::prompt_secret("OMDb API key (leave empty to keep the current one)")?;
    if !api_key.trim().is_empty() {
        config.omdb.api_key = api_key.trim().to_string();
    }
    config.omdb.base_url = prompts::prompt_string("OMDb base URL", Some(&config.omdb.base_url))?
        .trim()
        .to_string();
    config.omdb.timeout_seconds =
        prompts::prompt_number_in("Request timeout in seconds", config.omdb.timeout_seconds, 1..=120)?;
    config.search.min_query_len =
        prompts::prompt_number_in("Minimum query length", config.search.min_query_len, 1..=20)?;
    config.rating.max_rating = prompts::prompt_number_in("Maximum star rating", config.rating.max_rating, 1..=10)?;

    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;
    save(&config, &config_file)?;
    output.success(format!("Configuration saved to {}", config_file.display()));
    Ok(())
}

fn set_api_key(paths: &PathManager, api_key: &str, output: &Output) -> Result<()> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(eyre!("API key must not be empty"));
    }

    let config_file = paths.config_file();
    let mut config = load(&config_file)?;
    config.omdb.api_key = api_key.to_string();
    save(&config, &config_file)?;

    output.success(format!("API key saved to {}", config_file.display()));
    Ok(())
}

fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "<not set>".to_string();
    }
    if key == DEFAULT_API_KEY {
        return "<built-in demo key>".to_string();
    }
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
