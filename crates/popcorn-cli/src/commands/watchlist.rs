use super::details::fetch_detail;
use super::{prompts, AppContext};
use crate::output::{format_average, styled_table, Output};
use crate::WatchlistCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, CellAlignment, Table};
use popcorn_core::StarRating;
use popcorn_models::{WatchSummary, WatchlistEntry};
use serde_json::json;

pub async fn run_watchlist(cmd: WatchlistCommands, ctx: &AppContext, output: &Output) -> Result<()> {
    match cmd {
        WatchlistCommands::List => list(ctx, output),
        WatchlistCommands::Summary => summary(ctx, output),
        WatchlistCommands::Add { imdb_id, rating } => add(&imdb_id, rating, ctx, output).await,
        WatchlistCommands::Remove { imdb_id } => remove(&imdb_id, ctx, output),
        WatchlistCommands::Clear { yes } => clear(yes, ctx, output),
    }
}

fn list(ctx: &AppContext, output: &Output) -> Result<()> {
    let watchlist = ctx.watchlist()?;
    let summary = watchlist.summary();

    output.json(&json!({
        "entries": watchlist.entries(),
        "summary": summary,
    }));
    if !output.is_human() {
        return Ok(());
    }
    if watchlist.is_empty() {
        output.info("Your watchlist is empty. Add a title with 'popcorn watchlist add <imdb-id> --rating <n>'.");
        return Ok(());
    }
    output.table(&entries_table(watchlist.entries()));
    output.info(summary_line(&summary));
    Ok(())
}

fn summary(ctx: &AppContext, output: &Output) -> Result<()> {
    let summary = ctx.watchlist()?.summary();
    output.json(&serde_json::to_value(summary)?);
    if output.is_human() {
        output.info(summary_line(&summary));
    }
    Ok(())
}

async fn add(imdb_id: &str, rating: u8, ctx: &AppContext, output: &Output) -> Result<()> {
    let max = ctx.config.rating.max_rating;
    if !(1..=max).contains(&rating) {
        return Err(eyre!("Rating must be between 1 and {}, got {}", max, rating));
    }

    let mut watchlist = ctx.watchlist()?;
    if watchlist.contains(imdb_id) {
        output.warn(format!("{} is already on your watchlist", imdb_id));
        return Ok(());
    }

    let detail = fetch_detail(imdb_id, ctx).await?;
    // Fetching may resolve to a canonical id that is already present
    if watchlist.contains(&detail.imdb_id) {
        output.warn(format!("{} is already on your watchlist", detail.title));
        return Ok(());
    }

    let mut stars = StarRating::new(max);
    let user_rating = stars.click(rating);
    let entry = WatchlistEntry::from_detail(&detail, user_rating, stars.times_rated());

    watchlist
        .add(entry.clone())
        .map_err(|e| eyre!("Failed to save watchlist: {}", e))?;

    output.json(&json!({
        "type": "added",
        "entry": entry,
    }));
    output.success(format!("Added {} ({}) rated {}/{}", detail.title, detail.year, user_rating, max));
    Ok(())
}

fn remove(imdb_id: &str, ctx: &AppContext, output: &Output) -> Result<()> {
    let mut watchlist = ctx.watchlist()?;
    let removed = watchlist
        .remove(imdb_id)
        .map_err(|e| eyre!("Failed to save watchlist: {}", e))?;

    output.json(&json!({
        "type": "removed",
        "imdb_id": imdb_id,
        "removed": removed,
    }));
    if removed == 0 {
        output.warn(format!("{} is not on your watchlist", imdb_id));
    } else {
        output.success(format!("Removed {} from your watchlist", imdb_id));
    }
    Ok(())
}

fn clear(yes: bool, ctx: &AppContext, output: &Output) -> Result<()> {
    let mut watchlist = ctx.watchlist()?;
    if watchlist.is_empty() {
        output.info("Your watchlist is already empty");
        return Ok(());
    }

    if !yes {
        let question = format!("Remove all {} entries from your watchlist?", watchlist.len());
        if !prompts::prompt_yes_no(&question, false)? {
            output.info("Cancelled");
            return Ok(());
        }
    }

    let count = watchlist.len();
    watchlist.clear().map_err(|e| eyre!("Failed to save watchlist: {}", e))?;
    output.success(format!("Removed {} entries", count));
    Ok(())
}

fn entries_table(entries: &[WatchlistEntry]) -> Table {
    let mut table = styled_table(["IMDb ID", "Title", "Year", "⭐ IMDb", "🌟 Yours", "⏳ Runtime"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.imdb_id),
            Cell::new(&entry.title),
            Cell::new(&entry.year),
            Cell::new(format!("{:.1}", entry.critic_rating)).set_alignment(CellAlignment::Right),
            Cell::new(entry.user_rating).set_alignment(CellAlignment::Right),
            Cell::new(format!("{} min", entry.runtime_minutes)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn summary_line(summary: &WatchSummary) -> String {
    format!(
        "#️⃣ {} movies  ⭐️ {}  🌟 {}  ⏳ {} min",
        summary.count,
        format_average(summary.mean_critic_rating),
        format_average(summary.mean_user_rating),
        format_average(summary.mean_runtime_minutes),
    )
}
