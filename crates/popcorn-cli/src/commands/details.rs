use super::{spinner, AppContext};
use crate::output::{format_average, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use popcorn_core::DetailsFetcher;
use popcorn_models::MovieDetail;
use std::sync::Arc;
use tokio::sync::Notify;

pub async fn run_details(imdb_id: &str, ctx: &AppContext, output: &Output) -> Result<()> {
    let detail = fetch_detail(imdb_id, ctx).await?;

    output.json(&serde_json::to_value(&detail)?);
    if output.is_human() {
        let watchlist = ctx.watchlist()?;
        output.info(detail_block(&detail));
        if watchlist.contains(&detail.imdb_id) {
            output.success("Already on your watchlist");
        }
    }
    Ok(())
}

/// Load one title through the details fetcher, mapping a failed load to an error
pub async fn fetch_detail(imdb_id: &str, ctx: &AppContext) -> Result<MovieDetail> {
    let mut fetcher = DetailsFetcher::new(ctx.source()?, Arc::new(Notify::new()));
    fetcher.select(imdb_id);

    let pb = spinner(&format!("Loading {}...", imdb_id));
    fetcher.settle().await;
    pb.finish_and_clear();

    let state = fetcher.state();
    match (state.detail, state.error) {
        (Some(detail), _) => Ok(detail),
        (None, Some(error)) => Err(eyre!("{}: {}", imdb_id, error)),
        (None, None) => Err(eyre!("No details loaded for {}", imdb_id)),
    }
}

pub fn detail_block(detail: &MovieDetail) -> String {
    let mut lines = vec![
        String::new(),
        format!("{} ({})", detail.title.bright_cyan().bold(), detail.year),
        format!("{} • {} min", detail.genre, detail.runtime_minutes),
        format!("⭐ {} IMDb rating", format_average(detail.critic_rating)),
        String::new(),
    ];
    if !detail.plot.is_empty() {
        lines.push(detail.plot.italic().to_string());
    }
    lines.push(format!("Starring {}", detail.actors));
    lines.push(format!("Directed by {}", detail.director));
    lines.join("\n")
}
