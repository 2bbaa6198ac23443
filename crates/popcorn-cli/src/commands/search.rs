use super::{spinner, AppContext};
use crate::output::{styled_table, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::Cell;
use popcorn_core::SearchQueryFetcher;
use popcorn_models::SearchResultSummary;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Notify;

pub async fn run_search(query: &str, ctx: &AppContext, output: &Output) -> Result<()> {
    let min_len = ctx.config.search.min_query_len;
    if query.chars().count() < min_len {
        output.warn(format!("Type at least {} characters to search", min_len));
        return Ok(());
    }

    let mut fetcher = SearchQueryFetcher::new(ctx.source()?, min_len, Arc::new(Notify::new()));
    fetcher.set_query(query);

    let pb = spinner(&format!("Searching for \"{}\"...", query));
    fetcher.settle().await;
    pb.finish_and_clear();

    let state = fetcher.state();
    if let Some(error) = state.error {
        return Err(eyre!("{}", error));
    }

    output.json(&json!({
        "query": state.query,
        "count": state.results.len(),
        "results": state.results,
    }));
    if output.is_human() {
        output.table(&results_table(&state.results));
        output.info(format!("Found {} results", state.results.len()));
    }
    Ok(())
}

fn results_table(results: &[SearchResultSummary]) -> comfy_table::Table {
    let mut table = styled_table(["IMDb ID", "Title", "Year"]);
    for result in results {
        table.add_row(vec![
            Cell::new(&result.imdb_id),
            Cell::new(&result.title),
            Cell::new(&result.year),
        ]);
    }
    table
}
