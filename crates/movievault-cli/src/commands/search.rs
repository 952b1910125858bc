use super::context::AppContext;
use super::prompts;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use movievault_core::{map_title_response, search_candidates, EngineError, ImportPipeline, SearchOutcome};
use movievault_sources::{create_search_service, OmdbClient, SearchService};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const IMPORT_WAIT: Duration = Duration::from_secs(5);

fn search_service(ctx: &AppContext) -> Result<Arc<dyn SearchService>> {
    create_search_service(&ctx.config, &ctx.credentials)
        .map_err(|e| eyre!("{:#}", e))?
        .ok_or_else(|| eyre!("OMDb search is not configured. Run 'movievault config omdb' first."))
}

fn omdb_client(ctx: &AppContext) -> Result<OmdbClient> {
    OmdbClient::from_config(&ctx.config, &ctx.credentials)
        .map_err(|e| eyre!("{}", e))?
        .ok_or_else(|| eyre!("OMDb search is not configured. Run 'movievault config omdb' first."))
}

async fn run_query(
    search: impl Future<Output = Result<SearchOutcome, EngineError>>,
    query: &str,
    output: &Output,
) -> Result<SearchOutcome> {
    let spinner = super::spinner(output, &format!("Searching for '{}'...", query.trim()));
    let result = search.await;
    spinner.finish_and_clear();
    result.wrap_err("Search failed")
}

fn report_no_results(outcome: &SearchOutcome, output: &Output) {
    match output.format() {
        OutputFormat::Human => match &outcome.message {
            Some(message) => output.warn(format!("No results ({})", message)),
            None => output.warn("No results"),
        },
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "type": "search_results",
                "results": [],
                "message": outcome.message
            }));
        }
    }
}

pub async fn run_search(ctx: &AppContext, query: String, output: &Output) -> Result<()> {
    let search = search_service(ctx)?;
    let outcome = run_query(search_candidates(search.as_ref(), &query), &query, output).await?;
    if outcome.is_empty() {
        report_no_results(&outcome, output);
    } else {
        output.candidates(&outcome.candidates);
    }
    Ok(())
}

pub async fn run_import(ctx: &AppContext, query: String, pick: Option<usize>, output: &Output) -> Result<()> {
    let search = search_service(ctx)?;
    let (engine, _session) = ctx.live_engine(IMPORT_WAIT, output).await?;
    let pipeline = ImportPipeline::new(search, engine.clone());

    let result = import_one(&pipeline, &query, pick, output).await;
    engine.teardown();
    result
}

async fn import_one(pipeline: &ImportPipeline, query: &str, pick: Option<usize>, output: &Output) -> Result<()> {
    let outcome = run_query(pipeline.search(query), query, output).await?;
    if outcome.is_empty() {
        report_no_results(&outcome, output);
        return Ok(());
    }

    let index = match pick {
        Some(n) if n >= 1 && n <= outcome.candidates.len() => n - 1,
        Some(n) => {
            return Err(eyre!(
                "--pick {} is out of range (1-{})",
                n,
                outcome.candidates.len()
            ))
        }
        None if super::is_interactive() => {
            let labels: Vec<String> = outcome
                .candidates
                .iter()
                .map(|c| match &c.year {
                    Some(year) => format!("{} ({}) [{}]", c.title, year, c.imdb_id),
                    None => format!("{} [{}]", c.title, c.imdb_id),
                })
                .collect();
            match prompts::prompt_select("Import which movie?", &labels)? {
                Some(index) => index,
                None => {
                    output.info("Nothing imported");
                    return Ok(());
                }
            }
        }
        None => {
            output.candidates(&outcome.candidates);
            return Err(eyre!("Several results; choose one with --pick <n>"));
        }
    };

    let candidate = &outcome.candidates[index];
    let id = pipeline
        .import(candidate)
        .await
        .wrap_err_with(|| format!("Could not import '{}'", candidate.title))?;

    match output.format() {
        OutputFormat::Human => output.success(format!("Added '{}' to your watchlist ({})", candidate.title, id)),
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({ "type": "imported", "id": id, "candidate": candidate }));
        }
    }
    Ok(())
}

/// Show one title by IMDb id; with `add`, put it on the watchlist too.
pub async fn run_info(ctx: &AppContext, imdb_id: String, add: bool, output: &Output) -> Result<()> {
    let imdb_id = imdb_id.trim().to_string();
    if imdb_id.is_empty() {
        return Err(eyre!("IMDb id cannot be empty"));
    }
    let client = omdb_client(ctx)?;

    let spinner = super::spinner(output, &format!("Looking up {}...", imdb_id));
    let raw = client.fetch_by_imdb_id(&imdb_id).await;
    spinner.finish_and_clear();
    let raw = raw.wrap_err("Lookup failed")?;

    let details = match map_title_response(&raw) {
        Ok(details) => details,
        Err(message) => {
            return Err(eyre!(
                "No title found for {}{}",
                imdb_id,
                message.map(|m| format!(" ({})", m)).unwrap_or_default()
            ))
        }
    };
    output.title(&details);

    if add {
        let (engine, _session) = ctx.live_engine(IMPORT_WAIT, output).await?;
        let pipeline = ImportPipeline::new(Arc::new(client), engine.clone());
        let result = pipeline.import(&details.candidate).await;
        engine.teardown();
        let id = result.wrap_err_with(|| format!("Could not import '{}'", details.candidate.title))?;
        output.success(format!("Added '{}' to your watchlist ({})", details.candidate.title, id));
    }
    Ok(())
}
