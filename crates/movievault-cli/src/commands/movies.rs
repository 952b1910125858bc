use super::context::AppContext;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use movievault_models::{MovieDraft, MovieId, MovieStatus, MovieUpdate};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const WRITE_WAIT: Duration = Duration::from_secs(5);

pub async fn run_list(ctx: &AppContext, wait_ms: u64, output: &Output) -> Result<()> {
    debug!(wait_ms, "List command started");
    let (engine, _session) = ctx.live_engine(Duration::from_millis(wait_ms), output).await?;
    let view = engine.view();
    output.movies(&view.movies);
    engine.teardown();
    Ok(())
}

pub async fn run_add(
    ctx: &AppContext,
    title: String,
    status: MovieStatus,
    rating: Option<String>,
    review: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut draft = MovieDraft::new(title).with_status(status);
    if let Some(rating) = rating {
        draft = draft.with_rating(rating);
    }
    if let Some(review) = review {
        draft = draft.with_review(review);
    }

    let (engine, _session) = ctx.live_engine(WRITE_WAIT, output).await?;
    let result = engine.create(draft).await;
    let view = engine.view();
    engine.teardown();
    let id = result.wrap_err("Could not add movie")?;

    let title = view.get(&id).map(|m| m.title.clone()).unwrap_or_default();
    match output.format() {
        OutputFormat::Human => output.success(format!("Added '{}' ({})", title, id)),
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({ "type": "created", "id": id, "title": title }));
        }
    }
    Ok(())
}

/// Translate update flags into field operations.
pub fn build_update(
    title: Option<String>,
    status: Option<MovieStatus>,
    rating: Option<String>,
    clear_rating: bool,
    review: Option<String>,
    clear_review: bool,
) -> MovieUpdate {
    let mut update = MovieUpdate::new();
    if let Some(title) = title {
        update = update.title(title);
    }
    if let Some(status) = status {
        update = update.status(status);
    }
    if clear_rating {
        update = update.clear_rating();
    } else if let Some(rating) = rating {
        update = update.rating(rating);
    }
    if clear_review {
        update = update.clear_review();
    } else if let Some(review) = review {
        update = update.review(review);
    }
    update
}

pub async fn run_update(ctx: &AppContext, id: String, update: MovieUpdate, output: &Output) -> Result<()> {
    let id = MovieId::new(id);
    let (engine, _session) = ctx.live_engine(WRITE_WAIT, output).await?;
    let result = engine.update(&id, update).await;
    engine.teardown();
    result.wrap_err_with(|| format!("Could not update movie {}", id))?;

    match output.format() {
        OutputFormat::Human => output.success(format!("Updated {}", id)),
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({ "type": "updated", "id": id }));
        }
    }
    Ok(())
}

pub async fn run_delete(ctx: &AppContext, id: String, output: &Output) -> Result<()> {
    let id = MovieId::new(id);
    let (engine, _session) = ctx.live_engine(WRITE_WAIT, output).await?;
    let result = engine.delete(&id).await;
    engine.teardown();
    result.wrap_err_with(|| format!("Could not delete movie {}", id))?;

    match output.format() {
        OutputFormat::Human => output.success(format!("Deleted {}", id)),
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({ "type": "deleted", "id": id }));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use movievault_models::FieldUpdate;

    #[test]
    fn test_build_update_clear_wins() {
        let update = build_update(None, None, Some("7".into()), true, Some("ok".into()), false);
        assert_eq!(update.rating, FieldUpdate::Remove);
        assert_eq!(update.review, FieldUpdate::Set("ok".to_string()));
        assert_eq!(update.title, None);
    }

    #[test]
    fn test_build_update_untouched_fields_are_kept() {
        let update = build_update(None, Some(MovieStatus::Watched), None, false, None, false);
        assert_eq!(update.status, Some(MovieStatus::Watched));
        assert!(update.rating.is_keep());
        assert!(update.review.is_keep());
    }
}
