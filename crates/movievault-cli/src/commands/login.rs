use super::context::AppContext;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use movievault_models::Session;
use serde_json::json;
use tracing::info;

pub async fn run_login(
    mut ctx: AppContext,
    user_id: String,
    email: Option<String>,
    name: Option<String>,
    output: &Output,
) -> Result<()> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(eyre!("User id cannot be empty"));
    }

    let mut session = Session::new(user_id);
    session.email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());
    session.display_name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

    let store = ctx.open_store()?;
    store
        .register_account(&session)
        .map_err(|e| eyre!("Failed to register account: {}", e))?;
    if session.display_name.is_none() {
        session.display_name = store.account_display_name(session.id());
    }

    ctx.credentials.set_session(&session);
    ctx.credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;

    info!(session = %session.user_id, "Signed in");
    match output.format() {
        OutputFormat::Human => {
            let who = session.display_name.as_deref().unwrap_or(user_id);
            output.success(format!("Signed in as {}", who));
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({ "type": "login", "session": session }));
        }
    }
    Ok(())
}

pub fn run_logout(mut ctx: AppContext, output: &Output) -> Result<()> {
    if ctx.credentials.session().is_none() {
        output.info("Not signed in");
        return Ok(());
    }
    ctx.credentials.clear_session();
    ctx.credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;
    output.success("Signed out");
    Ok(())
}
