use super::context::AppContext;
use crate::output::Output;
use crate::ProfileCommands;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use movievault_core::ProfileService;
use std::sync::Arc;

pub async fn run_profile(ctx: AppContext, cmd: ProfileCommands, output: &Output) -> Result<()> {
    match cmd {
        ProfileCommands::Rename { name } => rename(ctx, name, output).await,
    }
}

async fn rename(mut ctx: AppContext, name: String, output: &Output) -> Result<()> {
    let session = ctx.require_session()?;
    let store = ctx.open_store()?;
    let service = ProfileService::new(Arc::new(store.clone()), Arc::new(store));

    let name = service
        .rename(&session, &name)
        .await
        .wrap_err("Could not change display name")?;

    ctx.credentials.set_session_display_name(&name);
    ctx.credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;

    output.success(format!("Display name changed to {}", name));
    Ok(())
}
