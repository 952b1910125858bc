use super::context::AppContext;
use super::prompts;
use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use movievault_config::{default_omdb_base_url, Config, OmdbConfig};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(ctx: AppContext, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(&ctx, full, output),
        ConfigCommands::Omdb { api_key, base_url, disable } => configure_omdb(ctx, api_key, base_url, disable, output),
    }
}

fn show_config(ctx: &AppContext, full: bool, output: &Output) -> Result<()> {
    let config = &ctx.config;
    let config_file = ctx.paths.config_file();
    let store_path = config.store_path(&ctx.paths);
    let session = ctx.credentials.session();

    let key_display = |key: &str| if full { key.to_string() } else { mask_string(key) };

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }
            if !config_file.exists() {
                output.warn(format!("Configuration file not found at: {} (using defaults)", config_file.display()));
            }

            println!("\n{}", "Configuration".bright_cyan().bold());
            println!();

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
            ]);
            table.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display().to_string())]);
            table.add_row(vec![Cell::new("Store file"), Cell::new(store_path.display().to_string())]);
            table.add_row(vec![
                Cell::new("Signed in as"),
                Cell::new(
                    session
                        .as_ref()
                        .map(|s| match &s.display_name {
                            Some(name) => format!("{} ({})", name, s.user_id),
                            None => s.user_id.to_string(),
                        })
                        .unwrap_or_else(|| "<not signed in>".to_string()),
                ),
            ]);

            match &config.omdb {
                Some(omdb) => {
                    table.add_row(vec![
                        Cell::new("OMDb enabled"),
                        Cell::new(if omdb.enabled { "✓".green().to_string() } else { "✗".red().to_string() }),
                    ]);
                    table.add_row(vec![Cell::new("OMDb API key"), Cell::new(key_display(&omdb.api_key))]);
                    table.add_row(vec![Cell::new("OMDb URL"), Cell::new(&omdb.base_url)]);
                    table.add_row(vec![Cell::new("OMDb timeout"), Cell::new(format!("{}s", omdb.timeout_seconds))]);
                }
                None => {
                    table.add_row(vec![Cell::new("OMDb"), Cell::new("<not configured>")]);
                }
            }
            if let Some(key) = ctx.credentials.get_omdb_api_key() {
                table.add_row(vec![Cell::new("OMDb key (credentials)"), Cell::new(key_display(key))]);
            }

            table.add_row(vec![Cell::new("Log level"), Cell::new(&config.logging.level)]);
            table.add_row(vec![Cell::new("JSON logs"), Cell::new(config.logging.json)]);
            if let Some(file) = &config.logging.file {
                table.add_row(vec![Cell::new("Log file"), Cell::new(file.display().to_string())]);
            }

            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "type": "config",
                "config_file": config_file,
                "store_file": store_path,
                "session": session,
                "omdb": config.omdb.as_ref().map(|omdb| json!({
                    "enabled": omdb.enabled,
                    "api_key": key_display(&omdb.api_key),
                    "base_url": omdb.base_url,
                    "timeout_seconds": omdb.timeout_seconds,
                })),
                "logging": config.logging,
            }));
        }
    }
    Ok(())
}

fn configure_omdb(
    mut ctx: AppContext,
    api_key: Option<String>,
    base_url: Option<String>,
    disable: bool,
    output: &Output,
) -> Result<()> {
    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;
    let config_file = ctx.paths.config_file();

    if disable {
        match ctx.config.omdb.as_mut() {
            Some(omdb) => omdb.enabled = false,
            None => {
                output.info("OMDb is not configured");
                return Ok(());
            }
        }
        save_config(&ctx.config, &config_file)?;
        output.success("OMDb search disabled");
        return Ok(());
    }

    let existing = ctx.config.omdb.clone();
    let api_key = match api_key {
        Some(key) => key,
        None => {
            let current = existing.as_ref().map(|o| o.api_key.as_str()).filter(|k| !k.is_empty());
            prompts::prompt_string("OMDb API key", current)?
        }
    };
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(eyre!("OMDb API key cannot be empty"));
    }

    ctx.config.omdb = Some(OmdbConfig {
        enabled: true,
        api_key,
        base_url: base_url
            .or_else(|| existing.as_ref().map(|o| o.base_url.clone()))
            .unwrap_or_else(default_omdb_base_url),
        timeout_seconds: existing.map(|o| o.timeout_seconds).unwrap_or(15),
    });

    ctx.config
        .validate()
        .map_err(|e| eyre!("Invalid OMDb configuration: {}", e))?;
    save_config(&ctx.config, &config_file)?;
    output.success(format!("OMDb search configured ({})", config_file.display()));
    Ok(())
}

fn save_config(config: &Config, path: &std::path::PathBuf) -> Result<()> {
    config
        .save_to_file(path)
        .map_err(|e| eyre!("Failed to save config to {}: {}", path.display(), e))
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == "YOUR_API_KEY" {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("YOUR_API_KEY"), "<not set>");
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string("abcdef12"), "ab***12");
    }
}
