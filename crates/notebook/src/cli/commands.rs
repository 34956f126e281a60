use super::render;
use super::setup::{Cli, Commands};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use notebookapp::api::NotebookApi;
use notebookapp::config::NotebookConfig;
use notebookapp::logging::init_tracing;
use notebookapp::store::FsBackend;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = NotebookConfig::load(cli.data_dir.as_deref())?;
    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    init_tracing(level)?;

    let api = NotebookApi::from_config(&config);
    tracing::debug!(data_dir = %config.resolved_data_dir().display(), "store opened");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    let output = runtime.block_on(dispatch(&api, cli.command))?;
    print!("{}", output);
    Ok(())
}

async fn dispatch(api: &NotebookApi<FsBackend>, command: Commands) -> Result<String> {
    match command {
        Commands::List { json } => {
            let metas = api.list_documents().await?;
            if json {
                Ok(format!("{}\n", serde_json::to_string_pretty(&metas)?))
            } else {
                Ok(render::render_list(&metas, Utc::now()))
            }
        }
        Commands::Show { id, full } => {
            let record = api
                .load_document(&id)
                .await
                .ok_or_else(|| anyhow!("Document not available: {}", id))?;
            let shown = if full {
                serde_json::to_string_pretty(&record)?
            } else {
                serde_json::to_string_pretty(&record.content)?
            };
            Ok(format!("{}\n", shown))
        }
        Commands::Save { name, id, file } => {
            let content = read_content(file.as_deref())?;
            let id = id.unwrap_or_else(|| api.generate_id());
            let meta = api.save_document(&id, &name, &content).await?;
            Ok(render::render_saved(&meta))
        }
        Commands::Delete { id } => {
            api.delete_document(&id).await?;
            Ok(format!("Deleted {}\n", id))
        }
        Commands::NewId => Ok(format!("{}\n", api.generate_id())),
        Commands::Doctor => {
            let report = api.doctor().await?;
            Ok(render::render_doctor(&report))
        }
    }
}

fn read_content(file: Option<&Path>) -> Result<Value> {
    let raw = match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("content is not valid JSON")
}
