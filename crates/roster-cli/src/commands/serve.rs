use anyhow::{Context as _, Result};
use clap::Args;
use roster_config::{parse_bind, AppConfig};
use roster_store::{paths, Store};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on, overrides `server.bind`.
    #[arg(long)]
    pub bind: Option<String>,
    #[arg(long)]
    pub db_path: Option<PathBuf>,
}

pub fn serve(config: &AppConfig, args: ServeArgs) -> Result<()> {
    let mut server = config.server.clone();
    if let Some(raw) = args.bind {
        server.bind = parse_bind(&raw)?;
    }

    let db_path = paths::resolve_db_path(args.db_path.or_else(|| server.db_path.clone()))
        .with_context(|| "resolve database path")?;
    debug!(path = %db_path.display(), "database path resolved");

    let store = Store::open(&db_path)
        .with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;
    info!(path = %db_path.display(), "database ready");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_context(|| "start async runtime")?;
    runtime
        .block_on(roster_server::run(store, &server))
        .with_context(|| "serve api")?;
    Ok(())
}
