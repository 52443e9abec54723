pub mod cli;
pub mod commands;
pub mod config;

use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use odre_config::{PATHS, TomlConfigBackend};
use odre_core::services::{PlanController, PlanRepository};
use odre_core::{CatalogFilter, SongCatalog, transpose};
use odre_storage::{CatalogConfig, JsonSongSource, SqliteDocumentStore, StorageConfig};

use crate::cli::{Cli, Command, PlanCommand};
use crate::config::LogConfig;

/// `RUST_LOG` manda; si no está, el filtro de la sección `[log]`.
pub fn init_tracing(default_filter: &str) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .compact()
    .init();
}

pub async fn run(cli: Cli) -> Result<()> {
  let backend = match &cli.config {
    Some(path) => TomlConfigBackend::with_file(path),
    None => TomlConfigBackend::new(PATHS.clone()),
  };

  let log = LogConfig::load_from(&backend).context("reading [log] config")?;
  init_tracing(&log.filter);
  debug!(config = %backend.path().display(), "configuration loaded");

  let out = match cli.command {
    Command::Songs { search, rhythm } => {
      let catalog = load_catalog(&backend).await?;
      let filter = CatalogFilter { text: search, rhythm };
      commands::list_songs(&catalog, &filter)
    }

    Command::Transpose { file, semitones } => {
      let text = tokio::fs::read_to_string(&file).await.with_context(|| format!("reading {}", file.display()))?;
      transpose(&text, semitones)
    }

    Command::Plan(cmd) => {
      let ctl = open_controller(&backend)?;
      match cmd {
        PlanCommand::Show(d) => commands::show_plan(&ctl, d.date).await?,
        PlanCommand::Add { date, song_ids, director, category } => {
          let catalog = load_catalog(&backend).await?;
          commands::add_songs(&ctl, &catalog, date.date, &song_ids, director.as_deref(), category.as_ref()).await?
        }
        PlanCommand::Remove { date, position } => commands::remove_song(&ctl, date.date, position).await?,
        PlanCommand::Move { date, from, to } => commands::move_song(&ctl, date.date, from, to).await?,
        PlanCommand::Delete(d) => commands::delete_plan(&ctl, d.date).await?,
        PlanCommand::Share { date, json } => commands::share_plan(&ctl, date.date, json).await?,
      }
    }
  };

  print!("{out}");
  Ok(())
}

async fn load_catalog(backend: &TomlConfigBackend) -> Result<SongCatalog> {
  let cfg = CatalogConfig::load_from(backend).context("reading [catalog] config")?;
  let source = JsonSongSource::from_config(&cfg);
  SongCatalog::load(&source).await.with_context(|| format!("loading songs from {}", source.path().display()))
}

fn open_controller(backend: &TomlConfigBackend) -> Result<PlanController<SqliteDocumentStore>> {
  let cfg = StorageConfig::load_from(backend).context("reading [storage] config")?;
  if let Some(parent) = cfg.db_path.parent() {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }

  let store = SqliteDocumentStore::open(&cfg.database_url()).context("opening plan store")?;
  Ok(PlanController::new(PlanRepository::new(store)))
}
