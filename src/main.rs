use anyhow::{Context, Result};
use clap::Parser;
use hackathon_registry_server::catalog::EventCatalog;
use hackathon_registry_server::registry::{Registry, RegistryStore, SqliteRegistryStore};
use hackathon_registry_server::seed::{load_seed_file, seed_store};
use hackathon_registry_server::server::{run_server, RequestsLoggingLevel};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite database file to use for attendee storage.
    #[clap(value_parser = parse_path)]
    pub registry_db: PathBuf,

    /// Path to the JSON file with attendees to seed the database with.
    #[clap(value_parser = parse_path)]
    pub seed_data: PathBuf,

    /// Path to the JSON file listing the registrable (event, category) pairs.
    #[clap(value_parser = parse_path)]
    pub events_catalog: PathBuf,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let store: Arc<dyn RegistryStore> = Arc::new(
        SqliteRegistryStore::new(&cli_args.registry_db)
            .with_context(|| format!("Error opening registry db: {:?}", cli_args.registry_db))?,
    );

    let catalog = EventCatalog::load(&cli_args.events_catalog).with_context(|| {
        format!("Error loading events catalog: {:?}", cli_args.events_catalog)
    })?;

    let seed_users = load_seed_file(&cli_args.seed_data)
        .with_context(|| format!("Error loading seed data: {:?}", cli_args.seed_data))?;
    let report = seed_store(store.as_ref(), &seed_users)?;
    info!(
        "Seeded registry with {} users ({} duplicate emails skipped)",
        report.inserted, report.skipped_duplicates
    );

    let registry = Arc::new(Registry::new(store, catalog));

    info!("Starting server on port {}", cli_args.port);
    run_server(registry, cli_args.logging_level, cli_args.port).await
}
