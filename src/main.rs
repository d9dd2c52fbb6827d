use chrono::Local;
use dotenvy::dotenv;
use recurring_ledger::{
    config::{database, definitions},
    core::{locks::DefinitionLocks, seed},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load configured definitions
    let config = definitions::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(
        "Loaded {} configured definitions.",
        config.definitions().count()
    );

    // 4. Connect and ensure tables
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Apply configured definitions against today's date
    let today = Local::now().date_naive();
    let locks = DefinitionLocks::new();
    let outcome = seed::seed_definitions(&db, &locks, &config, today)
        .await
        .inspect_err(|e| error!("Failed to seed definitions: {}", e))?;
    info!("{}", seed::format_seed_summary(&outcome));

    Ok(())
}
