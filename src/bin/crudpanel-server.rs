use clap::Parser;
use crudpanel::{init_logging, router, serve, PgStore, PrimaryKeyRegistry, ServerConfig, Store};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let config = ServerConfig::parse();

    let database_url = config.redacted_database_url();
    log::info!("connecting to {}", database_url);
    let store = PgStore::connect(
        &config.database_url,
        config.max_connections,
        config.acquire_timeout(),
    )
    .await?;

    match store.ping().await {
        Ok(()) => log::info!("database connection successful"),
        Err(e) => log::error!("database connection failed: {}", e),
    }
    match store.tables().await {
        Ok(tables) => {
            let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
            log::info!("available tables: {:?}", names);
        }
        Err(e) => log::error!("could not list tables: {}", e),
    }

    let listener = TcpListener::bind(config.bind).await?;
    let app = router(Arc::new(store), PrimaryKeyRegistry::default(), &database_url);
    serve(listener, app).await?;
    Ok(())
}
