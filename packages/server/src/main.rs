use std::net::SocketAddr;
use std::sync::Arc;

use common::storage::filesystem::FilesystemMediaStore;
use tracing::{Level, info};

use server::config::AppConfig;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = server::database::init_db(&config.database.url).await?;
    server::seed::seed_bootstrap_admin(&db, &config.auth).await?;

    let media = FilesystemMediaStore::new(
        config.media.root_dir.clone(),
        config.media.max_file_size,
    )
    .await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState {
        db,
        media: Arc::new(media),
        config,
    };

    let app = server::build_router(state);

    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
