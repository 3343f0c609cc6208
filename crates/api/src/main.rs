use anyhow::Context;

use bookstore_infra::{snapshot, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    bookstore_observability::init(config.log_format);

    let catalog = snapshot::load(&config.snapshot_path)
        .with_context(|| format!("loading snapshot {}", config.snapshot_path.display()))?;

    let _writer = config.snapshot_interval.map(|every| {
        tracing::info!(every_secs = every.as_secs(), "scheduled snapshot writer enabled");
        snapshot::spawn_scheduled_writer(catalog.clone(), config.snapshot_path.clone(), every)
    });

    let app = bookstore_api::app::build_app(catalog, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
