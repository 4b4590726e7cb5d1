use std::error::Error;
use std::sync::Arc;

use order_domain::{DomainError, OrderCache, OrderRepository};
use order_flow::{bootstrap, BootstrapReport, FileTemplate, IngestPipeline, OrderReader};
use order_persistence::DieselOrderRepository;
use order_service::config::ServiceConfig;
use order_service::http::{router, AppState};
use order_service::stream::{run_consumer, NatsOrderStream};
use tokio::signal;

/// Arranque del servicio de pedidos.
///
/// Orden: configuración → conexión a la base (fatal si falla) → arranque de
/// la caché → suscripción al stream (si falla el servicio sigue sirviendo
/// lecturas) → servidor HTTP hasta SIGINT/SIGTERM.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    order_service::init_logging();
    let config = ServiceConfig::from_env()?;

    let database_url = config.database_url.clone();
    let connected = tokio::task::spawn_blocking(move || {
                        let repo = DieselOrderRepository::new(&database_url)?;
                        repo.ping()?;
                        Ok::<_, DomainError>(repo)
                    }).await?;
    let repo = match connected {
        Ok(repo) => repo,
        Err(e) => {
            tracing::error!("db init: {}", e);
            return Err(e.into());
        }
    };
    let repo: Arc<dyn OrderRepository> = Arc::new(repo);
    let cache = Arc::new(OrderCache::new());

    let report = {
        let repo = repo.clone();
        let cache = cache.clone();
        let template = FileTemplate(config.template_path.clone());
        tokio::task::spawn_blocking(move || bootstrap(&*repo, &cache, &template)).await?
    };
    match &report {
        BootstrapReport::Degraded { reason } => tracing::warn!("bootstrap degraded: {}", reason),
        other => tracing::info!("bootstrap finished: {:?}", other),
    }

    let pipeline = Arc::new(IngestPipeline::new(repo.clone(), cache.clone()));
    let consumer = match NatsOrderStream::subscribe(&config.stream).await {
        Ok(stream) => Some(tokio::spawn(run_consumer(stream, pipeline))),
        Err(e) => {
            tracing::warn!("{} (service will still run)", e);
            None
        }
    };

    let state = AppState { reader: Arc::new(OrderReader::new(repo, cache)) };
    let app = router(state, Some(config.web_dir.as_path()));

    let listener = match tokio::net::TcpListener::bind(config.http_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("listen: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("http server listening on {}", config.http_addr);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    // Abortar el consumidor suelta la suscripción.
    if let Some(consumer) = consumer {
        consumer.abort();
    }
    tracing::info!("shutting down");
    Ok(())
}

/// Espera SIGTERM o SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
