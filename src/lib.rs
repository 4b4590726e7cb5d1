//! Servicio de pedidos: configuración, superficie HTTP y suscripción al
//! stream. El núcleo (validación, caché, ingesta, lecturas y arranque) vive
//! en los crates `order-domain`, `order-flow` y `order-persistence`.
pub mod config;
pub mod http;
pub mod stream;

use tracing_subscriber::EnvFilter;

/// Instala el subscriber de `tracing` (filtro por `RUST_LOG`, `info` por
/// defecto). Los registros del facade `log` de los crates internos se
/// reenvían al mismo subscriber.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
