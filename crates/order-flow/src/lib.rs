//! Crate `order-flow` — el camino de un pedido desde el stream hasta la caché
//!
//! - `IngestPipeline`: valida, cachea y persiste cada mensaje recibido.
//! - `OrderReader`: lecturas con caché primero y respaldo en el
//!   almacenamiento (con relleno de la caché).
//! - `bootstrap`: precalienta la caché al arrancar o siembra la plantilla si
//!   el almacenamiento está vacío.
//!
//! Los tres comparten la misma `OrderCache` (vía `Arc`) y el mismo
//! `OrderRepository`.
//!
//! Ejemplo rápido:
//! ```rust
//! use order_domain::{InMemoryOrderRepository, OrderCache};
//! use order_flow::{IngestPipeline, OrderReader};
//! use std::sync::Arc;
//! let repo = Arc::new(InMemoryOrderRepository::new());
//! let cache = Arc::new(OrderCache::new());
//! let pipeline = IngestPipeline::new(repo.clone(), cache.clone());
//! let reader = OrderReader::new(repo, cache);
//! let body = r#"{"order_uid":"A1","delivery":{},"payment":{},"items":[{"x":1}]}"#;
//! pipeline.handle(1, bytes::Bytes::from_static(body.as_bytes()));
//! assert_eq!(reader.get_by_key("A1").unwrap().unwrap().as_ref(), body.as_bytes());
//! ```
pub mod bootstrap;
pub mod ingest;
pub mod service;

pub use bootstrap::*;
pub use ingest::*;
pub use service::*;
