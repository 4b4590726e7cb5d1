// Archivo: ingest.rs
// Propósito: procesar cada mensaje del stream de pedidos:
// Received -> Validated -> Keyed -> Cached -> Persisted | PersistFailed.
// Un mensaje inválido termina en Rejected. Nada aquí reintenta ni propaga
// errores al transporte: el resultado se registra y se devuelve.
use bytes::Bytes;
use order_domain::{validate_order, DomainError, OrderCache, OrderRepository, ValidationError};
use std::sync::Arc;

/// Resultado terminal del procesamiento de un mensaje.
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// El payload no pasó la validación; no se tocó caché ni almacenamiento.
    Rejected(ValidationError),
    /// Guardado en caché y en el almacenamiento.
    Persisted { order_uid: String },
    /// Guardado en caché pero la escritura duradera falló. El pedido sigue
    /// visible en lecturas hasta que una escritura posterior lo corrija.
    PersistFailed { order_uid: String, error: DomainError },
}

impl IngestOutcome {
    pub fn order_uid(&self) -> Option<&str> {
        match self {
            IngestOutcome::Rejected(_) => None,
            IngestOutcome::Persisted { order_uid } | IngestOutcome::PersistFailed { order_uid, .. } => Some(order_uid),
        }
    }
}

/// Pipeline de ingesta: un mensaje a la vez, de principio a fin.
///
/// La caché se actualiza antes de escribir en el almacenamiento (lectura de
/// lo recién escrito antes que durabilidad). Si la escritura falla el pedido
/// queda visible sólo en caché y no se reintenta.
pub struct IngestPipeline<R>
    where R: OrderRepository + ?Sized
{
    repo: Arc<R>,
    cache: Arc<OrderCache>,
}

impl<R> IngestPipeline<R> where R: OrderRepository + ?Sized
{
    pub fn new(repo: Arc<R>, cache: Arc<OrderCache>) -> Self {
        Self { repo, cache }
    }

    /// Procesa un mensaje recibido con número de secuencia `sequence`.
    pub fn handle(&self, sequence: u64, payload: Bytes) -> IngestOutcome {
        log::info!("received message {}", sequence);

        let order = match validate_order(payload) {
            Ok(order) => order,
            Err(e) => {
                log::warn!("invalid order skipped (message {}): {}", sequence, e);
                return IngestOutcome::Rejected(e);
            }
        };
        let (order_uid, payload) = order.into_parts();
        if order_uid.is_empty() {
            log::error!("message {} passed validation without order_uid", sequence);
            return IngestOutcome::Rejected(ValidationError::MissingKey);
        }

        self.cache.upsert(order_uid.clone(), payload.clone());

        match self.repo.save_order(&order_uid, &payload) {
            Ok(()) => {
                log::info!("order {} saved successfully", order_uid);
                IngestOutcome::Persisted { order_uid }
            }
            Err(error) => {
                log::error!("save to db error for order {}: {}", order_uid, error);
                IngestOutcome::PersistFailed { order_uid, error }
            }
        }
    }
}
