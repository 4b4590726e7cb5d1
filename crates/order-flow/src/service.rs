// Archivo: service.rs
// Propósito: lecturas de pedidos con caché primero y el almacenamiento como
// respaldo. Lo invocan los handlers HTTP.
use bytes::Bytes;
use order_domain::{DomainError, OrderCache, OrderRepository};
use std::sync::Arc;

/// Servicio de lectura de pedidos.
pub struct OrderReader<R>
    where R: OrderRepository + ?Sized
{
    repo: Arc<R>,
    cache: Arc<OrderCache>,
}

impl<R> OrderReader<R> where R: OrderRepository + ?Sized
{
    pub fn new(repo: Arc<R>, cache: Arc<OrderCache>) -> Self {
        Self { repo, cache }
    }

    /// Busca un pedido por `order_uid`.
    ///
    /// Un acierto en caché responde sin tocar el almacenamiento. Si no está
    /// en caché se consulta el almacenamiento y, si existe, se copia a la
    /// caché (sin pisar un valor cacheado entretanto) y se devuelve lo que
    /// quedó en la caché. `Ok(None)` significa que no existe en
    /// ninguno de los dos; `Err` es un fallo del almacenamiento.
    pub fn get_by_key(&self, order_uid: &str) -> Result<Option<Bytes>, DomainError> {
        if let Some(hit) = self.cache.get(order_uid) {
            return Ok(Some(hit));
        }
        match self.repo.get_order(order_uid)? {
            Some(payload) => {
                log::debug!("cache miss for order {}, backfilled from store", order_uid);
                // Una ingesta concurrente pudo cachear una versión más nueva
                // mientras se leía el almacenamiento; esa gana.
                Ok(Some(self.cache.insert_if_absent(order_uid, payload)))
            }
            None => Ok(None),
        }
    }

    /// Contenido actual de la caché. No consulta el almacenamiento, así que
    /// sólo incluye pedidos ya cacheados.
    pub fn list_all(&self) -> Vec<(String, Bytes)> {
        self.cache.snapshot()
    }

    pub fn cache(&self) -> &Arc<OrderCache> {
        &self.cache
    }
}
