use crate::DomainError;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Contrato de persistencia duradera de pedidos.
///
/// Las implementaciones deben poder usarse desde varios hilos a la vez
/// (ingesta y lecturas HTTP comparten la misma instancia). Dos `save_order`
/// concurrentes sobre la misma clave se resuelven en el almacenamiento: gana
/// la última escritura.
pub trait OrderRepository: Send + Sync {
    /// Recupera el payload de un pedido. `Ok(None)` si no existe.
    fn get_order(&self, order_uid: &str) -> Result<Option<Bytes>, DomainError>;

    /// Inserta o reemplaza el pedido y refresca su marca de tiempo.
    fn save_order(&self, order_uid: &str, payload: &Bytes) -> Result<(), DomainError>;

    /// Número total de pedidos almacenados.
    fn count_orders(&self) -> Result<i64, DomainError>;

    /// Todos los pedidos almacenados (se usa para precalentar la caché).
    fn list_orders(&self) -> Result<Vec<(String, Bytes)>, DomainError>;
}

#[derive(Debug, Clone)]
struct StoredOrder {
    payload: Bytes,
    created_at: DateTime<Utc>,
}

/// Implementación en memoria para tests y desarrollo.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<HashMap<String, StoredOrder>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // Helper to map poisoned mutex errors into DomainError
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, StoredOrder>>, DomainError> {
        self.orders
            .lock()
            .map_err(|e| DomainError::Persistence(format!("Mutex 'orders' poisoned: {}", e)))
    }

    /// Momento de la última escritura de `order_uid`, si existe.
    pub fn stored_at(&self, order_uid: &str) -> Result<Option<DateTime<Utc>>, DomainError> {
        Ok(self.lock()?.get(order_uid).map(|o| o.created_at))
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn get_order(&self, order_uid: &str) -> Result<Option<Bytes>, DomainError> {
        Ok(self.lock()?.get(order_uid).map(|o| o.payload.clone()))
    }

    fn save_order(&self, order_uid: &str, payload: &Bytes) -> Result<(), DomainError> {
        let row = StoredOrder { payload: payload.clone(),
                                created_at: Utc::now() };
        self.lock()?.insert(order_uid.to_string(), row);
        Ok(())
    }

    fn count_orders(&self) -> Result<i64, DomainError> {
        Ok(self.lock()?.len() as i64)
    }

    fn list_orders(&self) -> Result<Vec<(String, Bytes)>, DomainError> {
        Ok(self.lock()?
               .iter()
               .map(|(k, v)| (k.clone(), v.payload.clone()))
               .collect())
    }
}
