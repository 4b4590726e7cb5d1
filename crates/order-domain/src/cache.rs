// cache.rs
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Caché en memoria `order_uid -> payload`.
///
/// Sin expiración ni límite de tamaño. Las lecturas (`get`, `snapshot`)
/// pueden ejecutarse en paralelo; `upsert` e `insert_if_absent` toman el
/// lock de escritura sólo durante la inserción. Ninguna operación hace I/O.
#[derive(Debug, Default)]
pub struct OrderCache {
    entries: RwLock<HashMap<String, Bytes>>,
}

impl OrderCache {
    pub fn new() -> Self {
        Self::default()
    }

    // Una escritura es un único `insert`, así que un lock envenenado no deja
    // el mapa a medias y se puede seguir usando.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Bytes>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Bytes>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, order_uid: &str) -> Option<Bytes> {
        self.read().get(order_uid).cloned()
    }

    /// Reemplaza cualquier valor previo para `order_uid`.
    pub fn upsert(&self, order_uid: impl Into<String>, payload: Bytes) {
        self.write().insert(order_uid.into(), payload);
    }

    /// Inserta `payload` sólo si `order_uid` no está en la caché y devuelve
    /// el valor que queda cacheado. Un valor ya presente nunca se reemplaza.
    pub fn insert_if_absent(&self, order_uid: impl Into<String>, payload: Bytes) -> Bytes {
        self.write().entry(order_uid.into()).or_insert(payload).clone()
    }

    /// Copia puntual del contenido, sin orden garantizado.
    pub fn snapshot(&self) -> Vec<(String, Bytes)> {
        self.read().iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
