#![allow(dead_code)]
use bytes::Bytes;
use order_domain::{DomainError, InMemoryOrderRepository, OrderRepository};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Repositorio en memoria que cuenta lecturas y puede fallar a demanda.
#[derive(Default)]
pub struct FlakyRepository {
    pub inner: InMemoryOrderRepository,
    pub fail_writes: AtomicBool,
    pub fail_reads: AtomicBool,
    pub gets: AtomicUsize,
}

impl FlakyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        let repo = Self::default();
        repo.fail_writes.store(true, Ordering::SeqCst);
        repo
    }

    pub fn failing_reads() -> Self {
        let repo = Self::default();
        repo.fail_reads.store(true, Ordering::SeqCst);
        repo
    }

    fn check(&self, flag: &AtomicBool) -> Result<(), DomainError> {
        if flag.load(Ordering::SeqCst) {
            Err(DomainError::Persistence("db: connection refused".into()))
        } else {
            Ok(())
        }
    }
}

impl OrderRepository for FlakyRepository {
    fn get_order(&self, order_uid: &str) -> Result<Option<Bytes>, DomainError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check(&self.fail_reads)?;
        self.inner.get_order(order_uid)
    }

    fn save_order(&self, order_uid: &str, payload: &Bytes) -> Result<(), DomainError> {
        self.check(&self.fail_writes)?;
        self.inner.save_order(order_uid, payload)
    }

    fn count_orders(&self) -> Result<i64, DomainError> {
        self.check(&self.fail_reads)?;
        self.inner.count_orders()
    }

    fn list_orders(&self) -> Result<Vec<(String, Bytes)>, DomainError> {
        self.check(&self.fail_reads)?;
        self.inner.list_orders()
    }
}
