//! Tipos de dominio de pedidos: el pedido validado, las reglas de forma, la
//! caché en memoria y el contrato de persistencia (`OrderRepository`).
mod cache;
mod errors;
mod order;
mod order_repository;
mod order_stubs;
pub mod validation;

pub use cache::OrderCache;
pub use errors::{DomainError, ValidationError};
pub use order::Order;
pub use order_repository::{InMemoryOrderRepository, OrderRepository};
pub use order_stubs::OrderStubs;
pub use validation::{extract_key, validate, validate_order};
