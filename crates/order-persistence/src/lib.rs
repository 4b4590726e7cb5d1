//! Persistencia Diesel del contrato `OrderRepository`.
//! La implementación está en `order_persistence.rs`; `schema` describe la
//! tabla `orders`.

mod order_persistence;
pub mod schema;

pub use order_persistence::{new_from_env, DieselOrderRepository};
