// order.rs
use bytes::Bytes;
use std::fmt;

/// Pedido validado.
///
/// El cuerpo se conserva tal como llegó (`payload`); sólo `order_uid` se
/// interpreta. Se construye mediante `validation::validate_order`, de modo
/// que un `Order` siempre cumple las reglas de forma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    order_uid: String,
    payload: Bytes,
}

impl Order {
    pub(crate) fn new(order_uid: String, payload: Bytes) -> Self {
        Self { order_uid, payload }
    }

    pub fn order_uid(&self) -> &str {
        &self.order_uid
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn into_parts(self) -> (String, Bytes) {
        (self.order_uid, self.payload)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order(order_uid: {}, {} bytes)", self.order_uid, self.payload.len())
    }
}
