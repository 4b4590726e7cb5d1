// validation.rs
//
// Reglas de forma de un pedido entrante. Se evalúan en orden y se detienen en
// la primera que falla; el documento se parsea una sola vez.
use crate::errors::ValidationError;
use crate::order::Order;
use bytes::Bytes;
use serde_json::{Map, Value};

type Document = Map<String, Value>;

fn parse_document(payload: &[u8]) -> Result<Document, ValidationError> {
    match serde_json::from_slice::<Value>(payload)? {
        Value::Object(map) => Ok(map),
        other => Err(ValidationError::MalformedDocument(format!("se esperaba un objeto, se recibió {}", kind(&other)))),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "un booleano",
        Value::Number(_) => "un número",
        Value::String(_) => "un string",
        Value::Array(_) => "un arreglo",
        Value::Object(_) => "un objeto",
    }
}

fn key_of(doc: &Document) -> Result<&str, ValidationError> {
    match doc.get("order_uid") {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        _ => Err(ValidationError::MissingKey),
    }
}

fn check_body(doc: &Document) -> Result<(), ValidationError> {
    if !matches!(doc.get("delivery"), Some(Value::Object(_))) {
        return Err(ValidationError::MissingDelivery);
    }
    if !matches!(doc.get("payment"), Some(Value::Object(_))) {
        return Err(ValidationError::MissingPayment);
    }
    match doc.get("items") {
        Some(Value::Array(items)) if !items.is_empty() => Ok(()),
        _ => Err(ValidationError::MissingItems),
    }
}

/// Comprueba que `payload` sea un pedido bien formado.
pub fn validate(payload: &[u8]) -> Result<(), ValidationError> {
    let doc = parse_document(payload)?;
    key_of(&doc)?;
    check_body(&doc)
}

/// Valida y devuelve el pedido tipado con su clave ya extraída.
pub fn validate_order(payload: Bytes) -> Result<Order, ValidationError> {
    let doc = parse_document(&payload)?;
    let order_uid = key_of(&doc)?.to_string();
    check_body(&doc)?;
    Ok(Order::new(order_uid, payload))
}

/// Sólo las dos primeras reglas: documento parseable con `order_uid`.
/// Se usa al sembrar la plantilla inicial.
pub fn extract_key(payload: &[u8]) -> Result<String, ValidationError> {
    let doc = parse_document(payload)?;
    key_of(&doc).map(str::to_string)
}
