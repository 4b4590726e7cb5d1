// errors.rs
use thiserror::Error;

/// Motivo por el que un documento no es un pedido válido.
///
/// Las variantes siguen el orden en que se evalúan las reglas: la primera
/// regla que falla es la que se reporta.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("JSON inválido: {0}")]
    MalformedDocument(String),
    #[error("falta order_uid o no es un string no vacío")]
    MissingKey,
    #[error("falta el campo delivery o no es un objeto")]
    MissingDelivery,
    #[error("falta el campo payment o no es un objeto")]
    MissingPayment,
    #[error("falta el arreglo items o está vacío")]
    MissingItems,
}

#[derive(Debug, Error, Clone)]
pub enum DomainError {
    #[error("Error de validación: {0}")]
    Validation(#[from] ValidationError),
    #[error("Error de persistencia: {0}")]
    Persistence(String),
    #[error("No encontrado: {0}")]
    NotFound(String),
    #[error("Arranque degradado: {0}")]
    Startup(String),
    #[error("Plantilla no disponible: {0}")]
    Template(String),
}

impl From<serde_json::Error> for ValidationError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedDocument(e.to_string())
    }
}
