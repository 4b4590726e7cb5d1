// Archivo: bootstrap.rs
// Propósito: preparar la caché al arrancar. Si hay pedidos almacenados se
// cargan todos; si el almacenamiento está vacío se siembra un pedido desde
// una plantilla. Ningún fallo aquí impide arrancar el servicio.
use bytes::Bytes;
use order_domain::{extract_key, DomainError, OrderCache, OrderRepository};
use std::path::PathBuf;

/// Origen del documento plantilla usado para sembrar un almacenamiento vacío.
pub trait TemplateSource {
    fn read_template(&self) -> Result<Bytes, DomainError>;
}

/// Plantilla leída desde un archivo (por defecto `model.json`).
#[derive(Debug, Clone)]
pub struct FileTemplate(pub PathBuf);

impl TemplateSource for FileTemplate {
    fn read_template(&self) -> Result<Bytes, DomainError> {
        std::fs::read(&self.0).map(Bytes::from)
                              .map_err(|e| DomainError::Template(format!("cannot read {}: {}", self.0.display(), e)))
    }
}

impl TemplateSource for Bytes {
    fn read_template(&self) -> Result<Bytes, DomainError> {
        Ok(self.clone())
    }
}

/// Qué hizo el arranque.
#[derive(Debug, Clone)]
pub enum BootstrapReport {
    /// Se cargaron `loaded` pedidos desde el almacenamiento.
    Warmed { loaded: usize },
    /// El almacenamiento estaba vacío y se sembró la plantilla.
    Seeded { order_uid: String },
    /// Algo falló; el servicio arranca con la caché que se haya podido llenar.
    Degraded { reason: DomainError },
}

/// Ejecuta el arranque una sola vez, antes de empezar a servir.
pub fn bootstrap<R, T>(repo: &R, cache: &OrderCache, template: &T) -> BootstrapReport
    where R: OrderRepository + ?Sized,
          T: TemplateSource + ?Sized
{
    let count = match repo.count_orders() {
        Ok(n) => n,
        Err(e) => return degraded("check db count error", e),
    };

    if count > 0 {
        log::info!("Database already contains {} orders", count);
        return match repo.list_orders() {
            Ok(rows) => {
                let loaded = rows.len();
                for (order_uid, payload) in rows {
                    cache.upsert(order_uid, payload);
                }
                log::info!("cache warmed with {} orders", loaded);
                BootstrapReport::Warmed { loaded }
            }
            Err(e) => degraded("load cache error", e),
        };
    }

    log::info!("Database empty, inserting initial order from template");
    match seed(repo, cache, template) {
        Ok(order_uid) => {
            log::info!("Initial order inserted successfully: {}", order_uid);
            BootstrapReport::Seeded { order_uid }
        }
        Err(e) => degraded("insert initial order error", e),
    }
}

fn seed<R, T>(repo: &R, cache: &OrderCache, template: &T) -> Result<String, DomainError>
    where R: OrderRepository + ?Sized,
          T: TemplateSource + ?Sized
{
    let payload = template.read_template()?;
    let order_uid = extract_key(&payload)?;
    repo.save_order(&order_uid, &payload)?;
    cache.upsert(order_uid.clone(), payload);
    Ok(order_uid)
}

fn degraded(context: &str, e: DomainError) -> BootstrapReport {
    log::warn!("{}: {} (starting with partial cache)", context, e);
    BootstrapReport::Degraded { reason: DomainError::Startup(format!("{}: {}", context, e)) }
}
