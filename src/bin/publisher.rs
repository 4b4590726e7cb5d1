use std::error::Error;

use order_flow::{FileTemplate, TemplateSource};
use order_service::config::{ServiceConfig, StreamConfig};
use order_service::stream::publish;

/// Publica la plantilla de pedido (`ORDER_TEMPLATE`, por defecto
/// `model.json`) en el subject configurado.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    order_service::init_logging();
    let config = ServiceConfig::from_env()?;
    let stream = StreamConfig { client_id: "publisher-client".into(),
                                ..config.stream };

    let payload = FileTemplate(config.template_path.clone()).read_template()?;
    publish(&stream, payload).await?;

    println!("Order published to subject: {}", stream.subject);
    Ok(())
}
