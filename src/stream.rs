//! Stream de pedidos: la suscripción que alimenta la ingesta.
//!
//! La ingesta sólo ve `StreamMessage`s; su origen queda detrás del trait
//! `OrderStream` (una suscripción NATS en producción, un canal de tokio en
//! los tests).
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use order_domain::OrderRepository;
use order_flow::{IngestOutcome, IngestPipeline};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::StreamConfig;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("nats connect error: {0}")]
    Connect(String),
    #[error("nats subscribe error: {0}")]
    Subscribe(String),
    #[error("nats publish error: {0}")]
    Publish(String),
}

/// Un mensaje tal como lo entrega el stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMessage {
    pub sequence: u64,
    pub payload: Bytes,
}

/// Origen de mensajes de pedidos. `None` indica que la suscripción terminó.
#[async_trait]
pub trait OrderStream: Send {
    async fn next_message(&mut self) -> Option<StreamMessage>;
}

// Nombre de conexión visto por el servidor NATS: "<cluster>/<client>".
fn connection_name(config: &StreamConfig) -> String {
    format!("{}/{}", config.cluster_id, config.client_id)
}

async fn connect(config: &StreamConfig) -> Result<async_nats::Client, StreamError> {
    async_nats::ConnectOptions::new()
        .name(connection_name(config))
        .connect(config.url.as_str())
        .await
        .map_err(|e| StreamError::Connect(e.to_string()))
}

/// Suscripción NATS sobre `config.subject`. NATS no numera los mensajes,
/// así que se numeran localmente en orden de llegada. Al soltarla se cancela
/// la suscripción.
pub struct NatsOrderStream {
    _client: async_nats::Client,
    subscriber: async_nats::Subscriber,
    next_sequence: u64,
}

impl NatsOrderStream {
    pub async fn subscribe(config: &StreamConfig) -> Result<Self, StreamError> {
        let client = connect(config).await?;
        let subscriber = client
            .subscribe(config.subject.clone())
            .await
            .map_err(|e| StreamError::Subscribe(e.to_string()))?;
        tracing::info!(
            "subscribed to '{}' on {} as {}",
            config.subject,
            config.url,
            connection_name(config)
        );
        Ok(Self {
            _client: client,
            subscriber,
            next_sequence: 1,
        })
    }
}

#[async_trait]
impl OrderStream for NatsOrderStream {
    async fn next_message(&mut self) -> Option<StreamMessage> {
        let message = self.subscriber.next().await?;
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        Some(StreamMessage {
            sequence,
            payload: message.payload,
        })
    }
}

/// Stream en proceso alimentado por un canal de tokio.
pub struct ChannelOrderStream {
    receiver: mpsc::Receiver<Bytes>,
    next_sequence: u64,
}

/// Crea un stream sobre un canal y el emisor que lo alimenta.
pub fn channel(buffer: usize) -> (mpsc::Sender<Bytes>, ChannelOrderStream) {
    let (sender, receiver) = mpsc::channel(buffer);
    (
        sender,
        ChannelOrderStream {
            receiver,
            next_sequence: 1,
        },
    )
}

#[async_trait]
impl OrderStream for ChannelOrderStream {
    async fn next_message(&mut self) -> Option<StreamMessage> {
        let payload = self.receiver.recv().await?;
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        Some(StreamMessage { sequence, payload })
    }
}

/// Consume `stream` hasta que se cierre, un mensaje a la vez.
///
/// Cada mensaje pasa por la ingesta (síncrona) en el pool bloqueante y
/// termina antes de pedir el siguiente. Devuelve cuántos mensajes se
/// procesaron.
pub async fn run_consumer<S, R>(mut stream: S, pipeline: Arc<IngestPipeline<R>>) -> u64
where
    S: OrderStream,
    R: OrderRepository + ?Sized + 'static,
{
    let mut handled = 0;
    while let Some(message) = stream.next_message().await {
        let pipeline = pipeline.clone();
        let sequence = message.sequence;
        match tokio::task::spawn_blocking(move || pipeline.handle(message.sequence, message.payload)).await {
            Ok(IngestOutcome::Rejected(reason)) => {
                tracing::debug!("message {} rejected: {}", sequence, reason)
            }
            Ok(_) => {}
            Err(e) => tracing::error!("ingest task for message {} failed: {}", sequence, e),
        }
        handled += 1;
    }
    tracing::info!("order stream closed after {} messages", handled);
    handled
}

/// Publica un payload en `config.subject` y espera a que llegue al servidor.
pub async fn publish(config: &StreamConfig, payload: Bytes) -> Result<(), StreamError> {
    let client = connect(config).await?;
    client
        .publish(config.subject.clone(), payload)
        .await
        .map_err(|e| StreamError::Publish(e.to_string()))?;
    client
        .flush()
        .await
        .map_err(|e| StreamError::Publish(e.to_string()))?;
    Ok(())
}
