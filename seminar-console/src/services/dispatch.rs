//! TTS job dispatch to the external worker
//!
//! Jobs travel as JSON over a fixed MQTT topic. The trait seam lets tests
//! install a fake queue; the real implementation keeps a background event
//! loop alive and tracks broker connectivity so enqueue can fail fast when
//! the broker is down.

use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::config::BrokerConfig;
use crate::models::TtsOrder;

/// Dispatch errors
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Broker unreachable: {0}")]
    Unreachable(String),

    #[error("Broker rejected message: {0}")]
    Rejected(String),
}

/// Wire format consumed by the worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsJobMessage {
    /// Correlation id: the TTS order id, echoed back on the callback path
    pub id: String,
    pub text: String,
    pub spk_id: String,
}

impl TtsJobMessage {
    pub fn from_order(order: &TtsOrder) -> Self {
        Self {
            id: order.id.to_string(),
            text: order.text.clone(),
            spk_id: order.spk_id.clone(),
        }
    }
}

/// Job queue seam
#[async_trait]
pub trait TtsJobQueue: Send + Sync {
    /// Hand one job to the broker; an error means nothing was enqueued
    async fn enqueue(&self, message: &TtsJobMessage) -> Result<(), DispatchError>;
}

/// MQTT-backed queue
pub struct MqttJobQueue {
    client: AsyncClient,
    topic: String,
    connected: Arc<AtomicBool>,
}

impl MqttJobQueue {
    /// Connect to the broker and spawn the event loop task.
    ///
    /// The connection is established lazily by the event loop; `connected`
    /// flips on ConnAck and off on any polling error.
    pub fn connect(config: &BrokerConfig) -> Self {
        let short = Uuid::new_v4().simple().to_string();
        let client_id = format!("seminar-console-{}", &short[..8]);

        let mut options = MqttOptions::new(client_id, config.host.clone(), config.port);
        if !config.username.is_empty() {
            options.set_credentials(config.username.clone(), config.password.clone());
        }
        options.set_keep_alive(Duration::from_secs(30));

        let (client, mut event_loop) = AsyncClient::new(options, 100);
        let connected = Arc::new(AtomicBool::new(false));

        let flag = connected.clone();
        tokio::spawn(async move {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        flag.store(true, Ordering::SeqCst);
                        tracing::info!("Broker connection established");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        flag.store(false, Ordering::SeqCst);
                        tracing::warn!("Broker connection error: {}", e);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                }
            }
        });

        Self {
            client,
            topic: config.topic.clone(),
            connected,
        }
    }
}

#[async_trait]
impl TtsJobQueue for MqttJobQueue {
    async fn enqueue(&self, message: &TtsJobMessage) -> Result<(), DispatchError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(DispatchError::Unreachable(
                "no broker connection".to_string(),
            ));
        }

        let payload = serde_json::to_vec(message)
            .map_err(|e| DispatchError::Rejected(e.to_string()))?;

        self.client
            .publish(self.topic.clone(), QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|e| DispatchError::Rejected(e.to_string()))?;

        tracing::info!(order_id = %message.id, "TTS order dispatched to broker");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_format() {
        let mut order = TtsOrder::new("hello".into(), "x".into(), Uuid::new_v4());
        order.id = Uuid::nil();
        let message = TtsJobMessage::from_order(&order);
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "text": "hello",
                "spk_id": "x",
            })
        );
    }
}
