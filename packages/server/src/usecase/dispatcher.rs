//! Broadcast Dispatcher
//!
//! Coordinator が返した `Delivery` を送信用 JSON に変換し、MessagePusher に渡します。
//! 配信は投げっぱなしで、失敗はログに残すだけです。

use std::sync::Arc;

use crate::{
    domain::{Audience, Delivery, MessagePusher},
    infrastructure::dto::websocket::OutboundEvent,
};

pub struct BroadcastDispatcher {
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastDispatcher {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 配信指示を順番どおりに送る
    pub async fn dispatch(&self, deliveries: Vec<Delivery>) {
        for delivery in deliveries {
            self.deliver(delivery).await;
        }
    }

    async fn deliver(&self, delivery: Delivery) {
        let event = OutboundEvent::from(delivery.notification);
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize outbound event: {}", e);
                return;
            }
        };

        match delivery.audience {
            Audience::Caller(connection_id) => {
                if let Err(e) = self.message_pusher.push_to(&connection_id, &json).await {
                    tracing::warn!("Failed to push to '{}': {}", connection_id, e);
                }
            }
            Audience::Connections(targets) => {
                if targets.is_empty() {
                    tracing::debug!("No recipients for {}", json);
                    return;
                }
                if let Err(e) = self.message_pusher.broadcast(targets, &json).await {
                    tracing::warn!("Failed to broadcast: {}", e);
                }
            }
        }
    }

    pub(crate) fn message_pusher(&self) -> &Arc<dyn MessagePusher> {
        &self.message_pusher
    }
}
