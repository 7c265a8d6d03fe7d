//! Event Router
//!
//! 接続からのイベントを受け取り、Coordinator に適用してから結果を配信します。
//!
//! ## 直列化
//!
//! 全ての状態は 1 つの `Mutex<Coordinator>` の中にあり、イベントは 1 件ずつ処理されます。
//! 配信もロックを保持したまま行うため、あるイベントの配信が後続イベントの配信と
//! 入れ替わることはありません（送信はチャンネルへの投入だけなので待たされない）。

use std::sync::Arc;

use tertulia_shared::time::Clock;
use tokio::sync::Mutex;

use crate::{
    domain::{ClientEvent, ConnectionId, Coordinator, MessagePusher, PusherChannel, Timestamp},
    infrastructure::dto::websocket::InboundEvent,
};

use super::dispatcher::BroadcastDispatcher;

pub struct EventRouter {
    coordinator: Arc<Mutex<Coordinator>>,
    dispatcher: BroadcastDispatcher,
    clock: Arc<dyn Clock>,
}

impl EventRouter {
    pub fn new(
        coordinator: Arc<Mutex<Coordinator>>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            coordinator,
            dispatcher: BroadcastDispatcher::new(message_pusher),
            clock,
        }
    }

    /// 新しい接続を登録し、ルーム一覧を本人に送る
    pub async fn connect(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.dispatcher
            .message_pusher()
            .register_client(connection_id.clone(), sender)
            .await;

        let mut coordinator = self.coordinator.lock().await;
        let deliveries = coordinator.connect(connection_id.clone(), self.now());
        tracing::info!(
            "Connection '{}' registered ({} connected)",
            connection_id,
            coordinator.connection_count()
        );
        self.dispatcher.dispatch(deliveries).await;
    }

    /// イベントを処理
    pub async fn handle(&self, connection_id: &ConnectionId, event: ClientEvent) {
        let name = event.name();
        let mut coordinator = self.coordinator.lock().await;
        let deliveries = coordinator.handle(connection_id, event, self.now());
        tracing::debug!(
            "Handled '{}' from '{}' ({} deliveries)",
            name,
            connection_id,
            deliveries.len()
        );
        self.dispatcher.dispatch(deliveries).await;
    }

    /// テキストフレームを解析して処理。解析できないフレームは無視する
    pub async fn handle_text(&self, connection_id: &ConnectionId, text: &str) {
        match serde_json::from_str::<InboundEvent>(text) {
            Ok(event) => self.handle(connection_id, event.into()).await,
            Err(e) => {
                tracing::warn!("Ignoring malformed frame from '{}': {}", connection_id, e);
            }
        }
    }

    /// 切断処理。既に切断済みなら何もせず `false`
    pub async fn disconnect(&self, connection_id: &ConnectionId) -> bool {
        let mut coordinator = self.coordinator.lock().await;
        let Some(deliveries) = coordinator.disconnect(connection_id) else {
            tracing::debug!("Connection '{}' already disconnected", connection_id);
            return false;
        };
        self.dispatcher.dispatch(deliveries).await;
        self.dispatcher
            .message_pusher()
            .unregister_client(connection_id)
            .await;
        tracing::info!(
            "Connection '{}' disconnected ({} connected)",
            connection_id,
            coordinator.connection_count()
        );
        true
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}
