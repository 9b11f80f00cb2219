//! Event Publisher Implementation
//!
//! WebSocket 事件推送实现：单一全局主题，向所有在线客户端广播

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::ports::ConversionNotifierPort;

/// WebSocket 事件类型
///
/// 事件不携带负载，序列化为 `{"event": "conversion_started"}` 的形式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WsEvent {
    /// 转换开始
    ConversionStarted,
    /// 转换完成
    ConversionCompleted,
}

/// 事件发布器
///
/// 即发即弃的全局广播，无投递保证；
/// 没有任何客户端在线时事件被丢弃（仅 debug 日志）
pub struct EventPublisher {
    channel: broadcast::Sender<WsEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅全局事件
    pub fn subscribe(&self) -> broadcast::Receiver<WsEvent> {
        self.channel.subscribe()
    }

    /// 发布事件到全局主题
    fn publish(&self, event: WsEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::debug!(
                error = %e,
                "Failed to publish event (no receivers)"
            );
        }
    }
}

impl ConversionNotifierPort for EventPublisher {
    fn conversion_started(&self) {
        self.publish(WsEvent::ConversionStarted);
    }

    fn conversion_completed(&self) {
        self.publish(WsEvent::ConversionCompleted);
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_without_payload() {
        let started = serde_json::to_string(&WsEvent::ConversionStarted).unwrap();
        assert_eq!(started, r#"{"event":"conversion_started"}"#);

        let completed = serde_json::to_string(&WsEvent::ConversionCompleted).unwrap();
        assert_eq!(completed, r#"{"event":"conversion_completed"}"#);
    }

    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let publisher = EventPublisher::new();
        let mut rx = publisher.subscribe();

        publisher.conversion_started();
        publisher.conversion_completed();

        assert_eq!(rx.recv().await.unwrap(), WsEvent::ConversionStarted);
        assert_eq!(rx.recv().await.unwrap(), WsEvent::ConversionCompleted);
    }

    #[test]
    fn test_publish_without_receivers_does_not_panic() {
        let publisher = EventPublisher::new();
        publisher.conversion_started();
    }
}
