//! Process-scoped registry mapping room names to room instances.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use idobata_shared::time::Clock;

use super::room::Room;

/// Lazily-populated map of room name to [`Room`].
///
/// Constructed once at startup and injected into the host layer's shared
/// state; rooms are created on first reference and never evicted. The
/// registry has its own lock, independent of any per-room lock.
pub struct RoomRegistry {
    clock: Arc<dyn Clock>,
    rooms: Mutex<HashMap<String, Arc<Room>>>,
}

impl RoomRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Return the room registered under `room_name`, creating it if absent.
    ///
    /// Concurrent callers with the same name always observe one instance.
    pub async fn get_or_create(&self, room_name: &str) -> Arc<Room> {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(room_name.to_owned())
            .or_insert_with(|| {
                tracing::info!("room '{}' created", room_name);
                Arc::new(Room::new(room_name, self.clock.clone()))
            })
            .clone()
    }

    /// Number of rooms created so far.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use idobata_shared::time::FixedClock;

    fn test_registry() -> Arc<RoomRegistry> {
        Arc::new(RoomRegistry::new(Arc::new(FixedClock::new(
            "2024-07-01T12:00:00.000000+09:00",
        ))))
    }

    #[tokio::test]
    async fn test_get_or_create_returns_same_instance_for_same_name() {
        // テスト項目: 同じ名前で 2 回呼び出すと同一の Room インスタンスが返される
        // given (前提条件):
        let registry = test_registry();

        // when (操作):
        let first = registry.get_or_create("lobby").await;
        let second = registry.get_or_create("lobby").await;

        // then (期待する結果):
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_get_or_create_returns_distinct_rooms_for_distinct_names() {
        // テスト項目: 異なる名前には異なる Room インスタンスが返される
        // given (前提条件):
        let registry = test_registry();

        // when (操作):
        let room_a = registry.get_or_create("a").await;
        let room_b = registry.get_or_create("b").await;

        // then (期待する結果):
        assert!(!Arc::ptr_eq(&room_a, &room_b));
        assert_eq!(room_a.name(), "a");
        assert_eq!(room_b.name(), "b");
        assert_eq!(registry.room_count().await, 2);
    }

    #[tokio::test]
    async fn test_get_or_create_is_race_free() {
        // テスト項目: 同じ名前への並行呼び出しが単一の Room インスタンスに収束する
        // given (前提条件):
        let registry = test_registry();

        // when (操作):
        let mut handles = Vec::new();
        for _ in 0..10 {
            let registry = registry.clone();
            handles.push(tokio::spawn(
                async move { registry.get_or_create("lobby").await },
            ));
        }
        let mut rooms = Vec::new();
        for handle in handles {
            rooms.push(handle.await.unwrap());
        }

        // then (期待する結果):
        for room in &rooms[1..] {
            assert!(Arc::ptr_eq(&rooms[0], room));
        }
        assert_eq!(registry.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_room_state_persists_across_lookups() {
        // テスト項目: 再取得した Room が以前の履歴を保持している（履歴の連続性）
        // given (前提条件):
        let registry = test_registry();
        let room = registry.get_or_create("lobby").await;
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let client_id = room.connect("alice", tx).await;
        room.process_event(
            &client_id,
            &serde_json::json!({ "event_tag": "new_message", "message": "hello" }),
        )
        .await
        .unwrap();

        // when (操作):
        let same_room = registry.get_or_create("lobby").await;
        let (tx2, mut rx2) = tokio::sync::mpsc::unbounded_channel();
        same_room.connect("bob", tx2).await;

        // then (期待する結果): bob の connection_started に alice の発言が含まれる
        let _user_connected = rx2.try_recv().unwrap();
        let started: crate::chat::ChatEvent =
            serde_json::from_str(&rx2.try_recv().unwrap()).unwrap();
        let crate::chat::ChatEvent::ConnectionStarted { messages, .. } = started else {
            panic!("expected connection_started");
        };
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, "hello");
    }
}
