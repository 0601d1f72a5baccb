//! Item operations over the request wrapper
//!
//! Each operation validates its input locally, performs at most one backend
//! call and folds the outcome into an [`Envelope`]. Nothing past this layer
//! ever sees a raw error.

use crate::envelope::{Envelope, Timing};
use crate::error::{ItemsError, Result};
use crate::models::{Item, ItemInput, ItemList, ItemUpdate, ValidationReport};
use bridge_traits::{Clock, SystemClock};
use core_api::ApiServiceBridge;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

const ITEMS_PATH: &str = "/items";
const STATUS_PATH: &str = "/status";
const HEALTH_PATH: &str = "/health";

const NAME_REQUIRED: &str = "Item name is required";
const ID_REQUIRED: &str = "Item ID is required";
const ID_INVALID: &str = "Item ID is invalid";

#[derive(Deserialize)]
struct ListBody {
    items: Vec<Item>,
    #[serde(default)]
    count: Option<u64>,
}

pub struct ItemService {
    bridge: Arc<ApiServiceBridge>,
    clock: Arc<dyn Clock>,
    operations: AtomicU64,
}

impl ItemService {
    pub fn new(bridge: Arc<ApiServiceBridge>) -> Self {
        Self {
            bridge,
            clock: Arc::new(SystemClock),
            operations: AtomicU64::new(0),
        }
    }

    /// Use a different time source for envelope timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn bridge(&self) -> &Arc<ApiServiceBridge> {
        &self.bridge
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Envelope<ItemList> {
        self.run("list", async {
            let response = self.bridge.get(ITEMS_PATH).await?;
            parse_list(response.data)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Envelope<Item> {
        self.run("get", async {
            let path = item_path(id)?;
            let response = self.bridge.get(&path).await?;
            parse_item(response.data)
        })
        .await
    }

    /// Create an item. A blank name fails locally without a request.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ItemInput) -> Envelope<Item> {
        self.run("create", async {
            if input.name.trim().is_empty() {
                return Err(ItemsError::invalid(NAME_REQUIRED));
            }

            let payload = serde_json::to_value(&input)?;
            let response = self.bridge.post(ITEMS_PATH, payload).await?;
            parse_item(response.data)
        })
        .await
    }

    /// Send only the fields present in `changes`
    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: &str, changes: ItemUpdate) -> Envelope<Item> {
        self.run("update", async {
            let path = item_path(id)?;
            let payload = serde_json::to_value(&changes)?;
            let response = self.bridge.put(&path, payload).await?;
            parse_item(response.data)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Envelope<()> {
        self.run("delete", async {
            let path = item_path(id)?;
            self.bridge.delete(&path).await?;
            Ok::<_, ItemsError>(())
        })
        .await
    }

    /// Raw body of `GET /status`
    #[instrument(skip(self))]
    pub async fn status(&self) -> Envelope<Value> {
        self.run("status", async {
            Ok::<_, ItemsError>(self.bridge.get(STATUS_PATH).await?.data)
        })
        .await
    }

    /// Raw body of `GET /health`
    #[instrument(skip(self))]
    pub async fn health(&self) -> Envelope<Value> {
        self.run("health", async {
            Ok::<_, ItemsError>(self.bridge.get(HEALTH_PATH).await?.data)
        })
        .await
    }

    pub fn validate(&self, input: &ItemInput) -> ValidationReport {
        input.validate()
    }

    pub fn operation_count(&self) -> u64 {
        self.operations.load(Ordering::Relaxed)
    }

    pub fn reset_operation_count(&self) {
        self.operations.store(0, Ordering::Relaxed);
    }

    async fn run<T, F>(&self, operation: &'static str, work: F) -> Envelope<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.operations.fetch_add(1, Ordering::Relaxed);

        let start = self.clock.now();
        let started = Instant::now();
        let outcome = work.await;
        let timing = Timing {
            start,
            end: self.clock.now(),
            duration_ms: started.elapsed().as_millis() as u64,
        };

        match outcome {
            Ok(data) => {
                debug!(operation, duration_ms = timing.duration_ms, "Item operation succeeded");
                Envelope::ok(data).with_timing(timing)
            }
            Err(error) => {
                warn!(
                    operation,
                    code = error.code(),
                    error = %error,
                    "Item operation failed"
                );
                Envelope::failure(error.to_string()).with_timing(timing)
            }
        }
    }
}

fn item_path(id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ItemsError::invalid(ID_REQUIRED));
    }
    // Dot segments survive encoding and would be resolved away by the URL parser
    if id == "." || id == ".." {
        return Err(ItemsError::invalid(ID_INVALID));
    }
    Ok(format!("{}/{}", ITEMS_PATH, urlencoding::encode(id)))
}

/// Accepts `{items, count?}` or a bare array
fn parse_list(body: Value) -> Result<ItemList> {
    if body.is_array() {
        let items: Vec<Item> = serde_json::from_value(body)?;
        return Ok(ItemList {
            count: items.len() as u64,
            items,
        });
    }

    let page: ListBody = serde_json::from_value(body)?;
    let count = page.count.unwrap_or(page.items.len() as u64);
    Ok(ItemList {
        items: page.items,
        count,
    })
}

/// Accepts `{item: {...}}` or the item object itself
fn parse_item(body: Value) -> Result<Item> {
    let body = match body {
        Value::Object(mut map) => match map.remove("item") {
            Some(inner @ Value::Object(_)) => inner,
            Some(other) => {
                map.insert("item".to_string(), other);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    };

    Ok(serde_json::from_value(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::{ApiTransport, FixedClock, RequestOptions, TransportError, TransportResult};
    use chrono::{TimeZone, Utc};
    use mockall::mock;
    use mockall::predicate::*;
    use serde_json::json;

    mock! {
        Transport {}

        #[async_trait]
        impl ApiTransport for Transport {
            async fn get(&self, path: &str, options: &RequestOptions) -> TransportResult<Value>;
            async fn post(
                &self,
                path: &str,
                payload: Option<Value>,
                options: &RequestOptions,
            ) -> TransportResult<Value>;
            async fn put(
                &self,
                path: &str,
                payload: Option<Value>,
                options: &RequestOptions,
            ) -> TransportResult<Value>;
            async fn delete(&self, path: &str, options: &RequestOptions) -> TransportResult<Value>;
        }
    }

    fn service(mock: MockTransport) -> ItemService {
        let bridge = Arc::new(ApiServiceBridge::with_transport(Arc::new(mock)));
        ItemService::new(bridge)
    }

    fn item_json(id: &str, name: &str) -> Value {
        json!({"id": id, "name": name, "ownerId": "owner-1"})
    }

    #[tokio::test]
    async fn test_list_with_count() {
        let mut mock = MockTransport::new();
        mock.expect_get()
            .with(eq("/items"), always())
            .times(1)
            .returning(|_, _| Ok(json!({"items": [{"id": "1", "name": "a"}], "count": 7})));

        let envelope = service(mock).list().await;
        assert!(envelope.success);
        let list = envelope.data.unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.count, 7);
        assert!(envelope.timing.is_some());
    }

    #[tokio::test]
    async fn test_list_count_fallback_and_bare_array() {
        let mut mock = MockTransport::new();
        let mut calls = 0;
        mock.expect_get().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Ok(json!({"items": [item_json("1", "a"), item_json("2", "b")]}))
            } else {
                Ok(json!([item_json("3", "c")]))
            }
        });

        let service = service(mock);
        assert_eq!(service.list().await.data.unwrap().count, 2);
        assert_eq!(service.list().await.data.unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_list_malformed_body() {
        let mut mock = MockTransport::new();
        mock.expect_get().returning(|_, _| Ok(json!({"rows": []})));

        let envelope = service(mock).list().await;
        assert!(!envelope.success);
        assert!(envelope
            .error
            .unwrap()
            .starts_with("Failed to parse response:"));
    }

    #[tokio::test]
    async fn test_list_failure_keeps_message_only() {
        let mut mock = MockTransport::new();
        mock.expect_get().returning(|_, _| Err(TransportError::status(500)));

        let envelope = service(mock).list().await;
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(
            envelope.error.as_deref(),
            Some("Internal server error - please try again later")
        );
    }

    #[tokio::test]
    async fn test_create_blank_name_makes_no_call() {
        // No expectations: any transport call would panic
        let service = service(MockTransport::new());

        let envelope = service.create(ItemInput::new("  ")).await;
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some(NAME_REQUIRED));
        assert_eq!(service.bridge().stats().total_requests, 0);
        assert_eq!(service.operation_count(), 1);
    }

    #[tokio::test]
    async fn test_create_unwraps_item() {
        let mut mock = MockTransport::new();
        mock.expect_post()
            .withf(|path, payload, _| {
                path == "/items" && payload == &Some(json!({"name": "Lamp", "description": "Desk"}))
            })
            .times(1)
            .returning(|_, _, _| Ok(json!({"item": item_json("9", "Lamp")})));

        let envelope = service(mock)
            .create(ItemInput::new("Lamp").with_description("Desk"))
            .await;

        let item = envelope.data.unwrap();
        assert_eq!(item.id, "9");
        assert_eq!(item.owner_id.as_deref(), Some("owner-1"));
    }

    #[tokio::test]
    async fn test_create_accepts_bare_item() {
        let mut mock = MockTransport::new();
        mock.expect_post()
            .returning(|_, _, _| Ok(item_json("10", "Chair")));

        let envelope = service(mock).create(ItemInput::new("Chair")).await;
        assert_eq!(envelope.data.unwrap().name, "Chair");
    }

    #[tokio::test]
    async fn test_create_server_detail() {
        let mut mock = MockTransport::new();
        mock.expect_post().returning(|_, _, _| {
            Err(TransportError::status_with_body(
                422,
                json!({"detail": "Name already exists"}),
            ))
        });

        let envelope = service(mock).create(ItemInput::new("Lamp")).await;
        assert_eq!(envelope.error.as_deref(), Some("Name already exists"));
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let service = service(MockTransport::new());

        let envelope = service.update(" ", ItemUpdate::default().name("x")).await;
        assert_eq!(envelope.error.as_deref(), Some(ID_REQUIRED));

        let envelope = service.delete("").await;
        assert_eq!(envelope.error.as_deref(), Some(ID_REQUIRED));

        let envelope = service.get("").await;
        assert_eq!(envelope.error.as_deref(), Some(ID_REQUIRED));
    }

    #[tokio::test]
    async fn test_id_stays_one_path_segment() {
        let mut mock = MockTransport::new();
        mock.expect_get()
            .with(eq("/items/1%2F..%2F2"), always())
            .times(1)
            .returning(|_, _| Ok(item_json("1/../2", "a")));
        mock.expect_delete()
            .with(eq("/items/a%20b%3Fc%23d"), always())
            .times(1)
            .returning(|_, _| Ok(Value::Null));

        let service = service(mock);
        assert_eq!(service.get("1/../2").await.data.unwrap().id, "1/../2");
        assert!(service.delete("a b?c#d").await.success);

        let envelope = service.get("..").await;
        assert_eq!(envelope.error.as_deref(), Some(ID_INVALID));
        let envelope = service.update(".", ItemUpdate::default().name("x")).await;
        assert_eq!(envelope.error.as_deref(), Some(ID_INVALID));
    }

    #[tokio::test]
    async fn test_update_sends_present_fields_only() {
        let mut mock = MockTransport::new();
        mock.expect_put()
            .withf(|path, payload, _| path == "/items/5" && payload == &Some(json!({"name": "Renamed"})))
            .times(1)
            .returning(|_, _, _| Ok(item_json("5", "Renamed")));

        let envelope = service(mock)
            .update("5", ItemUpdate::default().name("Renamed"))
            .await;
        assert_eq!(envelope.data.unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn test_delete() {
        let mut mock = MockTransport::new();
        mock.expect_delete()
            .with(eq("/items/5"), always())
            .times(1)
            .returning(|_, _| Ok(Value::Null));

        let envelope = service(mock).delete("5").await;
        assert!(envelope.success);
        assert!(envelope.error.is_none());
    }

    #[tokio::test]
    async fn test_status_and_health_are_raw() {
        let mut mock = MockTransport::new();
        mock.expect_get()
            .with(eq("/status"), always())
            .returning(|_, _| Ok(json!({"status": "ok", "version": "1.2.0"})));
        mock.expect_get()
            .with(eq("/health"), always())
            .returning(|_, _| Ok(json!({"healthy": true})));

        let service = service(mock);
        let first = service.status().await;
        let second = service.status().await;
        assert_eq!(first.data, second.data);
        assert_eq!(first.data.unwrap()["version"], "1.2.0");
        assert_eq!(service.health().await.data, Some(json!({"healthy": true})));
        assert_eq!(service.operation_count(), 3);

        service.reset_operation_count();
        assert_eq!(service.operation_count(), 0);
    }

    #[tokio::test]
    async fn test_not_connected_envelope() {
        let service = ItemService::new(Arc::new(ApiServiceBridge::new()));

        let envelope = service.health().await;
        assert!(!envelope.success);
        assert!(envelope.error.unwrap().contains("not connected"));
    }

    #[tokio::test]
    async fn test_timing_uses_clock() {
        let fixed = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut mock = MockTransport::new();
        mock.expect_get().returning(|_, _| Ok(json!({})));

        let service = service(mock).with_clock(Arc::new(FixedClock(fixed)));
        let timing = service.status().await.timing.unwrap();
        assert_eq!(timing.start, fixed);
        assert_eq!(timing.end, fixed);
    }

    #[test]
    fn test_validate_delegates() {
        let service = ItemService::new(Arc::new(ApiServiceBridge::new()));
        let report = service.validate(&ItemInput::new("").with_description("x".repeat(501)));
        assert_eq!(report.errors.len(), 2);
        assert_eq!(service.operation_count(), 0);
    }
}
