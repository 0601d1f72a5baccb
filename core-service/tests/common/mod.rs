//! In-memory stand-ins for host capabilities

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::{
    ApiTransport, ProbeClient, ProbeResponse, RequestOptions, TransportError, TransportResult,
};
use core_service::{CoreConfig, CoreService};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const CREATED_AT: &str = "2024-01-01T00:00:00Z";

/// Backend that keeps items in memory and serves the item routes
#[derive(Default)]
pub struct InMemoryBackend {
    items: Mutex<BTreeMap<String, Value>>,
    next_id: AtomicU64,
}

impl InMemoryBackend {
    fn not_found() -> TransportError {
        TransportError::status_with_body(404, json!({"detail": "Item not found"}))
    }

    fn item_id(path: &str) -> Option<&str> {
        path.strip_prefix("/items/").filter(|id| !id.is_empty())
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }
}

#[async_trait]
impl ApiTransport for InMemoryBackend {
    async fn get(&self, path: &str, _options: &RequestOptions) -> TransportResult<Value> {
        match path {
            "/items" => {
                let items: Vec<Value> = self.items.lock().await.values().cloned().collect();
                Ok(json!({"count": items.len(), "items": items}))
            }
            "/status" => Ok(json!({"status": "ok", "version": "1.0.0"})),
            "/health" => Ok(json!({"healthy": true})),
            other => match Self::item_id(other) {
                Some(id) => self
                    .items
                    .lock()
                    .await
                    .get(id)
                    .cloned()
                    .ok_or_else(Self::not_found),
                None => Err(TransportError::status(404)),
            },
        }
    }

    async fn post(
        &self,
        path: &str,
        payload: Option<Value>,
        _options: &RequestOptions,
    ) -> TransportResult<Value> {
        if path != "/items" {
            return Err(TransportError::status(405));
        }

        let payload = payload.unwrap_or_default();
        let Some(name) = payload.get("name").and_then(Value::as_str) else {
            return Err(TransportError::status_with_body(
                422,
                json!({"detail": [{"loc": ["body", "name"], "msg": "field required"}]}),
            ));
        };

        let id = (self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string();
        let mut item = Map::new();
        item.insert("id".into(), json!(id));
        item.insert("name".into(), json!(name));
        if let Some(description) = payload.get("description") {
            item.insert("description".into(), description.clone());
        }
        item.insert("ownerId".into(), json!("user-1"));
        item.insert("createdAt".into(), json!(CREATED_AT));
        item.insert("updatedAt".into(), json!(CREATED_AT));

        let item = Value::Object(item);
        self.items.lock().await.insert(id, item.clone());
        Ok(json!({"item": item}))
    }

    async fn put(
        &self,
        path: &str,
        payload: Option<Value>,
        _options: &RequestOptions,
    ) -> TransportResult<Value> {
        let id = Self::item_id(path).ok_or_else(Self::not_found)?;
        let mut items = self.items.lock().await;
        let item = items.get_mut(id).ok_or_else(Self::not_found)?;

        if let (Some(Value::Object(changes)), Value::Object(fields)) = (payload, &mut *item) {
            for (key, value) in changes {
                fields.insert(key, value);
            }
            fields.insert("updatedAt".into(), json!("2024-01-02T00:00:00Z"));
        }

        Ok(json!({"item": item.clone()}))
    }

    async fn delete(&self, path: &str, _options: &RequestOptions) -> TransportResult<Value> {
        let id = Self::item_id(path).ok_or_else(Self::not_found)?;
        self.items
            .lock()
            .await
            .remove(id)
            .map(|_| json!({"deleted": true}))
            .ok_or_else(Self::not_found)
    }
}

/// Probe that always fails at the network level
pub struct UnreachableProbe;

#[async_trait]
impl ProbeClient for UnreachableProbe {
    async fn probe(&self, _url: &str) -> TransportResult<ProbeResponse> {
        Err(TransportError::Network("connection refused".into()))
    }
}

/// Probe that always answers with the given status
pub struct StaticProbe(pub u16);

#[async_trait]
impl ProbeClient for StaticProbe {
    async fn probe(&self, _url: &str) -> TransportResult<ProbeResponse> {
        Ok(ProbeResponse::with_status(self.0))
    }
}

pub fn core_with(backend: Arc<InMemoryBackend>, probe: Arc<dyn ProbeClient>) -> CoreService {
    let config = CoreConfig::builder()
        .api_transport(backend)
        .probe_client(probe)
        .probe_timeout(Duration::from_secs(10))
        .build()
        .expect("config with injected capabilities");
    CoreService::new(config)
}
