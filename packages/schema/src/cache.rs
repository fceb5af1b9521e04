//! Session-lived schema memoization.
//!
//! The cache is read concurrently by the completion/hover path and the
//! validation pipeline. Concurrent misses for the same key converge on a
//! single in-flight fetch (the fetch itself is memoized, not just its
//! result). Successful fetches live until `clear()`; failures are
//! logged and not memoized, so a later lookup may retry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tracing::warn;

use flowconf_document::ComponentKind;

use crate::model::{ComponentRef, ComponentSchema};
use crate::provider::SchemaProvider;

type SharedFetch<T> = Shared<BoxFuture<'static, Option<Arc<T>>>>;

enum Slot<T> {
    Ready(Arc<T>),
    /// In-flight fetch, tagged so a failed fetch only evicts itself.
    Pending(u64, SharedFetch<T>),
}

pub struct SchemaCache {
    provider: Arc<dyn SchemaProvider>,
    schemas: Mutex<HashMap<String, Slot<ComponentSchema>>>,
    catalog: Mutex<Option<Slot<Vec<ComponentRef>>>>,
    fetch_id: AtomicU64,
}

impl SchemaCache {
    pub fn new(provider: Arc<dyn SchemaProvider>) -> Self {
        Self {
            provider,
            schemas: Mutex::new(HashMap::new()),
            catalog: Mutex::new(None),
            fetch_id: AtomicU64::new(0),
        }
    }

    /// Schema for a component addressed by its section's container
    /// name. An unmappable section answers `None` without touching the
    /// registry.
    pub async fn schema_for_section(
        &self,
        section: &str,
        name: &str,
    ) -> Option<Arc<ComponentSchema>> {
        let kind = ComponentKind::from_container(section)?;
        self.schema(kind, name).await
    }

    /// Schema for `(kind, name)`, fetched on first reference.
    pub async fn schema(&self, kind: ComponentKind, name: &str) -> Option<Arc<ComponentSchema>> {
        let key = format!("{}.{}", kind.container(), name);

        let (id, fetch) = {
            let mut slots = self.schemas.lock().await;
            match slots.get(&key) {
                Some(Slot::Ready(schema)) => return Some(Arc::clone(schema)),
                Some(Slot::Pending(id, fetch)) => (*id, fetch.clone()),
                None => {
                    let id = self.fetch_id.fetch_add(1, Ordering::Relaxed);
                    let provider = Arc::clone(&self.provider);
                    let owned = name.to_string();
                    let fetch: SharedFetch<ComponentSchema> = async move {
                        match provider.fetch_schema(kind, &owned).await {
                            Ok(schema) => Some(Arc::new(schema)),
                            Err(error) => {
                                warn!(%kind, name = %owned, %error, "schema fetch failed");
                                None
                            }
                        }
                    }
                    .boxed()
                    .shared();
                    slots.insert(key.clone(), Slot::Pending(id, fetch.clone()));
                    (id, fetch)
                }
            }
        };

        let result = fetch.await;
        let mut slots = self.schemas.lock().await;
        match &result {
            Some(schema) => {
                slots.insert(key, Slot::Ready(Arc::clone(schema)));
            }
            None => {
                // Evict only our own failed fetch; a newer in-flight
                // fetch for the same key must survive.
                if matches!(slots.get(&key), Some(Slot::Pending(id2, _)) if *id2 == id) {
                    slots.remove(&key);
                }
            }
        }
        result
    }

    /// Catalog of all registry components, memoized after first
    /// success.
    pub async fn catalog(&self) -> Option<Arc<Vec<ComponentRef>>> {
        let (id, fetch) = {
            let mut slot = self.catalog.lock().await;
            match &*slot {
                Some(Slot::Ready(refs)) => return Some(Arc::clone(refs)),
                Some(Slot::Pending(id, fetch)) => (*id, fetch.clone()),
                None => {
                    let id = self.fetch_id.fetch_add(1, Ordering::Relaxed);
                    let provider = Arc::clone(&self.provider);
                    let fetch: SharedFetch<Vec<ComponentRef>> = async move {
                        match provider.fetch_catalog().await {
                            Ok(refs) => Some(Arc::new(refs)),
                            Err(error) => {
                                warn!(%error, "component catalog fetch failed");
                                None
                            }
                        }
                    }
                    .boxed()
                    .shared();
                    *slot = Some(Slot::Pending(id, fetch.clone()));
                    (id, fetch)
                }
            }
        };

        let result = fetch.await;
        let mut slot = self.catalog.lock().await;
        match &result {
            Some(refs) => *slot = Some(Slot::Ready(Arc::clone(refs))),
            None => {
                if matches!(&*slot, Some(Slot::Pending(id2, _)) if *id2 == id) {
                    *slot = None;
                }
            }
        }
        result
    }

    /// Drops everything; the next lookups refetch.
    pub async fn clear(&self) {
        self.schemas.lock().await.clear();
        *self.catalog.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingProvider {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl SchemaProvider for CountingProvider {
        async fn fetch_schema(
            &self,
            _kind: ComponentKind,
            name: &str,
        ) -> Result<ComponentSchema, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Transport("registry unreachable".into()));
            }
            Ok(serde_json::from_value(json!({
                "type": "object",
                "properties": {"endpoint": {"type": "string"}},
                "description": format!("schema for {name}")
            }))
            .unwrap())
        }

        async fn fetch_catalog(&self) -> Result<Vec<ComponentRef>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Transport("registry unreachable".into()));
            }
            Ok(vec![ComponentRef {
                kind: ComponentKind::Receiver,
                name: "otlp".into(),
            }])
        }
    }

    #[tokio::test]
    async fn test_memoizes_success() {
        let provider = CountingProvider::new(false);
        let cache = SchemaCache::new(provider.clone());

        assert!(cache.schema(ComponentKind::Receiver, "otlp").await.is_some());
        assert!(cache.schema(ComponentKind::Receiver, "otlp").await.is_some());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_not_memoized() {
        let provider = CountingProvider::new(true);
        let cache = SchemaCache::new(provider.clone());

        assert!(cache.schema(ComponentKind::Receiver, "otlp").await.is_none());
        assert!(cache.schema(ComponentKind::Receiver, "otlp").await.is_none());
        // Both calls hit the provider: failures may be retried.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let provider = CountingProvider::new(false);
        let cache = Arc::new(SchemaCache::new(provider.clone()));

        let a = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.schema(ComponentKind::Receiver, "otlp").await })
        };
        let b = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.schema(ComponentKind::Receiver, "otlp").await })
        };
        assert!(a.await.unwrap().is_some());
        assert!(b.await.unwrap().is_some());
        assert!(provider.calls.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_unmappable_section_skips_network() {
        let provider = CountingProvider::new(false);
        let cache = SchemaCache::new(provider.clone());

        assert!(cache.schema_for_section("pipelines", "traces").await.is_none());
        assert!(cache.schema_for_section("nonsense", "x").await.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let provider = CountingProvider::new(false);
        let cache = SchemaCache::new(provider.clone());

        cache.schema(ComponentKind::Receiver, "otlp").await;
        cache.clear().await;
        cache.schema(ComponentKind::Receiver, "otlp").await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_catalog_memoized() {
        let provider = CountingProvider::new(false);
        let cache = SchemaCache::new(provider.clone());

        assert_eq!(cache.catalog().await.unwrap().len(), 1);
        assert_eq!(cache.catalog().await.unwrap().len(), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
