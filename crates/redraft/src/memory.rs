//! In-memory collaborators for tests and the command-line front end.

use async_trait::async_trait;
use chrono::Utc;
use redraft_interface::{
    CollaboratorResult, FormView, RefreshJob, RefreshJobBuilder, RefreshQueue, RefreshRequest,
    ViewStore,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// View store backed by a shared map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryViewStore {
    views: Arc<RwLock<HashMap<String, FormView>>>,
}

impl InMemoryViewStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a view.
    pub async fn insert(&self, view: FormView) {
        self.views.write().await.insert(view.id().clone(), view);
    }

    /// Number of stored views.
    pub async fn len(&self) -> usize {
        self.views.read().await.len()
    }

    /// Whether the store has no views.
    pub async fn is_empty(&self) -> bool {
        self.views.read().await.is_empty()
    }
}

#[async_trait]
impl ViewStore for InMemoryViewStore {
    async fn load_view(&self, view_id: &str) -> CollaboratorResult<FormView> {
        self.views
            .read()
            .await
            .get(view_id)
            .cloned()
            .ok_or_else(|| format!("Form view '{}' not found", view_id).into())
    }
}

/// Refresh queue that records requests instead of running them.
#[derive(Debug, Clone, Default)]
pub struct RecordingRefreshQueue {
    requests: Arc<RwLock<Vec<RefreshRequest>>>,
    unavailable: bool,
}

impl RecordingRefreshQueue {
    /// Queue that accepts every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue that rejects every request.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Requests accepted so far, in order.
    pub async fn requests(&self) -> Vec<RefreshRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl RefreshQueue for RecordingRefreshQueue {
    async fn enqueue(&self, request: RefreshRequest) -> CollaboratorResult<RefreshJob> {
        if self.unavailable {
            return Err("refresh queue unavailable".into());
        }
        self.requests.write().await.push(request);
        let job = RefreshJobBuilder::default()
            .id(uuid::Uuid::new_v4().to_string())
            .status("queued")
            .updated_at(Utc::now())
            .build()?;
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redraft_interface::{DataSourceBuilder, FormViewBuilder, SourceQueryBuilder};
    use serde_json::json;

    fn view(id: &str) -> FormView {
        FormViewBuilder::default()
            .id(id)
            .options(json!({}))
            .query(
                SourceQueryBuilder::default()
                    .id(1)
                    .query_text("SELECT id FROM t")
                    .data_source(
                        DataSourceBuilder::default()
                            .id(1)
                            .name("local")
                            .engine("sqlite")
                            .build()
                            .unwrap(),
                    )
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_view_store_lookup() {
        let store = InMemoryViewStore::new();
        assert!(store.is_empty().await);
        store.insert(view("v1")).await;
        assert_eq!(store.len().await, 1);
        assert_eq!(store.load_view("v1").await.unwrap().id(), "v1");
        let err = store.load_view("v2").await.unwrap_err();
        assert_eq!(err.to_string(), "Form view 'v2' not found");
    }

    #[tokio::test]
    async fn test_unavailable_queue_records_nothing() {
        let queue = RecordingRefreshQueue::unavailable();
        let request = serde_json::from_value::<RefreshRequest>(json!({
            "query_text": "SELECT 1",
            "data_source_id": 1,
            "user_id": 1,
            "is_api_user": false,
            "metadata": {}
        }))
        .unwrap();
        assert!(queue.enqueue(request).await.is_err());
        assert!(queue.requests().await.is_empty());
    }
}
