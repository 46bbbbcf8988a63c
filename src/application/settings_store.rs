// Per-block settings persistence
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[async_trait]
pub trait BlockSettingsStore: Send + Sync {
    async fn display_name(&self, usage_id: &str) -> Option<String>;

    /// `None` clears the stored value so the field default applies again
    async fn set_display_name(&self, usage_id: &str, display_name: Option<String>);
}

#[derive(Clone, Default)]
pub struct InMemorySettingsStore {
    display_names: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlockSettingsStore for InMemorySettingsStore {
    async fn display_name(&self, usage_id: &str) -> Option<String> {
        self.display_names.read().await.get(usage_id).cloned()
    }

    async fn set_display_name(&self, usage_id: &str, display_name: Option<String>) {
        let mut names = self.display_names.write().await;
        match display_name {
            Some(name) => {
                names.insert(usage_id.to_string(), name);
            }
            None => {
                names.remove(usage_id);
            }
        }
    }
}
