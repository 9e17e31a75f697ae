use std::sync::Arc;

use tokio::sync::RwLock;

use arkitek_common::{ClusterLink, LinkDefaults, NewClusterLink};

use crate::types::{build_link, remove_link, LinkRegistry, RegistryError};

/// In-process registry. Nothing survives a restart.
#[derive(Debug, Clone)]
pub struct MemoryRegistry {
    links: Arc<RwLock<Vec<ClusterLink>>>,
    defaults: LinkDefaults,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::with_defaults(LinkDefaults::default())
    }

    pub fn with_defaults(defaults: LinkDefaults) -> Self {
        Self {
            links: Arc::new(RwLock::new(Vec::new())),
            defaults,
        }
    }
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LinkRegistry for MemoryRegistry {
    async fn list(&self) -> Vec<ClusterLink> {
        self.links.read().await.clone()
    }

    async fn create(&self, new: NewClusterLink) -> Result<ClusterLink, RegistryError> {
        let mut links = self.links.write().await;
        let link = build_link(&links, new, &self.defaults)?;
        links.push(link.clone());
        Ok(link)
    }

    async fn delete(&self, id: &str) -> Result<ClusterLink, RegistryError> {
        let mut links = self.links.write().await;
        remove_link(&mut links, id)
    }
}
