use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use arkitek_common::cluster_link::non_empty;
use arkitek_common::{ClusterLink, LinkDefaults, LinkStatus, NewClusterLink};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("a cluster link named {0:?} already exists")]
    DuplicateName(String),

    #[error("cluster link {0:?} not found")]
    NotFound(String),

    #[error("failed to persist cluster links to {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Durable collection of cluster links.
///
/// `list` never fails: an absent or unreadable backing store reads as empty.
#[async_trait]
pub trait LinkRegistry: Send + Sync {
    async fn list(&self) -> Vec<ClusterLink>;

    async fn create(&self, new: NewClusterLink) -> Result<ClusterLink, RegistryError>;

    /// Removes the link with `id` and returns it.
    async fn delete(&self, id: &str) -> Result<ClusterLink, RegistryError>;
}

/// Validates `new` against `existing` and builds the record to append.
///
/// Checks run in order: name present, endpoint present, name unused.
pub(crate) fn build_link(
    existing: &[ClusterLink],
    new: NewClusterLink,
    defaults: &LinkDefaults,
) -> Result<ClusterLink, RegistryError> {
    let name = non_empty(new.name.as_deref()).ok_or(RegistryError::MissingField("name"))?;
    let endpoint =
        non_empty(new.endpoint.as_deref()).ok_or(RegistryError::MissingField("endpoint"))?;

    if existing.iter().any(|link| link.name == name) {
        return Err(RegistryError::DuplicateName(name.to_string()));
    }

    Ok(ClusterLink {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        endpoint: endpoint.to_string(),
        credentials: defaults.credentials_or_default(new.credentials.as_deref()),
        builder_type: defaults.builder_type_or_default(new.builder_type.as_deref()),
        created_at: Utc::now(),
        status: LinkStatus::Active,
    })
}

/// Removes every link whose id is `id`, keeping the order of the rest, and
/// returns the first one removed. Older files can hold colliding ids.
pub(crate) fn remove_link(links: &mut Vec<ClusterLink>, id: &str) -> Result<ClusterLink, RegistryError> {
    let first = links
        .iter()
        .find(|link| link.id == id)
        .cloned()
        .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
    links.retain(|link| link.id != id);
    Ok(first)
}
