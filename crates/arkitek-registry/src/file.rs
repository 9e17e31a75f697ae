use std::io;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use arkitek_common::{ClusterLink, LinkDefaults, NewClusterLink};

use crate::types::{build_link, remove_link, LinkRegistry, RegistryError};

/// Result of reading the links file.
#[derive(Debug)]
pub enum Snapshot {
    /// The file does not exist yet.
    Missing,
    /// The file exists but could not be read.
    Unreadable(io::Error),
    /// The file was read but is not a JSON array of links.
    Malformed(serde_json::Error),
    Loaded(Vec<ClusterLink>),
}

impl Snapshot {
    /// Collapses every failure to an empty collection.
    pub fn into_links(self) -> Vec<ClusterLink> {
        match self {
            Snapshot::Loaded(links) => links,
            Snapshot::Missing | Snapshot::Unreadable(_) | Snapshot::Malformed(_) => Vec::new(),
        }
    }
}

/// Registry backed by a single JSON file holding the whole collection.
///
/// Every mutation re-reads the file, applies the change and replaces the file
/// atomically. A file that exists but cannot be read or parsed is never
/// replaced: mutations fail with [`RegistryError::Persistence`] until it is
/// repaired, while `list` keeps reading it as empty. Mutations are serialised through one in-process lock, so
/// concurrent creates/deletes within a process never lose updates. Several
/// processes sharing one file are not coordinated.
#[derive(Debug)]
pub struct JsonFileRegistry {
    path: PathBuf,
    defaults: LinkDefaults,
    write_lock: Mutex<()>,
}

impl JsonFileRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_defaults(path, LinkDefaults::default())
    }

    pub fn with_defaults(path: impl Into<PathBuf>, defaults: LinkDefaults) -> Self {
        Self {
            path: path.into(),
            defaults,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Snapshot {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Snapshot::Loaded(Vec::new()),
            Ok(bytes) => match serde_json::from_slice::<Vec<ClusterLink>>(&bytes) {
                Ok(links) => Snapshot::Loaded(links),
                Err(e) => Snapshot::Malformed(e),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Snapshot::Missing,
            Err(e) => Snapshot::Unreadable(e),
        }
    }

    async fn read_links(&self) -> Vec<ClusterLink> {
        let snapshot = self.load().await;
        match &snapshot {
            Snapshot::Loaded(_) => {}
            Snapshot::Missing => {
                debug!(path = %self.path.display(), "links file missing, treating as empty");
            }
            Snapshot::Unreadable(e) => {
                warn!(path = %self.path.display(), error = %e, "links file unreadable, treating as empty");
            }
            Snapshot::Malformed(e) => {
                warn!(path = %self.path.display(), error = %e, "links file malformed, treating as empty");
            }
        }
        snapshot.into_links()
    }

    /// Current collection for a read-modify-write. Unlike `read_links`, only
    /// a missing file counts as empty.
    async fn read_links_for_update(&self) -> Result<Vec<ClusterLink>, RegistryError> {
        let source = match self.load().await {
            Snapshot::Loaded(links) => return Ok(links),
            Snapshot::Missing => return Ok(Vec::new()),
            Snapshot::Unreadable(e) => e,
            Snapshot::Malformed(e) => io::Error::new(io::ErrorKind::InvalidData, e),
        };
        warn!(path = %self.path.display(), error = %source, "refusing to overwrite links file");
        Err(RegistryError::Persistence {
            path: self.path.clone(),
            source,
        })
    }

    async fn write_links(&self, links: &[ClusterLink]) -> Result<(), RegistryError> {
        self.write_atomic(links).await.map_err(|source| RegistryError::Persistence {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes to a sibling temp file, syncs it and renames it over the target.
    async fn write_atomic(&self, links: &[ClusterLink]) -> io::Result<()> {
        let bytes = serde_json::to_vec_pretty(links)?;

        let parent = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file_name = self
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("cluster-links.json");
        let tmp_name = format!(".{}.tmp.{}.{}", file_name, std::process::id(), Uuid::new_v4());
        let tmp = match parent {
            Some(parent) => parent.join(tmp_name),
            None => PathBuf::from(tmp_name),
        };

        {
            let mut f = tokio::fs::File::create(&tmp).await?;
            f.write_all(&bytes).await?;
            f.sync_all().await?;
        }

        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl LinkRegistry for JsonFileRegistry {
    async fn list(&self) -> Vec<ClusterLink> {
        self.read_links().await
    }

    async fn create(&self, new: NewClusterLink) -> Result<ClusterLink, RegistryError> {
        let _guard = self.write_lock.lock().await;

        let mut links = self.read_links_for_update().await?;
        let link = build_link(&links, new, &self.defaults)?;
        links.push(link.clone());
        self.write_links(&links).await?;

        info!(id = %link.id, name = %link.name, endpoint = %link.endpoint, "cluster link created");
        Ok(link)
    }

    async fn delete(&self, id: &str) -> Result<ClusterLink, RegistryError> {
        let _guard = self.write_lock.lock().await;

        let mut links = self.read_links_for_update().await?;
        let removed = remove_link(&mut links, id)?;
        self.write_links(&links).await?;

        info!(id = %removed.id, name = %removed.name, "cluster link deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_failures_read_as_empty() {
        assert!(Snapshot::Missing.into_links().is_empty());
        let err = serde_json::from_str::<Vec<ClusterLink>>("{").unwrap_err();
        assert!(Snapshot::Malformed(err).into_links().is_empty());
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert!(Snapshot::Unreadable(io_err).into_links().is_empty());
    }
}
