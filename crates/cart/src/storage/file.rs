//! JSON file snapshot store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rocketshoes_core::Cart;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

use super::{SnapshotStore, StoreError, decode, encode};
use crate::config::StorageConfig;

/// Snapshot store backed by a single JSON file.
///
/// The file name is derived from the storage key, so several carts can share
/// a data directory. Saves go to a temporary sibling file that is then
/// renamed over the snapshot, which keeps the replacement atomic.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store for `key` under `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(file_name_for_key(key)),
        }
    }

    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.data_dir, &config.key)
    }

    /// Location of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<Cart>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No saved cart");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let cart = decode(&raw)?;
        debug!(lines = cart.len(), "Loaded cart snapshot");
        Ok(Some(cart))
    }

    #[instrument(skip(self, cart), fields(path = %self.path.display(), lines = cart.len()))]
    async fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let raw = encode(cart)?;

        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir).await?;
        }

        let temp = self.temp_path();
        if let Err(e) = replace_file(&temp, &self.path, raw.as_bytes()).await {
            // the previous snapshot is still in place; only the temp file is stale
            if let Err(cleanup) = tokio::fs::remove_file(&temp).await {
                debug!(error = %cleanup, "Could not remove temporary snapshot");
            }
            return Err(e.into());
        }

        debug!("Saved cart snapshot");
        Ok(())
    }
}

/// Write `contents` to `temp`, then rename it over `path`.
async fn replace_file(temp: &Path, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(temp).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(temp, path).await
}

/// Map a logical key such as `@RocketShoes:cart` to a portable file name.
fn file_name_for_key(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.json")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use rocketshoes_core::{Item, Price, ProductId};

    use super::*;

    fn cart() -> Cart {
        Cart::from_items(vec![Item {
            id: ProductId::new(1),
            title: "Tênis de Caminhada".to_string(),
            price: Price::from_cents(17990),
            image: "https://example.com/1.jpg".to_string(),
            amount: NonZeroU32::new(2).unwrap(),
        }])
        .unwrap()
    }

    #[test]
    fn test_file_name_for_key() {
        assert_eq!(file_name_for_key("@RocketShoes:cart"), "_RocketShoes_cart.json");
        assert_eq!(file_name_for_key("../etc/passwd"), ".._etc_passwd.json");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "@RocketShoes:cart");
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"), "@RocketShoes:cart");

        store.save(&cart()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(cart()));
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_resave_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "cart");

        store.save(&cart()).await.unwrap();
        let first = std::fs::read(store.path()).unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        store.save(&loaded).await.unwrap();
        assert_eq!(std::fs::read(store.path()).unwrap(), first);
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "cart");
        // a non-empty directory cannot be replaced by a file
        std::fs::create_dir(store.path()).unwrap();
        std::fs::write(store.path().join("keep"), "x").unwrap();

        let result = store.save(&cart()).await;

        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(!store.temp_path().exists());
        assert!(store.path().join("keep").exists());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "cart");
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.load().await, Err(StoreError::Corrupt(_))));
    }
}
