use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ironset_protocol::{TrackerError, TrackerResult, UserDirectory, UserStorePort};
use parking_lot::Mutex;
use tokio::fs;
use tracing::{debug, instrument, warn};

/// Stores every user in one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strict read: a missing file is an empty directory, anything unreadable
    /// is an error.
    pub async fn try_load(&self) -> Result<UserDirectory> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(UserDirectory::new());
        }

        let raw = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed reading user data {:?}", self.path))?;
        let users = serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing user data {:?}", self.path))?;
        Ok(users)
    }

    pub async fn try_save(&self, users: &UserDirectory) -> Result<()> {
        Self::ensure_parent(&self.path).await?;

        let payload = serde_json::to_string_pretty(users)?;
        fs::write(&self.path, payload)
            .await
            .with_context(|| format!("failed writing user data {:?}", self.path))?;
        Ok(())
    }

    async fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl UserStorePort for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> UserDirectory {
        match self.try_load().await {
            Ok(users) => {
                debug!(users = users.len(), "user data loaded");
                users
            }
            Err(error) => {
                warn!(error = %format!("{error:#}"), "user data unreadable, starting empty");
                UserDirectory::new()
            }
        }
    }

    #[instrument(skip(self, users), fields(path = %self.path.display(), users = users.len()))]
    async fn save(&self, users: &UserDirectory) -> TrackerResult<()> {
        self.try_save(users)
            .await
            .map_err(|error| TrackerError::Io(format!("{error:#}")))
    }
}

/// Process-local store; same whole-document semantics, nothing on disk.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<UserDirectory>,
}

impl MemoryUserStore {
    pub fn new(users: UserDirectory) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    pub fn snapshot(&self) -> UserDirectory {
        self.users.lock().clone()
    }
}

#[async_trait]
impl UserStorePort for MemoryUserStore {
    async fn load(&self) -> UserDirectory {
        self.snapshot()
    }

    async fn save(&self, users: &UserDirectory) -> TrackerResult<()> {
        *self.users.lock() = users.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::Result;
    use chrono::Utc;
    use ironset_protocol::{SetInput, UserId, UserProfile, UserStorePort};
    use tokio::fs;

    use super::*;

    fn unique_test_root(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("{name}-{nanos}"))
    }

    fn sample_directory() -> UserDirectory {
        let now = Utc::now();
        let mut profile = UserProfile::new("Alex");
        profile.begin_session("Day A", now);
        if let Some(session) = profile.current_session.as_mut() {
            session.record_set(0, "Leg press (4x8-12)", SetInput { weight: 120.0, reps: 10 }, now);
        }
        profile.finish_session();
        profile.record_body_weight(81.5, now);

        let mut users = UserDirectory::new();
        users.insert(UserId::from_string("1001"), profile);
        users
    }

    #[tokio::test]
    async fn missing_file_loads_empty() -> Result<()> {
        let root = unique_test_root("ironset-store-missing");
        let store = JsonFileStore::new(root.join("user_data.json"));

        assert!(store.try_load().await?.is_empty());
        assert!(store.load().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_preserves_profiles() -> Result<()> {
        let root = unique_test_root("ironset-store-save");
        let store = JsonFileStore::new(root.join("nested/user_data.json"));
        let users = sample_directory();

        store.save(&users).await?;
        let loaded = store.load().await;
        assert_eq!(loaded, users);

        let raw = fs::read_to_string(store.path()).await?;
        assert!(raw.contains("\"weight_history\""));
        assert!(raw.contains("\"completed_exercises\""));

        let _ = fs::remove_dir_all(root).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_degrades_to_empty() -> Result<()> {
        let root = unique_test_root("ironset-store-corrupt");
        fs::create_dir_all(&root).await?;
        let path = root.join("user_data.json");
        fs::write(&path, "{ \"1001\": { \"username\": ").await?;
        let store = JsonFileStore::new(&path);

        assert!(store.try_load().await.is_err());
        assert!(store.load().await.is_empty());

        let _ = fs::remove_dir_all(root).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_overwrites_whole_document() -> Result<()> {
        let root = unique_test_root("ironset-store-overwrite");
        let store = JsonFileStore::new(root.join("user_data.json"));

        store.save(&sample_directory()).await?;
        let mut other = UserDirectory::new();
        other.insert(UserId::from_string("2002"), UserProfile::new("Sam"));
        store.save(&other).await?;

        let loaded = store.load().await;
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key(&UserId::from_string("2002")));

        let _ = fs::remove_dir_all(root).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_into_unwritable_location_reports_io_error() {
        let root = unique_test_root("ironset-store-unwritable");
        fs::create_dir_all(&root).await.unwrap();
        // the target path is an existing directory, so the write must fail
        let store = JsonFileStore::new(&root);

        let error = store.save(&sample_directory()).await.unwrap_err();
        assert!(matches!(error, TrackerError::Io(_)));

        let _ = fs::remove_dir_all(root).await;
    }

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = MemoryUserStore::default();
        assert!(store.load().await.is_empty());
        store.save(&sample_directory()).await.unwrap();
        assert_eq!(store.load().await.len(), 1);
    }
}
