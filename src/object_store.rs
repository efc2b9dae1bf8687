// ABOUTME: Object storage access for uploaded avatars
// ABOUTME: Only removal is needed server-side; failures are logged and never surfaced

use async_trait::async_trait;
use serde_json::json;

use crate::config::AppConfig;
use crate::error::{AppError, Result};

pub const AVATAR_BUCKET: &str = "avatars";

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<()>;
}

/// Object path of an avatar within its bucket. Only URLs under the project's public
/// avatars path whose file name carries the owner's id prefix qualify.
pub fn avatar_object_path(avatar_url: &str, project_url: &str, owner_id: &str) -> Option<String> {
    let prefix = format!(
        "{}/storage/v1/object/public/{}/{}/",
        project_url.trim_end_matches('/'),
        AVATAR_BUCKET,
        AVATAR_BUCKET
    );
    let base = avatar_url.split(['?', '#']).next()?;
    let file_name = base.strip_prefix(&prefix)?;

    let owned = file_name
        .strip_prefix(owner_id)
        .is_some_and(|rest| rest.starts_with('-'));
    let single_segment = !file_name.contains(['/', '\\', '%']) && !file_name.contains("..");
    if !owned || !single_segment {
        return None;
    }

    Some(format!("{}/{}", AVATAR_BUCKET, file_name))
}

/// Delete a replaced avatar. Best effort: the profile update has already succeeded.
/// Without a configured project nothing is removed.
pub async fn remove_avatar_best_effort(
    store: &dyn ObjectStore,
    project_url: Option<&str>,
    owner_id: &str,
    avatar_url: &str,
) {
    let Some(project_url) = project_url else {
        tracing::debug!("No project configured; keeping old avatar {}", avatar_url);
        return;
    };
    let Some(path) = avatar_object_path(avatar_url, project_url, owner_id) else {
        tracing::warn!(
            "Not removing avatar {} for user {}: outside the user's avatar objects",
            avatar_url,
            owner_id
        );
        return;
    };

    match store.remove(AVATAR_BUCKET, &[path.clone()]).await {
        Ok(()) => tracing::debug!("Removed old avatar {}", path),
        Err(e) => tracing::warn!("Failed to remove old avatar {}: {}", path, e),
    }
}

pub struct HostedObjectStore {
    client: reqwest::Client,
    project_url: String,
    api_key: String,
}

impl HostedObjectStore {
    pub fn new(project_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            project_url: project_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Option<Self> {
        let project_url = config.project_url()?;
        let api_key = config.storage_key()?;
        Some(Self::new(project_url, api_key))
    }
}

#[async_trait]
impl ObjectStore for HostedObjectStore {
    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/storage/v1/object/{}", self.project_url, bucket))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Object storage returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

pub struct NoopObjectStore;

#[async_trait]
impl ObjectStore for NoopObjectStore {
    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<()> {
        tracing::debug!("Demo mode: skipping removal of {:?} from {}", paths, bucket);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const PROJECT: &str = "https://abc.supabase.co";

    #[test]
    fn test_avatar_path_for_own_object() {
        assert_eq!(
            avatar_object_path(
                "https://abc.supabase.co/storage/v1/object/public/avatars/avatars/user-1-123.png",
                PROJECT,
                "user-1"
            ),
            Some("avatars/user-1-123.png".to_string())
        );
        assert_eq!(
            avatar_object_path(
                "https://abc.supabase.co/storage/v1/object/public/avatars/avatars/user-1-9.jpg?v=2",
                "https://abc.supabase.co/",
                "user-1"
            ),
            Some("avatars/user-1-9.jpg".to_string())
        );
    }

    #[test]
    fn test_avatar_path_rejects_foreign_objects() {
        let other_user =
            "https://abc.supabase.co/storage/v1/object/public/avatars/avatars/user-2-123.png";
        let other_project =
            "https://evil.supabase.co/storage/v1/object/public/avatars/avatars/user-1-123.png";
        let prefix_collision =
            "https://abc.supabase.co/storage/v1/object/public/avatars/avatars/user-10-123.png";
        let traversal =
            "https://abc.supabase.co/storage/v1/object/public/avatars/avatars/user-1-/../x.png";

        for url in [other_user, other_project, prefix_collision, traversal, "not a url"] {
            assert_eq!(avatar_object_path(url, PROJECT, "user-1"), None, "{}", url);
        }
    }

    struct FailingStore;

    #[async_trait]
    impl ObjectStore for FailingStore {
        async fn remove(&self, _bucket: &str, _paths: &[String]) -> Result<()> {
            Err(AppError::Upstream("storage down".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        removed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ObjectStore for RecordingStore {
        async fn remove(&self, _bucket: &str, paths: &[String]) -> Result<()> {
            self.removed.lock().unwrap().extend_from_slice(paths);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_best_effort_removal_swallows_failures() {
        let own = "https://abc.supabase.co/storage/v1/object/public/avatars/avatars/user-1-1.png";
        remove_avatar_best_effort(&FailingStore, Some(PROJECT), "user-1", own).await;
        remove_avatar_best_effort(&NoopObjectStore, Some(PROJECT), "user-1", own).await;
    }

    #[tokio::test]
    async fn test_removal_only_touches_owner_objects() {
        let store = RecordingStore::default();
        let own = "https://abc.supabase.co/storage/v1/object/public/avatars/avatars/user-1-1.png";
        let foreign = "https://abc.supabase.co/storage/v1/object/public/avatars/avatars/user-2-1.png";

        remove_avatar_best_effort(&store, Some(PROJECT), "user-1", foreign).await;
        remove_avatar_best_effort(&store, None, "user-1", own).await;
        assert!(store.removed.lock().unwrap().is_empty());

        remove_avatar_best_effort(&store, Some(PROJECT), "user-1", own).await;
        assert_eq!(
            store.removed.lock().unwrap().as_slice(),
            &["avatars/user-1-1.png".to_string()]
        );
    }
}
