use super::notify::Notifier;
use crate::models::ContentType;
use crate::store::{LocalStore, StoreError};

/// Per-browser like toggle. Purely local; never synchronised with the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeWidget {
    pub content_type: ContentType,
    pub content_id: String,
    liked: bool,
    likes: i64,
}

impl LikeWidget {
    fn liked_key(content_type: ContentType, content_id: &str) -> String {
        format!("{}-{}-liked", content_type, content_id)
    }

    fn likes_key(content_type: ContentType, content_id: &str) -> String {
        format!("{}-{}-likes", content_type, content_id)
    }

    /// Restores state from the store, defaulting to not-liked with `initial_likes`.
    pub fn mount(
        store: &dyn LocalStore,
        content_type: ContentType,
        content_id: &str,
        initial_likes: i64,
    ) -> Self {
        let liked = store
            .get(&Self::liked_key(content_type, content_id))
            .is_some_and(|v| v == "true");
        let likes = store
            .get(&Self::likes_key(content_type, content_id))
            .and_then(|v| v.parse().ok())
            .unwrap_or(initial_likes);

        Self {
            content_type,
            content_id: content_id.to_string(),
            liked,
            likes,
        }
    }

    pub fn liked(&self) -> bool {
        self.liked
    }

    pub fn likes(&self) -> i64 {
        self.likes
    }

    /// Flips the state. Both keys are written together before the widget changes,
    /// so a failed write leaves the widget and the store as they were.
    pub async fn toggle(
        &mut self,
        store: &dyn LocalStore,
        notifier: &mut Notifier,
    ) -> Result<(), StoreError> {
        let liked = !self.liked;
        let likes = if liked { self.likes + 1 } else { self.likes - 1 };

        let liked_key = Self::liked_key(self.content_type, &self.content_id);
        let likes_key = Self::likes_key(self.content_type, &self.content_id);
        let count = likes.to_string();
        store
            .set_many(&[
                (liked_key.as_str(), if liked { "true" } else { "false" }),
                (likes_key.as_str(), count.as_str()),
            ])
            .await?;

        self.liked = liked;
        self.likes = likes;
        if liked {
            notifier.info("Thanks for liking!");
        } else {
            notifier.info("You've removed your like");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStore, MemoryStore};

    #[test]
    fn test_mount_defaults_to_initial() {
        let store = MemoryStore::new();
        let widget = LikeWidget::mount(&store, ContentType::Blog, "b1", 7);
        assert!(!widget.liked());
        assert_eq!(widget.likes(), 7);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let store = MemoryStore::new();
        let mut notifier = Notifier::new();
        let mut widget = LikeWidget::mount(&store, ContentType::Project, "p1", 3);

        widget.toggle(&store, &mut notifier).await.unwrap();
        assert!(widget.liked());
        assert_eq!(widget.likes(), 4);
        assert_eq!(store.get("project-p1-liked").as_deref(), Some("true"));
        assert_eq!(notifier.last().unwrap().description, "Thanks for liking!");

        widget.toggle(&store, &mut notifier).await.unwrap();
        assert!(!widget.liked());
        assert_eq!(widget.likes(), 3);
        assert_eq!(notifier.last().unwrap().description, "You've removed your like");
    }

    #[tokio::test]
    async fn test_remount_reads_persisted_state() {
        let store = MemoryStore::new();
        let mut notifier = Notifier::new();
        LikeWidget::mount(&store, ContentType::Blog, "b1", 0)
            .toggle(&store, &mut notifier)
            .await
            .unwrap();

        let widget = LikeWidget::mount(&store, ContentType::Blog, "b1", 0);
        assert!(widget.liked());
        assert_eq!(widget.likes(), 1);
    }

    #[tokio::test]
    async fn test_failed_toggle_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::open(&path).await.unwrap();
        let mut notifier = Notifier::new();
        let mut widget = LikeWidget::mount(&store, ContentType::Blog, "b1", 5);

        std::fs::create_dir(path.with_extension("tmp")).unwrap();

        assert!(widget.toggle(&store, &mut notifier).await.is_err());
        assert!(!widget.liked());
        assert_eq!(widget.likes(), 5);
        assert!(notifier.is_empty());
        assert_eq!(store.get("blog-b1-liked"), None);
        assert_eq!(store.get("blog-b1-likes"), None);

        let remounted = LikeWidget::mount(&store, ContentType::Blog, "b1", 5);
        assert!(!remounted.liked());
        assert_eq!(remounted.likes(), 5);
    }
}
