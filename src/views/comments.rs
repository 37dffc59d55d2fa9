use chrono::Utc;
use serde_json::json;

use super::form::FormError;
use super::notify::Notifier;
use crate::api::{endpoints, ApiClient};
use crate::models::comment::{attach_reply, nest};
use crate::models::{Comment, CommentAuthor, ContentType};

/// Input from the comment or reply form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentDraft {
    pub name: String,
    pub email: String,
    pub content: String,
    pub parent_id: Option<String>,
}

impl CommentDraft {
    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() || self.content.trim().is_empty() {
            return Err(FormError::IncompleteComment);
        }
        Ok(())
    }

    /// Client-side comment with a temporary id (current time in milliseconds).
    /// The server assigns the real id and approval state.
    pub fn provisional(&self, content_type: ContentType, content_id: &str) -> Comment {
        let email = self.email.trim();
        Comment {
            id: Utc::now().timestamp_millis().to_string(),
            content_id: content_id.to_string(),
            content_type: Some(content_type),
            parent_id: self.parent_id.clone().filter(|p| !p.is_empty()),
            author: CommentAuthor {
                name: self.name.trim().to_string(),
                email: (!email.is_empty()).then(|| email.to_string()),
                avatar: None,
            },
            content: self.content.trim().to_string(),
            approved: false,
            created_at: Some(Utc::now()),
            replies: Vec::new(),
        }
    }
}

/// Comment tree for one piece of content.
#[derive(Debug, Clone)]
pub struct CommentSection {
    pub content_type: ContentType,
    pub content_id: String,
    comments: Vec<Comment>,
    loading: bool,
}

impl CommentSection {
    pub fn new(content_type: ContentType, content_id: impl Into<String>) -> Self {
        Self {
            content_type,
            content_id: content_id.into(),
            comments: Vec::new(),
            loading: true,
        }
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// All comments including replies.
    pub fn total(&self) -> usize {
        self.comments.iter().map(Comment::thread_len).sum()
    }

    pub async fn load(&mut self, client: &ApiClient, notifier: &mut Notifier) {
        self.loading = true;
        let req = endpoints::list_comments(self.content_type, &self.content_id);
        match client.fetch::<Vec<Comment>>(&req, "comments").await {
            Ok(comments) => self.comments = nest(comments),
            Err(e) => {
                tracing::warn!(content_id = %self.content_id, error = %e, "comment load failed");
                notifier.error("Error", "Failed to load comments. Please try again later.");
            }
        }
        self.loading = false;
    }

    /// Posts a comment or reply. Invalid input raises a toast and sends nothing.
    /// The result only becomes visible when the server returns it approved; otherwise
    /// the tree is re-fetched.
    pub async fn post(
        &mut self,
        draft: &CommentDraft,
        client: &ApiClient,
        notifier: &mut Notifier,
    ) -> bool {
        if let Err(e) = draft.validate() {
            e.notify(notifier);
            return false;
        }

        let provisional = draft.provisional(self.content_type, &self.content_id);
        let is_reply = provisional.parent_id.is_some();

        let mut body = json!({
            "author": provisional.author,
            "content": provisional.content,
        });
        if let Some(parent_id) = &provisional.parent_id {
            body["parentId"] = json!(parent_id);
        }

        let req = endpoints::post_comment(self.content_type, &self.content_id, body);
        let saved = match client.fetch::<Comment>(&req, "comment").await {
            Ok(saved) => saved,
            Err(e) => {
                notifier.error("Error", e.to_string());
                return false;
            }
        };

        tracing::info!(
            provisional_id = %provisional.id,
            id = %saved.id,
            approved = saved.approved,
            "comment posted"
        );

        if is_reply {
            notifier.info("Reply added successfully. It will be visible after approval.");
        } else {
            notifier.info("Comment added successfully. It will be visible after approval.");
        }

        if saved.approved {
            match saved.parent_id.clone() {
                Some(parent) => {
                    if !attach_reply(&mut self.comments, &parent, saved.clone()) {
                        self.comments.push(saved);
                    }
                }
                None => self.comments.push(saved),
            }
        } else {
            let mut quiet = Notifier::new();
            self.load(client, &mut quiet).await;
        }
        true
    }
}
