use super::list::ListResource;
use super::notify::Notifier;
use crate::api::{endpoints, ApiClient};
use crate::models::ContactMessage;

pub const MESSAGES_PATH: &str = "/dashboard/messages";

/// Single-message screen.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDetail {
    message: ContactMessage,
}

impl MessageDetail {
    /// Loads one message. On failure a toast is raised and the caller navigates
    /// back to [`MESSAGES_PATH`].
    pub async fn load(client: &ApiClient, id: &str, notifier: &mut Notifier) -> Option<Self> {
        match client
            .fetch::<ContactMessage>(&endpoints::get_contact(id), "message")
            .await
        {
            Ok(message) => Some(Self { message }),
            Err(e) => {
                notifier.error("Error", e.to_string());
                None
            }
        }
    }

    pub fn message(&self) -> &ContactMessage {
        &self.message
    }

    pub async fn toggle_read(&mut self, client: &ApiClient, notifier: &mut Notifier) -> bool {
        let (title, description) = self.message.toggle_toast();
        match client.send(&self.message.toggle_request()).await {
            Ok(_) => {
                self.message.read = !self.message.read;
                notifier.success(title, description);
                true
            }
            Err(e) => {
                notifier.error("Error", e.to_string());
                false
            }
        }
    }

    /// Deletes the message; on success the caller navigates back to the list.
    pub async fn delete(&self, client: &ApiClient, notifier: &mut Notifier) -> bool {
        match client.send(&self.message.delete_request()).await {
            Ok(_) => {
                notifier.success("Message Deleted", "The message has been successfully deleted");
                true
            }
            Err(e) => {
                notifier.error("Error", e.to_string());
                false
            }
        }
    }
}
