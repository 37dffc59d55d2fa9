use serde::de::DeserializeOwned;

use super::notify::Notifier;
use crate::api::{ApiClient, ApiRequest};
use crate::models::ResourceKind;

/// A record type managed by a dashboard list screen.
pub trait ListResource: DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;
    /// Plural noun used in messages, e.g. "blogs".
    const PLURAL: &'static str;

    fn id(&self) -> &str;

    /// Case-insensitive match; `needle` is already lower-cased and non-empty.
    fn matches(&self, needle: &str) -> bool;

    /// The toggleable boolean: published, read or active.
    fn flag(&self) -> bool;
    fn set_flag(&mut self, value: bool);

    fn list_request() -> ApiRequest;
    fn delete_request(&self) -> ApiRequest;
    fn toggle_request(&self) -> ApiRequest;

    /// Confirmation title for toggling, e.g. "Publish Blog?".
    fn toggle_prompt(&self) -> String;

    /// Success toast after a toggle; `self` still holds the prior flag.
    fn toggle_toast(&self) -> (String, String);

    /// Subtitle of the empty state when the collection itself is empty.
    fn nothing_yet() -> String {
        format!("There are no {} yet.", Self::PLURAL)
    }
}

/// Status filter applied on top of the search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    /// Flag set: published, read, active.
    On,
    Off,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Self {
        match value {
            "read" | "active" | "published" | "approved" => StatusFilter::On,
            "unread" | "inactive" | "draft" | "pending" => StatusFilter::Off,
            _ => StatusFilter::All,
        }
    }

    fn admits(&self, flag: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::On => flag,
            StatusFilter::Off => !flag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Delete(String),
    Toggle(String),
}

impl PendingAction {
    pub fn id(&self) -> &str {
        match self {
            PendingAction::Delete(id) | PendingAction::Toggle(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Items exist but none pass the search and filter.
    NoResults,
    /// The collection is empty.
    Nothing,
}

/// State of one dashboard list screen.
#[derive(Debug, Clone)]
pub struct ListView<R: ListResource> {
    items: Vec<R>,
    loading: bool,
    search: String,
    status: StatusFilter,
    pending: Option<PendingAction>,
}

impl<R: ListResource> Default for ListView<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            search: String::new(),
            status: StatusFilter::All,
            pending: None,
        }
    }
}

impl<R: ListResource> ListView<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<R>) -> Self {
        Self {
            items,
            loading: false,
            ..Self::default()
        }
    }

    /// Fetches the whole collection. A failure leaves the list empty and raises a toast.
    pub async fn load(&mut self, client: &ApiClient, notifier: &mut Notifier) {
        self.loading = true;
        match client.fetch::<Vec<R>>(&R::list_request(), R::PLURAL).await {
            Ok(items) => self.items = items,
            Err(e) => {
                tracing::warn!(resource = R::PLURAL, error = %e, "list load failed");
                self.items.clear();
                notifier.error("Error", e.to_string());
            }
        }
        self.loading = false;
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.status = status;
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status
    }

    /// Items passing the current search term and status filter.
    pub fn visible(&self) -> Vec<&R> {
        let needle = self.search.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| needle.is_empty() || item.matches(&needle))
            .filter(|item| self.status.admits(item.flag()))
            .collect()
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.items.is_empty() {
            Some(EmptyState::Nothing)
        } else if self.visible().is_empty() {
            Some(EmptyState::NoResults)
        } else {
            None
        }
    }

    pub fn find(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Opens the delete confirmation. Returns false when `id` is not in the list.
    pub fn request_delete(&mut self, id: &str) -> bool {
        self.open(PendingAction::Delete(id.to_string()))
    }

    /// Opens the toggle confirmation. Returns false when `id` is not in the list.
    pub fn request_toggle(&mut self, id: &str) -> bool {
        self.open(PendingAction::Toggle(id.to_string()))
    }

    fn open(&mut self, action: PendingAction) -> bool {
        if self.find(action.id()).is_none() {
            return false;
        }
        self.pending = Some(action);
        true
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn pending_item(&self) -> Option<&R> {
        self.pending.as_ref().and_then(|action| self.find(action.id()))
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Runs the pending action. Local state changes only after the server acknowledges it;
    /// the dialog closes either way. Returns whether the action succeeded.
    pub async fn confirm(&mut self, client: &ApiClient, notifier: &mut Notifier) -> bool {
        let Some(action) = self.pending.take() else {
            return false;
        };
        let Some(index) = self.items.iter().position(|item| item.id() == action.id()) else {
            return false;
        };
        let label = R::KIND.label();

        match action {
            PendingAction::Delete(_) => {
                let req = self.items[index].delete_request();
                match client.send(&req).await {
                    Ok(_) => {
                        let removed = self.items.remove(index);
                        tracing::info!(resource = R::PLURAL, id = %removed.id(), "item deleted");
                        notifier.success(
                            format!("{} Deleted", label),
                            format!("The {} has been successfully deleted", label.to_lowercase()),
                        );
                        true
                    }
                    Err(e) => {
                        notifier.error("Error", e.to_string());
                        false
                    }
                }
            }
            PendingAction::Toggle(_) => {
                let item = &self.items[index];
                let req = item.toggle_request();
                let (title, description) = item.toggle_toast();
                match client.send(&req).await {
                    Ok(_) => {
                        let item = &mut self.items[index];
                        let flipped = !item.flag();
                        item.set_flag(flipped);
                        tracing::info!(resource = R::PLURAL, id = %item.id(), flag = flipped, "item toggled");
                        notifier.success(title, description);
                        true
                    }
                    Err(e) => {
                        notifier.error("Error", e.to_string());
                        false
                    }
                }
            }
        }
    }
}
