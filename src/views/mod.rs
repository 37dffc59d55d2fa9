/*!
 * Views
 * Screen state machines: each drives the API client and reports through a Notifier
 */
pub mod blog_form;
pub mod comments;
pub mod form;
pub mod like;
pub mod list;
pub mod message;
pub mod notify;
pub mod overview;
pub mod project_form;
pub mod public;
pub mod resources;
pub mod shell;

pub use blog_form::{BlogEditor, BlogForm};
pub use comments::{CommentDraft, CommentSection};
pub use form::FormError;
pub use like::LikeWidget;
pub use list::{EmptyState, ListResource, ListView, PendingAction, StatusFilter};
pub use message::MessageDetail;
pub use notify::{Notifier, Toast, Variant};
pub use project_form::{ProjectEditor, ProjectForm};
pub use public::{DetailState, HomePage};
pub use shell::ShellState;
