use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: Option<String>,
    pub description: String,
    pub variant: Variant,
}

impl Toast {
    pub fn is_error(&self) -> bool {
        self.variant == Variant::Destructive
    }

    /// Query parameters that carry this toast across a redirect.
    pub fn to_query(&self) -> String {
        let mut parts = vec![format!(
            "toast={}",
            urlencoding::encode(&self.description)
        )];
        if let Some(title) = &self.title {
            parts.push(format!("toast_title={}", urlencoding::encode(title)));
        }
        if self.is_error() {
            parts.push("toast_variant=destructive".to_string());
        }
        parts.join("&")
    }

    pub fn from_query(params: &HashMap<String, String>) -> Option<Self> {
        let description = params.get("toast").filter(|d| !d.is_empty())?.clone();
        let variant = match params.get("toast_variant").map(String::as_str) {
            Some("destructive") => Variant::Destructive,
            _ => Variant::Default,
        };
        Some(Self {
            title: params.get("toast_title").cloned(),
            description,
            variant,
        })
    }
}

/// Collects the toasts raised while handling one interaction.
#[derive(Debug, Default, Clone)]
pub struct Notifier {
    toasts: Vec<Toast>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: Toast) {
        match toast.variant {
            Variant::Destructive => {
                tracing::debug!(title = ?toast.title, description = %toast.description, "error toast")
            }
            Variant::Default => {
                tracing::trace!(title = ?toast.title, description = %toast.description, "toast")
            }
        }
        self.toasts.push(toast);
    }

    pub fn success(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Toast {
            title: Some(title.into()),
            description: description.into(),
            variant: Variant::Default,
        });
    }

    /// Untitled, non-error toast.
    pub fn info(&mut self, description: impl Into<String>) {
        self.push(Toast {
            title: None,
            description: description.into(),
            variant: Variant::Default,
        });
    }

    pub fn error(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Toast {
            title: Some(title.into()),
            description: description.into(),
            variant: Variant::Destructive,
        });
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn last(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn has_errors(&self) -> bool {
        self.toasts.iter().any(Toast::is_error)
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }
}
