use serde::{Deserialize, Serialize};

use super::form::{add_unique, blank, remove_value, FormError};
use super::notify::Notifier;
use crate::api::{endpoints, upload_image, ApiClient, ApiError, ImageFile};
use crate::models::BlogPost;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogForm {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub tags: Vec<String>,
    pub image: String,
    pub published: bool,
}

impl From<&BlogPost> for BlogForm {
    fn from(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            tags: post.tags.clone(),
            image: post.image.clone(),
            published: post.published,
        }
    }
}

/// Create/edit screen for one blog post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogEditor {
    pub form: BlogForm,
    /// Id of the post being edited; `None` when creating.
    #[serde(default)]
    pub editing: Option<String>,
}

impl BlogEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an existing post for editing.
    pub async fn load(client: &ApiClient, id: &str) -> Result<Self, ApiError> {
        let post: BlogPost = client.fetch(&endpoints::get_blog(id), "blog").await?;
        Ok(Self {
            form: BlogForm::from(&post),
            editing: Some(post.id),
        })
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn add_tag(&mut self, input: &str) -> bool {
        add_unique(&mut self.form.tags, input)
    }

    pub fn remove_tag(&mut self, tag: &str) {
        remove_value(&mut self.form.tags, tag);
    }

    /// Uploads the featured image and stores its URL in the form.
    pub async fn upload_image(
        &mut self,
        client: &ApiClient,
        file: ImageFile,
        notifier: &mut Notifier,
    ) -> bool {
        match upload_image(client, file).await {
            Ok(url) => {
                self.form.image = url;
                notifier.success("Image Uploaded", "Your image has been uploaded successfully");
                true
            }
            Err(e) => {
                notifier.error("Upload Failed", e.to_string());
                false
            }
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        let form = &self.form;
        if blank(&form.title) || blank(&form.excerpt) || blank(&form.content) {
            return Err(FormError::MissingFields);
        }
        if form.tags.is_empty() {
            return Err(FormError::MissingTags);
        }
        if blank(&form.image) {
            return Err(FormError::MissingImage);
        }
        Ok(())
    }

    /// Validates, then creates or updates the post. Nothing is sent when validation fails.
    pub async fn submit(&mut self, client: &ApiClient, notifier: &mut Notifier) -> bool {
        if let Err(e) = self.validate() {
            e.notify(notifier);
            return false;
        }

        let body = match serde_json::to_value(&self.form) {
            Ok(body) => body,
            Err(e) => {
                notifier.error("Error", e.to_string());
                return false;
            }
        };
        let req = match &self.editing {
            Some(id) => endpoints::update_blog(id, body),
            None => endpoints::create_blog(body),
        };

        match client.send(&req).await {
            Ok(_) => {
                if self.is_editing() {
                    notifier.success("Blog Updated", "Your blog has been updated successfully");
                } else {
                    notifier.success("Blog Created", "Your blog has been created successfully");
                }
                tracing::info!(title = %self.form.title, editing = self.is_editing(), "blog saved");
                true
            }
            Err(e) => {
                let fallback = if self.is_editing() {
                    "Failed to update blog"
                } else {
                    "Failed to create blog"
                };
                tracing::warn!(error = %e, "{}", fallback);
                notifier.error("Error", e.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> BlogEditor {
        let mut editor = BlogEditor::new();
        editor.form.title = "Title".into();
        editor.form.excerpt = "Short".into();
        editor.form.content = "<p>Body</p>".into();
        editor.add_tag("rust");
        editor.form.image = "https://cdn/x.png".into();
        editor
    }

    #[test]
    fn test_validation_order() {
        let mut editor = BlogEditor::new();
        editor.form.image = "https://cdn/x.png".into();
        assert_eq!(editor.validate(), Err(FormError::MissingFields));

        let mut editor = filled();
        editor.remove_tag("rust");
        editor.form.image.clear();
        assert_eq!(editor.validate(), Err(FormError::MissingTags));

        let mut editor = filled();
        editor.form.image = "  ".into();
        assert_eq!(editor.validate(), Err(FormError::MissingImage));

        assert_eq!(filled().validate(), Ok(()));
    }

    #[test]
    fn test_form_serializes_camel_case() {
        let value = serde_json::to_value(&filled().form).unwrap();
        assert_eq!(value["tags"][0], "rust");
        assert_eq!(value["published"], false);
    }
}
