use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::form::{add_unique, append, blank, remove_at, remove_value, FormError};
use super::notify::Notifier;
use crate::api::{endpoints, upload_image, ApiClient, ImageFile};
use crate::models::{MediaItem, MediaType, Version};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub tags: Vec<String>,
    pub image: String,
    pub demo_url: String,
    pub repo_url: String,
    pub versions: Vec<Version>,
    pub features: Vec<String>,
    pub challenges: Vec<String>,
    pub solutions: Vec<String>,
    pub screenshots: Vec<String>,
    pub published: bool,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            long_description: String::new(),
            tags: Vec::new(),
            image: String::new(),
            demo_url: String::new(),
            repo_url: String::new(),
            versions: vec![Version {
                version: "v1.0".to_string(),
                date: today(),
                notes: "Initial release".to_string(),
                ..Version::default()
            }],
            features: Vec::new(),
            challenges: Vec::new(),
            solutions: Vec::new(),
            screenshots: Vec::new(),
            published: false,
        }
    }
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Label following `previous`: `v{N+1}.0` where N is the leading major number
/// of a `v`-prefixed label, and 1 when it cannot be read.
pub fn next_version_label(previous: &str) -> String {
    let major = previous
        .strip_prefix('v')
        .and_then(|rest| rest.split('.').next())
        .and_then(|major| {
            let digits: String = major.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u64>().ok()
        })
        .unwrap_or(1);
    format!("v{}.0", major.saturating_add(1))
}

/// Create screen for a project, including its version accordion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEditor {
    pub form: ProjectForm,
    /// Index of the expanded version; always in range.
    #[serde(default)]
    active: usize,
}

impl ProjectEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repairs state restored from an untrusted round-trip.
    pub fn normalized(mut self) -> Self {
        if self.form.versions.is_empty() {
            self.form.versions = ProjectForm::default().versions;
        }
        self.active = self.active.min(self.form.versions.len() - 1);
        self
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn set_active(&mut self, index: usize) -> bool {
        if index < self.form.versions.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    pub fn active_version(&self) -> &Version {
        &self.form.versions[self.active]
    }

    pub fn active_version_mut(&mut self) -> &mut Version {
        &mut self.form.versions[self.active]
    }

    // ------------------------------------------------------------------------
    // Set-like fields
    // ------------------------------------------------------------------------

    pub fn add_tag(&mut self, input: &str) -> bool {
        add_unique(&mut self.form.tags, input)
    }

    pub fn remove_tag(&mut self, value: &str) {
        remove_value(&mut self.form.tags, value);
    }

    pub fn add_feature(&mut self, input: &str) -> bool {
        add_unique(&mut self.form.features, input)
    }

    pub fn remove_feature(&mut self, value: &str) {
        remove_value(&mut self.form.features, value);
    }

    pub fn add_challenge(&mut self, input: &str) -> bool {
        add_unique(&mut self.form.challenges, input)
    }

    pub fn remove_challenge(&mut self, value: &str) {
        remove_value(&mut self.form.challenges, value);
    }

    pub fn add_solution(&mut self, input: &str) -> bool {
        add_unique(&mut self.form.solutions, input)
    }

    pub fn remove_solution(&mut self, value: &str) {
        remove_value(&mut self.form.solutions, value);
    }

    pub fn add_version_feature(&mut self, input: &str) -> bool {
        add_unique(&mut self.active_version_mut().features, input)
    }

    pub fn remove_version_feature(&mut self, value: &str) {
        remove_value(&mut self.active_version_mut().features, value);
    }

    // ------------------------------------------------------------------------
    // Append-only fields
    // ------------------------------------------------------------------------

    pub fn add_version_change(&mut self, input: &str) -> bool {
        append(&mut self.active_version_mut().changes, input)
    }

    pub fn remove_version_change(&mut self, value: &str) {
        remove_value(&mut self.active_version_mut().changes, value);
    }

    /// Appends media to the active version; both URL and caption are required.
    pub fn add_media(
        &mut self,
        media_type: MediaType,
        url: &str,
        caption: &str,
        notifier: &mut Notifier,
    ) -> bool {
        if blank(url) || blank(caption) {
            FormError::IncompleteMedia.notify(notifier);
            return false;
        }
        self.active_version_mut().media.push(MediaItem {
            media_type,
            url: url.trim().to_string(),
            caption: caption.trim().to_string(),
        });
        true
    }

    pub fn remove_media(&mut self, index: usize) {
        remove_at(&mut self.active_version_mut().media, index);
    }

    pub fn remove_screenshot(&mut self, index: usize) {
        remove_at(&mut self.form.screenshots, index);
    }

    // ------------------------------------------------------------------------
    // Versions
    // ------------------------------------------------------------------------

    /// Appends a default version after the last one and makes it active.
    pub fn add_version(&mut self) {
        let label = self
            .form
            .versions
            .last()
            .map(|v| next_version_label(&v.version))
            .unwrap_or_else(|| "v1.0".to_string());

        self.form.versions.push(Version {
            version: label,
            date: today(),
            notes: "New version".to_string(),
            ..Version::default()
        });
        self.active = self.form.versions.len() - 1;
    }

    /// Removes a version. The last remaining version cannot be removed.
    pub fn remove_version(&mut self, index: usize, notifier: &mut Notifier) -> bool {
        if self.form.versions.len() <= 1 {
            FormError::LastVersion.notify(notifier);
            return false;
        }
        if remove_at(&mut self.form.versions, index).is_none() {
            return false;
        }
        if self.active >= self.form.versions.len() {
            self.active = self.form.versions.len() - 1;
        }
        true
    }

    // ------------------------------------------------------------------------
    // Uploads & submission
    // ------------------------------------------------------------------------

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

    pub async fn upload_screenshot(
        &mut self,
        client: &ApiClient,
        file: ImageFile,
        notifier: &mut Notifier,
    ) -> bool {
        match upload_image(client, file).await {
            Ok(url) => {
                self.form.screenshots.push(url);
                notifier.success(
                    "Screenshot Uploaded",
                    "Your screenshot has been uploaded successfully",
                );
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
        if blank(&form.title) || blank(&form.description) || blank(&form.long_description) {
            return Err(FormError::MissingFields);
        }
        if form.tags.is_empty() {
            return Err(FormError::MissingTags);
        }
        if blank(&form.image) {
            return Err(FormError::MissingImage);
        }
        if blank(&form.demo_url) || blank(&form.repo_url) {
            return Err(FormError::MissingUrls);
        }
        if form.features.is_empty() {
            return Err(FormError::MissingFeatures);
        }
        Ok(())
    }

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

        match client.send(&endpoints::create_project(body)).await {
            Ok(_) => {
                tracing::info!(title = %self.form.title, versions = self.form.versions.len(), "project created");
                notifier.success("Project Created", "Your project has been created successfully");
                true
            }
            Err(e) => {
                notifier.error("Error", e.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_version_label() {
        assert_eq!(next_version_label("v1.0"), "v2.0");
        assert_eq!(next_version_label("v9.3.1"), "v10.0");
        assert_eq!(next_version_label("release"), "v2.0");
        assert_eq!(next_version_label("vbeta"), "v2.0");
    }

    #[test]
    fn test_add_version_activates_it() {
        let mut editor = ProjectEditor::new();
        editor.add_version();
        editor.add_version();
        assert_eq!(editor.form.versions.len(), 3);
        assert_eq!(editor.active_index(), 2);
        assert_eq!(editor.active_version().version, "v3.0");
        assert_eq!(editor.active_version().notes, "New version");
    }

    #[test]
    fn test_cannot_remove_last_version() {
        let mut editor = ProjectEditor::new();
        let mut notifier = Notifier::new();
        let before = editor.form.versions.clone();

        assert!(!editor.remove_version(0, &mut notifier));
        assert_eq!(editor.form.versions, before);
        assert_eq!(
            notifier.last().map(|t| t.description.as_str()),
            Some("You must have at least one version")
        );
    }

    #[test]
    fn test_remove_version_clamps_active() {
        let mut editor = ProjectEditor::new();
        let mut notifier = Notifier::new();
        editor.add_version();
        assert_eq!(editor.active_index(), 1);

        assert!(editor.remove_version(1, &mut notifier));
        assert_eq!(editor.active_index(), 0);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_media_requires_url_and_caption() {
        let mut editor = ProjectEditor::new();
        let mut notifier = Notifier::new();
        assert!(!editor.add_media(MediaType::Image, "https://x/a.png", " ", &mut notifier));
        assert!(notifier.has_errors());
        assert!(editor.active_version().media.is_empty());

        assert!(editor.add_media(MediaType::Video, "https://x/a.mp4", "Demo", &mut notifier));
        assert_eq!(editor.active_version().media.len(), 1);
    }

    #[test]
    fn test_version_features_are_set_like() {
        let mut editor = ProjectEditor::new();
        assert!(editor.add_version_feature("Search"));
        assert!(!editor.add_version_feature("Search "));
        assert!(editor.add_version_change("Fixed crash"));
        assert!(editor.add_version_change("Fixed crash"));
        assert_eq!(editor.active_version().features.len(), 1);
        assert_eq!(editor.active_version().changes.len(), 2);
    }

    #[test]
    fn test_validation_urls_then_features() {
        let mut editor = ProjectEditor::new();
        editor.form.title = "Alpha".into();
        editor.form.description = "Short".into();
        editor.form.long_description = "<p>Long</p>".into();
        editor.add_tag("x");
        editor.form.image = "https://cdn/a.png".into();
        editor.form.demo_url = "https://demo".into();
        assert_eq!(editor.validate(), Err(FormError::MissingUrls));

        editor.form.repo_url = "https://repo".into();
        assert_eq!(editor.validate(), Err(FormError::MissingFeatures));

        editor.add_feature("Fast");
        assert_eq!(editor.validate(), Ok(()));
    }

    #[test]
    fn test_normalized_repairs_state() {
        let mut editor = ProjectEditor::new();
        editor.form.versions.clear();
        editor.active = 7;
        let editor = editor.normalized();
        assert_eq!(editor.form.versions.len(), 1);
        assert_eq!(editor.active_index(), 0);
    }
}
