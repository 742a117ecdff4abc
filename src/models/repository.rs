// file: src/models/repository.rs
// description: source repository descriptor produced by the lister
// reference: https://docs.github.com/en/rest/repos/repos

use serde::Deserialize;

/// Minimal metadata needed to mirror one source repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryDescriptor {
    /// `owner/name`
    pub full_name: String,
    pub description: Option<String>,
    pub clone_url: String,
    #[serde(rename = "private")]
    pub is_private: bool,
    #[serde(rename = "fork")]
    pub is_fork: bool,
}

impl RepositoryDescriptor {
    pub fn new(full_name: &str, clone_url: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            description: None,
            clone_url: clone_url.to_string(),
            is_private: false,
            is_fork: false,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    /// Name of the mirror on the mirror service: every `/` becomes `-`.
    pub fn mirror_name(&self) -> String {
        mirror_name(&self.full_name)
    }
}

pub fn mirror_name(full_name: &str) -> String {
    full_name.replace('/', "-")
}
