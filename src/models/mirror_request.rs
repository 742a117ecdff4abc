// file: src/models/mirror_request.rs
// description: mirror creation payload for the gitea migrate endpoint
// reference: https://docs.gitea.com/api/1.20/#tag/repository/operation/repoMigrate

use crate::models::RepositoryDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Refresh cadence the mirror service uses to pull from the source.
pub const MIRROR_INTERVAL: &str = "24h";

/// Numeric id of the authenticated mirror-service account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AccountIdentity {
    pub id: i64,
}

/// Credentials the mirror service uses to pull a private source repository.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CloneAuth {
    pub auth_username: String,
    pub auth_password: String,
}

impl fmt::Debug for CloneAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloneAuth")
            .field("auth_username", &self.auth_username)
            .field("auth_password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorRequest {
    pub repo_name: String,
    pub description: Option<String>,
    pub clone_addr: String,
    pub mirror: bool,
    pub mirror_interval: &'static str,
    pub private: bool,
    pub uid: i64,
    #[serde(flatten)]
    pub auth: Option<CloneAuth>,
}

impl MirrorRequest {
    /// Maps a source repository onto a private pull mirror owned by `owner`.
    ///
    /// `source_auth` is attached only when the repository is private.
    pub fn from_repository(
        repo: &RepositoryDescriptor,
        owner: AccountIdentity,
        source_auth: &CloneAuth,
    ) -> Self {
        Self {
            repo_name: repo.mirror_name(),
            description: repo.description.clone(),
            clone_addr: repo.clone_url.clone(),
            mirror: true,
            mirror_interval: MIRROR_INTERVAL,
            private: true,
            uid: owner.id,
            auth: repo.is_private.then(|| source_auth.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn auth() -> CloneAuth {
        CloneAuth {
            auth_username: "alice".to_string(),
            auth_password: "ghp_secret".to_string(),
        }
    }

    #[test]
    fn test_public_repository_payload() {
        let repo = RepositoryDescriptor::new("alice/proj", "https://x/alice/proj.git");
        let request = MirrorRequest::from_repository(&repo, AccountIdentity { id: 7 }, &auth());

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "repo_name": "alice-proj",
                "description": null,
                "clone_addr": "https://x/alice/proj.git",
                "mirror": true,
                "mirror_interval": "24h",
                "private": true,
                "uid": 7
            })
        );
    }

    #[test]
    fn test_private_repository_carries_credentials() {
        let repo = RepositoryDescriptor::new("alice/secret", "https://x/alice/secret.git")
            .with_description("hidden")
            .private(true);
        let request = MirrorRequest::from_repository(&repo, AccountIdentity { id: 7 }, &auth());

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["auth_username"], "alice");
        assert_eq!(value["auth_password"], "ghp_secret");
        assert_eq!(value["description"], "hidden");
        assert_eq!(value["private"], true);
    }

    #[test]
    fn test_mirror_is_private_regardless_of_source() {
        for is_private in [false, true] {
            let repo = RepositoryDescriptor::new("o/r", "https://x/o/r.git").private(is_private);
            let request = MirrorRequest::from_repository(&repo, AccountIdentity { id: 1 }, &auth());
            assert!(request.private);
            assert!(request.mirror);
            assert_eq!(request.auth.is_some(), is_private);
        }
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", auth());
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("ghp_secret"));
    }
}
