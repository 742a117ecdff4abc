// file: src/mirror/gitea.rs
// description: gitea api client for resolving the account and creating pull mirrors
// reference: https://docs.gitea.com/api/1.20/

use crate::config::MirrorConfig;
use crate::error::{Result, SyncError};
use crate::http::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::models::{AccountIdentity, MirrorRequest, Outcome};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct GiteaClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    token: String,
}

impl GiteaClient {
    pub fn new(config: &MirrorConfig, timeout: Duration) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(timeout)?;
        Ok(Self::with_transport(
            &config.base_url,
            &config.token,
            Arc::new(transport),
        ))
    }

    /// `base_url` is the API root, e.g. `https://git.example.com/api/v1`.
    pub fn with_transport(base_url: &str, token: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn authorized(&self, request: HttpRequest) -> HttpRequest {
        request
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("Authorization", format!("token {}", self.token))
    }

    /// Resolves the id of the account the token belongs to.
    pub async fn current_user(&self) -> Result<AccountIdentity> {
        let url = format!("{}/user", self.base_url);
        let response = self
            .transport
            .send(self.authorized(HttpRequest::get(url)))
            .await?;

        if !response.is_success() {
            return Err(SyncError::Api {
                status: response.status,
                message: response.body_text(),
            });
        }

        let identity: AccountIdentity = serde_json::from_slice(&response.body)?;
        debug!("Resolved mirror account id {}", identity.id);
        Ok(identity)
    }

    /// Issues exactly one migrate request and classifies the response.
    ///
    /// Never returns an error: transport failures become
    /// [`Outcome::TransportError`], a body that cannot be encoded becomes
    /// [`Outcome::InvalidRequest`] and nothing is sent.
    pub async fn create_mirror(&self, request: &MirrorRequest) -> Outcome {
        let body = match serde_json::to_vec(request) {
            Ok(body) => body,
            Err(e) => return Outcome::InvalidRequest(e.to_string()),
        };

        let url = format!("{}/repos/migrate", self.base_url);
        debug!("Submitting mirror {} -> {}", request.clone_addr, request.repo_name);

        match self
            .transport
            .send(self.authorized(HttpRequest::post(url, body)))
            .await
        {
            Ok(response) => Outcome::from_status(response.status, response.body_text()),
            Err(e) => Outcome::TransportError(e.to_string()),
        }
    }
}
