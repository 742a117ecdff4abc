// file: src/source/github.rs
// description: lists the authenticated user's github repositories as a lazy stream
// reference: https://docs.github.com/en/rest/repos/repos#list-repositories-for-the-authenticated-user

use crate::config::SourceConfig;
use crate::error::{Result, SyncError};
use crate::http::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::models::RepositoryDescriptor;
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Url;
use std::future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const PAGE_SIZE: u32 = 100;

type Page = stream::Iter<std::vec::IntoIter<Result<RepositoryDescriptor>>>;

#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(config: &SourceConfig, timeout: Duration) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(timeout)?;
        Ok(Self::with_transport(
            &config.api_url,
            &config.token,
            Arc::new(transport),
        ))
    }

    pub fn with_transport(api_url: &str, token: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn first_page_url(&self) -> String {
        format!(
            "{}/user/repos?affiliation=owner&per_page={}",
            self.api_url, PAGE_SIZE
        )
    }

    /// Every repository owned by the authenticated account, in API order.
    ///
    /// Pages are fetched on demand by following `rel="next"` links. The
    /// stream ends after the last page or at the first failed page.
    pub fn owned_repositories(&self) -> impl Stream<Item = Result<RepositoryDescriptor>> + '_ {
        stream::try_unfold(Some(self.first_page_url()), move |next| self.next_page(next))
            .try_flatten()
    }

    /// [`owned_repositories`](Self::owned_repositories) without forks.
    pub fn mirrorable_repositories(&self) -> impl Stream<Item = Result<RepositoryDescriptor>> + '_ {
        self.owned_repositories().try_filter(|repo| {
            if repo.is_fork {
                debug!("Skipping fork {}", repo.full_name);
            }
            future::ready(!repo.is_fork)
        })
    }

    async fn next_page(&self, url: Option<String>) -> Result<Option<(Page, Option<String>)>> {
        let Some(url) = url else {
            return Ok(None);
        };

        debug!("Fetching repository page {}", url);
        let request = HttpRequest::get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("Authorization", format!("token {}", self.token));

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(SyncError::Api {
                status: response.status,
                message: response.body_text(),
            });
        }

        let repos: Vec<RepositoryDescriptor> = serde_json::from_slice(&response.body)?;
        let next = response
            .header("link")
            .and_then(next_link)
            .and_then(|link| self.follow(link));
        debug!("Received {} repositories", repos.len());

        let items: Vec<Result<RepositoryDescriptor>> = repos.into_iter().map(Ok).collect();
        Ok(Some((stream::iter(items), next)))
    }

    /// Only links on the API's own origin are followed; the token stays
    /// with the host it was issued for.
    fn follow(&self, link: String) -> Option<String> {
        if same_origin(&self.api_url, &link) {
            Some(link)
        } else {
            warn!("Ignoring pagination link outside {}: {}", self.api_url, link);
            None
        }
    }
}

fn same_origin(base: &str, link: &str) -> bool {
    match (Url::parse(base), Url::parse(link)) {
        (Ok(base), Ok(link)) => base.origin() == link.origin(),
        _ => false,
    }
}

/// Extracts the `rel="next"` target from a GitHub `Link` header.
///
/// `<https://api.github.com/user/repos?page=2>; rel="next", <...page=5>; rel="last"`
pub fn next_link(link_header: &str) -> Option<String> {
    link_header.split(',').find_map(|part| {
        let mut url = None;
        let mut is_next = false;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(rel) = segment.strip_prefix("rel=") {
                is_next = rel.trim_matches('"') == "next";
            }
        }

        if is_next { url.map(str::to_string) } else { None }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, HttpResponse, MockTransport};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const API: &str = "https://api.test";
    const PAGE_1: &str = "https://api.test/user/repos?affiliation=owner&per_page=100";
    const PAGE_2: &str = "https://api.test/user/repos?affiliation=owner&per_page=100&page=2";

    fn repo(full_name: &str, fork: bool) -> serde_json::Value {
        json!({
            "full_name": full_name,
            "description": null,
            "clone_url": format!("https://github.com/{}.git", full_name),
            "private": false,
            "fork": fork
        })
    }

    #[test]
    fn test_next_link_parsing() {
        let header = "<https://api.github.com/user/repos?page=2>; rel=\"next\", \
                      <https://api.github.com/user/repos?page=5>; rel=\"last\"";
        assert_eq!(
            next_link(header).as_deref(),
            Some("https://api.github.com/user/repos?page=2")
        );

        let last_page = "<https://api.github.com/user/repos?page=1>; rel=\"first\", \
                         <https://api.github.com/user/repos?page=4>; rel=\"prev\"";
        assert_eq!(next_link(last_page), None);
        assert_eq!(next_link(""), None);
    }

    #[tokio::test]
    async fn test_follows_pagination_in_order() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Get,
            PAGE_1,
            HttpResponse {
                status: 200,
                headers: vec![("Link".to_string(), format!("<{}>; rel=\"next\"", PAGE_2))],
                body: json!([repo("alice/b", false), repo("alice/a", false)])
                    .to_string()
                    .into_bytes(),
            },
        );
        mock.push_json(HttpMethod::Get, PAGE_2, 200, json!([repo("alice/c", false)]));

        let client = GitHubClient::with_transport(API, "tok", Arc::new(mock.clone()));
        let names: Vec<String> = client
            .owned_repositories()
            .map_ok(|r| r.full_name)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(names, vec!["alice/b", "alice/a", "alice/c"]);
        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert!(
            requests[0]
                .headers
                .contains(&("Authorization".to_string(), "token tok".to_string()))
        );
    }

    #[tokio::test]
    async fn test_next_link_to_other_host_is_not_followed() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Get,
            PAGE_1,
            HttpResponse {
                status: 200,
                headers: vec![(
                    "Link".to_string(),
                    "<https://elsewhere.test/user/repos?page=2>; rel=\"next\"".to_string(),
                )],
                body: json!([repo("alice/a", false)]).to_string().into_bytes(),
            },
        );

        let client = GitHubClient::with_transport(API, "tok", Arc::new(mock.clone()));
        let repos: Vec<RepositoryDescriptor> =
            client.owned_repositories().try_collect().await.unwrap();

        assert_eq!(repos.len(), 1);
        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests.iter().all(|r| r.url.starts_with(API)));
    }

    #[test]
    fn test_same_origin() {
        assert!(same_origin(API, PAGE_2));
        assert!(!same_origin(API, "http://api.test/user/repos?page=2"));
        assert!(!same_origin(API, "https://api.test:8443/user/repos"));
        assert!(!same_origin(API, "/user/repos?page=2"));
    }

    #[tokio::test]
    async fn test_forks_are_excluded() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            PAGE_1,
            200,
            json!([repo("alice/fork", true), repo("alice/own", false)]),
        );

        let client = GitHubClient::with_transport(API, "tok", Arc::new(mock));
        let repos: Vec<RepositoryDescriptor> =
            client.mirrorable_repositories().try_collect().await.unwrap();

        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].full_name, "alice/own");
    }

    #[tokio::test]
    async fn test_rejected_token_fails_listing() {
        let mock = MockTransport::new();
        mock.push_status(HttpMethod::Get, PAGE_1, 401, "{\"message\":\"Bad credentials\"}");

        let client = GitHubClient::with_transport(API, "bad", Arc::new(mock));
        let result: Result<Vec<RepositoryDescriptor>> =
            client.owned_repositories().try_collect().await;

        match result {
            Err(SyncError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert!(message.contains("Bad credentials"));
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_trailing_slash_in_api_url() {
        let mock = MockTransport::new();
        mock.push_json(HttpMethod::Get, PAGE_1, 200, json!([]));

        let client = GitHubClient::with_transport("https://api.test/", "tok", Arc::new(mock));
        let repos: Vec<RepositoryDescriptor> =
            client.owned_repositories().try_collect().await.unwrap();
        assert!(repos.is_empty());
    }
}
