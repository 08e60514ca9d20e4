use std::collections::HashSet;

use reqwest::header::{HeaderMap, ACCEPT, LINK, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::warn;
use url::Url;

use crate::error::{BridgeError, Result};
use crate::types::{Collaborator, CreatedIssue, IssueRequest, Repository};

const API_VERSION: &str = "2022-11-28";
const MEDIA_TYPE: &str = "application/vnd.github+json";
const PAGE_SIZE: &str = "100";
const MAX_PAGES: usize = 100;
const AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// REST client for the issue tracker that owns the target repository.
pub struct TrackerClient {
    http: Client,
    api_url: Url,
    token: String,
}

impl TrackerClient {
    pub fn new(api_url: Url, token: String) -> Self {
        Self {
            http: Client::new(),
            api_url: with_trailing_slash(api_url),
            token,
        }
    }

    /// List collaborator logins, following `Link` pagination in order.
    ///
    /// Next-page links must stay on the API origin, may not repeat, and are
    /// followed for at most [`MAX_PAGES`] pages.
    #[tracing::instrument(level = "debug", skip(self, repo), fields(repo = %repo))]
    pub async fn collaborators(&self, repo: &Repository) -> Result<Vec<String>> {
        let mut url = self.endpoint(&format!("repos/{}/{}/collaborators", repo.owner, repo.name))?;
        url.query_pairs_mut().append_pair("per_page", PAGE_SIZE);

        let mut logins = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(url);

        while let Some(url) = next.take() {
            if url.origin() != self.api_url.origin() {
                return Err(BridgeError::Pagination(format!(
                    "next page {url} is outside {}",
                    self.api_url
                )));
            }
            if visited.len() >= MAX_PAGES {
                return Err(BridgeError::Pagination(format!(
                    "more than {MAX_PAGES} pages"
                )));
            }
            if !visited.insert(url.clone()) {
                return Err(BridgeError::Pagination(format!("page {url} repeated")));
            }

            let response = self.request(self.http.get(url)).send().await?;

            if !response.status().is_success() {
                return Err(upstream_error(response).await);
            }

            next = next_page(response.headers());
            let page: Vec<Collaborator> = response.json().await?;
            logins.extend(page.into_iter().map(|c| c.login));
        }

        Ok(logins)
    }

    /// Create an issue. Only `201 Created` counts as success; the response body
    /// is read for logging only and may be missing or malformed.
    #[tracing::instrument(level = "debug", skip(self, repo, issue), fields(repo = %repo))]
    pub async fn create_issue(
        &self,
        repo: &Repository,
        issue: &IssueRequest,
    ) -> Result<Option<CreatedIssue>> {
        let url = self.endpoint(&format!("repos/{}/{}/issues", repo.owner, repo.name))?;

        let response = self
            .request(self.http.post(url))
            .json(issue)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            return Err(upstream_error(response).await);
        }

        match response.json::<CreatedIssue>().await {
            Ok(created) => Ok(Some(created)),
            Err(e) => {
                warn!(error = %e, "Issue created but the response body could not be read");
                Ok(None)
            }
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .map_err(|_| BridgeError::InvalidUrl(format!("{}{path}", self.api_url)))
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header(ACCEPT, MEDIA_TYPE)
            .header(USER_AGENT, AGENT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

async fn upstream_error(response: Response) -> BridgeError {
    BridgeError::Upstream {
        status: response.status().as_u16(),
        message: response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read response body>".to_string()),
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Extract the `rel="next"` target from a `Link` header.
fn next_page(headers: &HeaderMap) -> Option<Url> {
    let link = headers.get(LINK)?.to_str().ok()?;

    link.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| p.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        Url::parse(target).ok()
    })
}
