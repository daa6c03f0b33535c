use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client, Method, Response, StatusCode, Url,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error};

use crate::config::TrackerConfig;
use crate::domain::issue::{NewIssue, RemoteIssue};
use crate::domain::label::Label;
use crate::domain::milestone::{Milestone, MilestoneState};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";
const PER_PAGE: usize = 100;

/// GitHub REST client scoped to a single repository.
pub struct GithubClient {
    http: Client,
    repo_url: Url,
    auth: String,
}

impl GithubClient {
    pub fn new(config: &TrackerConfig) -> AppResult<Self> {
        let mut repo_url = Url::parse(&config.api_url).map_err(|err| {
            AppError::Configuration(format!("invalid GitHub API URL '{}': {err}", config.api_url))
        })?;
        repo_url
            .path_segments_mut()
            .map_err(|_| {
                AppError::Configuration(format!(
                    "GitHub API URL '{}' cannot hold a path",
                    config.api_url
                ))
            })?
            .pop_if_empty()
            .extend(["repos", config.owner.as_str(), config.repo.as_str()]);

        let http = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            repo_url,
            auth: Self::auth_header(&config.username, &config.token),
        })
    }

    fn auth_header(username: &str, token: &str) -> String {
        let credentials = format!("{username}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    /// Repository-relative URL; segments are percent-encoded.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.repo_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> AppResult<Response> {
        debug!(%method, %url, "GitHub request");
        let mut request = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, &self.auth)
            .header(ACCEPT, GITHUB_JSON);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Passes successful responses through and turns the rest into [`AppError::Api`].
    async fn check(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().clone();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        error!(%status, %url, body = %body, "GitHub request failed");
        Err(AppError::Api { status, body })
    }

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> AppResult<T> {
        let response = self
            .send(method, self.endpoint(segments, query), body)
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// GET that maps 404 to `None`.
    async fn lookup<T: DeserializeOwned>(&self, segments: &[&str]) -> AppResult<Option<T>> {
        let response = self
            .send::<()>(Method::GET, self.endpoint(segments, &[]), None)
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response).await?;
        Ok(Some(response.json::<T>().await?))
    }

    /// Follows `page` until GitHub returns a short page.
    async fn list_all<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> AppResult<Vec<T>> {
        let per_page = PER_PAGE.to_string();
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let page_number = page.to_string();
            let mut pairs = query.to_vec();
            pairs.push(("per_page", per_page.as_str()));
            pairs.push(("page", page_number.as_str()));

            let batch: Vec<T> = self
                .request(Method::GET, segments, &pairs, None::<&()>)
                .await?;
            let last = batch.len() < PER_PAGE;
            items.extend(batch);
            if last {
                return Ok(items);
            }
            page += 1;
        }
    }
}

#[async_trait]
impl IssueTrackerService for GithubClient {
    async fn list_labels(&self) -> AppResult<Vec<Label>> {
        self.list_all(&["labels"], &[]).await
    }

    async fn get_label(&self, name: &str) -> AppResult<Option<Label>> {
        self.lookup(&["labels", name]).await
    }

    async fn create_label(&self, name: &str) -> AppResult<Label> {
        let body = CreateLabelRequest { name };
        self.request(Method::POST, &["labels"], &[], Some(&body))
            .await
    }

    async fn update_label(&self, name: &str, color: &str) -> AppResult<Label> {
        let body = UpdateLabelRequest { color };
        self.request(Method::PATCH, &["labels", name], &[], Some(&body))
            .await
    }

    async fn list_milestones(&self, state: MilestoneState) -> AppResult<Vec<Milestone>> {
        self.list_all(&["milestones"], &[("state", state.as_str())])
            .await
    }

    async fn create_milestone(&self, title: &str) -> AppResult<Milestone> {
        let body = CreateMilestoneRequest { title };
        self.request(Method::POST, &["milestones"], &[], Some(&body))
            .await
    }

    async fn get_issue(&self, number: u64) -> AppResult<Option<RemoteIssue>> {
        let number = number.to_string();
        self.lookup(&["issues", number.as_str()]).await
    }

    async fn create_issue(&self, issue: NewIssue) -> AppResult<RemoteIssue> {
        self.request(Method::POST, &["issues"], &[], Some(&issue))
            .await
    }

    async fn close_issue(&self, number: u64) -> AppResult<RemoteIssue> {
        let number = number.to_string();
        let body = UpdateIssueStateRequest { state: "closed" };
        self.request(Method::PATCH, &["issues", number.as_str()], &[], Some(&body))
            .await
    }

    async fn create_comment(&self, number: u64, body: &str) -> AppResult<()> {
        let number = number.to_string();
        let payload = CreateCommentRequest { body };
        let url = self.endpoint(&["issues", number.as_str(), "comments"], &[]);
        let response = self.send(Method::POST, url, Some(&payload)).await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct CreateLabelRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct UpdateLabelRequest<'a> {
    color: &'a str,
}

#[derive(Serialize)]
struct CreateMilestoneRequest<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct UpdateIssueStateRequest {
    state: &'static str,
}

#[derive(Serialize)]
struct CreateCommentRequest<'a> {
    body: &'a str,
}
