use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use tracing::instrument;

use crate::{Follows, Highlights, Language, Repo, Stars, Week, YearRange};

mod queries;
mod types;

pub use types::*;

/// The Source Query Set.
///
/// `Ok(None)` means the upstream root object was null. Callers treat that and
/// `Err` alike: the field stays absent.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Login of the account the credential belongs to.
    async fn viewer_login(&self) -> anyhow::Result<Option<String>>;
    async fn highlights(&self, range: YearRange) -> anyhow::Result<Option<Highlights>>;
    async fn top_languages(&self, range: YearRange) -> anyhow::Result<Option<Vec<Language>>>;
    async fn top_repos(&self) -> anyhow::Result<Option<Vec<Repo>>>;
    async fn follows(&self) -> anyhow::Result<Option<Follows>>;
    async fn stars(&self) -> anyhow::Result<Option<Stars>>;
    async fn contributions(&self, range: YearRange) -> anyhow::Result<Option<Vec<Week>>>;
    async fn location(&self) -> anyhow::Result<Option<String>>;
    async fn is_member(&self, login: &str) -> anyhow::Result<Option<bool>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MembershipResponse {
    is_member: bool,
}

/// GitHub GraphQL client bound to one user's bearer token.
#[derive(Clone)]
pub struct GithubClient {
    octocrab: octocrab::Octocrab,
    http: reqwest::Client,
    membership_url: Option<String>,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("membership_url", &self.membership_url)
            .finish_non_exhaustive()
    }
}

impl GithubClient {
    pub fn new(token: String, membership_url: Option<String>) -> anyhow::Result<Self> {
        let octocrab = octocrab::Octocrab::builder()
            .personal_token(token)
            .build()?;

        Ok(Self {
            octocrab,
            http: reqwest::Client::new(),
            membership_url,
        })
    }

    async fn viewer<T>(&self, query: &str, variables: serde_json::Value) -> anyhow::Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let response: GraphqlResponse<T> = self
            .octocrab
            .graphql(&json!({ "query": query, "variables": variables }))
            .await?;
        Ok(response.into_viewer())
    }
}

#[async_trait]
impl StatsSource for GithubClient {
    #[instrument(skip(self))]
    async fn viewer_login(&self) -> anyhow::Result<Option<String>> {
        let viewer: Option<LoginViewer> = self.viewer(queries::VIEWER_LOGIN, json!({})).await?;
        Ok(viewer
            .map(|viewer| viewer.login)
            .filter(|login| !login.is_empty()))
    }

    #[instrument(skip(self))]
    async fn highlights(&self, range: YearRange) -> anyhow::Result<Option<Highlights>> {
        let (from, to) = range.as_query_bounds();
        let viewer: Option<HighlightsViewer> = self
            .viewer(queries::USER_HIGHLIGHTS, json!({ "from": from, "to": to }))
            .await?;
        Ok(viewer.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn top_languages(&self, range: YearRange) -> anyhow::Result<Option<Vec<Language>>> {
        let (from, _) = range.as_query_bounds();
        let viewer: Option<LanguagesViewer> = self
            .viewer(queries::TOP_LANGUAGES, json!({ "from": from }))
            .await?;
        Ok(viewer.map(LanguagesViewer::into_languages))
    }

    #[instrument(skip(self))]
    async fn top_repos(&self) -> anyhow::Result<Option<Vec<Repo>>> {
        let viewer: Option<ReposViewer> = self.viewer(queries::TOP_REPOS, json!({})).await?;
        Ok(viewer.map(|viewer| {
            viewer
                .contributions_collection
                .commit_contributions_by_repository
                .into_iter()
                .map(Into::into)
                .collect()
        }))
    }

    #[instrument(skip(self))]
    async fn follows(&self) -> anyhow::Result<Option<Follows>> {
        let viewer: Option<FollowsViewer> = self.viewer(queries::FOLLOWS, json!({})).await?;
        Ok(viewer.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn stars(&self) -> anyhow::Result<Option<Stars>> {
        let viewer: Option<StarsViewer> = self.viewer(queries::STARS, json!({})).await?;
        Ok(viewer.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn contributions(&self, range: YearRange) -> anyhow::Result<Option<Vec<Week>>> {
        let (from, to) = range.as_query_bounds();
        let viewer: Option<ContributionsViewer> = self
            .viewer(queries::CONTRIBUTIONS, json!({ "from": from, "to": to }))
            .await?;
        Ok(viewer.map(|viewer| viewer.contributions_collection.contribution_calendar.weeks))
    }

    #[instrument(skip(self))]
    async fn location(&self) -> anyhow::Result<Option<String>> {
        let viewer: Option<LocationViewer> =
            self.viewer(queries::USER_LOCATION, json!({})).await?;
        Ok(viewer.and_then(|viewer| viewer.location))
    }

    #[instrument(skip(self))]
    async fn is_member(&self, login: &str) -> anyhow::Result<Option<bool>> {
        let Some(base) = &self.membership_url else {
            return Ok(Some(false));
        };

        let response = self
            .http
            .get(format!("{}/{}", base.trim_end_matches('/'), login))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Some(false));
        }
        let membership: MembershipResponse = response.error_for_status()?.json().await?;
        Ok(Some(membership.is_member))
    }
}
