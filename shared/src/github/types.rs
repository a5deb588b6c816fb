use serde::Deserialize;

use crate::{Actor, FollowGroup, Follows, Highlights, Language, Repo, Stars, Week};

/// `{ "data": { "viewer": ... } }`; either level may be null.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<ViewerData<T>>,
}

#[derive(Debug, Deserialize)]
pub struct ViewerData<T> {
    pub viewer: Option<T>,
}

impl<T> GraphqlResponse<T> {
    pub fn into_viewer(self) -> Option<T> {
        self.data.and_then(|data| data.viewer)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalContributions {
    pub total_contributions: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightsCollection {
    pub total_commit_contributions: u32,
    pub total_pull_request_contributions: u32,
    pub total_pull_request_review_contributions: u32,
    pub total_repositories_with_contributed_commits: u32,
    pub contribution_calendar: TotalContributions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightsViewer {
    pub login: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub company: Option<String>,
    pub avatar_url: Option<String>,
    pub contributions_collection: HighlightsCollection,
}

impl From<HighlightsViewer> for Highlights {
    fn from(viewer: HighlightsViewer) -> Self {
        let collection = viewer.contributions_collection;
        Self {
            username: viewer.login,
            // GitHub reports a hidden email as an empty string
            email: viewer.email.filter(|email| !email.is_empty()),
            full_name: viewer.name,
            avatar_url: viewer.avatar_url,
            company: viewer.company,
            commits: collection.total_commit_contributions,
            pulls: collection.total_pull_request_contributions,
            reviews: collection.total_pull_request_review_contributions,
            repos: collection.total_repositories_with_contributed_commits,
            contributions: collection.contribution_calendar.total_contributions,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PrimaryLanguage {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageNode {
    pub primary_language: Option<PrimaryLanguage>,
}

#[derive(Debug, Deserialize)]
pub struct Nodes<T> {
    pub nodes: Vec<Option<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagesViewer {
    pub top_repositories: Nodes<LanguageNode>,
}

impl LanguagesViewer {
    pub fn into_languages(self) -> Vec<Language> {
        crate::dedup_languages(
            self.top_repositories
                .nodes
                .into_iter()
                .flatten()
                .filter_map(|node| node.primary_language)
                .map(|language| Language::new(language.name, language.color)),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoOwner {
    pub login: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    pub name: String,
    pub name_with_owner: Option<String>,
    pub is_private: bool,
    pub url: Option<String>,
    pub stargazer_count: u32,
    pub owner: RepoOwner,
}

#[derive(Debug, Deserialize)]
pub struct RepoContribution {
    pub contributions: TotalCount,
    pub repository: RepositoryNode,
}

impl From<RepoContribution> for Repo {
    fn from(contribution: RepoContribution) -> Self {
        let repository = contribution.repository;
        Self {
            name: repository.name,
            owner: Some(repository.owner.login),
            avatar_url: repository.owner.avatar_url,
            is_private: repository.is_private,
            name_with_owner: repository.name_with_owner,
            url: repository.url,
            stars: repository.stargazer_count,
            contributions: contribution.contributions.total_count,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoCollection {
    pub commit_contributions_by_repository: Vec<RepoContribution>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReposViewer {
    pub contributions_collection: RepoCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorNode {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub url: String,
}

impl From<ActorNode> for Actor {
    fn from(node: ActorNode) -> Self {
        Self {
            avatar_url: node.avatar_url,
            name: node.name,
            login: node.login,
            url: node.url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorConnection {
    pub total_count: u32,
    pub nodes: Vec<Option<ActorNode>>,
}

impl From<ActorConnection> for FollowGroup {
    fn from(connection: ActorConnection) -> Self {
        Self {
            total_count: connection.total_count,
            latest: connection
                .nodes
                .into_iter()
                .flatten()
                .map(Into::into)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FollowsViewer {
    pub followers: ActorConnection,
    pub following: ActorConnection,
}

impl From<FollowsViewer> for Follows {
    fn from(viewer: FollowsViewer) -> Self {
        Self {
            followers: viewer.followers.into(),
            following: viewer.following.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StargazerNode {
    pub stargazer_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarsViewer {
    pub starred_repositories: TotalCount,
    pub repositories: Nodes<StargazerNode>,
}

impl From<StarsViewer> for Stars {
    fn from(viewer: StarsViewer) -> Self {
        Self {
            given: viewer.starred_repositories.total_count,
            received: viewer
                .repositories
                .nodes
                .into_iter()
                .flatten()
                .map(|node| node.stargazer_count)
                .sum(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Weeks {
    pub weeks: Vec<Week>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCollection {
    pub contribution_calendar: Weeks,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsViewer {
    pub contributions_collection: CalendarCollection,
}

#[derive(Debug, Deserialize)]
pub struct LocationViewer {
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginViewer {
    pub login: String,
}
