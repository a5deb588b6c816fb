use serde::{Deserialize, Serialize};
use shared::{GithubHandle, Manifest, Stats};
use sqlx::types::Json;

/// Sanitized projection of a stats record, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub login: GithubHandle,
    pub email: String,
    pub avatar_url: String,
    pub company: String,
    pub pull_requests_opened: i32,
    pub github_stats: Stats,
    pub is_member: bool,
}

impl ProfileRecord {
    /// Separates the email out of `stats`; the stored blob never carries it.
    pub fn new(mut stats: Stats, is_member: bool) -> Self {
        let email = stats.take_email().unwrap_or_default();
        Self {
            login: stats.username.clone(),
            email,
            avatar_url: stats.avatar_url.clone().unwrap_or_default(),
            company: stats.company.clone().unwrap_or_default(),
            pull_requests_opened: stats.pulls as i32,
            github_stats: stats,
            is_member,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub login: String,
    pub email: String,
    pub avatar_url: String,
    pub company: String,
    pub pull_requests_opened: i32,
    pub github_stats: Json<Stats>,
    pub video_manifest: Option<Json<Manifest>>,
    pub is_member: bool,
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub record: ProfileRecord,
    pub manifest: Option<Manifest>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            record: ProfileRecord {
                login: row.login,
                email: row.email,
                avatar_url: row.avatar_url,
                company: row.company,
                pull_requests_opened: row.pull_requests_opened,
                github_stats: row.github_stats.0,
                is_member: row.is_member,
            },
            manifest: row.video_manifest.map(|manifest| manifest.0),
        }
    }
}
