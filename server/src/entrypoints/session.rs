use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    Request,
};
use shared::github::GithubClient;

/// Caller credential: a GitHub bearer token. The account it belongs to is
/// resolved with [`year_in_code_server::identify`].
pub struct Session {
    pub token: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    pub fn client(&self, membership_url: Option<String>) -> Result<GithubClient, Status> {
        GithubClient::new(self.token.clone(), membership_url).map_err(|e| {
            rocket::error!("Failed to create GitHub client: {e}");
            Status::InternalServerError
        })
    }
}

fn bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Session {
    type Error = &'static str;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match request.headers().get_one("Authorization").and_then(bearer) {
            Some(token) => Outcome::Success(Session {
                token: token.to_string(),
            }),
            None => Outcome::Error((Status::Unauthorized, "missing credentials")),
        }
    }
}
