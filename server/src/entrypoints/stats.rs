use rocket::{fairing::AdHoc, http::Status, serde::json::Json, State};
use shared::Stats;
use year_in_code_server::{db::DB, stats_for, types::Settings};

use super::session::Session;

#[utoipa::path(responses(
    (status = 200, description = "Stats of the token's owner for the configured year"),
    (status = 401, description = "Missing credentials"),
    (status = 404, description = "No identity data for the credential"),
))]
#[post("/stats")]
pub async fn post_stats(
    session: Session,
    db: &State<DB>,
    settings: &State<Settings>,
) -> Result<Json<Stats>, Status> {
    let client = session.client(settings.membership_url.clone())?;
    stats_for(&client, db.inner(), settings.year)
        .await
        .map(Json)
        .map_err(|e| {
            rocket::warn!("Failed to load stats: {e}");
            super::status(&e)
        })
}

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("Installing stats entrypoints", |rocket| async {
        rocket.mount("/", rocket::routes![post_stats])
    })
}
