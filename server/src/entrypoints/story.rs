use std::sync::Arc;

use rocket::{fairing::AdHoc, http::Status, serde::json::Json, State};
use shared::{openai::SceneGenerator, Manifest, RenderMode, SceneDescriptor};
use year_in_code_server::{
    db::{types::Profile, DB},
    manifest_for,
    types::Settings,
};

use super::{session::Session, types::TimelineResponse};

async fn profile(db: &DB, login: &str) -> Result<Profile, Status> {
    match db.get_profile(login).await {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Err(Status::NotFound),
        Err(e) => {
            rocket::error!("Failed to load profile {login}: {e}");
            Err(Status::InternalServerError)
        }
    }
}

#[utoipa::path(responses(
    (status = 200, description = "Manifest of the token's owner, compiled on first request"),
    (status = 401, description = "Missing credentials"),
    (status = 404, description = "No identity data for the credential"),
    (status = 502, description = "Story compilation failed"),
))]
#[post("/manifest")]
pub async fn post_manifest(
    session: Session,
    db: &State<DB>,
    settings: &State<Settings>,
    generator: &State<Arc<dyn SceneGenerator>>,
) -> Result<Json<Manifest>, Status> {
    let client = session.client(settings.membership_url.clone())?;
    manifest_for(&client, &**generator.inner(), db.inner(), settings.year)
        .await
        .map(Json)
        .map_err(|e| {
            rocket::warn!("Failed to compile manifest: {e}");
            super::status(&e)
        })
}

#[utoipa::path(responses(
    (status = 200, description = "Stored manifest of the user"),
    (status = 404, description = "User or manifest not found"),
))]
#[get("/users/<login>/manifest")]
pub async fn get_manifest(login: &str, db: &State<DB>) -> Result<Json<Manifest>, Status> {
    match db.get_manifest(login).await {
        Ok(Some(manifest)) => Ok(Json(manifest)),
        Ok(None) => Err(Status::NotFound),
        Err(e) => {
            rocket::error!("Failed to load manifest {login}: {e}");
            Err(Status::InternalServerError)
        }
    }
}

#[utoipa::path(responses(
    (status = 200, description = "Scene descriptor for the frame"),
    (status = 404, description = "User or manifest not found"),
))]
#[get("/users/<login>/scene/<frame>?<simplified>")]
pub async fn get_scene(
    login: &str,
    frame: u64,
    simplified: Option<bool>,
    db: &State<DB>,
    settings: &State<Settings>,
) -> Result<Json<SceneDescriptor>, Status> {
    let profile = profile(db, login).await?;
    let manifest = profile.manifest.ok_or(Status::NotFound)?;
    let mode = if simplified.unwrap_or_default() {
        RenderMode::Simplified
    } else {
        RenderMode::Full
    };

    Ok(Json(settings.timeline.render(
        &manifest,
        &profile.record.github_stats,
        frame,
        mode,
    )))
}

#[utoipa::path(responses(
    (status = 200, description = "Frame layout of the user's video", body = TimelineResponse),
    (status = 404, description = "User or manifest not found"),
))]
#[get("/users/<login>/timeline")]
pub async fn get_timeline(
    login: &str,
    db: &State<DB>,
    settings: &State<Settings>,
) -> Result<Json<TimelineResponse>, Status> {
    let manifest = match db.get_manifest(login).await {
        Ok(Some(manifest)) => manifest,
        Ok(None) => return Err(Status::NotFound),
        Err(e) => {
            rocket::error!("Failed to load manifest {login}: {e}");
            return Err(Status::InternalServerError);
        }
    };

    Ok(Json(TimelineResponse::new(
        &settings.timeline,
        manifest.song.asset_path(),
    )))
}

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("Installing story entrypoints", |rocket| async {
        rocket.mount(
            "/",
            rocket::routes![post_manifest, get_manifest, get_scene, get_timeline],
        )
    })
}
