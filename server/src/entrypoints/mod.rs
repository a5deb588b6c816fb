use rocket::{fairing::AdHoc, http::Status};
use shared::WrappedError;
use utoipa::OpenApi;

pub mod session;
pub mod stats;
pub mod story;
pub mod types;

#[derive(OpenApi)]
#[openapi(
    paths(
        stats::post_stats,
        story::post_manifest,
        story::get_manifest,
        story::get_scene,
        story::get_timeline,
    ),
    components(schemas(types::TimelineResponse))
)]
pub struct ApiDoc;

pub fn status(error: &WrappedError) -> Status {
    match error {
        WrappedError::NoIdentityData => Status::NotFound,
        WrappedError::CompilationFailed(_) => Status::BadGateway,
    }
}

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("Installing entrypoints", |rocket| async {
        rocket.attach(stats::stage()).attach(story::stage())
    })
}
