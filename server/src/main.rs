#[macro_use]
extern crate rocket;

mod entrypoints;

use std::sync::Arc;

use shared::openai::{OpenAiGenerator, SceneGenerator, DEFAULT_MODEL, DEFAULT_URL};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use year_in_code_server::{db, types::Settings};

#[derive(Debug, serde::Deserialize)]
pub struct Env {
    openai_api_key: String,
    openai_model: Option<String>,
    openai_url: Option<String>,
    year: Option<i32>,
    fps: Option<u64>,
    membership_url: Option<String>,
}

#[launch]
async fn rocket() -> _ {
    dotenv::dotenv().ok();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().pretty());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let env = envy::from_env::<Env>().expect("Failed to load environment variables");
    let settings = Settings::new(env.year, env.fps, env.membership_url);
    let generator: Arc<dyn SceneGenerator> = Arc::new(OpenAiGenerator::new(
        env.openai_api_key,
        env.openai_model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        env.openai_url.unwrap_or_else(|| DEFAULT_URL.to_string()),
    ));
    let cors = rocket_cors::CorsOptions::default()
        .to_cors()
        .expect("Failed to create CORS fairing");

    let span = tracing::info_span!("Starting Rocket");
    let _enter = span.enter();
    tracing::info!(
        "Serving {} at {} fps",
        settings.year.year,
        settings.timeline.fps()
    );

    rocket::build()
        .manage(settings)
        .manage(generator)
        .attach(cors)
        .attach(db::stage())
        .attach(entrypoints::stage())
        .mount(
            "/",
            SwaggerUi::new("/swagger-ui/<_..>")
                .url("/api-docs/openapi.json", entrypoints::ApiDoc::openapi()),
        )
}
