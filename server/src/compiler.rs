use shared::{openai::SceneGenerator, Manifest, Stats, WrappedError};
use tracing::{error, info, instrument, warn};

use crate::sink::ProfileSink;

/// The first attempt plus one repair attempt.
pub const GENERATION_ATTEMPTS: usize = 2;

/// Turns a stats record into a twelve-scene manifest.
///
/// The generator only ever sees the prompt projection of `stats`. A response
/// that fails validation is asked for once more; there is no fallback
/// manifest. The result is handed to `sink`, whose failure is only logged.
#[instrument(skip(generator, sink, stats))]
pub async fn compile<G, P>(
    generator: &G,
    sink: &P,
    login: &str,
    stats: &Stats,
) -> Result<Manifest, WrappedError>
where
    G: SceneGenerator + ?Sized,
    P: ProfileSink + ?Sized,
{
    let prompt = stats.clone().into_prompt();

    let mut last_error = None;
    let mut generated = None;
    for attempt in 1..=GENERATION_ATTEMPTS {
        match generator.generate(&prompt).await {
            Ok(manifest) => {
                generated = Some(manifest);
                break;
            }
            Err(e) => {
                warn!("Generation attempt {attempt}/{GENERATION_ATTEMPTS} failed: {e}");
                last_error = Some(e);
            }
        }
    }

    let Some(generated) = generated else {
        return Err(last_error
            .unwrap_or_else(|| WrappedError::CompilationFailed("no attempts made".to_string())));
    };
    let manifest = generated.into_manifest(&mut rand::thread_rng())?;
    info!(
        "Compiled manifest for {login} with {} and {}",
        manifest.song, manifest.planet
    );

    if let Err(e) = sink.store_manifest(login, &manifest).await {
        error!("Failed to persist manifest for {login}: {e:#}");
    }

    Ok(manifest)
}
