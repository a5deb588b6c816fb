use shared::{
    github::StatsSource, openai::SceneGenerator, Manifest, Stats, WrappedError, YearRange,
};
use tracing::{error, instrument};

use crate::{
    aggregator::{aggregate, identify},
    compiler::compile,
    sink::ProfileStore,
};

async fn stored_stats<P>(store: &P, login: &str) -> Option<Stats>
where
    P: ProfileStore + ?Sized,
{
    match store.load_stats(login).await {
        Ok(stats) => stats,
        Err(e) => {
            error!("Failed to load stats for {login}: {e:#}");
            None
        }
    }
}

/// Stats of the credential's owner: the stored record when there is one, a
/// fresh aggregation otherwise.
#[instrument(skip(source, store))]
pub async fn stats_for<S, P>(source: &S, store: &P, year: YearRange) -> Result<Stats, WrappedError>
where
    S: StatsSource + ?Sized,
    P: ProfileStore + ?Sized,
{
    let login = identify(source).await?;
    if let Some(stats) = stored_stats(store, &login).await {
        return Ok(stats);
    }
    aggregate(source, store, &login, year).await
}

/// Manifest of the credential's owner, compiled from their stats on first
/// request.
#[instrument(skip(source, generator, store))]
pub async fn manifest_for<S, G, P>(
    source: &S,
    generator: &G,
    store: &P,
    year: YearRange,
) -> Result<Manifest, WrappedError>
where
    S: StatsSource + ?Sized,
    G: SceneGenerator + ?Sized,
    P: ProfileStore + ?Sized,
{
    let login = identify(source).await?;
    match store.load_manifest(&login).await {
        Ok(Some(manifest)) => return Ok(manifest),
        Ok(None) => {}
        Err(e) => error!("Failed to load manifest for {login}: {e:#}"),
    }

    let stats = match stored_stats(store, &login).await {
        Some(stats) => stats,
        None => aggregate(source, store, &login, year).await?,
    };
    compile(generator, store, &login, &stats).await
}
