use shared::{
    github::StatsSource, GithubHandle, Stats, StatsBuilder, WrappedError, YearRange,
};
use tracing::{error, info, instrument, warn};

use crate::{db::types::ProfileRecord, sink::ProfileSink};

/// Logs a failed sub-query and treats it as missing data.
fn available<T>(query: &str, result: anyhow::Result<Option<T>>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("Query {query} is unavailable: {e:#}");
            None
        }
    }
}

/// Resolves the account behind the credential. Stored records are keyed by
/// this login.
#[instrument(skip(source))]
pub async fn identify<S>(source: &S) -> Result<GithubHandle, WrappedError>
where
    S: StatsSource + ?Sized,
{
    available("viewer_login", source.viewer_login().await).ok_or(WrappedError::NoIdentityData)
}

/// Runs every query concurrently and merges whatever came back into one
/// record.
///
/// `login` is the identity returned by [`identify`]. Only missing identity
/// data fails the call. The sanitized record is handed to `sink`; a failed
/// write is logged and the stats are still returned.
#[instrument(skip(source, sink))]
pub async fn aggregate<S, P>(
    source: &S,
    sink: &P,
    login: &str,
    year: YearRange,
) -> Result<Stats, WrappedError>
where
    S: StatsSource + ?Sized,
    P: ProfileSink + ?Sized,
{
    let (highlights, languages, repos, follows, stars, contributions, location, membership) = tokio::join!(
        source.highlights(year),
        source.top_languages(year),
        source.top_repos(),
        source.follows(),
        source.stars(),
        source.contributions(year),
        source.location(),
        source.is_member(login),
    );

    let highlights =
        available("highlights", highlights).ok_or(WrappedError::NoIdentityData)?;

    let stats = StatsBuilder::new(highlights, year)
        .top_languages(available("top_languages", languages))
        .top_repos(available("top_repos", repos))
        .top_follows(available("follows", follows))
        .stars(available("stars", stars))
        .contributions_history(available("contributions", contributions))
        .location(available("location", location))
        .build();
    let is_member = available("is_member", membership).unwrap_or_default();

    let record = ProfileRecord::new(stats, is_member);
    if let Err(e) = sink.store_stats(&record).await {
        error!("Failed to persist stats for {}: {e:#}", record.login);
    } else {
        info!("Stored stats for {}", record.login);
    }

    Ok(record.github_stats)
}
