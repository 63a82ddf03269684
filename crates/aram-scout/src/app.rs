// Run orchestration: fetch the three sources, join, compare, report.
//
// Fetching and analysis are split so the analysis can be driven from fixture
// documents without a `Fetcher`.

use futures_util::future::try_join_all;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::fetch::{FetchError, Fetcher};
use crate::report::Report;
use crate::roster::{self, ExtractionError};
use crate::stats::compare::{self, ComparisonError};
use crate::stats::identity::{self, ResolutionError};
use crate::stats::winrate::{self, StatisticsError};

/// Any failure that aborts a run.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Statistics(#[from] StatisticsError),

    #[error(transparent)]
    Comparison(#[from] ComparisonError),
}

/// Raw bodies of every source a run reads.
#[derive(Debug, Clone)]
pub struct SourceDocuments {
    pub roster_html: String,
    pub reference_json: String,
    /// `(patch, body)` in configured patch order.
    pub stats: Vec<(String, String)>,
}

/// Fetch every source. The roster page and reference data are fetched
/// together, then all patches together; nothing is analysed until every
/// fetch has finished.
pub async fn fetch_sources<F>(config: &Config, fetcher: &F) -> Result<SourceDocuments, FetchError>
where
    F: Fetcher + ?Sized,
{
    info!("Fetching free roster and champion ids");
    let (roster_html, reference_json) = tokio::try_join!(
        fetcher.get_text(&config.sources.roster_url),
        fetcher.get_text(&config.sources.reference_url),
    )?;

    info!("Fetching stats for {} patch(es)", config.patches.len());
    let urls: Vec<String> = config.patches.iter().map(|p| config.stats_url(p)).collect();
    let bodies = try_join_all(urls.iter().map(|url| fetcher.get_text(url))).await?;

    Ok(SourceDocuments {
        roster_html,
        reference_json,
        stats: config.patches.iter().cloned().zip(bodies).collect(),
    })
}

/// Turn fetched documents into a report.
pub fn analyze(config: &Config, docs: &SourceDocuments) -> Result<Report, ScoutError> {
    let free_roster = roster::extract_free_roster(&docs.roster_html, &config.roster)?;
    info!("Free roster has {} champions", free_roster.len());

    let mut champions = identity::resolve_champions(&docs.reference_json)?;
    info!("Reference data lists {} champions", champions.len());

    let patches = docs
        .stats
        .iter()
        .map(|(patch, body)| winrate::parse_patch_stats(patch, body))
        .collect::<Result<Vec<_>, _>>()?;

    let join = winrate::aggregate(&mut champions, &patches);
    if join.skipped_rows() > 0 {
        info!(
            "Skipped {} stats rows ({} unknown ids)",
            join.skipped_rows(),
            join.unknown_ids.len()
        );
    }

    let comparison = compare::compare(&champions, &free_roster, config.coefficient)?;
    info!(
        "Free roster average {:.3}, {} champions above {:.3}",
        comparison.free_average,
        comparison.good.len(),
        comparison.threshold
    );

    Ok(Report::new(
        config.coefficient,
        &config.patches,
        &free_roster,
        &champions,
        comparison,
        join,
    ))
}

/// Fetch and analyse in one go.
pub async fn run<F>(config: &Config, fetcher: &F) -> Result<Report, ScoutError>
where
    F: Fetcher + ?Sized,
{
    let docs = fetch_sources(config, fetcher).await?;
    analyze(config, &docs)
}
