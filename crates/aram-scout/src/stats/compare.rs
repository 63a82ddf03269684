// Free roster comparison: the roster's average win rate and the non-free
// champions that beat it by the configured coefficient.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use super::{ChampionId, ChampionMap};

#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("none of the {roster_size} free roster champions has a win rate")]
    NoFreeRosterWinRates { roster_size: usize },
}

/// A non-free champion whose win rate clears the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoodChampion {
    pub id: ChampionId,
    pub name: String,
    pub win_rate: f64,
    pub patches_observed: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Mean win rate of the free champions that have one.
    pub free_average: f64,
    /// `free_average * coefficient`; good champions are strictly above it.
    pub threshold: f64,
    /// Sorted by win rate descending, then name.
    pub good: Vec<GoodChampion>,
    /// Free roster names (deduplicated, roster order) that matched no champion
    /// with a win rate.
    pub unmatched_free_names: Vec<String>,
}

/// Average win rate over free roster champions.
///
/// Only champions with a win rate count, in the numerator and the
/// denominator alike, and each champion counts once however often its name
/// appears in the roster.
pub fn free_roster_average(
    champions: &ChampionMap,
    free_roster: &[String],
) -> Result<f64, ComparisonError> {
    let free: HashSet<&str> = free_roster.iter().map(String::as_str).collect();

    let (sum, count) = champions
        .values()
        .filter(|c| free.contains(c.name.as_str()))
        .filter_map(|c| c.win_rate)
        .fold((0.0, 0u32), |(sum, count), rate| (sum + rate, count + 1));

    if count == 0 {
        return Err(ComparisonError::NoFreeRosterWinRates {
            roster_size: free.len(),
        });
    }
    Ok(sum / f64::from(count))
}

/// Non-free champions with a win rate strictly above `average * coefficient`.
pub fn find_good_champions(
    champions: &ChampionMap,
    free_roster: &[String],
    average: f64,
    coefficient: f64,
) -> Vec<GoodChampion> {
    let free: HashSet<&str> = free_roster.iter().map(String::as_str).collect();
    let threshold = average * coefficient;

    let mut good: Vec<GoodChampion> = champions
        .values()
        .filter(|c| !free.contains(c.name.as_str()))
        .filter_map(|c| {
            let rate = c.win_rate?;
            (rate > threshold).then(|| GoodChampion {
                id: c.id,
                name: c.name.clone(),
                win_rate: rate,
                patches_observed: c.patches_observed,
            })
        })
        .collect();

    good.sort_by(|a, b| {
        b.win_rate
            .partial_cmp(&a.win_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    good
}

/// Run the whole comparison.
pub fn compare(
    champions: &ChampionMap,
    free_roster: &[String],
    coefficient: f64,
) -> Result<Comparison, ComparisonError> {
    let free_average = free_roster_average(champions, free_roster)?;
    let good = find_good_champions(champions, free_roster, free_average, coefficient);

    let rated: HashSet<&str> = champions
        .values()
        .filter(|c| c.win_rate.is_some())
        .map(|c| c.name.as_str())
        .collect();
    let mut seen = HashSet::new();
    let unmatched_free_names = free_roster
        .iter()
        .filter(|name| !rated.contains(name.as_str()) && seen.insert(name.as_str()))
        .cloned()
        .collect();

    Ok(Comparison {
        free_average,
        threshold: free_average * coefficient,
        good,
        unmatched_free_names,
    })
}
