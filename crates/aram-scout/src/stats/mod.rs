// Champion statistics: identity mapping, per-patch win rate aggregation and
// free roster comparison.

pub mod compare;
pub mod identity;
pub mod winrate;

use std::collections::BTreeMap;

use serde::Serialize;

/// Numeric champion id assigned by the reference data.
pub type ChampionId = u32;

/// One champion, joined across the reference data and every patch's stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionRecord {
    pub id: ChampionId,
    /// Reference-data name; what normalized roster names are matched against.
    pub name: String,
    /// Mean of the per-patch win rates (percent). `None` when no patch had
    /// stats for this champion.
    pub win_rate: Option<f64>,
    /// Number of patches that contributed to `win_rate`.
    pub patches_observed: u32,
}

impl ChampionRecord {
    pub fn new(id: ChampionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            win_rate: None,
            patches_observed: 0,
        }
    }
}

/// All known champions keyed by id.
pub type ChampionMap = BTreeMap<ChampionId, ChampionRecord>;
