// Per-patch win rates from u.gg ranking documents, averaged across patches.
//
// A ranking document looks like `[ { "none": [[id, _, wins, total, ...], ...] }, ... ]`
// and only `[0].none` is read. Cells may be numbers or numeric strings.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::{ChampionId, ChampionMap};

const ID_CELL: usize = 0;
const WINS_CELL: usize = 2;
const TOTAL_CELL: usize = 3;

#[derive(Debug, Error)]
pub enum StatisticsError {
    #[error("stats for patch {patch} are not valid JSON: {source}")]
    NotJson {
        patch: String,
        source: serde_json::Error,
    },

    #[error("stats for patch {patch} have no `[0].none` row list")]
    MissingRows { patch: String },
}

/// The raw rows of one patch's ranking document.
#[derive(Debug, Clone)]
pub struct PatchStats {
    pub patch: String,
    rows: Vec<Value>,
}

/// Parse one patch's ranking document down to its row list.
pub fn parse_patch_stats(patch: &str, json: &str) -> Result<PatchStats, StatisticsError> {
    let doc: Value = serde_json::from_str(json).map_err(|source| StatisticsError::NotJson {
        patch: patch.to_string(),
        source,
    })?;

    let rows = doc
        .get(0)
        .and_then(|first| first.get("none"))
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| StatisticsError::MissingRows {
            patch: patch.to_string(),
        })?;

    Ok(PatchStats {
        patch: patch.to_string(),
        rows,
    })
}

/// Rows the aggregator skipped, by reason.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JoinDiagnostics {
    /// Distinct ids present in stats but absent from the reference data.
    pub unknown_ids: BTreeSet<ChampionId>,
    /// Rows skipped because their id was unknown.
    pub unknown_id_rows: usize,
    /// Rows with zero games; they count as no observation for that patch.
    pub zero_total_rows: usize,
    /// Rows that could not be read at all.
    pub malformed_rows: usize,
}

impl JoinDiagnostics {
    pub fn skipped_rows(&self) -> usize {
        self.unknown_id_rows + self.zero_total_rows + self.malformed_rows
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct StatRow {
    id: ChampionId,
    wins: f64,
    total: f64,
}

impl StatRow {
    fn win_rate(&self) -> f64 {
        self.wins * 100.0 / self.total
    }
}

#[derive(Debug, PartialEq)]
enum RowIssue {
    Malformed(String),
    ZeroTotal(ChampionId),
}

fn parse_row(row: &Value) -> Result<StatRow, RowIssue> {
    let cells = row
        .as_array()
        .ok_or_else(|| RowIssue::Malformed("row is not an array".into()))?;
    if cells.len() <= TOTAL_CELL {
        return Err(RowIssue::Malformed(format!(
            "row has {} cells, need at least {}",
            cells.len(),
            TOTAL_CELL + 1
        )));
    }

    let id = id_cell(&cells[ID_CELL])
        .ok_or_else(|| RowIssue::Malformed(format!("bad id {}", cells[ID_CELL])))?;
    let wins = count_cell(&cells[WINS_CELL])
        .ok_or_else(|| RowIssue::Malformed(format!("bad wins {} for id {id}", cells[WINS_CELL])))?;
    let total = count_cell(&cells[TOTAL_CELL]).ok_or_else(|| {
        RowIssue::Malformed(format!("bad total {} for id {id}", cells[TOTAL_CELL]))
    })?;

    if total == 0.0 {
        return Err(RowIssue::ZeroTotal(id));
    }
    if wins > total {
        return Err(RowIssue::Malformed(format!(
            "{wins} wins out of {total} games for id {id}"
        )));
    }

    Ok(StatRow { id, wins, total })
}

fn id_cell(cell: &Value) -> Option<ChampionId> {
    match cell {
        Value::Number(n) => n.as_u64().and_then(|v| ChampionId::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn count_cell(cell: &Value) -> Option<f64> {
    let v = match cell {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (v.is_finite() && v >= 0.0).then_some(v)
}

/// Fill in `win_rate` and `patches_observed` on every champion.
///
/// A champion's win rate is the unweighted mean of its per-patch rates over
/// the patches that have a usable row for it; patches without one are skipped,
/// not counted as zero. If a patch lists the same id twice, the last usable
/// row wins; a later zero-total or malformed row does not clear an earlier
/// rate. Rows that cannot be used are skipped and tallied in the returned
/// diagnostics.
pub fn aggregate(champions: &mut ChampionMap, patches: &[PatchStats]) -> JoinDiagnostics {
    let mut diagnostics = JoinDiagnostics::default();
    let mut totals: HashMap<ChampionId, (f64, u32)> = HashMap::new();

    for patch in patches {
        let mut rates: BTreeMap<ChampionId, f64> = BTreeMap::new();

        for row in &patch.rows {
            match parse_row(row) {
                Ok(stat) if !champions.contains_key(&stat.id) => {
                    warn!(
                        "patch {}: id {} is not in the reference data, skipping row",
                        patch.patch, stat.id
                    );
                    diagnostics.unknown_ids.insert(stat.id);
                    diagnostics.unknown_id_rows += 1;
                }
                Ok(stat) => {
                    rates.insert(stat.id, stat.win_rate());
                }
                Err(RowIssue::ZeroTotal(id)) => {
                    warn!("patch {}: id {id} has zero games, skipping row", patch.patch);
                    diagnostics.zero_total_rows += 1;
                }
                Err(RowIssue::Malformed(reason)) => {
                    warn!("patch {}: skipping malformed row: {reason}", patch.patch);
                    diagnostics.malformed_rows += 1;
                }
            }
        }

        debug!(patch = %patch.patch, champions = rates.len(), "patch win rates");
        for (id, rate) in rates {
            let entry = totals.entry(id).or_insert((0.0, 0));
            entry.0 += rate;
            entry.1 += 1;
        }
    }

    for (id, champion) in champions.iter_mut() {
        match totals.get(id) {
            Some(&(sum, observed)) => {
                champion.win_rate = Some(sum / f64::from(observed));
                champion.patches_observed = observed;
            }
            None => {
                champion.win_rate = None;
                champion.patches_observed = 0;
            }
        }
    }

    diagnostics
}
